//! Error types for the conversational core.

use bazaar_core::error::BazaarError;

/// Errors from the chat engine.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("query cannot be empty")]
    EmptyQuery,
    #[error("generator error: {0}")]
    Generator(String),
    #[error("storage error: {0}")]
    Storage(String),
}

impl From<BazaarError> for ChatError {
    fn from(err: BazaarError) -> Self {
        ChatError::Storage(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_error_display() {
        assert_eq!(ChatError::EmptyQuery.to_string(), "query cannot be empty");
        assert_eq!(
            ChatError::Generator("timeout".to_string()).to_string(),
            "generator error: timeout"
        );
        assert_eq!(
            ChatError::Storage("disk full".to_string()).to_string(),
            "storage error: disk full"
        );
    }

    #[test]
    fn test_chat_error_from_bazaar_error() {
        let err: ChatError = BazaarError::Storage("connection lost".to_string()).into();
        assert!(matches!(err, ChatError::Storage(_)));
        assert!(err.to_string().contains("connection lost"));
    }
}
