use thiserror::Error;

/// Top-level error type for the bazaar system.
///
/// Each variant wraps a subsystem-specific failure. Subsystem crates define
/// their own error types and convert via `From` so that the `?` operator
/// works across crate boundaries.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BazaarError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Generator error: {0}")]
    Generator(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for BazaarError {
    fn from(err: toml::de::Error) -> Self {
        BazaarError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for BazaarError {
    fn from(err: toml::ser::Error) -> Self {
        BazaarError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for BazaarError {
    fn from(err: serde_json::Error) -> Self {
        BazaarError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for bazaar operations.
pub type Result<T> = std::result::Result<T, BazaarError>;
