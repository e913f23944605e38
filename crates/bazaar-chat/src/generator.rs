//! The text-generation collaborator.
//!
//! The router never interprets tokens beyond concatenation, truncation, and
//! length; the `Generator` trait owns the text<->token mapping and the
//! continuation call. `HostedGenerator` talks to a hosted inference API;
//! `ScriptedGenerator` is deterministic for tests and offline runs.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ChatError;

/// Opaque token identifier.
pub type TokenId = u32;

/// Reserved end-of-sequence / padding token id.
///
/// NUL never occurs in chat text, so id 0 is free for the marker.
pub const EOS_TOKEN: TokenId = 0;

/// Map text to a token sequence (one Unicode scalar value per token).
pub fn encode_text(text: &str) -> Vec<TokenId> {
    text.chars().map(|c| c as TokenId).collect()
}

/// Map a token sequence back to text, skipping special tokens.
pub fn decode_tokens(tokens: &[TokenId]) -> String {
    tokens
        .iter()
        .filter(|&&t| t != EOS_TOKEN)
        .filter_map(|&t| char::from_u32(t))
        .collect()
}

/// A conversational model: given a token sequence, produce a continuation.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Encode text as tokens.
    fn encode(&self, text: &str) -> Vec<TokenId> {
        encode_text(text)
    }

    /// Decode tokens back to text, dropping special tokens.
    fn decode(&self, tokens: &[TokenId]) -> String {
        decode_tokens(tokens)
    }

    /// The end-of-sequence token id used for turn markers and padding.
    fn eos_token(&self) -> TokenId {
        EOS_TOKEN
    }

    /// Continue `input`, returning the full sequence (input followed by the
    /// newly produced tokens), capped at `max_total` tokens overall. The
    /// input itself is never truncated.
    async fn complete(&self, input: &[TokenId], max_total: usize)
        -> Result<Vec<TokenId>, ChatError>;
}

// =============================================================================
// HostedGenerator
// =============================================================================

#[derive(Debug, Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
    parameters: InferenceParameters,
}

#[derive(Debug, Serialize)]
struct InferenceParameters {
    max_length: usize,
    return_full_text: bool,
}

#[derive(Debug, Deserialize)]
struct InferenceReply {
    generated_text: String,
}

/// Generator backed by a hosted text-generation inference endpoint.
#[derive(Clone)]
pub struct HostedGenerator {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl HostedGenerator {
    pub fn new(endpoint: String, api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
            api_key,
        }
    }
}

#[async_trait]
impl Generator for HostedGenerator {
    async fn complete(
        &self,
        input: &[TokenId],
        max_total: usize,
    ) -> Result<Vec<TokenId>, ChatError> {
        let prompt = self.decode(input);
        let request = InferenceRequest {
            inputs: &prompt,
            parameters: InferenceParameters {
                max_length: max_total,
                return_full_text: false,
            },
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ChatError::Generator(format!("request failed: {}", e)))?
            .error_for_status()
            .map_err(|e| ChatError::Generator(format!("inference service error: {}", e)))?;

        let replies: Vec<InferenceReply> = response
            .json()
            .await
            .map_err(|e| ChatError::Generator(format!("invalid response body: {}", e)))?;
        let continuation = replies
            .first()
            .map(|r| r.generated_text.as_str())
            .unwrap_or_default();

        tracing::debug!(
            input_tokens = input.len(),
            continuation_chars = continuation.len(),
            "Generator continuation received"
        );

        let mut full = input.to_vec();
        full.extend(self.encode(continuation));
        full.push(self.eos_token());
        full.truncate(max_total.max(input.len()));
        Ok(full)
    }
}

impl std::fmt::Debug for HostedGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // The credential stays out of debug output.
        f.debug_struct("HostedGenerator")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

// =============================================================================
// ScriptedGenerator
// =============================================================================

/// Deterministic generator that always continues with a fixed reply.
///
/// Used by tests and by offline runs where no inference service is reachable.
#[derive(Clone, Debug)]
pub struct ScriptedGenerator {
    reply: String,
}

impl ScriptedGenerator {
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
        }
    }
}

#[async_trait]
impl Generator for ScriptedGenerator {
    async fn complete(
        &self,
        input: &[TokenId],
        max_total: usize,
    ) -> Result<Vec<TokenId>, ChatError> {
        let mut full = input.to_vec();
        full.extend(self.encode(&self.reply));
        full.push(self.eos_token());
        full.truncate(max_total.max(input.len()));
        Ok(full)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_decode_round_trip() {
        let text = "what is the price of the red chair?";
        assert_eq!(decode_tokens(&encode_text(text)), text);
    }

    #[test]
    fn test_decode_skips_eos() {
        let mut tokens = encode_text("hi");
        tokens.push(EOS_TOKEN);
        tokens.extend(encode_text("there"));
        assert_eq!(decode_tokens(&tokens), "hithere");
    }

    #[test]
    fn test_encode_unicode() {
        let text = "chaise rouge \u{00e9}l\u{00e9}gante";
        assert_eq!(decode_tokens(&encode_text(text)), text);
    }

    #[tokio::test]
    async fn test_scripted_generator_appends_reply() {
        let gen = ScriptedGenerator::new("hello back");
        let input = encode_text("hello");
        let full = gen.complete(&input, 1000).await.unwrap();

        assert_eq!(&full[..input.len()], &input[..]);
        let suffix = gen.decode(&full[input.len()..]);
        assert_eq!(suffix, "hello back");
    }

    #[tokio::test]
    async fn test_scripted_generator_respects_max_total() {
        let gen = ScriptedGenerator::new("x".repeat(50));
        let input = encode_text(&"a".repeat(20));
        let full = gen.complete(&input, 30).await.unwrap();
        assert_eq!(full.len(), 30);
        assert_eq!(&full[..20], &input[..]);
    }

    #[tokio::test]
    async fn test_scripted_generator_never_truncates_input() {
        let gen = ScriptedGenerator::new("ignored");
        let input = encode_text(&"a".repeat(40));
        let full = gen.complete(&input, 10).await.unwrap();
        // Cap is below the input length; the input survives intact.
        assert_eq!(full, input);
    }

    #[test]
    fn test_hosted_generator_debug_hides_key() {
        let gen = HostedGenerator::new(
            "https://example.test/generate".to_string(),
            "hf_secret".to_string(),
        );
        let dbg = format!("{:?}", gen);
        assert!(dbg.contains("example.test"));
        assert!(!dbg.contains("hf_secret"));
    }
}
