//! Query routing: the central coordinator of the conversational core.
//!
//! Decides per query between a structured attribute answer, generative
//! fallback, and the no-match reply. Owns the process-wide conversation
//! state (token window plus the last resolved product) behind a single
//! mutex, so concurrent requests cannot interleave context mutation.

use std::sync::Arc;

use tokio::sync::Mutex;

use bazaar_core::types::Product;
use bazaar_storage::ProductRepository;

use crate::context::{ConversationWindow, MAX_CONTEXT_TOKENS};
use crate::error::ChatError;
use crate::generator::Generator;
use crate::matcher::ProductMatcher;
use crate::resolver::AttributeResolver;

/// Fixed reply when no product resolves and none is cached.
pub const NO_MATCH_REPLY: &str = "Sorry, I couldn't find a matching product for your query.";

/// The outcome of a routed query.
#[derive(Clone, Debug, PartialEq)]
pub enum Reply {
    /// Deterministic template answer from stored product data.
    Structured(String),
    /// Free-form continuation from the generator.
    Generated(String),
    /// No product resolved and none cached; informational, not an error.
    NoMatch(String),
}

impl Reply {
    /// The user-visible reply text.
    pub fn text(&self) -> &str {
        match self {
            Reply::Structured(s) | Reply::Generated(s) | Reply::NoMatch(s) => s,
        }
    }
}

/// Conversation state shared across requests.
///
/// There is exactly one conversation per process: the window of recent
/// tokens and the last product any query resolved. A later query with no
/// product mention still answers about the cached product — deliberate
/// cross-call carry-over.
#[derive(Debug, Default)]
struct ChatState {
    window: ConversationWindow,
    last_product: Option<Product>,
}

/// Routes raw queries to attribute answers or generative fallback.
pub struct QueryRouter {
    matcher: ProductMatcher,
    resolver: AttributeResolver,
    generator: Arc<dyn Generator>,
    context_tokens: usize,
    state: Mutex<ChatState>,
}

impl QueryRouter {
    pub fn new(products: Arc<ProductRepository>, generator: Arc<dyn Generator>) -> Self {
        Self {
            matcher: ProductMatcher::new(products),
            resolver: AttributeResolver,
            generator,
            context_tokens: MAX_CONTEXT_TOKENS,
            state: Mutex::new(ChatState::default()),
        }
    }

    /// Override the window cap and generation length, normally from
    /// `[chat] context_tokens` in the config file.
    pub fn with_context_tokens(mut self, context_tokens: usize) -> Self {
        self.context_tokens = context_tokens;
        self
    }

    /// Handle one query end to end.
    ///
    /// The state mutex is held for the whole turn, including the generator
    /// call, which serializes context mutation across concurrent requests.
    pub async fn handle(&self, query: &str) -> Result<Reply, ChatError> {
        if query.trim().is_empty() {
            return Err(ChatError::EmptyQuery);
        }

        let mut state = self.state.lock().await;

        if let Some(product) = self.matcher.find(query)? {
            state.last_product = Some(product);
        }
        let Some(product) = state.last_product.clone() else {
            return Ok(Reply::NoMatch(NO_MATCH_REPLY.to_string()));
        };

        if let Some(answer) = self.resolver.resolve(query, &product) {
            tracing::debug!(product = %product.name, "Structured attribute answer");
            return Ok(Reply::Structured(answer));
        }

        // Generative fallback: encode the query with an end marker, continue
        // from prior context, decode only the newly produced suffix, and
        // keep the trailing window for the next turn.
        let mut incoming = self.generator.encode(query);
        incoming.push(self.generator.eos_token());
        let input = state.window.compose_input(&incoming);

        let full = self.generator.complete(&input, self.context_tokens).await?;
        let suffix_start = input.len().min(full.len());
        let reply = self.generator.decode(&full[suffix_start..]);
        state.window.retain_tail(&full, self.context_tokens);

        tracing::debug!(
            window_tokens = state.window.len(),
            reply_chars = reply.len(),
            "Generated fallback reply"
        );
        Ok(Reply::Generated(reply))
    }
}
