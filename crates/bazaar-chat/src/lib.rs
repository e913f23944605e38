//! Conversational core for bazaar.
//!
//! Routes natural-language catalog queries: product-attribute questions get
//! deterministic template answers from stored data; everything else falls
//! through to a text-generation model with a bounded conversation window.

pub mod context;
pub mod error;
pub mod generator;
pub mod matcher;
pub mod resolver;
pub mod router;

pub use context::{ConversationWindow, MAX_CONTEXT_TOKENS};
pub use error::ChatError;
pub use generator::{Generator, HostedGenerator, ScriptedGenerator, TokenId, EOS_TOKEN};
pub use matcher::ProductMatcher;
pub use resolver::AttributeResolver;
pub use router::{QueryRouter, Reply, NO_MATCH_REPLY};
