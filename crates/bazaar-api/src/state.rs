//! Application state shared across all route handlers.
//!
//! AppState holds the product repository and the query router; it is passed
//! to handlers via axum's State extractor.

use std::sync::Arc;
use std::time::Instant;

use bazaar_chat::QueryRouter;
use bazaar_storage::ProductRepository;

/// Shared application state.
///
/// All fields use `Arc` for cheap cloning across handler tasks. The router
/// guards the single conversation state internally.
#[derive(Clone)]
pub struct AppState {
    /// Product persistence.
    pub products: Arc<ProductRepository>,
    /// Conversational core.
    pub router: Arc<QueryRouter>,
    /// Server start time for uptime reporting.
    pub start_time: Instant,
}

impl AppState {
    pub fn new(products: Arc<ProductRepository>, router: Arc<QueryRouter>) -> Self {
        Self {
            products,
            router,
            start_time: Instant::now(),
        }
    }
}
