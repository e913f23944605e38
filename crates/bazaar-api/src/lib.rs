//! HTTP surface for bazaar.
//!
//! Exposes the chatbot endpoint, product CRUD, and the embedded chat page
//! over axum, with CORS and request tracing.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::{create_router, start_server};
pub use state::AppState;
