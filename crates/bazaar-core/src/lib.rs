//! Core types, configuration, and errors shared across all bazaar crates.

pub mod config;
pub mod error;
pub mod types;

pub use config::BazaarConfig;
pub use error::{BazaarError, Result};
pub use types::{NewProduct, PriceValue, Product, ProductPatch};
