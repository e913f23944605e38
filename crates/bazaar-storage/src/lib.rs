//! SQLite-backed persistence for the product catalog.
//!
//! `Database` owns the connection; `ProductRepository` exposes the CRUD and
//! name-search operations the API and the chat core rely on.

pub mod db;
pub mod migrations;
pub mod repository;

pub use db::Database;
pub use repository::{ProductRepository, UpdateOutcome};
