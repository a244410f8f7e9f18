//! Rabta Ledger - Donation Transaction Ledger Service
//!
//! Donors pledge amounts and attach proof of payment; admins verify
//! pledges and credit donations by hand. Fund totals are always derived from
//! the stored transactions, never kept as counters.
//!
//! # Architecture
//!
//! The application follows a layered architecture:
//! - **Handlers**: HTTP request handlers (thin layer)
//! - **Services**: Access policy, lifecycle rules and ledger aggregation
//! - **Stores**: Storage ports with Postgres and Redis adapters
//! - **Models**: Domain models and input validation

pub mod config;
pub mod constants;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod state;
pub mod utils;

#[cfg(test)]
pub(crate) mod test_utils;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, AppResult};
pub use state::AppState;
