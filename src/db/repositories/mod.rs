//! Database repositories
//!
//! Postgres adapters for the storage ports in [`crate::db::store`].

pub mod transaction_repo;
pub mod user_repo;

pub use transaction_repo::{PgTransactionRepository, TransactionRow};
pub use user_repo::{PgUserRepository, UserRow};
