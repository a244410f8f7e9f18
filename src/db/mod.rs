//! Database module
//!
//! This module handles database connections, migrations, storage ports and
//! their Postgres/Redis adapters.

pub mod connection;
pub mod repositories;
pub mod sessions;
pub mod store;

use sqlx::PgPool;

pub use connection::*;
pub use sessions::RedisSessionStore;
pub use store::{ProofGuard, SessionStore, TransactionStore, UserStore};

/// Run database migrations
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
