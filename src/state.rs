//! Shared handler state
//!
//! Stores are held as trait objects: Postgres and Redis in production,
//! in-memory fakes under test.

use std::sync::Arc;

use redis::aio::ConnectionManager;
use sqlx::PgPool;

use crate::{
    config::Config,
    db::{
        repositories::{PgTransactionRepository, PgUserRepository},
        RedisSessionStore, SessionStore, TransactionStore, UserStore,
    },
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Account storage
    users: Arc<dyn UserStore>,

    /// Donation record storage
    transactions: Arc<dyn TransactionStore>,

    /// Refresh sessions
    sessions: Arc<dyn SessionStore>,

    /// Application configuration
    config: Config,
}

impl AppState {
    /// Create a new application state from arbitrary store implementations
    pub fn new(
        users: Arc<dyn UserStore>,
        transactions: Arc<dyn TransactionStore>,
        sessions: Arc<dyn SessionStore>,
        config: Config,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                users,
                transactions,
                sessions,
                config,
            }),
        }
    }

    /// State backed by Postgres and Redis
    pub fn connected(db: PgPool, redis: ConnectionManager, config: Config) -> Self {
        Self::new(
            Arc::new(PgUserRepository::new(db.clone())),
            Arc::new(PgTransactionRepository::new(db)),
            Arc::new(RedisSessionStore::new(redis)),
            config,
        )
    }

    pub fn users(&self) -> &dyn UserStore {
        self.inner.users.as_ref()
    }

    pub fn transactions(&self) -> &dyn TransactionStore {
        self.inner.transactions.as_ref()
    }

    pub fn sessions(&self) -> &dyn SessionStore {
        self.inner.sessions.as_ref()
    }

    /// Get a reference to the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }
}
