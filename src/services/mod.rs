//! Business logic services

pub mod access;
pub mod aggregator;
pub mod auth_service;
pub mod ledger_service;
pub mod lifecycle_service;
pub mod transaction_service;
pub mod user_service;

pub use access::AccessPolicy;
pub use auth_service::AuthService;
pub use ledger_service::LedgerService;
pub use lifecycle_service::LifecycleService;
pub use transaction_service::TransactionService;
pub use user_service::UserService;
