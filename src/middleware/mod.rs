//! HTTP middleware

pub mod auth;
pub mod logging;

pub use auth::{identity_middleware, CurrentIdentity};
pub use logging::logging_middleware;
