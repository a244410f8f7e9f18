//! Domain models
//!
//! This module contains all domain models used throughout the application.

pub mod pagination;
pub mod transaction;
pub mod user;

pub use pagination::{PageRequest, Pagination};
pub use transaction::*;
pub use user::*;
