//! Utility functions

pub mod amount;
pub mod crypto;
pub mod validation;

pub use amount::deserialize_amount;
pub use crypto::{generate_refresh_token, token_digest};
pub use validation::{normalize_username, validate_phone, validate_username};
