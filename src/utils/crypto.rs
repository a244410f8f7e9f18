//! Refresh token material
//!
//! Clients hold the raw token; only its SHA-256 digest is ever stored.

use rand::{distr::Alphanumeric, Rng};
use sha2::{Digest, Sha256};

use crate::constants::REFRESH_TOKEN_LENGTH;

/// Fresh opaque refresh token of [`REFRESH_TOKEN_LENGTH`] alphanumerics
pub fn generate_refresh_token() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(REFRESH_TOKEN_LENGTH)
        .map(char::from)
        .collect()
}

/// Storage key for a refresh token: hex SHA-256 of the raw value
pub fn token_digest(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}
