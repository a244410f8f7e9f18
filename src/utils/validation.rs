//! Input validation utilities

use std::sync::LazyLock;

use regex::Regex;

use crate::constants::{MAX_USERNAME_LENGTH, MIN_USERNAME_LENGTH};

static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9_]+$").expect("valid username pattern"));

/// Pakistani mobile number, optionally prefixed with `+92` or `0`
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\+92|0)?[0-9]{10}$").expect("valid phone pattern"));

/// Usernames are stored trimmed and lowercased
pub fn normalize_username(username: &str) -> String {
    username.trim().to_lowercase()
}

/// Validate an already normalized username
pub fn validate_username(username: &str) -> Result<(), &'static str> {
    let len = username.chars().count() as u64;
    if len < MIN_USERNAME_LENGTH {
        return Err("must be at least 3 characters");
    }
    if len > MAX_USERNAME_LENGTH {
        return Err("cannot exceed 50 characters");
    }
    if !USERNAME_RE.is_match(username) {
        return Err("can only contain lowercase letters, numbers, and underscores");
    }
    Ok(())
}

/// Validate a phone or WhatsApp number
pub fn validate_phone(phone: &str) -> Result<(), &'static str> {
    if phone.is_empty() {
        return Err("is required");
    }
    if !PHONE_RE.is_match(phone) {
        return Err("must be a valid Pakistani phone number");
    }
    Ok(())
}
