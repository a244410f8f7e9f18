use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    models::{Role, User},
    services::auth_service::TokenPair,
};

const BEARER: &str = "Bearer";

/// Token pair as sent over the wire
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: &'static str,
    /// Access token lifetime in seconds
    pub expires_in: i64,
}

impl From<TokenPair> for TokenResponse {
    fn from(pair: TokenPair) -> Self {
        Self {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
            token_type: BEARER,
            expires_in: pair.expires_in,
        }
    }
}

/// Login result: tokens plus the account they belong to
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    #[serde(flatten)]
    pub tokens: TokenResponse,
    pub user: UserResponse,
}

impl AuthResponse {
    pub fn new(tokens: TokenPair, user: User) -> Self {
        Self {
            tokens: tokens.into(),
            user: user.into(),
        }
    }
}

/// Account without credentials
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub username: String,
    pub phone: String,
    pub whatsapp: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            username: user.username,
            phone: user.phone,
            whatsapp: user.whatsapp,
            role: user.role,
            created_at: user.created_at,
        }
    }
}

/// `{ "user": ... }` envelope
#[derive(Debug, Serialize)]
pub struct AccountResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    pub user: UserResponse,
}

impl AccountResponse {
    pub fn new(user: User) -> Self {
        Self {
            message: None,
            user: user.into(),
        }
    }

    pub fn with_message(mut self, message: &'static str) -> Self {
        self.message = Some(message);
        self
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}
