//! Authentication request DTOs

use serde::Deserialize;
use validator::Validate;

use crate::{constants::MAX_PASSWORD_LENGTH, models::NewUser};

/// Self-registration request; field rules live on [`NewUser::validate`]
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RegisterRequest {
    pub name: String,
    pub username: String,
    pub phone: String,
    pub whatsapp: String,
    pub password: String,
}

impl From<RegisterRequest> for NewUser {
    fn from(req: RegisterRequest) -> Self {
        NewUser {
            name: req.name,
            username: req.username,
            phone: req.phone,
            whatsapp: req.whatsapp,
            password: req.password,
        }
    }
}

/// User login request
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "is required"))]
    pub username: String,

    #[validate(length(min = 1, max = MAX_PASSWORD_LENGTH, message = "is required"))]
    pub password: String,
}

/// Token refresh request
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct RefreshTokenRequest {
    #[validate(length(min = 1, message = "is required"))]
    pub refresh_token: String,
}

/// Logout request
#[derive(Debug, Default, Deserialize)]
pub struct LogoutRequest {
    /// Session to end; ignored when `all_sessions` is set
    pub refresh_token: Option<String>,
    pub all_sessions: Option<bool>,
}
