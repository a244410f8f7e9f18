//! User model

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    constants::{roles, MAX_NAME_LENGTH, MAX_PASSWORD_LENGTH, MIN_PASSWORD_LENGTH},
    error::{AppError, AppResult, FieldViolations},
    utils::validation::{normalize_username, validate_phone, validate_username},
};

/// Role attached to every account; fixed at creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Donor,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Donor => roles::DONOR,
            Role::Admin => roles::ADMIN,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            roles::DONOR => Ok(Role::Donor),
            roles::ADMIN => Ok(Role::Admin),
            other => Err(AppError::InvalidInput(format!(
                "Invalid role: {}. Valid roles: {:?}",
                other,
                roles::ALL
            ))),
        }
    }
}

/// User domain model
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub username: String,
    pub phone: String,
    pub whatsapp: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Check if user has admin privileges
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// The identity this user acts under once authenticated
    pub fn identity(&self) -> Identity {
        Identity {
            id: self.id,
            username: self.username.clone(),
            role: self.role,
        }
    }
}

/// Authenticated caller, passed explicitly into every core operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: Uuid,
    pub username: String,
    pub role: Role,
}

impl Identity {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Account fields supplied on registration or admin creation
#[derive(Debug, Clone, Default)]
pub struct NewUser {
    pub name: String,
    pub username: String,
    pub phone: String,
    pub whatsapp: String,
    pub password: String,
}

/// Normalized account fields, ready for hashing and insertion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedUser {
    pub name: String,
    pub username: String,
    pub phone: String,
    pub whatsapp: String,
    pub password: String,
}

impl NewUser {
    /// Trim, lowercase the username and check every field, reporting all violations at once.
    pub fn validate(self) -> AppResult<ValidatedUser> {
        self.validate_with(FieldViolations::new())
    }

    /// As [`validate`](Self::validate), reporting `violations` found by the caller alongside
    pub fn validate_with(self, mut violations: FieldViolations) -> AppResult<ValidatedUser> {

        let name = self.name.trim().to_string();
        check_name(&name, &mut violations);

        let username = normalize_username(&self.username);
        if let Err(message) = validate_username(&username) {
            violations.push("username", message);
        }

        let phone = self.phone.trim().to_string();
        if let Err(message) = validate_phone(&phone) {
            violations.push("phone", message);
        }

        let whatsapp = self.whatsapp.trim().to_string();
        if let Err(message) = validate_phone(&whatsapp) {
            violations.push("whatsapp", message);
        }

        let password_len = self.password.chars().count() as u64;
        if password_len < MIN_PASSWORD_LENGTH {
            violations.push(
                "password",
                format!("must be at least {} characters", MIN_PASSWORD_LENGTH),
            );
        } else if password_len > MAX_PASSWORD_LENGTH {
            violations.push(
                "password",
                format!("cannot exceed {} characters", MAX_PASSWORD_LENGTH),
            );
        }

        violations.into_result()?;

        Ok(ValidatedUser {
            name,
            username,
            phone,
            whatsapp,
            password: self.password,
        })
    }
}

/// Row-ready account, password already hashed
#[derive(Debug, Clone)]
pub struct UserDraft {
    pub name: String,
    pub username: String,
    pub phone: String,
    pub whatsapp: String,
    pub password_hash: String,
    pub role: Role,
}

/// Partial self-service profile update; absent fields stay as they are
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileChanges {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub whatsapp: Option<String>,
}

impl ProfileChanges {
    /// Trim supplied fields, dropping blank ones, and validate what remains.
    pub fn validate(self) -> AppResult<ProfileChanges> {
        let mut violations = FieldViolations::new();

        let name = non_blank(self.name);
        if let Some(name) = &name {
            check_name(name, &mut violations);
        }

        let phone = non_blank(self.phone);
        if let Some(phone) = &phone {
            if let Err(message) = validate_phone(phone) {
                violations.push("phone", message);
            }
        }

        let whatsapp = non_blank(self.whatsapp);
        if let Some(whatsapp) = &whatsapp {
            if let Err(message) = validate_phone(whatsapp) {
                violations.push("whatsapp", message);
            }
        }

        violations.into_result()?;

        Ok(ProfileChanges {
            name,
            phone,
            whatsapp,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.phone.is_none() && self.whatsapp.is_none()
    }
}

fn check_name(name: &str, violations: &mut FieldViolations) {
    if name.is_empty() {
        violations.push("name", "is required");
    } else if name.chars().count() as u64 > MAX_NAME_LENGTH {
        violations.push(
            "name",
            format!("cannot exceed {} characters", MAX_NAME_LENGTH),
        );
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
