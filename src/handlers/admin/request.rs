//! Admin request DTOs

use serde::Deserialize;
use validator::Validate;

use crate::{models::NewUser, services::lifecycle_service::ManualCredit, utils::deserialize_amount};

/// Listing filter
#[derive(Debug, Default, Deserialize)]
pub struct ListTransactionsQuery {
    pub status: Option<String>,
}

/// Status change request
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct UpdateStatusRequest {
    #[validate(length(min = 1, message = "is required"))]
    pub status: String,
}

/// Manual credit against a donor account. Missing fields decode to blanks
/// so that every problem is reported by the credit validation at once.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ManualCreditRequest {
    pub user_id: String,
    #[serde(deserialize_with = "deserialize_amount")]
    pub amount: Option<f64>,
    pub category: String,
    pub status: Option<String>,
}

impl From<ManualCreditRequest> for ManualCredit {
    fn from(req: ManualCreditRequest) -> Self {
        ManualCredit {
            user_id: req.user_id,
            amount: req.amount,
            category: req.category,
            status: req.status,
        }
    }
}

/// Admin-created account; role defaults to donor
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateUserRequest {
    pub name: String,
    pub username: String,
    pub phone: String,
    pub whatsapp: String,
    pub password: String,
    pub role: Option<String>,
}

impl CreateUserRequest {
    pub fn into_parts(self) -> (NewUser, Option<String>) {
        (
            NewUser {
                name: self.name,
                username: self.username,
                phone: self.phone,
                whatsapp: self.whatsapp,
                password: self.password,
            },
            self.role,
        )
    }
}
