//! Donor request DTOs

use serde::Deserialize;

use crate::{
    models::{PageRequest, ProfileChanges},
    services::lifecycle_service::PledgeRequest,
    utils::deserialize_amount,
};

/// `?page=&limit=` on the donor history
#[derive(Debug, Default, Deserialize)]
pub struct HistoryQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl From<HistoryQuery> for PageRequest {
    fn from(query: HistoryQuery) -> Self {
        PageRequest::new(query.page, query.limit)
    }
}

/// Partial profile update
#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub whatsapp: Option<String>,
}

impl From<UpdateProfileRequest> for ProfileChanges {
    fn from(req: UpdateProfileRequest) -> Self {
        ProfileChanges {
            name: req.name,
            phone: req.phone,
            whatsapp: req.whatsapp,
        }
    }
}

/// New pledge; `amount` may arrive as a number or a numeric string
#[derive(Debug, Default, Deserialize)]
pub struct CreatePledgeRequest {
    #[serde(default, deserialize_with = "deserialize_amount")]
    pub amount: Option<f64>,
    #[serde(rename = "type")]
    pub category: Option<String>,
    pub is_private: Option<bool>,
    pub notes: Option<String>,
    pub proof_url: Option<String>,
}

impl From<CreatePledgeRequest> for PledgeRequest {
    fn from(req: CreatePledgeRequest) -> Self {
        PledgeRequest {
            amount: req.amount,
            category: req.category,
            is_private: req.is_private,
            notes: req.notes,
            proof_url: req.proof_url,
        }
    }
}

/// Proof of payment for an existing pledge; checked by `normalize_proof_url`
#[derive(Debug, Default, Deserialize)]
pub struct AttachProofRequest {
    #[serde(default)]
    pub proof_url: String,
}
