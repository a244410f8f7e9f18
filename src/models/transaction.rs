//! Transaction model
//!
//! A transaction is a single donation record. Its category (`type` on the
//! wire) is free text; funds are derived from it by keyword, see
//! [`crate::services::aggregator`].

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    constants::{
        statuses, DEFAULT_TRANSACTION_TYPE, MAX_DESCRIPTION_LENGTH, MAX_NAME_LENGTH,
        MAX_NOTES_LENGTH, MAX_PROOF_URL_LENGTH,
    },
    error::{AppError, AppResult, FieldViolations},
};

/// Verification state of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Pending,
    Approved,
    Rejected,
    /// Only produced by imported data; never set through the admin workflow
    Completed,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => statuses::PENDING,
            Self::Approved => statuses::APPROVED,
            Self::Rejected => statuses::REJECTED,
            Self::Completed => statuses::COMPLETED,
        }
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            statuses::PENDING => Ok(Self::Pending),
            statuses::APPROVED => Ok(Self::Approved),
            statuses::REJECTED => Ok(Self::Rejected),
            statuses::COMPLETED => Ok(Self::Completed),
            other => Err(AppError::InvalidStatus(format!(
                "{} is not a valid status",
                other
            ))),
        }
    }
}

/// Transaction domain model
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transaction {
    pub id: Uuid,
    /// Resolved owner; `None` for entries recorded under a display name only
    pub owner_id: Option<Uuid>,
    pub donor_name: String,
    pub amount: f64,
    #[serde(rename = "type")]
    pub category: String,
    pub description: Option<String>,
    pub proof_url: Option<String>,
    pub status: TransactionStatus,
    pub is_private: bool,
    pub notes: Option<String>,
    /// When the donation nominally happened; may be back- or front-dated
    pub date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    /// Date used for donor-facing ordering
    pub fn effective_date(&self) -> DateTime<Utc> {
        self.date.unwrap_or(self.created_at)
    }

    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.owner_id == Some(user_id)
    }

    /// A pledge is a transaction without proof of payment
    pub fn is_pledge(&self) -> bool {
        self.proof_url.is_none()
    }
}

/// Caller-supplied fields for a new transaction
#[derive(Debug, Clone, Default)]
pub struct NewTransaction {
    pub owner_id: Option<Uuid>,
    pub donor_name: String,
    pub amount: f64,
    pub category: Option<String>,
    pub description: Option<String>,
    pub proof_url: Option<String>,
    pub status: Option<TransactionStatus>,
    pub is_private: Option<bool>,
    pub notes: Option<String>,
    pub date: Option<DateTime<Utc>>,
}

/// Validated, fully defaulted transaction ready to be stored
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionDraft {
    pub owner_id: Option<Uuid>,
    pub donor_name: String,
    pub amount: f64,
    pub category: String,
    pub description: Option<String>,
    pub proof_url: Option<String>,
    pub status: TransactionStatus,
    pub is_private: bool,
    pub notes: Option<String>,
    pub date: DateTime<Utc>,
}

impl NewTransaction {
    /// Trim every string field, apply defaults and check all constraints.
    ///
    /// Every violated constraint is reported, not just the first. `now`
    /// becomes the effective date when none was given.
    pub fn validate(self, now: DateTime<Utc>) -> AppResult<TransactionDraft> {
        let mut violations = FieldViolations::new();

        let donor_name = self.donor_name.trim().to_string();
        if donor_name.is_empty() {
            violations.push("donor_name", "is required");
        } else if donor_name.chars().count() as u64 > MAX_NAME_LENGTH {
            violations.push(
                "donor_name",
                format!("cannot exceed {} characters", MAX_NAME_LENGTH),
            );
        }

        if !self.amount.is_finite() || self.amount <= 0.0 {
            violations.push("amount", "must be a positive number");
        }

        let category =
            trimmed(self.category).unwrap_or_else(|| DEFAULT_TRANSACTION_TYPE.to_string());

        let description = trimmed(self.description);
        check_max_len(&description, "description", MAX_DESCRIPTION_LENGTH, &mut violations);

        let notes = trimmed(self.notes);
        check_max_len(&notes, "notes", MAX_NOTES_LENGTH, &mut violations);

        let proof_url = trimmed(self.proof_url);
        check_max_len(&proof_url, "proof_url", MAX_PROOF_URL_LENGTH, &mut violations);

        violations.into_result()?;

        Ok(TransactionDraft {
            owner_id: self.owner_id,
            donor_name,
            amount: self.amount,
            category,
            description,
            proof_url,
            status: self.status.unwrap_or(TransactionStatus::Pending),
            is_private: self.is_private.unwrap_or(false),
            notes,
            date: self.date.unwrap_or(now),
        })
    }
}

/// Trim a proof reference and reject it when blank or oversized.
pub fn normalize_proof_url(proof_url: &str) -> AppResult<String> {
    let proof_url = proof_url.trim();
    if proof_url.is_empty() {
        return Err(AppError::invalid_field("proof_url", "is required"));
    }
    if proof_url.chars().count() as u64 > MAX_PROOF_URL_LENGTH {
        return Err(AppError::invalid_field(
            "proof_url",
            format!("cannot exceed {} characters", MAX_PROOF_URL_LENGTH),
        ));
    }
    Ok(proof_url.to_string())
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn check_max_len(
    value: &Option<String>,
    field: &str,
    max: u64,
    violations: &mut FieldViolations,
) {
    if let Some(value) = value {
        if value.chars().count() as u64 > max {
            violations.push(field, format!("cannot exceed {} characters", max));
        }
    }
}
