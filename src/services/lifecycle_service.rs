//! Transaction lifecycle
//!
//! Donors open pledges and attach proof; admins move records between
//! `pending`, `approved` and `rejected` and may credit donors directly.
//! Transitions only ever change the status column. Aggregates are derived on
//! read, so nothing else needs updating.

use uuid::Uuid;

use crate::{
    constants::funds,
    db::{ProofGuard, TransactionStore, UserStore},
    error::{AppError, AppResult, FieldViolations},
    models::{Identity, NewTransaction, Transaction, TransactionStatus},
    services::{access::AccessPolicy, transaction_service::TransactionService},
};

/// Donor-supplied pledge fields
#[derive(Debug, Clone, Default)]
pub struct PledgeRequest {
    pub amount: Option<f64>,
    pub category: Option<String>,
    pub is_private: Option<bool>,
    pub notes: Option<String>,
    pub proof_url: Option<String>,
}

/// Admin credit on behalf of a donor, as submitted
#[derive(Debug, Clone, Default)]
pub struct ManualCredit {
    pub user_id: String,
    pub amount: Option<f64>,
    pub category: String,
    /// Defaults to `approved`
    pub status: Option<String>,
}

pub struct LifecycleService;

impl LifecycleService {
    /// Admin status change. Any of `pending`, `approved`, `rejected` may be set
    /// from any state; setting the current status again is a no-op update.
    pub async fn transition(
        store: &dyn TransactionStore,
        identity: Option<&Identity>,
        id: Uuid,
        status: &str,
    ) -> AppResult<Transaction> {
        let admin = AccessPolicy::require_admin(identity)?;
        let status = Self::admissible_status(status)?;

        let transaction = TransactionService::update_status(store, id, status).await?;
        tracing::info!(
            transaction_id = %id,
            status = %status,
            admin = %admin.username,
            "Transaction status changed"
        );
        Ok(transaction)
    }

    /// Statuses an admin may set by hand
    fn admissible_status(status: &str) -> AppResult<TransactionStatus> {
        match status.trim().parse::<TransactionStatus>()? {
            TransactionStatus::Completed => Err(AppError::InvalidStatus(
                "completed cannot be set through a status change".to_string(),
            )),
            status => Ok(status),
        }
    }

    /// Donor attaches proof of payment to one of their own pending pledges.
    /// The pending check happens in the same write as the update, so a
    /// concurrent approval makes this fail with `Conflict`.
    pub async fn attach_proof(
        store: &dyn TransactionStore,
        identity: Option<&Identity>,
        id: Uuid,
        proof_url: &str,
    ) -> AppResult<Transaction> {
        let donor = AccessPolicy::require_donor(identity)?;
        let guard = ProofGuard {
            owner_id: donor.id,
            status: Some(TransactionStatus::Pending),
        };

        let transaction =
            TransactionService::attach_proof_guarded(store, id, proof_url, guard).await?;
        tracing::info!(transaction_id = %id, donor = %donor.username, "Proof attached");
        Ok(transaction)
    }

    /// Donor opens a new pledge under their own display name
    pub async fn submit_pledge(
        transactions: &dyn TransactionStore,
        users: &dyn UserStore,
        identity: Option<&Identity>,
        request: PledgeRequest,
    ) -> AppResult<Transaction> {
        let donor = AccessPolicy::require_donor(identity)?;
        let user = users
            .find_by_id(donor.id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        let transaction = TransactionService::create(
            transactions,
            NewTransaction {
                owner_id: Some(user.id),
                donor_name: user.name,
                // absent amounts fail the positive-number check
                amount: request.amount.unwrap_or(f64::NAN),
                category: request.category,
                proof_url: request.proof_url,
                status: Some(TransactionStatus::Pending),
                is_private: request.is_private,
                notes: request.notes,
                ..Default::default()
            },
        )
        .await?;

        tracing::info!(
            transaction_id = %transaction.id,
            donor = %donor.username,
            "Pledge submitted"
        );
        Ok(transaction)
    }

    /// Admin records a donation directly against a donor account
    pub async fn credit_manual(
        transactions: &dyn TransactionStore,
        users: &dyn UserStore,
        identity: Option<&Identity>,
        credit: ManualCredit,
    ) -> AppResult<Transaction> {
        let admin = AccessPolicy::require_admin(identity)?;

        let mut violations = FieldViolations::new();
        let user_id = match credit.user_id.trim() {
            "" => {
                violations.push("user_id", "is required");
                None
            }
            raw => raw
                .parse::<Uuid>()
                .map_err(|_| violations.push("user_id", "must be a valid id"))
                .ok(),
        };
        let category = credit.category.trim().to_lowercase();
        if !funds::MANUAL_CATEGORIES.contains(&category.as_str()) {
            violations.push(
                "category",
                format!("must be one of {}", funds::MANUAL_CATEGORIES.join(", ")),
            );
        }
        let status = match credit.status.as_deref().map(str::trim) {
            None | Some("") => Some(TransactionStatus::Approved),
            Some(s) => match s.parse::<TransactionStatus>() {
                Ok(s @ (TransactionStatus::Approved | TransactionStatus::Pending)) => Some(s),
                _ => {
                    violations.push("status", "must be approved or pending");
                    None
                }
            },
        };
        let amount = match credit.amount {
            None => {
                violations.push("amount", "is required");
                None
            }
            Some(amount) if !amount.is_finite() || amount <= 0.0 => {
                violations.push("amount", "must be a positive number");
                None
            }
            amount => amount,
        };
        let (user_id, status, amount) = match (user_id, status, amount) {
            (Some(user_id), Some(status), Some(amount)) if violations.is_empty() => {
                (user_id, status, amount)
            }
            _ => return Err(AppError::Validation(violations)),
        };

        let user = users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        let transaction = TransactionService::create(
            transactions,
            NewTransaction {
                owner_id: Some(user.id),
                donor_name: user.name,
                amount,
                category: Some(category),
                description: Some(format!("Manually added by admin - {}", status)),
                status: Some(status),
                ..Default::default()
            },
        )
        .await?;

        tracing::info!(
            transaction_id = %transaction.id,
            user_id = %user_id,
            amount,
            admin = %admin.username,
            "Manual credit recorded"
        );
        Ok(transaction)
    }

    /// Admin removes a transaction outright
    pub async fn delete(
        store: &dyn TransactionStore,
        identity: Option<&Identity>,
        id: Uuid,
    ) -> AppResult<()> {
        let admin = AccessPolicy::require_admin(identity)?;
        TransactionService::delete(store, id).await?;
        tracing::info!(transaction_id = %id, admin = %admin.username, "Transaction deleted");
        Ok(())
    }
}
