//! Storage ports
//!
//! Services talk to persistence only through these traits. The Postgres and
//! Redis adapters live next to this module; tests substitute in-memory ones.

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{
        ProfileChanges, Role, Transaction, TransactionDraft, TransactionStatus, User, UserDraft,
    },
};

/// Conditions a proof update must meet at the moment it is written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProofGuard {
    /// Resolved owner (`user_id`, else legacy `donor_id`)
    pub owner_id: Uuid,
    /// Status the record must currently have, if any
    pub status: Option<TransactionStatus>,
}

impl ProofGuard {
    /// Whether a record owned by `owner_id` with `status` passes
    pub fn admits(&self, owner_id: Option<Uuid>, status: TransactionStatus) -> bool {
        owner_id == Some(self.owner_id) && self.status.is_none_or(|required| required == status)
    }
}

/// Persistence port for donation records
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TransactionStore: Send + Sync {
    /// Insert a validated draft and return the stored record
    async fn insert(&self, draft: TransactionDraft) -> AppResult<Transaction>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Transaction>>;

    /// Records whose owner resolves to `owner_id`, newest effective date first
    async fn find_by_owner(&self, owner_id: Uuid) -> AppResult<Vec<Transaction>>;

    /// One page of [`find_by_owner`](Self::find_by_owner) plus the owner's total count
    async fn find_by_owner_page(
        &self,
        owner_id: Uuid,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<Transaction>, i64)>;

    /// All records, optionally restricted to one status, newest created first
    async fn find_all(&self, status: Option<TransactionStatus>) -> AppResult<Vec<Transaction>>;

    /// The `limit` newest records with `status`
    async fn find_recent(
        &self,
        status: TransactionStatus,
        limit: i64,
    ) -> AppResult<Vec<Transaction>>;

    /// Change only the status; `None` when the id is unknown
    async fn set_status(
        &self,
        id: Uuid,
        status: TransactionStatus,
    ) -> AppResult<Option<Transaction>>;

    /// Change only the proof reference, in the same write that checks `guard`.
    /// `None` when the id is unknown or the guard did not hold.
    async fn set_proof(
        &self,
        id: Uuid,
        proof_url: String,
        guard: ProofGuard,
    ) -> AppResult<Option<Transaction>>;

    /// `false` when nothing was deleted
    async fn delete(&self, id: Uuid) -> AppResult<bool>;

    /// Delete every record owned by `owner_id`, returning how many went
    async fn delete_by_owner(&self, owner_id: Uuid) -> AppResult<u64>;
}

/// Persistence port for accounts
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new account; a taken username yields `AppError::Conflict`
    async fn insert(&self, draft: UserDraft) -> AppResult<User>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    async fn find_by_username(&self, username: String) -> AppResult<Option<User>>;

    /// Accounts with the given role, newest first
    async fn list_by_role(&self, role: Role) -> AppResult<Vec<User>>;

    async fn update_profile(&self, id: Uuid, changes: ProfileChanges) -> AppResult<Option<User>>;

    async fn delete(&self, id: Uuid) -> AppResult<bool>;
}

/// Refresh-session port. Tokens are only ever handed over hashed.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn save(&self, user_id: Uuid, token_hash: String, ttl_secs: u64) -> AppResult<()>;

    /// Consume a session, returning its user when it was still live
    async fn take(&self, token_hash: String) -> AppResult<Option<Uuid>>;

    async fn revoke_all(&self, user_id: Uuid) -> AppResult<()>;
}
