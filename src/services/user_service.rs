//! User service

use futures::future::try_join_all;
use serde::Serialize;
use uuid::Uuid;

use crate::{
    constants::roles,
    db::{TransactionStore, UserStore},
    error::{AppError, AppResult, FieldViolations},
    models::{
        Identity, NewUser, ProfileChanges, Role, Transaction, User, UserDraft, ValidatedUser,
    },
    services::{
        access::AccessPolicy,
        aggregator::{self, ProfileTotals, UserStats},
        auth_service::AuthService,
        transaction_service::TransactionService,
    },
};

/// Donor row on the admin user list
#[derive(Debug, Clone, Serialize)]
pub struct DonorListing {
    #[serde(flatten)]
    pub user: User,
    pub total_contributed: f64,
    pub pending_count: usize,
    pub total_transactions: usize,
}

/// Everything an admin sees about one account
#[derive(Debug, Clone, Serialize)]
pub struct UserDetail {
    pub user: User,
    pub transactions: Vec<Transaction>,
    pub stats: UserStats,
}

/// A donor's own profile page
#[derive(Debug, Clone, Serialize)]
pub struct Profile {
    #[serde(flatten)]
    pub user: User,
    #[serde(flatten)]
    pub totals: ProfileTotals,
}

fn user_not_found() -> AppError {
    AppError::NotFound("User not found".to_string())
}

/// User service for business logic
pub struct UserService;

impl UserService {
    /// Self-registration; always creates a donor
    pub async fn register(users: &dyn UserStore, fields: NewUser) -> AppResult<User> {
        let user = Self::insert(users, fields.validate()?, Role::Donor).await?;
        tracing::info!(user_id = %user.id, username = %user.username, "User registered");
        Ok(user)
    }

    /// Admin-initiated account creation, admins included. A blank role means donor;
    /// an unknown one is reported together with any other invalid field.
    pub async fn create_user(
        users: &dyn UserStore,
        identity: Option<&Identity>,
        fields: NewUser,
        role: Option<&str>,
    ) -> AppResult<User> {
        let admin = AccessPolicy::require_admin(identity)?;

        let mut violations = FieldViolations::new();
        let role = match role.map(str::trim) {
            None | Some("") => Role::Donor,
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                violations.push("role", format!("must be one of {}", roles::ALL.join(", ")));
                Role::Donor
            }),
        };
        let valid = fields.validate_with(violations)?;

        let user = Self::insert(users, valid, role).await?;
        tracing::info!(
            user_id = %user.id,
            role = %user.role,
            admin = %admin.username,
            "User created by admin"
        );
        Ok(user)
    }

    async fn insert(users: &dyn UserStore, valid: ValidatedUser, role: Role) -> AppResult<User> {
        if users.find_by_username(valid.username.clone()).await?.is_some() {
            return Err(AppError::Conflict("Username already exists".to_string()));
        }

        let password_hash = AuthService::hash_password(&valid.password)?;

        users
            .insert(UserDraft {
                name: valid.name,
                username: valid.username,
                phone: valid.phone,
                whatsapp: valid.whatsapp,
                password_hash,
                role,
            })
            .await
    }

    /// Donors, newest first, each with their contribution figures
    pub async fn list_donors(
        users: &dyn UserStore,
        transactions: &dyn TransactionStore,
        identity: Option<&Identity>,
    ) -> AppResult<Vec<DonorListing>> {
        AccessPolicy::require_admin(identity)?;

        let donors = users.list_by_role(Role::Donor).await?;
        try_join_all(donors.into_iter().map(|user| async move {
            let owned = TransactionService::find_by_owner(transactions, user.id).await?;
            let stats = aggregator::per_user_stats(&owned);
            Ok::<_, AppError>(DonorListing {
                user,
                total_contributed: stats.total_contributed,
                pending_count: stats.pending_count,
                total_transactions: stats.total_transactions,
            })
        }))
        .await
    }

    pub async fn user_detail(
        users: &dyn UserStore,
        transactions: &dyn TransactionStore,
        identity: Option<&Identity>,
        id: Uuid,
    ) -> AppResult<UserDetail> {
        AccessPolicy::require_admin(identity)?;

        let user = users.find_by_id(id).await?.ok_or_else(user_not_found)?;
        let mut owned = TransactionService::find_by_owner(transactions, id).await?;
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let stats = aggregator::per_user_stats(&owned);

        Ok(UserDetail {
            user,
            transactions: owned,
            stats,
        })
    }

    /// Delete a donor and everything they own.
    ///
    /// Transactions go first, then the account. The two steps are not atomic:
    /// if the second fails the donor survives without transactions.
    pub async fn delete_user(
        users: &dyn UserStore,
        transactions: &dyn TransactionStore,
        identity: Option<&Identity>,
        id: Uuid,
    ) -> AppResult<()> {
        let admin = AccessPolicy::require_admin(identity)?;

        let user = users.find_by_id(id).await?.ok_or_else(user_not_found)?;
        if user.is_admin() {
            return Err(AppError::Forbidden("Admin accounts cannot be deleted".to_string()));
        }

        let removed = TransactionService::delete_by_owner(transactions, id).await?;
        match users.delete(id).await {
            Ok(true) => {}
            Ok(false) => return Err(user_not_found()),
            Err(e) => {
                tracing::warn!(
                    user_id = %id,
                    removed_transactions = removed,
                    error = %e,
                    "User delete failed after their transactions were removed"
                );
                return Err(e);
            }
        }

        tracing::info!(
            user_id = %id,
            removed_transactions = removed,
            admin = %admin.username,
            "User deleted"
        );
        Ok(())
    }

    /// The caller's own profile with completed-donation totals
    pub async fn profile(
        users: &dyn UserStore,
        transactions: &dyn TransactionStore,
        identity: Option<&Identity>,
    ) -> AppResult<Profile> {
        let donor = AccessPolicy::require_donor(identity)?;

        let user = users.find_by_id(donor.id).await?.ok_or_else(user_not_found)?;
        let owned = TransactionService::find_by_owner(transactions, donor.id).await?;

        Ok(Profile {
            user,
            totals: aggregator::profile_totals(&owned),
        })
    }

    pub async fn update_profile(
        users: &dyn UserStore,
        identity: Option<&Identity>,
        changes: ProfileChanges,
    ) -> AppResult<User> {
        let donor = AccessPolicy::require_donor(identity)?;
        let changes = changes.validate()?;

        if changes.is_empty() {
            return users.find_by_id(donor.id).await?.ok_or_else(user_not_found);
        }

        users
            .update_profile(donor.id, changes)
            .await?
            .ok_or_else(user_not_found)
    }

    /// Account behind an authenticated identity
    pub async fn current_user(
        users: &dyn UserStore,
        identity: Option<&Identity>,
    ) -> AppResult<User> {
        let identity = AccessPolicy::authenticated(identity)?;
        users.find_by_id(identity.id).await?.ok_or(AppError::Unauthorized)
    }
}
