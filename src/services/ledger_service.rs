//! Ledger views
//!
//! Read-side composition of stored transactions with the pure aggregator.

use serde::Serialize;

use crate::{
    constants::PUBLIC_LEDGER_LIMIT,
    db::TransactionStore,
    error::AppResult,
    models::{Identity, PageRequest, Pagination, Transaction, TransactionStatus},
    services::{
        access::AccessPolicy,
        aggregator::{self, DonorSummary, LedgerStats, PublicLedgerEntry},
        transaction_service::TransactionService,
    },
};

/// Admin dashboard: the (optionally filtered) listing plus ledger-wide stats
#[derive(Debug, Clone, Serialize)]
pub struct AdminOverview {
    pub transactions: Vec<Transaction>,
    pub stats: LedgerStats,
}

/// Donor dashboard: one page of history, totals over all of it
#[derive(Debug, Clone, Serialize)]
pub struct DonorOverview {
    pub transactions: Vec<Transaction>,
    pub pagination: Pagination,
    pub summary: DonorSummary,
    pub public_ledger: Vec<PublicLedgerEntry>,
}

pub struct LedgerService;

impl LedgerService {
    /// Stats are always computed over the whole ledger, whatever the filter.
    pub async fn admin_overview(
        store: &dyn TransactionStore,
        identity: Option<&Identity>,
        status: Option<&str>,
    ) -> AppResult<AdminOverview> {
        AccessPolicy::require_admin(identity)?;
        let status = status
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::parse::<TransactionStatus>)
            .transpose()?;

        let all = TransactionService::find_all(store, None).await?;
        let stats = aggregator::ledger_stats(&all);
        let transactions = match status {
            Some(status) => all.into_iter().filter(|t| t.status == status).collect(),
            None => all,
        };

        Ok(AdminOverview {
            transactions,
            stats,
        })
    }

    pub async fn donor_overview(
        store: &dyn TransactionStore,
        identity: Option<&Identity>,
        page: PageRequest,
    ) -> AppResult<DonorOverview> {
        let donor = AccessPolicy::require_donor(identity)?;

        let (transactions, pagination) =
            TransactionService::find_by_owner_page(store, donor.id, page).await?;
        let owned = TransactionService::find_by_owner(store, donor.id).await?;
        let summary = aggregator::donor_summary(&owned);
        let public_ledger = Self::public_entries(store).await?;

        Ok(DonorOverview {
            transactions,
            pagination,
            summary,
            public_ledger,
        })
    }

    /// Open to any signed-in caller
    pub async fn public_ledger(
        store: &dyn TransactionStore,
        identity: Option<&Identity>,
    ) -> AppResult<Vec<PublicLedgerEntry>> {
        AccessPolicy::authenticated(identity)?;
        Self::public_entries(store).await
    }

    async fn public_entries(store: &dyn TransactionStore) -> AppResult<Vec<PublicLedgerEntry>> {
        let recent = store
            .find_recent(TransactionStatus::Approved, PUBLIC_LEDGER_LIMIT as i64)
            .await?;
        Ok(aggregator::public_ledger(&recent, PUBLIC_LEDGER_LIMIT))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        constants::ANONYMOUS_DONOR_NAME,
        db::store::MockTransactionStore,
        error::AppError,
        models::{Role, TransactionStatus::*},
        test_utils::{
            identity, seed_transaction, seed_user, MemoryTransactionStore, MemoryUserStore,
        },
    };

    #[tokio::test]
    async fn test_admin_overview_stats_ignore_filter() {
        let users = MemoryUserStore::default();
        let admin = identity(&seed_user(&users, "admin", Role::Admin).await);
        let store = MemoryTransactionStore::default();
        seed_transaction(&store, None, 5000.0, "rabta", Approved).await;
        seed_transaction(&store, None, 1500.0, "Madrassa", Approved).await;
        seed_transaction(&store, None, 100.0, "rabta", Pending).await;

        let overview = LedgerService::admin_overview(&store, Some(&admin), Some("pending"))
            .await
            .unwrap();

        assert_eq!(overview.transactions.len(), 1);
        assert_eq!(overview.stats.total_approved_funds, 6500.0);
        assert_eq!(overview.stats.rabta_fund, 5000.0);
        assert_eq!(overview.stats.madrassa_fund, 1500.0);
        assert_eq!(overview.stats.pending_count, 1);
        assert_eq!(overview.stats.total_transactions, 3);
    }

    #[tokio::test]
    async fn test_admin_overview_invalid_filter() {
        let users = MemoryUserStore::default();
        let admin = identity(&seed_user(&users, "admin", Role::Admin).await);
        let store = MemoryTransactionStore::default();

        let result = LedgerService::admin_overview(&store, Some(&admin), Some("bogus")).await;
        assert!(matches!(result, Err(AppError::InvalidStatus(_))));

        let blank = LedgerService::admin_overview(&store, Some(&admin), Some("  ")).await;
        assert!(blank.is_ok());
    }

    #[tokio::test]
    async fn test_donor_overview_only_own_records() {
        let users = MemoryUserStore::default();
        let donor = identity(&seed_user(&users, "donor", Role::Donor).await);
        let store = MemoryTransactionStore::default();
        seed_transaction(&store, Some(donor.id), 300.0, "rabta", Approved).await;
        seed_transaction(&store, Some(donor.id), 50.0, "rabta", Pending).await;
        seed_transaction(&store, None, 999.0, "rabta", Approved).await;

        let overview = LedgerService::donor_overview(&store, Some(&donor), PageRequest::default())
            .await
            .unwrap();
        assert_eq!(overview.transactions.len(), 2);
        assert_eq!(overview.summary.total_approved_donations, 300.0);
        assert_eq!(overview.summary.pending_pledges, 1);
        assert_eq!(overview.public_ledger.len(), 2);
    }

    #[tokio::test]
    async fn test_donor_overview_pages_history_but_not_totals() {
        let users = MemoryUserStore::default();
        let donor = identity(&seed_user(&users, "donor", Role::Donor).await);
        let store = MemoryTransactionStore::default();
        for _ in 0..3 {
            seed_transaction(&store, Some(donor.id), 100.0, "rabta", Approved).await;
        }

        let page = PageRequest::new(Some(2), Some(2));
        let overview = LedgerService::donor_overview(&store, Some(&donor), page)
            .await
            .unwrap();
        assert_eq!(overview.transactions.len(), 1);
        assert_eq!(overview.pagination.page, 2);
        assert_eq!(overview.pagination.limit, 2);
        assert_eq!(overview.pagination.total_count, 3);
        assert_eq!(overview.pagination.total_pages, 2);
        assert_eq!(overview.summary.total_approved_donations, 300.0);
    }

    #[tokio::test]
    async fn test_public_ledger_reads_only_recent_approved() {
        let users = MemoryUserStore::default();
        let donor = identity(&seed_user(&users, "donor", Role::Donor).await);

        let mut store = MockTransactionStore::new();
        store.expect_find_all().never();
        store
            .expect_find_recent()
            .withf(|status, limit| *status == Approved && *limit == PUBLIC_LEDGER_LIMIT as i64)
            .times(1)
            .returning(|_, _| Ok(Vec::new()));

        let ledger = LedgerService::public_ledger(&store, Some(&donor)).await.unwrap();
        assert!(ledger.is_empty());
    }

    #[tokio::test]
    async fn test_public_ledger_requires_identity_and_redacts() {
        let users = MemoryUserStore::default();
        let donor = identity(&seed_user(&users, "donor", Role::Donor).await);
        let store = MemoryTransactionStore::default();
        let mut row = MemoryTransactionStore::row(10.0, "rabta", Approved);
        row.is_private = true;
        row.proof_url = Some("https://p.example/secret.png".to_string());
        store.insert_row(row);

        assert!(matches!(
            LedgerService::public_ledger(&store, None).await,
            Err(AppError::Unauthorized)
        ));

        let ledger = LedgerService::public_ledger(&store, Some(&donor)).await.unwrap();
        assert_eq!(ledger[0].donor_name, ANONYMOUS_DONOR_NAME);
        assert_eq!(ledger[0].proof_url, None);
    }
}
