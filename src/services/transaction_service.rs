//! Transaction repository service
//!
//! The domain-level contract over a [`TransactionStore`]: validation on the
//! way in, `NotFound` for unknown ids, ownership checks on proof attachment.

use chrono::Utc;
use uuid::Uuid;

use crate::{
    db::{ProofGuard, TransactionStore},
    error::{AppError, AppResult},
    models::{
        normalize_proof_url, NewTransaction, PageRequest, Pagination, Transaction,
        TransactionStatus,
    },
};

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Transaction {} not found", id))
}

pub struct TransactionService;

impl TransactionService {
    /// Validate and persist a new transaction
    pub async fn create(
        store: &dyn TransactionStore,
        fields: NewTransaction,
    ) -> AppResult<Transaction> {
        let draft = fields.validate(Utc::now())?;
        store.insert(draft).await
    }

    pub async fn find_by_id(store: &dyn TransactionStore, id: Uuid) -> AppResult<Transaction> {
        store.find_by_id(id).await?.ok_or_else(|| not_found(id))
    }

    /// Everything owned by `owner_id` through either ownership column
    pub async fn find_by_owner(
        store: &dyn TransactionStore,
        owner_id: Uuid,
    ) -> AppResult<Vec<Transaction>> {
        store.find_by_owner(owner_id).await
    }

    /// One page of the owner's records, newest first, with paging metadata
    pub async fn find_by_owner_page(
        store: &dyn TransactionStore,
        owner_id: Uuid,
        page: PageRequest,
    ) -> AppResult<(Vec<Transaction>, Pagination)> {
        let (transactions, total) = store
            .find_by_owner_page(owner_id, page.offset(), page.limit())
            .await?;
        Ok((transactions, Pagination::new(page, total)))
    }

    pub async fn find_all(
        store: &dyn TransactionStore,
        status: Option<TransactionStatus>,
    ) -> AppResult<Vec<Transaction>> {
        store.find_all(status).await
    }

    /// Change only the status of a transaction
    pub async fn update_status(
        store: &dyn TransactionStore,
        id: Uuid,
        status: TransactionStatus,
    ) -> AppResult<Transaction> {
        store
            .set_status(id, status)
            .await?
            .ok_or_else(|| not_found(id))
    }

    /// Attach proof of payment on behalf of `owner_id`. Status is left alone.
    pub async fn attach_proof(
        store: &dyn TransactionStore,
        id: Uuid,
        proof_url: &str,
        owner_id: Uuid,
    ) -> AppResult<Transaction> {
        let guard = ProofGuard {
            owner_id,
            status: None,
        };
        Self::attach_proof_guarded(store, id, proof_url, guard).await
    }

    /// Attach proof only if `guard` holds when the write happens. Ownership and
    /// status are checked by the update itself; a refused update is re-read
    /// to report `NotFound`, `Forbidden` or `Conflict`.
    pub async fn attach_proof_guarded(
        store: &dyn TransactionStore,
        id: Uuid,
        proof_url: &str,
        guard: ProofGuard,
    ) -> AppResult<Transaction> {
        let proof_url = normalize_proof_url(proof_url)?;
        if let Some(updated) = store.set_proof(id, proof_url, guard).await? {
            return Ok(updated);
        }

        let current = Self::find_by_id(store, id).await?;
        if !current.is_owned_by(guard.owner_id) {
            return Err(AppError::Forbidden(
                "Cannot attach proof to another donor's transaction".to_string(),
            ));
        }
        Err(match guard.status {
            Some(required) if current.status != required => AppError::Conflict(format!(
                "Proof can only be attached while {} (currently {})",
                required, current.status
            )),
            _ => AppError::Conflict("Transaction changed while attaching proof".to_string()),
        })
    }

    pub async fn delete(store: &dyn TransactionStore, id: Uuid) -> AppResult<()> {
        if store.delete(id).await? {
            Ok(())
        } else {
            Err(not_found(id))
        }
    }

    /// Remove every transaction owned by `owner_id`, returning the count
    pub async fn delete_by_owner(store: &dyn TransactionStore, owner_id: Uuid) -> AppResult<u64> {
        store.delete_by_owner(owner_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::store::MockTransactionStore,
        test_utils::{seed_transaction, MemoryTransactionStore},
    };
    use chrono::Duration;
    use TransactionStatus::*;

    fn pledge(owner: Uuid, amount: f64) -> NewTransaction {
        NewTransaction {
            owner_id: Some(owner),
            donor_name: "Ahmed Ali".to_string(),
            amount,
            category: Some("rabta".to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_applies_defaults() {
        let store = MemoryTransactionStore::default();
        let owner = Uuid::new_v4();

        let tx = TransactionService::create(&store, pledge(owner, 5000.0))
            .await
            .unwrap();

        assert_eq!(tx.status, Pending);
        assert_eq!(tx.owner_id, Some(owner));
        assert!(!tx.is_private);
        assert!(tx.date.is_some());
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_without_storing() {
        let store = MemoryTransactionStore::default();
        let result = TransactionService::create(&store, pledge(Uuid::new_v4(), 0.0)).await;

        assert!(matches!(result, Err(AppError::Validation(_))));
        assert_eq!(store.len(), 0);
    }

    #[tokio::test]
    async fn test_find_by_id_unknown_is_not_found() {
        let store = MemoryTransactionStore::default();
        let result = TransactionService::find_by_id(&store, Uuid::new_v4()).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_find_by_owner_includes_legacy_donor_id_rows() {
        let store = MemoryTransactionStore::default();
        let owner = Uuid::new_v4();

        let current = seed_transaction(&store, Some(owner), 100.0, "rabta", Approved).await;
        let mut legacy = MemoryTransactionStore::row(40.0, "madrassa", Approved);
        legacy.donor_id = Some(owner);
        legacy.date = Some(Utc::now() - Duration::days(30));
        let legacy_id = legacy.id;
        store.insert_row(legacy);
        seed_transaction(&store, Some(Uuid::new_v4()), 1.0, "rabta", Approved).await;

        let found = TransactionService::find_by_owner(&store, owner).await.unwrap();
        let ids: Vec<Uuid> = found.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![current.id, legacy_id]);
        assert!(found.iter().all(|t| t.is_owned_by(owner)));
    }

    #[tokio::test]
    async fn test_find_by_owner_page() {
        let store = MemoryTransactionStore::default();
        let owner = Uuid::new_v4();
        let now = Utc::now();
        let mut ids = Vec::new();
        for days_ago in 0..5 {
            let mut row = MemoryTransactionStore::row(10.0, "rabta", Pending);
            row.user_id = Some(owner);
            row.date = Some(now - Duration::days(days_ago));
            ids.push(row.id);
            store.insert_row(row);
        }
        seed_transaction(&store, Some(Uuid::new_v4()), 9.0, "rabta", Pending).await;

        let page_two = PageRequest::new(Some(2), Some(2));
        let (page, meta) = TransactionService::find_by_owner_page(&store, owner, page_two)
            .await
            .unwrap();
        let page_ids: Vec<Uuid> = page.iter().map(|t| t.id).collect();
        assert_eq!(page_ids, ids[2..4].to_vec());
        assert_eq!(meta.total_count, 5);
        assert_eq!(meta.total_pages, 3);

        let page_four = PageRequest::new(Some(4), Some(2));
        let (past_end, _) = TransactionService::find_by_owner_page(&store, owner, page_four)
            .await
            .unwrap();
        assert!(past_end.is_empty());
    }

    #[tokio::test]
    async fn test_find_all_filters_by_status() {
        let store = MemoryTransactionStore::default();
        seed_transaction(&store, None, 1.0, "rabta", Pending).await;
        let approved = seed_transaction(&store, None, 2.0, "rabta", Approved).await;

        let all = TransactionService::find_all(&store, None).await.unwrap();
        assert_eq!(all.len(), 2);

        let filtered = TransactionService::find_all(&store, Some(Approved)).await.unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, approved.id);
    }

    #[tokio::test]
    async fn test_update_status_touches_only_status() {
        let store = MemoryTransactionStore::default();
        let tx = seed_transaction(&store, None, 75.0, "madrassa", Pending).await;

        let updated = TransactionService::update_status(&store, tx.id, Approved)
            .await
            .unwrap();

        assert_eq!(updated.status, Approved);
        assert_eq!(updated.amount, tx.amount);
        assert_eq!(updated.category, tx.category);
        assert_eq!(updated.donor_name, tx.donor_name);
        assert_eq!(updated.created_at, tx.created_at);
        assert!(updated.updated_at > tx.updated_at);
    }

    #[tokio::test]
    async fn test_update_status_unknown_is_not_found() {
        let store = MemoryTransactionStore::default();
        let result = TransactionService::update_status(&store, Uuid::new_v4(), Approved).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_attach_proof_checks_owner() {
        let store = MemoryTransactionStore::default();
        let owner = Uuid::new_v4();
        let tx = seed_transaction(&store, Some(owner), 10.0, "rabta", Pending).await;

        let denied =
            TransactionService::attach_proof(&store, tx.id, "https://p.example/x", Uuid::new_v4())
                .await;
        assert!(matches!(denied, Err(AppError::Forbidden(_))));

        let stored = TransactionService::find_by_id(&store, tx.id).await.unwrap();
        assert_eq!(stored.proof_url, None);

        let attached =
            TransactionService::attach_proof(&store, tx.id, " https://p.example/x.png ", owner)
                .await
                .unwrap();
        assert_eq!(attached.proof_url.as_deref(), Some("https://p.example/x.png"));
        assert_eq!(attached.status, Pending);
    }

    #[tokio::test]
    async fn test_attach_proof_unknown_is_not_found() {
        let store = MemoryTransactionStore::default();
        let result =
            TransactionService::attach_proof(&store, Uuid::new_v4(), "https://p.ex", Uuid::new_v4())
                .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_and_delete_by_owner() {
        let store = MemoryTransactionStore::default();
        let owner = Uuid::new_v4();
        let tx = seed_transaction(&store, Some(owner), 1.0, "rabta", Pending).await;
        seed_transaction(&store, Some(owner), 2.0, "rabta", Approved).await;
        seed_transaction(&store, None, 3.0, "rabta", Approved).await;

        TransactionService::delete(&store, tx.id).await.unwrap();
        assert!(matches!(
            TransactionService::delete(&store, tx.id).await,
            Err(AppError::NotFound(_))
        ));

        let removed = TransactionService::delete_by_owner(&store, owner).await.unwrap();
        assert_eq!(removed, 1);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_store_failure_propagates_unchanged() {
        let mut store = MockTransactionStore::new();
        store
            .expect_set_status()
            .returning(|_, _| Err(AppError::Database("connection reset".to_string())));

        let result = TransactionService::update_status(&store, Uuid::new_v4(), Rejected).await;
        assert!(matches!(result, Err(AppError::Database(msg)) if msg == "connection reset"));
    }
}
