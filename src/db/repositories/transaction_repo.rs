//! Transaction repository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::{
    db::store::{ProofGuard, TransactionStore},
    error::{AppError, AppResult},
    models::{Transaction, TransactionDraft, TransactionStatus},
};

/// Stored shape of a transaction, legacy ownership columns included
#[derive(Debug, Clone, FromRow)]
pub struct TransactionRow {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub donor_id: Option<Uuid>,
    pub donor_name: String,
    pub amount: f64,
    #[sqlx(rename = "type")]
    pub category: String,
    pub description: Option<String>,
    pub proof_url: Option<String>,
    pub status: String,
    pub is_private: bool,
    pub notes: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TransactionRow {
    /// Single logical owner: `user_id`, falling back to the legacy `donor_id`
    pub fn owner_id(&self) -> Option<Uuid> {
        self.user_id.or(self.donor_id)
    }

    /// Whether either ownership column references `owner_id`
    pub fn references(&self, owner_id: Uuid) -> bool {
        self.user_id == Some(owner_id) || self.donor_id == Some(owner_id)
    }
}

impl TryFrom<TransactionRow> for Transaction {
    type Error = AppError;

    fn try_from(row: TransactionRow) -> Result<Self, Self::Error> {
        let owner_id = row.owner_id();
        let status = row.status.parse::<TransactionStatus>().map_err(|_| {
            AppError::Database(format!(
                "transaction {} has unknown status {:?}",
                row.id, row.status
            ))
        })?;

        Ok(Transaction {
            id: row.id,
            owner_id,
            donor_name: row.donor_name,
            amount: row.amount,
            category: row.category,
            description: row.description,
            proof_url: row.proof_url.filter(|p| !p.trim().is_empty()),
            status,
            is_private: row.is_private,
            notes: row.notes,
            date: row.date,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn into_domain(rows: Vec<TransactionRow>) -> AppResult<Vec<Transaction>> {
    rows.into_iter().map(Transaction::try_from).collect()
}

/// Postgres-backed transaction store
#[derive(Clone)]
pub struct PgTransactionRepository {
    pool: PgPool,
}

impl PgTransactionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TransactionStore for PgTransactionRepository {
    async fn insert(&self, draft: TransactionDraft) -> AppResult<Transaction> {
        let row = sqlx::query_as::<_, TransactionRow>(
            r#"
            INSERT INTO transactions
                (user_id, donor_name, amount, type, description, proof_url,
                 status, is_private, notes, date)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(draft.owner_id)
        .bind(&draft.donor_name)
        .bind(draft.amount)
        .bind(&draft.category)
        .bind(&draft.description)
        .bind(&draft.proof_url)
        .bind(draft.status.as_str())
        .bind(draft.is_private)
        .bind(&draft.notes)
        .bind(draft.date)
        .fetch_one(&self.pool)
        .await?;

        row.try_into()
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Transaction>> {
        let row = sqlx::query_as::<_, TransactionRow>(r#"SELECT * FROM transactions WHERE id = $1"#)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Transaction::try_from).transpose()
    }

    async fn find_by_owner(&self, owner_id: Uuid) -> AppResult<Vec<Transaction>> {
        let rows = sqlx::query_as::<_, TransactionRow>(
            r#"
            SELECT * FROM transactions
            WHERE user_id = $1 OR donor_id = $1
            ORDER BY COALESCE(date, created_at) DESC
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        into_domain(rows)
    }

    async fn find_by_owner_page(
        &self,
        owner_id: Uuid,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<Transaction>, i64)> {
        let rows = sqlx::query_as::<_, TransactionRow>(
            r#"
            SELECT * FROM transactions
            WHERE user_id = $1 OR donor_id = $1
            ORDER BY COALESCE(date, created_at) DESC, id
            OFFSET $2 LIMIT $3
            "#,
        )
        .bind(owner_id)
        .bind(offset)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        let total: (i64,) = sqlx::query_as(
            r#"SELECT COUNT(*) FROM transactions WHERE user_id = $1 OR donor_id = $1"#,
        )
        .bind(owner_id)
        .fetch_one(&self.pool)
        .await?;

        Ok((into_domain(rows)?, total.0))
    }

    async fn find_all(&self, status: Option<TransactionStatus>) -> AppResult<Vec<Transaction>> {
        let rows = sqlx::query_as::<_, TransactionRow>(
            r#"
            SELECT * FROM transactions
            WHERE ($1::text IS NULL OR status = $1)
            ORDER BY created_at DESC
            "#,
        )
        .bind(status.map(|s| s.as_str()))
        .fetch_all(&self.pool)
        .await?;

        into_domain(rows)
    }

    async fn find_recent(
        &self,
        status: TransactionStatus,
        limit: i64,
    ) -> AppResult<Vec<Transaction>> {
        let rows = sqlx::query_as::<_, TransactionRow>(
            r#"
            SELECT * FROM transactions
            WHERE status = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(status.as_str())
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        into_domain(rows)
    }

    async fn set_status(
        &self,
        id: Uuid,
        status: TransactionStatus,
    ) -> AppResult<Option<Transaction>> {
        let row = sqlx::query_as::<_, TransactionRow>(
            r#"
            UPDATE transactions
            SET status = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Transaction::try_from).transpose()
    }

    async fn set_proof(
        &self,
        id: Uuid,
        proof_url: String,
        guard: ProofGuard,
    ) -> AppResult<Option<Transaction>> {
        let row = sqlx::query_as::<_, TransactionRow>(
            r#"
            UPDATE transactions
            SET proof_url = $2, updated_at = NOW()
            WHERE id = $1
              AND COALESCE(user_id, donor_id) = $3
              AND ($4::text IS NULL OR status = $4)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(proof_url)
        .bind(guard.owner_id)
        .bind(guard.status.map(|s| s.as_str()))
        .fetch_optional(&self.pool)
        .await?;

        row.map(Transaction::try_from).transpose()
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query(r#"DELETE FROM transactions WHERE id = $1"#)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_by_owner(&self, owner_id: Uuid) -> AppResult<u64> {
        let result = sqlx::query(r#"DELETE FROM transactions WHERE user_id = $1 OR donor_id = $1"#)
            .bind(owner_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
