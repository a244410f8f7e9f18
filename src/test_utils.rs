//! In-memory stores and fixtures for unit tests

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::{
    config::{Config, DatabaseConfig, JwtConfig, RedisConfig, ServerConfig},
    db::{repositories::TransactionRow, ProofGuard, SessionStore, TransactionStore, UserStore},
    error::{AppError, AppResult},
    models::{
        Identity, NewTransaction, ProfileChanges, Role, Transaction, TransactionDraft,
        TransactionStatus, User, UserDraft,
    },
    state::AppState,
};

/// Strictly increasing timestamps so ordering assertions never tie
#[derive(Default)]
struct Clock {
    last: Mutex<Option<DateTime<Utc>>>,
}

impl Clock {
    fn tick(&self) -> DateTime<Utc> {
        let mut last = self.last.lock().unwrap();
        let now = match *last {
            Some(prev) if Utc::now() <= prev => prev + Duration::milliseconds(1),
            _ => Utc::now(),
        };
        *last = Some(now);
        now
    }
}

#[derive(Default)]
pub struct MemoryTransactionStore {
    rows: Mutex<Vec<TransactionRow>>,
    clock: Clock,
}

impl MemoryTransactionStore {
    /// Seed a raw row, e.g. one owned only through the legacy `donor_id`
    pub fn insert_row(&self, row: TransactionRow) {
        self.rows.lock().unwrap().push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    /// Raw row with sensible defaults for seeding
    pub fn row(amount: f64, category: &str, status: TransactionStatus) -> TransactionRow {
        let now = Utc::now();
        TransactionRow {
            id: Uuid::new_v4(),
            user_id: None,
            donor_id: None,
            donor_name: "Seeded Donor".to_string(),
            amount,
            category: category.to_string(),
            description: None,
            proof_url: None,
            status: status.as_str().to_string(),
            is_private: false,
            notes: None,
            date: Some(now),
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply `apply` to row `id` when `admits` holds, under one lock
    fn update_where<P, F>(&self, id: Uuid, admits: P, apply: F) -> AppResult<Option<Transaction>>
    where
        P: FnOnce(&TransactionRow) -> bool,
        F: FnOnce(&mut TransactionRow),
    {
        let now = self.clock.tick();
        let mut rows = self.rows.lock().unwrap();
        match rows.iter_mut().find(|r| r.id == id) {
            Some(row) if admits(row) => {
                apply(row);
                row.updated_at = now;
                Ok(Some(row.clone().try_into()?))
            }
            _ => Ok(None),
        }
    }
}

#[async_trait]
impl TransactionStore for MemoryTransactionStore {
    async fn insert(&self, draft: TransactionDraft) -> AppResult<Transaction> {
        let now = self.clock.tick();
        let row = TransactionRow {
            id: Uuid::new_v4(),
            user_id: draft.owner_id,
            donor_id: None,
            donor_name: draft.donor_name,
            amount: draft.amount,
            category: draft.category,
            description: draft.description,
            proof_url: draft.proof_url,
            status: draft.status.as_str().to_string(),
            is_private: draft.is_private,
            notes: draft.notes,
            date: Some(draft.date),
            created_at: now,
            updated_at: now,
        };
        self.rows.lock().unwrap().push(row.clone());
        row.try_into()
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Transaction>> {
        let rows = self.rows.lock().unwrap();
        rows.iter()
            .find(|r| r.id == id)
            .cloned()
            .map(Transaction::try_from)
            .transpose()
    }

    async fn find_by_owner(&self, owner_id: Uuid) -> AppResult<Vec<Transaction>> {
        let rows = self.rows.lock().unwrap();
        let mut found: Vec<Transaction> = rows
            .iter()
            .filter(|r| r.references(owner_id))
            .cloned()
            .map(Transaction::try_from)
            .collect::<AppResult<_>>()?;
        found.sort_by(|a, b| b.effective_date().cmp(&a.effective_date()));
        Ok(found)
    }

    async fn find_by_owner_page(
        &self,
        owner_id: Uuid,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<Transaction>, i64)> {
        let owned = self.find_by_owner(owner_id).await?;
        let total = owned.len() as i64;
        let page = owned
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect();
        Ok((page, total))
    }

    async fn find_all(&self, status: Option<TransactionStatus>) -> AppResult<Vec<Transaction>> {
        let rows = self.rows.lock().unwrap();
        let mut found: Vec<Transaction> = rows
            .iter()
            .filter(|r| status.is_none_or(|s| r.status == s.as_str()))
            .cloned()
            .map(Transaction::try_from)
            .collect::<AppResult<_>>()?;
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(found)
    }

    async fn find_recent(
        &self,
        status: TransactionStatus,
        limit: i64,
    ) -> AppResult<Vec<Transaction>> {
        let mut found = self.find_all(Some(status)).await?;
        found.truncate(limit.max(0) as usize);
        Ok(found)
    }

    async fn set_status(
        &self,
        id: Uuid,
        status: TransactionStatus,
    ) -> AppResult<Option<Transaction>> {
        self.update_where(id, |_| true, |row| row.status = status.as_str().to_string())
    }

    async fn set_proof(
        &self,
        id: Uuid,
        proof_url: String,
        guard: ProofGuard,
    ) -> AppResult<Option<Transaction>> {
        self.update_where(
            id,
            |row| {
                row.status
                    .parse::<TransactionStatus>()
                    .is_ok_and(|status| guard.admits(row.owner_id(), status))
            },
            |row| row.proof_url = Some(proof_url),
        )
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|r| r.id != id);
        Ok(rows.len() != before)
    }

    async fn delete_by_owner(&self, owner_id: Uuid) -> AppResult<u64> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|r| !r.references(owner_id));
        Ok((before - rows.len()) as u64)
    }
}

#[derive(Default)]
pub struct MemoryUserStore {
    users: Mutex<Vec<User>>,
    clock: Clock,
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn insert(&self, draft: UserDraft) -> AppResult<User> {
        let now = self.clock.tick();
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.username == draft.username) {
            return Err(AppError::Conflict("Username already exists".to_string()));
        }
        let user = User {
            id: Uuid::new_v4(),
            name: draft.name,
            username: draft.username,
            phone: draft.phone,
            whatsapp: draft.whatsapp,
            password_hash: draft.password_hash,
            role: draft.role,
            created_at: now,
            updated_at: now,
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.users.lock().unwrap().iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_username(&self, username: String) -> AppResult<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn list_by_role(&self, role: Role) -> AppResult<Vec<User>> {
        let mut found: Vec<User> = self
            .users
            .lock()
            .unwrap()
            .iter()
            .filter(|u| u.role == role)
            .cloned()
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(found)
    }

    async fn update_profile(&self, id: Uuid, changes: ProfileChanges) -> AppResult<Option<User>> {
        let now = self.clock.tick();
        let mut users = self.users.lock().unwrap();
        let Some(user) = users.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };
        if let Some(name) = changes.name {
            user.name = name;
        }
        if let Some(phone) = changes.phone {
            user.phone = phone;
        }
        if let Some(whatsapp) = changes.whatsapp {
            user.whatsapp = whatsapp;
        }
        user.updated_at = now;
        Ok(Some(user.clone()))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let mut users = self.users.lock().unwrap();
        let before = users.len();
        users.retain(|u| u.id != id);
        Ok(users.len() != before)
    }
}

/// Sessions without expiry; TTLs are not observable in unit tests
#[derive(Default)]
pub struct MemorySessionStore {
    tokens: Mutex<HashMap<String, Uuid>>,
    by_user: Mutex<HashMap<Uuid, HashSet<String>>>,
}

impl MemorySessionStore {
    pub fn live_sessions(&self, user_id: Uuid) -> usize {
        self.by_user
            .lock()
            .unwrap()
            .get(&user_id)
            .map_or(0, HashSet::len)
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn save(&self, user_id: Uuid, token_hash: String, _ttl_secs: u64) -> AppResult<()> {
        self.tokens
            .lock()
            .unwrap()
            .insert(token_hash.clone(), user_id);
        self.by_user
            .lock()
            .unwrap()
            .entry(user_id)
            .or_default()
            .insert(token_hash);
        Ok(())
    }

    async fn take(&self, token_hash: String) -> AppResult<Option<Uuid>> {
        let user_id = self.tokens.lock().unwrap().remove(&token_hash);
        if let Some(user_id) = user_id {
            if let Some(set) = self.by_user.lock().unwrap().get_mut(&user_id) {
                set.remove(&token_hash);
            }
        }
        Ok(user_id)
    }

    async fn revoke_all(&self, user_id: Uuid) -> AppResult<()> {
        let hashes = self.by_user.lock().unwrap().remove(&user_id);
        let mut tokens = self.tokens.lock().unwrap();
        for hash in hashes.unwrap_or_default() {
            tokens.remove(&hash);
        }
        Ok(())
    }
}

pub fn test_config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            rust_log: "debug".to_string(),
            log_json: false,
            request_timeout_secs: 5,
        },
        database: DatabaseConfig {
            url: "postgres://unused".to_string(),
            max_connections: 1,
        },
        redis: RedisConfig {
            url: "redis://unused".to_string(),
        },
        jwt: JwtConfig {
            secret: "test-secret-key-for-unit-tests".to_string(),
            expiry_hours: 1,
            refresh_token_expiry_days: 1,
        },
    }
}

/// App state over in-memory stores, with handles kept for inspection
pub struct TestApp {
    pub state: AppState,
    pub users: Arc<MemoryUserStore>,
    pub transactions: Arc<MemoryTransactionStore>,
    pub sessions: Arc<MemorySessionStore>,
}

impl TestApp {
    pub fn new() -> Self {
        let users = Arc::new(MemoryUserStore::default());
        let transactions = Arc::new(MemoryTransactionStore::default());
        let sessions = Arc::new(MemorySessionStore::default());
        let state = AppState::new(
            users.clone(),
            transactions.clone(),
            sessions.clone(),
            test_config(),
        );
        Self {
            state,
            users,
            transactions,
            sessions,
        }
    }
}

/// Store a user directly, skipping password hashing
pub async fn seed_user(store: &dyn UserStore, username: &str, role: Role) -> User {
    store
        .insert(UserDraft {
            name: format!("{} name", username),
            username: username.to_string(),
            phone: "03001234567".to_string(),
            whatsapp: "03001234567".to_string(),
            password_hash: "unused".to_string(),
            role,
        })
        .await
        .unwrap()
}

pub async fn seed_transaction(
    store: &dyn TransactionStore,
    owner: Option<Uuid>,
    amount: f64,
    category: &str,
    status: TransactionStatus,
) -> Transaction {
    let draft = NewTransaction {
        owner_id: owner,
        donor_name: "Seeded Donor".to_string(),
        amount,
        category: Some(category.to_string()),
        status: Some(status),
        ..Default::default()
    }
    .validate(Utc::now())
    .unwrap();
    store.insert(draft).await.unwrap()
}

pub fn identity(user: &User) -> Identity {
    user.identity()
}
