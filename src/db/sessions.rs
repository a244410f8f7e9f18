//! Redis-backed refresh sessions
//!
//! Layout:
//! - `refresh_token:{hash}` → user id, expiring with the session
//! - `user_sessions:{user_id}` → set of that user's live token hashes

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use uuid::Uuid;

use crate::{db::store::SessionStore, error::AppResult};

fn token_key(token_hash: &str) -> String {
    format!("refresh_token:{}", token_hash)
}

fn user_key(user_id: &Uuid) -> String {
    format!("user_sessions:{}", user_id)
}

/// Session store on top of a Redis connection manager
#[derive(Clone)]
pub struct RedisSessionStore {
    conn: ConnectionManager,
}

impl RedisSessionStore {
    pub fn new(conn: ConnectionManager) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn save(&self, user_id: Uuid, token_hash: String, ttl_secs: u64) -> AppResult<()> {
        let mut redis = self.conn.clone();
        let user_key = user_key(&user_id);

        redis
            .set_ex::<_, _, ()>(token_key(&token_hash), user_id.to_string(), ttl_secs)
            .await?;
        redis.sadd::<_, _, ()>(&user_key, &token_hash).await?;
        redis.expire::<_, ()>(&user_key, ttl_secs as i64).await?;

        Ok(())
    }

    async fn take(&self, token_hash: String) -> AppResult<Option<Uuid>> {
        let mut redis = self.conn.clone();

        let user_id: Option<String> = redis::cmd("GETDEL")
            .arg(token_key(&token_hash))
            .query_async(&mut redis)
            .await?;

        let Some(user_id) = user_id.and_then(|id| Uuid::parse_str(&id).ok()) else {
            return Ok(None);
        };

        redis.srem::<_, _, ()>(user_key(&user_id), &token_hash).await?;

        Ok(Some(user_id))
    }

    async fn revoke_all(&self, user_id: Uuid) -> AppResult<()> {
        let mut redis = self.conn.clone();
        let user_key = user_key(&user_id);

        let hashes: Vec<String> = redis.smembers(&user_key).await?;
        for hash in hashes {
            redis.del::<_, ()>(token_key(&hash)).await?;
        }
        redis.del::<_, ()>(&user_key).await?;

        Ok(())
    }
}
