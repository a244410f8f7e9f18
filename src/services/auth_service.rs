//! Credentials, access tokens and refresh sessions

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    config::Config,
    db::{SessionStore, UserStore},
    error::{AppError, AppResult},
    models::{Identity, Role, User},
    utils::{generate_refresh_token, normalize_username, token_digest},
};

/// Access token payload
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub username: String,
    pub role: Role,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    fn for_user(user: &User, lifetime: Duration) -> Self {
        let issued = Utc::now();
        Self {
            sub: user.id,
            username: user.username.clone(),
            role: user.role,
            exp: (issued + lifetime).timestamp(),
            iat: issued.timestamp(),
        }
    }

    /// The identity these claims vouch for
    pub fn identity(&self) -> Identity {
        Identity {
            id: self.sub,
            username: self.username.clone(),
            role: self.role,
        }
    }
}

/// Access and refresh token pair handed to a client
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
}

pub struct AuthService;

impl AuthService {
    /// Username lookup is case-insensitive; unknown user and wrong password look alike
    pub async fn login(
        users: &dyn UserStore,
        sessions: &dyn SessionStore,
        config: &Config,
        username: &str,
        password: &str,
    ) -> AppResult<(User, TokenPair)> {
        let Some(user) = users.find_by_username(normalize_username(username)).await? else {
            return Err(AppError::InvalidCredentials);
        };
        if !Self::verify_password(password, &user.password_hash)? {
            return Err(AppError::InvalidCredentials);
        }

        let tokens = Self::issue_tokens(sessions, config, &user).await?;
        tracing::info!(user_id = %user.id, username = %user.username, "User logged in");

        Ok((user, tokens))
    }

    /// Rotate a refresh token: the presented one is consumed, a fresh pair issued
    pub async fn refresh(
        users: &dyn UserStore,
        sessions: &dyn SessionStore,
        config: &Config,
        refresh_token: &str,
    ) -> AppResult<TokenPair> {
        let owner = sessions.take(token_digest(refresh_token)).await?;
        let user = match owner {
            Some(user_id) => users.find_by_id(user_id).await?,
            None => None,
        }
        .ok_or(AppError::InvalidToken)?;

        Self::issue_tokens(sessions, config, &user).await
    }

    /// Revoke one refresh session, or all of the caller's sessions
    pub async fn logout(
        sessions: &dyn SessionStore,
        identity: &Identity,
        refresh_token: Option<&str>,
        all_sessions: bool,
    ) -> AppResult<()> {
        match (all_sessions, refresh_token) {
            (true, _) => sessions.revoke_all(identity.id).await?,
            (false, Some(token)) => {
                sessions.take(token_digest(token)).await?;
            }
            (false, None) => {}
        }

        tracing::info!(user_id = %identity.id, all_sessions, "User logged out");
        Ok(())
    }

    /// Verify JWT token and extract claims
    pub fn verify_token(token: &str, secret: &str) -> AppResult<Claims> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;

        Ok(token_data.claims)
    }

    /// Argon2id PHC string with a fresh salt
    pub fn hash_password(password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Password hashing failed: {}", e)))
    }

    /// `Ok(false)` on mismatch; a malformed stored hash is an internal error
    pub fn verify_password(password: &str, stored: &str) -> AppResult<bool> {
        let stored = PasswordHash::new(stored).map_err(|e| {
            AppError::Internal(anyhow::anyhow!("Stored password hash unreadable: {}", e))
        })?;

        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &stored)
            .is_ok())
    }

    /// Signed access token and its lifetime in seconds
    pub(crate) fn generate_access_token(user: &User, config: &Config) -> AppResult<(String, i64)> {
        let lifetime = Duration::hours(config.jwt.expiry_hours);
        let claims = Claims::for_user(user, lifetime);

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.jwt.secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Token generation failed: {}", e)))?;

        Ok((token, lifetime.num_seconds()))
    }

    async fn issue_tokens(
        sessions: &dyn SessionStore,
        config: &Config,
        user: &User,
    ) -> AppResult<TokenPair> {
        let (access_token, expires_in) = Self::generate_access_token(user, config)?;
        let refresh_token = generate_refresh_token();

        sessions
            .save(user.id, token_digest(&refresh_token), config.jwt.refresh_ttl_secs())
            .await?;

        Ok(TokenPair {
            access_token,
            refresh_token,
            expires_in,
        })
    }
}
