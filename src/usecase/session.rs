//! Session usecase
//!
//! Login-or-signup: an unknown username creates an account with the
//! configured initial coin grant; a known username must present the right
//! password. Issues an opaque bearer token whose SHA-256 hash is stored
//! server-side with a configured lifetime.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rand::RngCore;
use sha2::{Digest, Sha256};

use crate::domain::Coins;
use crate::error::{AppError, AppResult};
use crate::repository::{AccountRepository, RepoError, SessionRepository};

/// Newly issued session. The plaintext token leaves the process exactly
/// once, in the auth response.
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

pub struct SessionUsecase {
    accounts: Arc<dyn AccountRepository>,
    sessions: Arc<dyn SessionRepository>,
    initial_grant: Coins,
    session_ttl: chrono::Duration,
}

impl SessionUsecase {
    pub fn new(
        accounts: Arc<dyn AccountRepository>,
        sessions: Arc<dyn SessionRepository>,
        initial_grant: Coins,
        session_ttl: chrono::Duration,
    ) -> Self {
        Self {
            accounts,
            sessions,
            initial_grant,
            session_ttl,
        }
    }

    pub async fn login_or_signup(
        &self,
        username: &str,
        password: &str,
    ) -> AppResult<IssuedSession> {
        if username.is_empty() {
            return Err(AppError::InvalidRequest("username is required".to_string()));
        }
        if password.is_empty() {
            return Err(AppError::InvalidRequest("password is required".to_string()));
        }

        let account = match self.accounts.get_by_username(username).await {
            Ok(account) => {
                if !verify_password(password, &account.password_hash) {
                    tracing::info!(username, "Failed authentication attempt");
                    return Err(AppError::WrongCredentials);
                }
                account
            }
            Err(RepoError::NotFound) => {
                let account = self
                    .accounts
                    .create(username, &hash_password(password), self.initial_grant)
                    .await?;
                tracing::info!(
                    username,
                    initial_grant = %self.initial_grant,
                    "Created account at signup"
                );
                account
            }
            Err(other) => return Err(other.into()),
        };

        let token = generate_token();
        let expires_at = Utc::now() + self.session_ttl;

        self.sessions
            .create(account.id, &hash_token(&token), expires_at)
            .await?;

        tracing::info!(account_id = account.id, username, "Granted new session");

        Ok(IssuedSession { token, expires_at })
    }
}

/// Random 256-bit token, hex-encoded.
fn generate_token() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// SHA-256 hex digest of a session token, as stored in the sessions table.
pub fn hash_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

/// Salted SHA-256 password hash, stored as `salt$digest`.
fn hash_password(password: &str) -> String {
    let mut salt = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut salt);
    let salt_hex = hex::encode(salt);
    let digest = digest_with_salt(&salt_hex, password);
    format!("{salt_hex}${digest}")
}

fn verify_password(password: &str, stored: &str) -> bool {
    match stored.split_once('$') {
        Some((salt_hex, digest)) => digest_with_salt(salt_hex, password) == digest,
        None => false,
    }
}

fn digest_with_salt(salt_hex: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt_hex.as_bytes());
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}
