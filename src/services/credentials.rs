use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;

use crate::auth::password::{hash_password, verify_password};
use crate::auth::token::TokenCodec;
use crate::models::Credential;
use crate::storage::{StoreError, UserStore};

/// Failures of registration and login.
#[derive(Debug, Error)]
pub enum CredentialError {
    /// Registration hit an already-claimed username.
    #[error("Username already exists")]
    UsernameTaken,
    /// Login failed. Unknown usernames and wrong passwords both land
    /// here so a caller cannot probe which usernames exist.
    #[error("Invalid username or password")]
    InvalidCredentials,
    /// The credential store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// Hashing or token generation failed.
    #[error("{0}")]
    Internal(String),
}

/// Registration and login on top of a credential store and the token
/// codec. Stateless apart from the store handle; no session is created
/// anywhere.
pub struct CredentialService {
    users: Arc<dyn UserStore>,
    tokens: TokenCodec,
}

impl CredentialService {
    pub fn new(users: Arc<dyn UserStore>, tokens: TokenCodec) -> Self {
        Self { users, tokens }
    }

    /// Registers a new user and returns the stored username.
    ///
    /// The lookup is only a fast path; the store's uniqueness
    /// constraint is the authority, so a concurrent registration of the
    /// same name still surfaces as `UsernameTaken`.
    pub async fn register(&self, username: &str, password: &str) -> Result<String, CredentialError> {
        if self.users.find_by_username(username).await?.is_some() {
            return Err(CredentialError::UsernameTaken);
        }

        let password_hash = hash_password(password)
            .map_err(|e| CredentialError::Internal(format!("Failed to hash password: {}", e)))?;
        let credential = Credential {
            username: username.to_owned(),
            password_hash,
            created_at: Utc::now(),
        };

        match self.users.create(credential).await {
            Ok(()) => Ok(username.to_owned()),
            Err(StoreError::AlreadyExists) => Err(CredentialError::UsernameTaken),
            Err(e) => Err(CredentialError::Store(e)),
        }
    }

    /// Checks a credential pair and issues a bearer token for it.
    pub async fn login(&self, username: &str, password: &str) -> Result<String, CredentialError> {
        let credential = self.users.find_by_username(username).await?;

        let valid = credential
            .as_ref()
            .map_or(false, |c| verify_password(password, &c.password_hash));
        if !valid {
            return Err(CredentialError::InvalidCredentials);
        }

        self.tokens
            .issue(username)
            .map_err(|e| CredentialError::Internal(format!("Failed to generate token: {}", e)))
    }
}
