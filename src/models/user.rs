use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// A stored credential record. The username is the unique identity;
/// only the salted hash of the password is ever persisted.
#[derive(Debug, Clone, FromRow)]
pub struct Credential {
    pub username: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}
