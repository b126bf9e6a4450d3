pub mod memory;
pub mod postgres;

use crate::models::{Credential, Task, TaskQuery};
use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

pub use memory::{MemoryTaskStore, MemoryUserStore};
pub use postgres::{init_schema, PgTaskStore, PgUserStore};

/// Failures surfaced by the storage backends.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A uniqueness constraint rejected the write.
    #[error("record already exists")]
    AlreadyExists,
    /// The backend itself failed.
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Persistence for credential records.
///
/// `create` must enforce username uniqueness itself and report a
/// duplicate as `AlreadyExists`; callers may pre-check with
/// `find_by_username` but the store is the authority.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_username(&self, username: &str) -> Result<Option<Credential>, StoreError>;
    async fn create(&self, credential: Credential) -> Result<(), StoreError>;
}

/// Persistence for tasks.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Inserts the task, or replaces it if the id is already present.
    async fn save(&self, task: Task) -> Result<Task, StoreError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Task>, StoreError>;
    /// Returns whether a task was actually removed.
    async fn delete_by_id(&self, id: Uuid) -> Result<bool, StoreError>;
    /// Lists the owner's tasks, newest first, narrowed by `query`.
    async fn list_for_owner(&self, owner: &str, query: &TaskQuery)
        -> Result<Vec<Task>, StoreError>;
}
