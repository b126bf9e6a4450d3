use std::collections::hash_map::Entry;
use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{Credential, Task, TaskQuery};
use crate::storage::{StoreError, TaskStore, UserStore};

/// Credential store backed by a map behind an async lock.
///
/// Used as the development fallback when no database is configured, and
/// by the test suites. The write lock makes check-and-insert atomic, so
/// it upholds the same uniqueness guarantee as the database constraint.
#[derive(Default)]
pub struct MemoryUserStore {
    users: RwLock<HashMap<String, Credential>>,
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<Credential>, StoreError> {
        Ok(self.users.read().await.get(username).cloned())
    }

    async fn create(&self, credential: Credential) -> Result<(), StoreError> {
        let mut users = self.users.write().await;
        match users.entry(credential.username.clone()) {
            Entry::Occupied(_) => Err(StoreError::AlreadyExists),
            Entry::Vacant(slot) => {
                slot.insert(credential);
                Ok(())
            }
        }
    }
}

/// Task store backed by a map behind an async lock.
#[derive(Default)]
pub struct MemoryTaskStore {
    tasks: RwLock<HashMap<Uuid, Task>>,
}

fn matches(task: &Task, query: &TaskQuery) -> bool {
    if let Some(status) = query.status {
        if task.status != status {
            return false;
        }
    }
    if let Some(term) = &query.search {
        let term = term.to_lowercase();
        let in_title = task.title.to_lowercase().contains(&term);
        let in_description = task
            .description
            .as_ref()
            .map_or(false, |d| d.to_lowercase().contains(&term));
        if !in_title && !in_description {
            return false;
        }
    }
    true
}

#[async_trait]
impl TaskStore for MemoryTaskStore {
    async fn save(&self, task: Task) -> Result<Task, StoreError> {
        self.tasks.write().await.insert(task.id, task.clone());
        Ok(task)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Task>, StoreError> {
        Ok(self.tasks.read().await.get(&id).cloned())
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<bool, StoreError> {
        Ok(self.tasks.write().await.remove(&id).is_some())
    }

    async fn list_for_owner(
        &self,
        owner: &str,
        query: &TaskQuery,
    ) -> Result<Vec<Task>, StoreError> {
        let tasks = self.tasks.read().await;
        let mut matching: Vec<Task> = tasks
            .values()
            .filter(|t| t.owner == owner && matches(t, query))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(matching)
    }
}
