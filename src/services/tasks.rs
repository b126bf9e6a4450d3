use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::auth::Principal;
use crate::models::{Task, TaskInput, TaskQuery};
use crate::storage::{StoreError, TaskStore};

/// Task CRUD scoped to the calling principal.
///
/// Every lookup goes through the ownership gate: a task another user
/// owns is reported exactly like a task that does not exist, so ids
/// cannot be probed across accounts. `None` / `false` mean "not found"
/// in that collapsed sense.
pub struct TaskService {
    tasks: Arc<dyn TaskStore>,
}

impl TaskService {
    pub fn new(tasks: Arc<dyn TaskStore>) -> Self {
        Self { tasks }
    }

    pub async fn create(&self, principal: &Principal, input: TaskInput) -> Result<Task, StoreError> {
        self.tasks.save(Task::new(input, &principal.subject)).await
    }

    pub async fn list(
        &self,
        principal: &Principal,
        query: &TaskQuery,
    ) -> Result<Vec<Task>, StoreError> {
        self.tasks.list_for_owner(&principal.subject, query).await
    }

    pub async fn get(&self, principal: &Principal, id: Uuid) -> Result<Option<Task>, StoreError> {
        self.load_owned(principal, id).await
    }

    pub async fn update(
        &self,
        principal: &Principal,
        id: Uuid,
        input: TaskInput,
    ) -> Result<Option<Task>, StoreError> {
        let mut task = match self.load_owned(principal, id).await? {
            Some(task) => task,
            None => return Ok(None),
        };

        task.title = input.title;
        task.description = input.description;
        task.status = input.status;
        task.updated_at = Utc::now();

        let saved = self.tasks.save(task).await?;
        Ok(Some(saved))
    }

    pub async fn delete(&self, principal: &Principal, id: Uuid) -> Result<bool, StoreError> {
        match self.load_owned(principal, id).await? {
            Some(task) => self.tasks.delete_by_id(task.id).await,
            None => Ok(false),
        }
    }

    /// The ownership gate. A task that exists but belongs to someone
    /// else comes back as `None`, same as one that was never created.
    async fn load_owned(
        &self,
        principal: &Principal,
        id: Uuid,
    ) -> Result<Option<Task>, StoreError> {
        let task = self.tasks.find_by_id(id).await?;
        Ok(task.filter(|t| t.owner == principal.subject))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TaskStatus;
    use crate::storage::MemoryTaskStore;

    fn service() -> TaskService {
        TaskService::new(Arc::new(MemoryTaskStore::default()))
    }

    fn principal(subject: &str) -> Principal {
        Principal {
            subject: subject.to_string(),
        }
    }

    fn input(title: &str, status: TaskStatus) -> TaskInput {
        TaskInput {
            title: title.to_string(),
            description: None,
            status,
        }
    }

    #[actix_rt::test]
    async fn owner_sees_their_task() {
        let service = service();
        let alice = principal("alice");

        let created = service
            .create(&alice, input("Buy milk", TaskStatus::Pending))
            .await
            .unwrap();

        let fetched = service.get(&alice, created.id).await.unwrap().unwrap();
        assert_eq!(fetched.id, created.id);
        assert_eq!(fetched.owner, "alice");
    }

    #[actix_rt::test]
    async fn another_users_task_reads_as_missing() {
        let service = service();
        let alice = principal("alice");
        let bob = principal("bob");

        let created = service
            .create(&alice, input("Buy milk", TaskStatus::Pending))
            .await
            .unwrap();

        let fetched = service.get(&bob, created.id).await.unwrap();
        let missing = service.get(&bob, Uuid::new_v4()).await.unwrap();
        assert!(fetched.is_none());
        assert!(missing.is_none());
    }

    #[actix_rt::test]
    async fn update_replaces_fields_and_bumps_updated_at() {
        let service = service();
        let alice = principal("alice");

        let created = service
            .create(&alice, input("Buy milk", TaskStatus::Pending))
            .await
            .unwrap();
        let updated = service
            .update(&alice, created.id, input("Buy oat milk", TaskStatus::Completed))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.title, "Buy oat milk");
        assert_eq!(updated.status, TaskStatus::Completed);
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at >= created.updated_at);
    }

    #[actix_rt::test]
    async fn non_owner_cannot_update_or_delete() {
        let service = service();
        let alice = principal("alice");
        let bob = principal("bob");

        let created = service
            .create(&alice, input("Buy milk", TaskStatus::Pending))
            .await
            .unwrap();

        let updated = service
            .update(&bob, created.id, input("Hijacked", TaskStatus::Completed))
            .await
            .unwrap();
        assert!(updated.is_none());

        let deleted = service.delete(&bob, created.id).await.unwrap();
        assert!(!deleted);

        // The task is untouched for its owner.
        let fetched = service.get(&alice, created.id).await.unwrap().unwrap();
        assert_eq!(fetched.title, "Buy milk");
        assert_eq!(fetched.status, TaskStatus::Pending);
    }

    #[actix_rt::test]
    async fn owner_can_delete_their_task() {
        let service = service();
        let alice = principal("alice");

        let created = service
            .create(&alice, input("Buy milk", TaskStatus::Pending))
            .await
            .unwrap();

        assert!(service.delete(&alice, created.id).await.unwrap());
        assert!(service.get(&alice, created.id).await.unwrap().is_none());
    }
}
