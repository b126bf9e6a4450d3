use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{Credential, Task, TaskQuery};
use crate::storage::{StoreError, TaskStore, UserStore};

const TASK_COLUMNS: &str = "id, title, description, status, created_at, updated_at, owner";

/// Creates the schema if it is not there yet.
///
/// The primary key on `users.username` is the uniqueness constraint the
/// credential service relies on.
pub async fn init_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS users (
             username TEXT PRIMARY KEY,
             password_hash TEXT NOT NULL,
             created_at TIMESTAMPTZ NOT NULL
         )",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS tasks (
             id UUID PRIMARY KEY,
             title TEXT NOT NULL,
             description TEXT,
             status TEXT NOT NULL,
             created_at TIMESTAMPTZ NOT NULL,
             updated_at TIMESTAMPTZ NOT NULL,
             owner TEXT NOT NULL REFERENCES users (username)
         )",
    )
    .execute(pool)
    .await?;

    Ok(())
}

fn map_unique_violation(e: sqlx::Error) -> StoreError {
    if e.as_database_error()
        .map_or(false, |d| d.is_unique_violation())
    {
        StoreError::AlreadyExists
    } else {
        StoreError::Database(e)
    }
}

/// Credential store backed by the `users` table.
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<Credential>, StoreError> {
        let credential = sqlx::query_as::<_, Credential>(
            "SELECT username, password_hash, created_at FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(credential)
    }

    async fn create(&self, credential: Credential) -> Result<(), StoreError> {
        sqlx::query("INSERT INTO users (username, password_hash, created_at) VALUES ($1, $2, $3)")
            .bind(&credential.username)
            .bind(&credential.password_hash)
            .bind(credential.created_at)
            .execute(&self.pool)
            .await
            .map_err(map_unique_violation)?;

        Ok(())
    }
}

/// Task store backed by the `tasks` table.
pub struct PgTaskStore {
    pool: PgPool,
}

impl PgTaskStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TaskStore for PgTaskStore {
    async fn save(&self, task: Task) -> Result<Task, StoreError> {
        let sql = format!(
            "INSERT INTO tasks ({columns})
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             ON CONFLICT (id) DO UPDATE
             SET title = EXCLUDED.title,
                 description = EXCLUDED.description,
                 status = EXCLUDED.status,
                 updated_at = EXCLUDED.updated_at
             RETURNING {columns}",
            columns = TASK_COLUMNS
        );

        let saved = sqlx::query_as::<_, Task>(&sql)
            .bind(task.id)
            .bind(task.title)
            .bind(task.description)
            .bind(task.status)
            .bind(task.created_at)
            .bind(task.updated_at)
            .bind(task.owner)
            .fetch_one(&self.pool)
            .await?;

        Ok(saved)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Task>, StoreError> {
        let sql = format!("SELECT {} FROM tasks WHERE id = $1", TASK_COLUMNS);
        let task = sqlx::query_as::<_, Task>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(task)
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_for_owner(
        &self,
        owner: &str,
        query: &TaskQuery,
    ) -> Result<Vec<Task>, StoreError> {
        // Conditions are appended dynamically; bind order below must
        // mirror the order parameters are numbered here.
        let mut sql = format!("SELECT {} FROM tasks WHERE owner = $1", TASK_COLUMNS);
        let mut param_count = 2;

        if query.status.is_some() {
            sql.push_str(&format!(" AND status = ${}", param_count));
            param_count += 1;
        }
        if query.search.is_some() {
            sql.push_str(&format!(
                " AND (title ILIKE ${} OR description ILIKE ${})",
                param_count,
                param_count + 1
            ));
        }
        sql.push_str(" ORDER BY created_at DESC");

        let mut query_builder = sqlx::query_as::<_, Task>(&sql).bind(owner);
        if let Some(status) = query.status {
            query_builder = query_builder.bind(status);
        }
        if let Some(search) = &query.search {
            let pattern = format!("%{}%", search);
            query_builder = query_builder.bind(pattern.clone());
            query_builder = query_builder.bind(pattern);
        }

        let tasks = query_builder.fetch_all(&self.pool).await?;

        Ok(tasks)
    }
}
