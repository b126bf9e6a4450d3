use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Lifecycle state of a task, stored and serialized as `"PENDING"` /
/// `"COMPLETED"`.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum TaskStatus {
    /// Task is yet to be done.
    Pending,
    /// Task is finished.
    Completed,
}

/// Input structure for creating or replacing a task.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct TaskInput {
    /// The title of the task. Must be between 1 and 200 characters.
    #[validate(length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"))]
    pub title: String,

    /// An optional description, at most 500 characters.
    #[validate(length(max = 500, message = "Description must not exceed 500 characters"))]
    pub description: Option<String>,

    /// The state the task should be in.
    pub status: TaskStatus,
}

/// A task as stored and as returned by the API.
///
/// The owner is never serialized into responses; every task a caller can
/// see is their own.
#[derive(Debug, Serialize, Clone, FromRow)]
pub struct Task {
    /// Unique identifier (UUID v4).
    pub id: Uuid,
    /// The title of the task.
    pub title: String,
    /// An optional description.
    pub description: Option<String>,
    /// The current state of the task.
    pub status: TaskStatus,
    /// Timestamp of when the task was created.
    pub created_at: DateTime<Utc>,
    /// Timestamp of the last update.
    pub updated_at: DateTime<Utc>,
    /// Username of the user the task belongs to.
    #[serde(skip_serializing)]
    pub owner: String,
}

/// Query parameters accepted when listing tasks.
#[derive(Debug, Deserialize)]
pub struct TaskQuery {
    /// Keep only tasks in this state.
    pub status: Option<TaskStatus>,
    /// Keep only tasks whose title or description contains this term
    /// (case-insensitive).
    pub search: Option<String>,
}

impl Task {
    /// Creates a fresh task owned by `owner` from validated input.
    pub fn new(input: TaskInput, owner: &str) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: input.title,
            description: input.description,
            status: input.status,
            created_at: now,
            updated_at: now,
            owner: owner.to_owned(),
        }
    }
}
