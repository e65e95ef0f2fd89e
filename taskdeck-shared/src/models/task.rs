/// Task model and database operations
///
/// Tasks live on a Kanban-style board inside a project and move through a
/// flat three-state lifecycle. `status` is the only lifecycle field and the
/// only thing gating mutability.
///
/// # Lifecycle
///
/// ```text
/// Pending ⇄ InProgress ⇄ Done
/// ```
///
/// Transitions are caller-specified: the board UI drags cards freely between
/// columns, so any recognized status can be written at any time. The one
/// universal rule is that a task already in `Done` can no longer be updated
/// or deleted; see [`TaskStatus::is_locked`].
///
/// # Schema
///
/// ```sql
/// CREATE TYPE task_status AS ENUM ('pending', 'in_progress', 'done');
///
/// CREATE TABLE tasks (
///     id SERIAL PRIMARY KEY,
///     title VARCHAR(255) NOT NULL,
///     description TEXT NOT NULL DEFAULT '',
///     status task_status NOT NULL DEFAULT 'pending',
///     project_id INTEGER NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
///     created_by INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgExecutor, PgPool};

use crate::models::tag::Tag;

/// Board column a task sits in
///
/// Serialized on the wire as `"Pending"`, `"InProgress"`, `"Done"`; stored
/// in PostgreSQL as the `task_status` enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "snake_case")]
pub enum TaskStatus {
    /// Not started yet
    Pending,

    /// Being worked on
    InProgress,

    /// Completed; the task is frozen from here on
    Done,
}

impl TaskStatus {
    /// Converts status to its wire string
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "Pending",
            TaskStatus::InProgress => "InProgress",
            TaskStatus::Done => "Done",
        }
    }

    /// True once the task can no longer be edited or deleted
    pub fn is_locked(&self) -> bool {
        matches!(self, TaskStatus::Done)
    }
}

/// Task row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique task ID
    pub id: i32,

    /// Task title
    pub title: String,

    /// Free-form description
    pub description: String,

    /// Current board column
    pub status: TaskStatus,

    /// Project this task belongs to
    pub project_id: i32,

    /// User who created the task
    pub created_by: i32,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last updated
    pub updated_at: DateTime<Utc>,
}

/// Task with its tags attached, as returned by detail and list queries
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskWithTags {
    #[serde(flatten)]
    pub task: Task,

    /// Tags linked to the task
    pub tags: Vec<Tag>,
}

/// Input for creating a new task
#[derive(Debug, Clone)]
pub struct CreateTask {
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub project_id: i32,
    pub created_by: i32,
}

/// Input for updating an existing task
///
/// Only non-`None` fields are written. Tag changes go through the task
/// service, not this struct.
#[derive(Debug, Clone, Default)]
pub struct UpdateTask {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
}

impl Task {
    /// Creates a new task
    pub async fn create(db: impl PgExecutor<'_>, data: CreateTask) -> Result<Self, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (title, description, status, project_id, created_by)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, title, description, status, project_id, created_by,
                      created_at, updated_at
            "#,
        )
        .bind(data.title)
        .bind(data.description)
        .bind(data.status)
        .bind(data.project_id)
        .bind(data.created_by)
        .fetch_one(db)
        .await?;

        Ok(task)
    }

    /// Finds a task by ID
    pub async fn find_by_id(db: impl PgExecutor<'_>, id: i32) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, description, status, project_id, created_by,
                   created_at, updated_at
            FROM tasks
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;

        Ok(task)
    }

    /// Updates title, description and/or status
    ///
    /// Returns `None` if the task does not exist. Lifecycle rules are
    /// enforced by the task service before this runs.
    pub async fn update(
        db: impl PgExecutor<'_>,
        id: i32,
        data: UpdateTask,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut query = String::from("UPDATE tasks SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.title.is_some() {
            bind_count += 1;
            query.push_str(&format!(", title = ${}", bind_count));
        }
        if data.description.is_some() {
            bind_count += 1;
            query.push_str(&format!(", description = ${}", bind_count));
        }
        if data.status.is_some() {
            bind_count += 1;
            query.push_str(&format!(", status = ${}", bind_count));
        }

        query.push_str(
            " WHERE id = $1 RETURNING id, title, description, status, project_id, created_by, created_at, updated_at",
        );

        let mut q = sqlx::query_as::<_, Task>(&query).bind(id);

        if let Some(title) = data.title {
            q = q.bind(title);
        }
        if let Some(description) = data.description {
            q = q.bind(description);
        }
        if let Some(status) = data.status {
            q = q.bind(status);
        }

        let task = q.fetch_optional(db).await?;

        Ok(task)
    }

    /// Deletes a task by ID
    ///
    /// Returns true if a row was deleted. Tag links must be removed first;
    /// the task service orders the two deletes inside one transaction.
    pub async fn delete(db: impl PgExecutor<'_>, id: i32) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Lists tasks with limit/offset pagination, oldest first
    pub async fn list(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, description, status, project_id, created_by,
                   created_at, updated_at
            FROM tasks
            ORDER BY id ASC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Lists every task of a project, unpaginated, oldest first
    ///
    /// Used by the board view. An unknown project simply yields an empty
    /// list.
    pub async fn list_by_project(pool: &PgPool, project_id: i32) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, description, status, project_id, created_by,
                   created_at, updated_at
            FROM tasks
            WHERE project_id = $1
            ORDER BY id ASC
            "#,
        )
        .bind(project_id)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Counts all tasks
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tasks")
            .fetch_one(pool)
            .await?;

        Ok(count)
    }

    /// Counts the tasks of a project
    ///
    /// Backs the derived `tasksCount` field on project detail responses.
    pub async fn count_by_project(
        db: impl PgExecutor<'_>,
        project_id: i32,
    ) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tasks WHERE project_id = $1")
            .bind(project_id)
            .fetch_one(db)
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_status_as_str() {
        assert_eq!(TaskStatus::Pending.as_str(), "Pending");
        assert_eq!(TaskStatus::InProgress.as_str(), "InProgress");
        assert_eq!(TaskStatus::Done.as_str(), "Done");
    }

    #[test]
    fn test_task_status_is_locked() {
        assert!(!TaskStatus::Pending.is_locked());
        assert!(!TaskStatus::InProgress.is_locked());
        assert!(TaskStatus::Done.is_locked());
    }

    #[test]
    fn test_task_status_wire_format() {
        assert_eq!(
            serde_json::to_string(&TaskStatus::InProgress).unwrap(),
            "\"InProgress\""
        );
        let status: TaskStatus = serde_json::from_str("\"Done\"").unwrap();
        assert_eq!(status, TaskStatus::Done);
    }

    #[test]
    fn test_task_with_tags_flattens_task_fields() {
        let task = Task {
            id: 1,
            title: "Fix login".to_string(),
            description: String::new(),
            status: TaskStatus::Pending,
            project_id: 2,
            created_by: 3,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_value(TaskWithTags { task, tags: vec![] }).expect("serialize");
        assert_eq!(json["title"], "Fix login");
        assert_eq!(json["projectId"], 2);
        assert!(json["tags"].as_array().unwrap().is_empty());
    }
}
