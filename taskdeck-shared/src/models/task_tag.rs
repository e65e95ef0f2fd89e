/// Task-tag link model and database operations
///
/// Each row attaches one tag to one task; the `(task_id, tag_id)` pair is
/// unique, which makes linking and unlinking idempotent operations keyed by
/// that pair. Every task must keep at least one link - the rule itself is
/// enforced by the task service, this model only moves rows.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE task_tags (
///     id SERIAL PRIMARY KEY,
///     task_id INTEGER NOT NULL REFERENCES tasks(id) ON DELETE CASCADE,
///     tag_id INTEGER NOT NULL REFERENCES tags(id) ON DELETE CASCADE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     UNIQUE (task_id, tag_id)
/// );
/// ```
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;

/// Link row attaching a tag to a task
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TaskTag {
    /// Unique link ID
    pub id: i32,

    /// Task side of the link
    pub task_id: i32,

    /// Tag side of the link
    pub tag_id: i32,

    /// When the link was created
    pub created_at: DateTime<Utc>,
}

impl TaskTag {
    /// Links a tag to a task
    ///
    /// # Errors
    ///
    /// Returns an error if the link already exists (unique constraint
    /// violation) or a referenced row is missing.
    pub async fn link(
        db: impl PgExecutor<'_>,
        task_id: i32,
        tag_id: i32,
    ) -> Result<Self, sqlx::Error> {
        let link = sqlx::query_as::<_, TaskTag>(
            r#"
            INSERT INTO task_tags (task_id, tag_id)
            VALUES ($1, $2)
            RETURNING id, task_id, tag_id, created_at
            "#,
        )
        .bind(task_id)
        .bind(tag_id)
        .fetch_one(db)
        .await?;

        Ok(link)
    }

    /// Removes the link between a task and a tag
    ///
    /// Returns true if a row was deleted.
    pub async fn unlink(
        db: impl PgExecutor<'_>,
        task_id: i32,
        tag_id: i32,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM task_tags WHERE task_id = $1 AND tag_id = $2")
            .bind(task_id)
            .bind(tag_id)
            .execute(db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Returns the tag IDs currently linked to a task
    pub async fn tag_ids(db: impl PgExecutor<'_>, task_id: i32) -> Result<Vec<i32>, sqlx::Error> {
        let ids: Vec<i32> =
            sqlx::query_scalar("SELECT tag_id FROM task_tags WHERE task_id = $1 ORDER BY tag_id")
                .bind(task_id)
                .fetch_all(db)
                .await?;

        Ok(ids)
    }

    /// Deletes every link of a task
    ///
    /// Runs ahead of the task row's own delete. Returns the number of rows
    /// removed.
    pub async fn delete_for_task(
        db: impl PgExecutor<'_>,
        task_id: i32,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM task_tags WHERE task_id = $1")
            .bind(task_id)
            .execute(db)
            .await?;

        Ok(result.rows_affected())
    }
}
