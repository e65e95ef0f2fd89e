/// Tag model and database operations
///
/// Tags are a global namespace: they are not scoped to a project and any
/// task anywhere may link to any tag through the `task_tags` join table.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tags (
///     id SERIAL PRIMARY KEY,
///     title VARCHAR(255) NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgExecutor, PgPool};

/// Tag row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    /// Unique tag ID
    pub id: i32,

    /// Tag title
    pub title: String,

    /// When the tag was created
    pub created_at: DateTime<Utc>,

    /// When the tag was last updated
    pub updated_at: DateTime<Utc>,
}

impl Tag {
    /// Creates a new tag
    pub async fn create(db: impl PgExecutor<'_>, title: &str) -> Result<Self, sqlx::Error> {
        let tag = sqlx::query_as::<_, Tag>(
            r#"
            INSERT INTO tags (title)
            VALUES ($1)
            RETURNING id, title, created_at, updated_at
            "#,
        )
        .bind(title)
        .fetch_one(db)
        .await?;

        Ok(tag)
    }

    /// Finds a tag by ID
    pub async fn find_by_id(db: impl PgExecutor<'_>, id: i32) -> Result<Option<Self>, sqlx::Error> {
        let tag = sqlx::query_as::<_, Tag>(
            r#"
            SELECT id, title, created_at, updated_at
            FROM tags
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;

        Ok(tag)
    }

    /// Updates a tag's title
    ///
    /// Returns `None` if the tag does not exist.
    pub async fn update(
        db: impl PgExecutor<'_>,
        id: i32,
        title: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let tag = sqlx::query_as::<_, Tag>(
            r#"
            UPDATE tags
            SET title = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, title, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(title)
        .fetch_optional(db)
        .await?;

        Ok(tag)
    }

    /// Deletes a tag by ID
    ///
    /// Task links referencing it are removed via ON DELETE CASCADE.
    /// Returns true if a row was deleted.
    pub async fn delete(db: impl PgExecutor<'_>, id: i32) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tags WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Lists tags with limit/offset pagination, oldest first
    pub async fn list(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<Self>, sqlx::Error> {
        let tags = sqlx::query_as::<_, Tag>(
            r#"
            SELECT id, title, created_at, updated_at
            FROM tags
            ORDER BY id ASC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        Ok(tags)
    }

    /// Counts all tags
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tags")
            .fetch_one(pool)
            .await?;

        Ok(count)
    }

    /// Lists the tags attached to a task, joined through `task_tags`
    pub async fn list_for_task(
        db: impl PgExecutor<'_>,
        task_id: i32,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let tags = sqlx::query_as::<_, Tag>(
            r#"
            SELECT t.id, t.title, t.created_at, t.updated_at
            FROM tags t
            JOIN task_tags tt ON tt.tag_id = t.id
            WHERE tt.task_id = $1
            ORDER BY t.id ASC
            "#,
        )
        .bind(task_id)
        .fetch_all(db)
        .await?;

        Ok(tags)
    }
}

// Tag is plain CRUD; behavior is covered by the DB-backed tests in
// tests/service_tests.rs.
