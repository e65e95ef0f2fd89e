/// Project membership model and database operations
///
/// A membership row grants a user access to a project's resources: members
/// may create, edit, and delete tasks. Adding and removing members is the
/// owner's privilege and is enforced one level up, in
/// [`crate::auth::authorization`] and the project service.
///
/// The `(user_id, project_id)` pair is unique; the constraint is the only
/// guard against two concurrent add-member calls inserting the same row, so
/// callers must translate its violation rather than pre-checking.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE project_memberships (
///     id SERIAL PRIMARY KEY,
///     user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     project_id INTEGER NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     UNIQUE (user_id, project_id)
/// );
/// ```
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgExecutor, PgPool};

/// Membership row linking a user to a project
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ProjectMembership {
    /// Unique membership ID
    pub id: i32,

    /// Member user ID
    pub user_id: i32,

    /// Project ID
    pub project_id: i32,

    /// When the membership was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new membership
#[derive(Debug, Clone)]
pub struct CreateMembership {
    pub user_id: i32,
    pub project_id: i32,
}

impl ProjectMembership {
    /// Creates a membership (adds a user to a project)
    ///
    /// # Errors
    ///
    /// Returns an error if the membership already exists (unique constraint
    /// violation), a referenced row is missing, or the database fails.
    pub async fn create(
        db: impl PgExecutor<'_>,
        data: CreateMembership,
    ) -> Result<Self, sqlx::Error> {
        let membership = sqlx::query_as::<_, ProjectMembership>(
            r#"
            INSERT INTO project_memberships (user_id, project_id)
            VALUES ($1, $2)
            RETURNING id, user_id, project_id, created_at
            "#,
        )
        .bind(data.user_id)
        .bind(data.project_id)
        .fetch_one(db)
        .await?;

        Ok(membership)
    }

    /// Finds the membership row for a user on a project
    pub async fn find(
        db: impl PgExecutor<'_>,
        project_id: i32,
        user_id: i32,
    ) -> Result<Option<Self>, sqlx::Error> {
        let membership = sqlx::query_as::<_, ProjectMembership>(
            r#"
            SELECT id, user_id, project_id, created_at
            FROM project_memberships
            WHERE project_id = $1 AND user_id = $2
            "#,
        )
        .bind(project_id)
        .bind(user_id)
        .fetch_optional(db)
        .await?;

        Ok(membership)
    }

    /// Checks whether a user is a member of a project
    pub async fn exists(
        db: impl PgExecutor<'_>,
        project_id: i32,
        user_id: i32,
    ) -> Result<bool, sqlx::Error> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM project_memberships
                WHERE project_id = $1 AND user_id = $2
            )
            "#,
        )
        .bind(project_id)
        .bind(user_id)
        .fetch_one(db)
        .await?;

        Ok(exists)
    }

    /// Deletes the membership for a user on a project
    ///
    /// Returns true if a row was deleted.
    pub async fn delete(
        db: impl PgExecutor<'_>,
        project_id: i32,
        user_id: i32,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM project_memberships WHERE project_id = $1 AND user_id = $2")
                .bind(project_id)
                .bind(user_id)
                .execute(db)
                .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Lists all memberships for a project, oldest first
    pub async fn list_by_project(pool: &PgPool, project_id: i32) -> Result<Vec<Self>, sqlx::Error> {
        let memberships = sqlx::query_as::<_, ProjectMembership>(
            r#"
            SELECT id, user_id, project_id, created_at
            FROM project_memberships
            WHERE project_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(project_id)
        .fetch_all(pool)
        .await?;

        Ok(memberships)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_membership_serializes_camel_case() {
        let membership = ProjectMembership {
            id: 1,
            user_id: 2,
            project_id: 3,
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(&membership).expect("serialize");
        assert_eq!(json["userId"], 2);
        assert_eq!(json["projectId"], 3);
    }

    // Integration tests for database operations are in tests/service_tests.rs
}
