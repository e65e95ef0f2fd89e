/// Authorization checks for project access
///
/// Two relationships gate everything a user can do inside a project:
///
/// 1. **Ownership** - the single user recorded as `projects.owner_id`.
///    Only the owner may add or remove members.
/// 2. **Membership** - a `project_memberships` row. Any member (the owner
///    always holds one) may create, edit, and delete tasks in the project.
///
/// There is no real authentication in front of these checks: callers pass
/// an opaque acting-user id that the presentation layer accepted as-is.
/// The checks therefore answer "may this id act", never "is this id who it
/// claims to be" - an auth layer can be slotted in front without touching
/// them.
///
/// # Example
///
/// ```no_run
/// use taskdeck_shared::auth::authorization::{require_membership, require_owner};
/// use taskdeck_shared::models::project::Project;
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool, project: Project, user_id: i32) -> Result<(), Box<dyn std::error::Error>> {
/// // Owner-only action
/// require_owner(&project, user_id, "add members")?;
///
/// // Member-allowed action
/// require_membership(&pool, project.id, user_id, "create tasks").await?;
/// # Ok(())
/// # }
/// ```
use sqlx::PgPool;

use crate::models::membership::ProjectMembership;
use crate::models::project::Project;

/// Error type for authorization checks
#[derive(Debug, thiserror::Error)]
pub enum AuthzError {
    /// Acting user is not the project owner
    #[error("Only the project owner can {action}")]
    NotOwner { action: String },

    /// Acting user holds no membership on the project
    #[error("Only project members can {action}")]
    NotMember { action: String },

    /// Database error while checking membership
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// True iff `user_id` is the project's owner
pub fn is_owner(project: &Project, user_id: i32) -> bool {
    project.owner_id == user_id
}

/// Requires that `user_id` owns the project
///
/// `action` names the operation for the error message, e.g. "add members".
///
/// # Errors
///
/// Returns [`AuthzError::NotOwner`] if the acting user is not the owner.
pub fn require_owner(project: &Project, user_id: i32, action: &str) -> Result<(), AuthzError> {
    if !is_owner(project, user_id) {
        return Err(AuthzError::NotOwner {
            action: action.to_string(),
        });
    }

    Ok(())
}

/// Requires that `user_id` is a member of the project
///
/// # Errors
///
/// Returns [`AuthzError::NotMember`] if no membership row exists, or
/// [`AuthzError::Database`] if the lookup fails.
pub async fn require_membership(
    pool: &PgPool,
    project_id: i32,
    user_id: i32,
    action: &str,
) -> Result<(), AuthzError> {
    let is_member = ProjectMembership::exists(pool, project_id, user_id).await?;

    if !is_member {
        return Err(AuthzError::NotMember {
            action: action.to_string(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn project_owned_by(owner_id: i32) -> Project {
        Project {
            id: 1,
            name: "Test Project".to_string(),
            description: String::new(),
            owner_id,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_is_owner() {
        let project = project_owned_by(42);
        assert!(is_owner(&project, 42));
        assert!(!is_owner(&project, 7));
    }

    #[test]
    fn test_require_owner() {
        let project = project_owned_by(42);

        assert!(require_owner(&project, 42, "add members").is_ok());

        let err = require_owner(&project, 7, "add members").unwrap_err();
        assert_eq!(err.to_string(), "Only the project owner can add members");
    }

    #[test]
    fn test_not_member_message_names_action() {
        let err = AuthzError::NotMember {
            action: "delete tasks".to_string(),
        };
        assert_eq!(err.to_string(), "Only project members can delete tasks");
    }
}
