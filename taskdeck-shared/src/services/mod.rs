/// Service orchestration
///
/// Services sit between the HTTP surface and the models, running each
/// operation's checks in a fixed order: existence first, then
/// authorization, then business rules, then the mutation. The first failing
/// check short-circuits the pipeline; no mutation runs after a failure and
/// no partial success is ever reported as success. Multi-step writes
/// (project + owner membership, task + tag links) run inside one
/// transaction.
///
/// Each service is a small struct constructed over a [`sqlx::PgPool`] -
/// dependencies arrive through the constructor, nothing is reached through
/// global state.
///
/// # Services
///
/// - `project`: project CRUD plus owner-gated member management
/// - `task`: task lifecycle with membership checks and tag reconciliation
/// - `tag`: unguarded CRUD over the global tag namespace
/// - `user`: signup with duplicate-email rejection and password hashing
use crate::auth::authorization::AuthzError;
use crate::auth::password::PasswordError;

pub mod project;
pub mod tag;
pub mod task;
pub mod user;

pub use project::ProjectService;
pub use tag::TagService;
pub use task::TaskService;
pub use user::UserService;

/// Service result type alias
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Error taxonomy shared by all services
///
/// Every variant carries a human-readable message naming the precondition
/// that failed. The HTTP layer maps these onto status codes: `NotFound` →
/// 404, `Forbidden` → 403, `BusinessRule` → 400, `Internal` → 500.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// A referenced entity id did not resolve
    #[error("{0}")]
    NotFound(String),

    /// The actor lacks the required relationship to the project
    #[error("{0}")]
    Forbidden(String),

    /// A domain rule was violated (completed-task lock, empty tag list,
    /// duplicate email, duplicate membership)
    #[error("{0}")]
    BusinessRule(String),

    /// Unexpected store failure, original message kept for diagnostics
    #[error("{0}")]
    Internal(String),
}

impl From<sqlx::Error> for ServiceError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ServiceError::NotFound("Resource not found".to_string()),
            sqlx::Error::Database(db_err) => {
                // Unique-key races (two concurrent add-member calls, a
                // repeated tag link) surface here; they are client errors,
                // not server faults.
                if let Some(constraint) = db_err.constraint() {
                    if constraint.contains("email") {
                        return ServiceError::BusinessRule(
                            "There is already a user with this email".to_string(),
                        );
                    }
                    if constraint.contains("membership") {
                        return ServiceError::BusinessRule(
                            "User is already a member of this project".to_string(),
                        );
                    }
                    if constraint.contains("task_tags") {
                        return ServiceError::BusinessRule(
                            "Tag is already attached to this task".to_string(),
                        );
                    }
                }

                ServiceError::Internal(format!("Database error: {}", db_err))
            }
            _ => ServiceError::Internal(format!("Database error: {}", err)),
        }
    }
}

impl From<AuthzError> for ServiceError {
    fn from(err: AuthzError) -> Self {
        match err {
            AuthzError::NotOwner { .. } | AuthzError::NotMember { .. } => {
                ServiceError::Forbidden(err.to_string())
            }
            AuthzError::Database(e) => ServiceError::from(e),
        }
    }
}

impl From<PasswordError> for ServiceError {
    fn from(err: PasswordError) -> Self {
        ServiceError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::authorization::AuthzError;

    #[test]
    fn test_authz_errors_map_to_forbidden() {
        let err: ServiceError = AuthzError::NotOwner {
            action: "add members".to_string(),
        }
        .into();

        match err {
            ServiceError::Forbidden(msg) => {
                assert_eq!(msg, "Only the project owner can add members")
            }
            other => panic!("expected Forbidden, got {:?}", other),
        }
    }

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        let err: ServiceError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[test]
    fn test_error_display_is_bare_message() {
        let err = ServiceError::BusinessRule("Tasks must have tags".to_string());
        assert_eq!(err.to_string(), "Tasks must have tags");
    }
}
