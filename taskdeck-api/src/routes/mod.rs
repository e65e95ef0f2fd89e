/// API route handlers
///
/// Handlers are thin: they parse and validate the boundary (ids, paging,
/// bodies), call the matching service, and shape the response. Every id
/// reaching a service has already been parsed into an integer here.
///
/// - `health`: liveness and database connectivity
/// - `project`: project CRUD and member management
/// - `task`: board tasks
/// - `tag`: global tag CRUD
/// - `user`: accounts
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

pub mod health;
pub mod project;
pub mod tag;
pub mod task;
pub mod user;

/// Pagination query parameters, shared by every list endpoint
///
/// Both parameters are required; `page` is zero-based and `size` must be
/// strictly positive.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PageParams {
    pub page: Option<i64>,
    pub size: Option<i64>,
}

impl PageParams {
    /// Validates the parameters, yielding `(page, size)` for the services
    pub fn resolve(self) -> Result<(i64, i64), ApiError> {
        match (self.page, self.size) {
            (Some(page), Some(size)) if page >= 0 && size > 0 => Ok((page, size)),
            _ => Err(ApiError::BadRequest(
                "Invalid page or size parameters".to_string(),
            )),
        }
    }
}

/// The `?userId=` acting-user parameter on task mutations
///
/// This is the stand-in for an authenticated actor: the id is taken at
/// face value and handed to the membership checks.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActorParams {
    pub user_id: Option<i32>,
}

impl ActorParams {
    /// Requires the parameter to be present
    pub fn require(self) -> Result<i32, ApiError> {
        self.user_id
            .ok_or_else(|| ApiError::BadRequest("userId query parameter is required".to_string()))
    }
}

/// Simple acknowledgment payload for delete-style endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_params_accept_valid_paging() {
        let params = PageParams {
            page: Some(0),
            size: Some(10),
        };
        assert_eq!(params.resolve().unwrap(), (0, 10));
    }

    #[test]
    fn test_page_params_reject_missing_or_out_of_range() {
        let missing = PageParams {
            page: None,
            size: Some(10),
        };
        assert!(missing.resolve().is_err());

        let negative_page = PageParams {
            page: Some(-1),
            size: Some(10),
        };
        assert!(negative_page.resolve().is_err());

        let zero_size = PageParams {
            page: Some(0),
            size: Some(0),
        };
        assert!(zero_size.resolve().is_err());
    }

    #[test]
    fn test_actor_params_require() {
        assert_eq!(ActorParams { user_id: Some(7) }.require().unwrap(), 7);
        assert!(ActorParams { user_id: None }.require().is_err());
    }
}
