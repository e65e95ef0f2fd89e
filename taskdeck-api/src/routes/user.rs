/// User endpoints
///
/// Signup rejects duplicate emails; responses never include the password
/// hash (the model skips it during serialization).
///
/// # Endpoints
///
/// - `POST   /user` - signup (201)
/// - `GET    /user?page&size` - paginated listing
/// - `GET    /user/:id` - detail
/// - `PATCH  /user/:id` - partial update
/// - `DELETE /user/:id`
use crate::{
    app::AppState,
    error::{validation_error, ApiResult},
    routes::{MessageResponse, PageParams},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use taskdeck_shared::models::user::User;
use taskdeck_shared::pagination::Page;
use taskdeck_shared::services::user::{NewUser, UserChanges};
use validator::Validate;

/// Signup request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Update user request; absent fields stay untouched
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserRequest {
    pub name: Option<String>,

    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    pub password: Option<String>,
}

/// `POST /user`
///
/// # Errors
///
/// - `400 Bad Request`: invalid fields, or the email is already taken
pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<User>)> {
    req.validate().map_err(validation_error)?;

    let user = state
        .users
        .create(NewUser {
            name: req.name,
            email: req.email,
            password: req.password,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(user)))
}

/// `GET /user/:id`
pub async fn detail(State(state): State<AppState>, Path(id): Path<i32>) -> ApiResult<Json<User>> {
    let user = state.users.detail(id).await?;

    Ok(Json(user))
}

/// `PATCH /user/:id`
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(req): Json<UpdateUserRequest>,
) -> ApiResult<Json<User>> {
    req.validate().map_err(validation_error)?;

    let user = state
        .users
        .update(
            id,
            UserChanges {
                name: req.name,
                email: req.email,
                password: req.password,
            },
        )
        .await?;

    Ok(Json(user))
}

/// `DELETE /user/:id`
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<Json<MessageResponse>> {
    state.users.delete(id).await?;

    Ok(Json(MessageResponse::new(format!(
        "User with ID {} was successfully deleted",
        id
    ))))
}

/// `GET /user?page&size`
pub async fn find_all(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> ApiResult<Json<Page<User>>> {
    let (page, size) = params.resolve()?;

    let users = state.users.find_all(page, size).await?;

    Ok(Json(users))
}
