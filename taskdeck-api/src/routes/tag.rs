/// Tag endpoints
///
/// Tags are global and unguarded - any caller may manage any tag.
///
/// # Endpoints
///
/// - `POST   /tag` - create (201)
/// - `GET    /tag?page&size` - paginated listing
/// - `GET    /tag/tag/:id` - detail
/// - `PATCH  /tag/tag/:id` - rename
/// - `DELETE /tag/tag/:id`
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
use taskdeck_shared::models::tag::Tag;
use taskdeck_shared::pagination::Page;
use validator::Validate;

/// Create/rename tag request
#[derive(Debug, Deserialize, Validate)]
pub struct TagRequest {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
}

/// `POST /tag`
pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<TagRequest>,
) -> ApiResult<(StatusCode, Json<Tag>)> {
    req.validate().map_err(validation_error)?;

    let tag = state.tags.create(&req.title).await?;

    Ok((StatusCode::CREATED, Json(tag)))
}

/// `GET /tag/tag/:id`
pub async fn detail(State(state): State<AppState>, Path(id): Path<i32>) -> ApiResult<Json<Tag>> {
    let tag = state.tags.detail(id).await?;

    Ok(Json(tag))
}

/// `PATCH /tag/tag/:id`
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(req): Json<TagRequest>,
) -> ApiResult<Json<Tag>> {
    req.validate().map_err(validation_error)?;

    let tag = state.tags.update(id, &req.title).await?;

    Ok(Json(tag))
}

/// `DELETE /tag/tag/:id`
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<Json<MessageResponse>> {
    state.tags.delete(id).await?;

    Ok(Json(MessageResponse::new("Tag deleted successfully")))
}

/// `GET /tag?page&size`
pub async fn find_all(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> ApiResult<Json<Page<Tag>>> {
    let (page, size) = params.resolve()?;

    let tags = state.tags.find_all(page, size).await?;

    Ok(Json(tags))
}
