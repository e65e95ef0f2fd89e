/// Project endpoints
///
/// # Endpoints
///
/// - `POST   /project` - create a project (201)
/// - `POST   /project/add-member/:ownerId` - add a member, owner-only
/// - `DELETE /project/remove-member/:projectId/:memberId/:ownerId`
/// - `PATCH  /project/:projectId` - partial update
/// - `GET    /project?page&size` - paginated listing
/// - `GET    /project/:id` - detail with derived task count
/// - `DELETE /project/:id` - delete (204)
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
use taskdeck_shared::models::project::{CreateProject, Project, UpdateProject};
use taskdeck_shared::models::membership::ProjectMembership;
use taskdeck_shared::pagination::Page;
use taskdeck_shared::services::project::ProjectDetail;
use validator::Validate;

/// Create project request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectRequest {
    /// The owner's user id - also the acting user for this call
    pub owner_id: i32,

    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,

    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
}

/// Add member request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddMemberRequest {
    /// User to add
    pub user_id: i32,

    /// Project to add them to
    pub project_id: i32,
}

/// Update project request; absent fields stay untouched
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProjectRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// `POST /project`
///
/// # Errors
///
/// - `404 Not Found`: owner id does not resolve
/// - `400 Bad Request`: empty name or description
/// - `500 Internal Server Error`: store failure
pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateProjectRequest>,
) -> ApiResult<(StatusCode, Json<Project>)> {
    req.validate().map_err(validation_error)?;

    let project = state
        .projects
        .create(CreateProject {
            name: req.name,
            description: req.description,
            owner_id: req.owner_id,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(project)))
}

/// `POST /project/add-member/:ownerId`
///
/// The path parameter is the acting owner; the body names the project and
/// the user to add.
///
/// # Errors
///
/// - `404 Not Found`: project or user missing
/// - `403 Forbidden`: acting user is not the owner
/// - `400 Bad Request`: user is already a member
pub async fn add_member(
    State(state): State<AppState>,
    Path(owner_id): Path<i32>,
    Json(req): Json<AddMemberRequest>,
) -> ApiResult<Json<ProjectMembership>> {
    let membership = state
        .projects
        .add_member(req.project_id, req.user_id, owner_id)
        .await?;

    Ok(Json(membership))
}

/// `DELETE /project/remove-member/:projectId/:memberId/:ownerId`
///
/// # Errors
///
/// - `404 Not Found`: project missing, or member holds no membership
/// - `403 Forbidden`: acting user is not the owner
pub async fn remove_member(
    State(state): State<AppState>,
    Path((project_id, member_id, owner_id)): Path<(i32, i32, i32)>,
) -> ApiResult<Json<MessageResponse>> {
    state
        .projects
        .remove_member(project_id, member_id, owner_id)
        .await?;

    Ok(Json(MessageResponse::new("Member removed successfully")))
}

/// `PATCH /project/:projectId`
pub async fn update(
    State(state): State<AppState>,
    Path(project_id): Path<i32>,
    Json(req): Json<UpdateProjectRequest>,
) -> ApiResult<Json<Project>> {
    let project = state
        .projects
        .update(
            project_id,
            UpdateProject {
                name: req.name,
                description: req.description,
            },
        )
        .await?;

    Ok(Json(project))
}

/// `GET /project?page&size`
pub async fn find_all(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> ApiResult<Json<Page<Project>>> {
    let (page, size) = params.resolve()?;

    let projects = state.projects.find_all(page, size).await?;

    Ok(Json(projects))
}

/// `GET /project/:id`
pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<Json<ProjectDetail>> {
    let detail = state.projects.detail(id).await?;

    Ok(Json(detail))
}

/// `DELETE /project/:id`
pub async fn delete(State(state): State<AppState>, Path(id): Path<i32>) -> ApiResult<StatusCode> {
    state.projects.delete(id).await?;

    Ok(StatusCode::NO_CONTENT)
}
