/// Task endpoints
///
/// Task mutations carry the acting user in the `?userId=` query parameter;
/// membership and lifecycle rules are enforced by the task service.
///
/// # Endpoints
///
/// - `POST   /task/create-task?userId=` - create (201)
/// - `GET    /task/task/:taskId` - detail with tags
/// - `PATCH  /task/task/:taskId?userId=` - partial update + tag list
/// - `DELETE /task/task/:taskId?userId=`
/// - `GET    /task?page&size` - paginated listing with tags
/// - `GET    /task/by-project/:projectId` - unpaginated board listing
use crate::{
    app::AppState,
    error::{validation_error, ApiResult},
    routes::{ActorParams, MessageResponse, PageParams},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use taskdeck_shared::models::task::{Task, TaskStatus, TaskWithTags};
use taskdeck_shared::pagination::Page;
use taskdeck_shared::services::task::{NewTask, TaskChanges};
use validator::Validate;

/// Create task request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,

    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,

    /// Initial board column; `Done` is rejected by the service
    pub status: TaskStatus,

    pub project_id: i32,

    /// Tag ids to attach; must name at least one existing tag
    pub tags: Vec<i32>,
}

/// Update task request; absent fields stay untouched
///
/// Omitting `tags` leaves the tag set alone; supplying an empty list is
/// rejected.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub tags: Option<Vec<i32>>,
}

/// Unpaginated board listing response
#[derive(Debug, Serialize)]
pub struct TaskListResponse {
    pub data: Vec<TaskWithTags>,
}

/// `POST /task/create-task?userId=`
///
/// # Errors
///
/// - `404 Not Found`: project or a requested tag missing
/// - `403 Forbidden`: acting user is not a project member
/// - `400 Bad Request`: status is `Done`, tag list empty, or `userId` absent
pub async fn create(
    State(state): State<AppState>,
    Query(actor): Query<ActorParams>,
    Json(req): Json<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    let user_id = actor.require()?;
    req.validate().map_err(validation_error)?;

    let task = state
        .tasks
        .create(
            NewTask {
                title: req.title,
                description: req.description,
                status: req.status,
                project_id: req.project_id,
                tags: req.tags,
            },
            user_id,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(task)))
}

/// `GET /task/task/:taskId`
pub async fn detail(
    State(state): State<AppState>,
    Path(task_id): Path<i32>,
) -> ApiResult<Json<TaskWithTags>> {
    let task = state.tasks.detail(task_id).await?;

    Ok(Json(task))
}

/// `PATCH /task/task/:taskId?userId=`
///
/// Returns the updated task; tag changes are applied as a side effect and
/// show up on the next detail fetch.
///
/// # Errors
///
/// - `404 Not Found`: task or a requested tag missing
/// - `403 Forbidden`: acting user is not a project member
/// - `400 Bad Request`: task is completed or tag list empty
pub async fn update(
    State(state): State<AppState>,
    Path(task_id): Path<i32>,
    Query(actor): Query<ActorParams>,
    Json(req): Json<UpdateTaskRequest>,
) -> ApiResult<Json<Task>> {
    let user_id = actor.require()?;

    let task = state
        .tasks
        .update(
            task_id,
            TaskChanges {
                title: req.title,
                description: req.description,
                status: req.status,
                tags: req.tags,
            },
            user_id,
        )
        .await?;

    Ok(Json(task))
}

/// `DELETE /task/task/:taskId?userId=`
pub async fn delete(
    State(state): State<AppState>,
    Path(task_id): Path<i32>,
    Query(actor): Query<ActorParams>,
) -> ApiResult<Json<MessageResponse>> {
    let user_id = actor.require()?;

    state.tasks.delete(task_id, user_id).await?;

    Ok(Json(MessageResponse::new("Task deleted successfully")))
}

/// `GET /task?page&size`
pub async fn find_all(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> ApiResult<Json<Page<TaskWithTags>>> {
    let (page, size) = params.resolve()?;

    let tasks = state.tasks.find_all(page, size).await?;

    Ok(Json(tasks))
}

/// `GET /task/by-project/:projectId`
///
/// Backs the board view; an unknown project yields an empty list rather
/// than 404.
pub async fn by_project(
    State(state): State<AppState>,
    Path(project_id): Path<i32>,
) -> ApiResult<Json<TaskListResponse>> {
    let data = state.tasks.find_by_project(project_id).await?;

    Ok(Json(TaskListResponse { data }))
}
