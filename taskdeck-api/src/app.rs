/// Application state and router builder
///
/// Defines the shared application state handed to every handler and builds
/// the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use taskdeck_api::{app::{build_router, AppState}, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::new(pool, config);
/// let app = build_router(state);
/// # Ok(())
/// # }
/// ```
use crate::config::Config;
use axum::{
    http::{header, HeaderValue, Method},
    routing::{delete, get, post},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use taskdeck_shared::services::{ProjectService, TagService, TaskService, UserService};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned into each request handler via Axum's `State` extractor. The
/// services are constructed once, here, over the injected pool - handlers
/// never assemble their own dependencies.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,

    /// Project orchestration (CRUD + member management)
    pub projects: ProjectService,

    /// Task orchestration (lifecycle + tag reconciliation)
    pub tasks: TaskService,

    /// Tag CRUD
    pub tags: TagService,

    /// User accounts
    pub users: UserService,
}

impl AppState {
    /// Creates new application state over a connection pool
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            projects: ProjectService::new(db.clone()),
            tasks: TaskService::new(db.clone()),
            tags: TagService::new(db.clone()),
            users: UserService::new(db.clone()),
            db,
            config: Arc::new(config),
        }
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                                              # liveness (public)
/// ├── /project                                             # projects
/// │   ├── POST   /                                         # create
/// │   ├── GET    /?page&size                               # list
/// │   ├── POST   /add-member/:ownerId                      # owner-only
/// │   ├── DELETE /remove-member/:projectId/:memberId/:ownerId
/// │   └── GET|PATCH|DELETE /:id
/// ├── /task
/// │   ├── POST   /create-task?userId=
/// │   ├── GET    /?page&size
/// │   ├── GET    /by-project/:projectId
/// │   └── GET|PATCH|DELETE /task/:taskId?userId=
/// ├── /tag
/// │   ├── POST   /            GET /?page&size
/// │   └── GET|PATCH|DELETE /tag/:id
/// └── /user
///     ├── POST   /            GET /?page&size
///     └── GET|PATCH|DELETE /:id
/// ```
///
/// # Middleware Stack
///
/// 1. Request logging (tower-http TraceLayer)
/// 2. CORS (permissive when configured with `*`, restricted otherwise)
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    let project_routes = Router::new()
        .route("/", post(routes::project::create).get(routes::project::find_all))
        .route("/add-member/:owner_id", post(routes::project::add_member))
        .route(
            "/remove-member/:project_id/:member_id/:owner_id",
            delete(routes::project::remove_member),
        )
        .route(
            "/:id",
            get(routes::project::detail)
                .patch(routes::project::update)
                .delete(routes::project::delete),
        );

    let task_routes = Router::new()
        .route("/", get(routes::task::find_all))
        .route("/create-task", post(routes::task::create))
        .route(
            "/task/:task_id",
            get(routes::task::detail)
                .patch(routes::task::update)
                .delete(routes::task::delete),
        )
        .route("/by-project/:project_id", get(routes::task::by_project));

    let tag_routes = Router::new()
        .route("/", post(routes::tag::create).get(routes::tag::find_all))
        .route(
            "/tag/:id",
            get(routes::tag::detail)
                .patch(routes::tag::update)
                .delete(routes::tag::delete),
        );

    let user_routes = Router::new()
        .route("/", post(routes::user::create).get(routes::user::find_all))
        .route(
            "/:id",
            get(routes::user::detail)
                .patch(routes::user::update)
                .delete(routes::user::delete),
        );

    // Configure CORS based on environment
    let cors = if state.config.api.cors_origins.contains(&"*".to_string()) {
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PATCH,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
    };

    Router::new()
        .merge(health_routes)
        .nest("/project", project_routes)
        .nest("/task", task_routes)
        .nest("/tag", tag_routes)
        .nest("/user", user_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}
