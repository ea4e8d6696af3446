/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use todolist_api::{app::AppState, config::Config};
/// use todolist_shared::store::PgStore;
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::new(Arc::new(PgStore::new(pool)), config);
/// let app = todolist_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::config::Config;
use axum::{
    http::{header, HeaderValue, Method},
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use todolist_shared::store::TodoStore;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// This is cloned for each request handler via Axum's `State` extractor.
/// The store is the only path from a handler to the database.
#[derive(Clone)]
pub struct AppState {
    /// Persistence gateway
    pub store: Arc<dyn TodoStore>,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(store: Arc<dyn TodoStore>, config: Config) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Routes
///
/// ```text
/// /
/// ├── GET    /health
/// ├── /users
/// │   ├── POST   /users          # Create user
/// │   ├── GET    /users          # List users (with their tasks)
/// │   ├── PUT    /users          # Replace user
/// │   └── PUT    /users/update   # Replace user (legacy path)
/// ├── /tasks
/// │   ├── POST   /tasks          # Create task
/// │   ├── GET    /tasks          # List tasks (with their tags)
/// │   ├── PUT    /tasks          # Replace task
/// │   └── DELETE /tasks/:id      # Delete task
/// └── /tags
///     └── POST   /tags           # Create tag
/// ```
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Logging (tower-http TraceLayer)
/// 2. CORS (tower-http CorsLayer)
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    let user_routes = Router::new()
        .route(
            "/users",
            post(routes::users::create_user)
                .get(routes::users::list_users)
                .put(routes::users::update_user),
        )
        .route("/users/update", put(routes::users::update_user));

    let task_routes = Router::new()
        .route(
            "/tasks",
            post(routes::tasks::create_task)
                .get(routes::tasks::list_tasks)
                .put(routes::tasks::update_task),
        )
        .route("/tasks/:id", delete(routes::tasks::delete_task));

    let tag_routes = Router::new().route("/tags", post(routes::tags::create_tag));

    let cors = if state.config.api.cors_origins.iter().any(|origin| origin == "*") {
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
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::CONTENT_TYPE])
            .max_age(std::time::Duration::from_secs(3600))
    };

    Router::new()
        .merge(health_routes)
        .merge(user_routes)
        .merge(task_routes)
        .merge(tag_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}
