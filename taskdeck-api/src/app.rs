/// Application state and router builder
///
/// Defines the shared application state and builds the Axum router with
/// all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use taskdeck_api::{app::AppState, config::Config};
/// use taskdeck_shared::reminders::smtp::SmtpNotifier;
/// use sqlx::PgPool;
/// use std::sync::Arc;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let notifier = Arc::new(SmtpNotifier::new(config.smtp.clone()));
/// let state = AppState::new(pool, config, notifier);
/// let app = taskdeck_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, error::ApiError, middleware::security::SecurityHeadersLayer};
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{delete, get, post, put},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use taskdeck_shared::auth::{authorization, middleware::AuthContext};
use taskdeck_shared::reminders::Notifier;
use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor; the
/// pool and config are cheap to clone (pool is internally Arc'd).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,

    /// Reminder delivery channel
    pub notifier: Arc<dyn Notifier>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            db,
            config: Arc::new(config),
            notifier,
        }
    }

    /// Gets the JWT secret for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                       # Health check (public)
/// └── /api/
///     ├── /auth/                    # register, login, refresh (public)
///     │                             # logout, me, password (authenticated)
///     ├── /profile                  # profile view/edit
///     ├── /tasks/                   # task CRUD, reorder, assignment, subtask nesting
///     ├── /subtasks/:id             # subtask edit/delete
///     ├── /analytics/summary        # aggregate counts
///     ├── /reminders/send           # due-reminder scan
///     └── /admin/users              # user management (admin role)
/// ```
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Logging (tower-http TraceLayer)
/// 2. CORS + compression + security headers
/// 3. Authentication (per-group), admin gate on /api/admin
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    // Health check (public, no auth)
    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    // Auth routes that must work without a token
    let auth_public = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login))
        .route("/refresh", post(routes::auth::refresh));

    // Auth routes for an established session
    let auth_protected = Router::new()
        .route("/logout", post(routes::auth::logout))
        .route("/me", get(routes::auth::me))
        .route("/password", put(routes::auth::change_password))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    let task_routes = Router::new()
        .route("/", get(routes::tasks::list_tasks).post(routes::tasks::create_task))
        .route("/completed", delete(routes::tasks::clear_completed))
        .route("/reorder", put(routes::tasks::reorder_tasks))
        .route(
            "/:id",
            get(routes::tasks::get_task)
                .put(routes::tasks::update_task)
                .delete(routes::tasks::delete_task),
        )
        .route("/:id/assign", put(routes::tasks::assign_task))
        .route(
            "/:id/subtasks",
            get(routes::subtasks::list_subtasks).post(routes::subtasks::create_subtask),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    let subtask_routes = Router::new()
        .route(
            "/:id",
            put(routes::subtasks::update_subtask).delete(routes::subtasks::delete_subtask),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    let profile_routes = Router::new()
        .route(
            "/",
            get(routes::profile::get_profile).put(routes::profile::update_profile),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    let analytics_routes = Router::new()
        .route("/summary", get(routes::analytics::summary))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    let reminder_routes = Router::new()
        .route("/send", post(routes::reminders::send_reminders))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    // Admin routes: the role gate runs after (inside) authentication
    let admin_routes = Router::new()
        .route("/users", get(routes::admin::list_users))
        .route("/users/:id", put(routes::admin::update_user))
        .layer(axum::middleware::from_fn(require_admin_layer))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    let api_routes = Router::new()
        .nest("/auth", auth_public.merge(auth_protected))
        .nest("/profile", profile_routes)
        .nest("/tasks", task_routes)
        .nest("/subtasks", subtask_routes)
        .nest("/analytics", analytics_routes)
        .nest("/reminders", reminder_routes)
        .nest("/admin", admin_routes);

    // Configure CORS based on environment
    let cors = if state.config.api.cors_origins.contains(&"*".to_string()) {
        // Development mode: permissive CORS
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
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    Router::new()
        .merge(health_routes)
        .nest("/api", api_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .layer(CompressionLayer::new())
        .layer(SecurityHeadersLayer::new(state.config.api.production))
        .with_state(state)
}

/// JWT authentication middleware layer
///
/// Validates the bearer token from the Authorization header and injects
/// an `AuthContext` into request extensions for handlers to extract.
async fn jwt_auth_layer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth = taskdeck_shared::auth::middleware::authenticate(req.headers(), state.jwt_secret())?;

    req.extensions_mut().insert(auth);

    Ok(next.run(req).await)
}

/// Admin role gate
///
/// Runs inside `jwt_auth_layer`, so the auth context is already present;
/// rejects non-admin roles before the handler is reached.
async fn require_admin_layer(req: Request, next: Next) -> Result<Response, ApiError> {
    let auth = req
        .extensions()
        .get::<AuthContext>()
        .ok_or_else(|| ApiError::Unauthorized("Missing authentication context".to_string()))?;

    authorization::require_admin(auth)?;

    Ok(next.run(req).await)
}
