//! # Userdir API - REST API Layer
//!
//! Exposes the user directory over REST: point lookup, full enumeration,
//! health probes, and static assets. Maps the repository's error taxonomy
//! to HTTP status codes; absence becomes 404, store and decode failures
//! become 500, malformed identifiers are rejected with 400 before the
//! repository runs.

use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use thiserror::Error;
use tower_http::services::ServeDir;
use tower_http::{compression::CompressionLayer, cors::CorsLayer};
use tracing::info;
use userdir_config::Config;
use userdir_repository::{RepositoryError, UserRepository};
use userdir_store::KvClient;

pub mod handlers;
pub mod health;
pub mod validation;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => {
                tracing::error!(error = %self, "Request failed");
                StatusCode::INTERNAL_SERVER_ERROR
            },
        };

        (status, Json(ErrorResponse { error: self.to_string() })).into_response()
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

pub type Result<T> = std::result::Result<T, ApiError>;

/// Application state
#[derive(Clone)]
pub struct AppState {
    /// Shared handle to the externally owned store connection.
    pub client: Arc<dyn KvClient>,
    pub repository: Arc<UserRepository>,
    pub config: Arc<Config>,
    pub health_tracker: Arc<health::HealthTracker>,
}

impl AppState {
    /// Creates application state over a connected store client.
    pub fn new(client: Arc<dyn KvClient>, config: Arc<Config>) -> Self {
        let repository = Arc::new(UserRepository::new(Arc::clone(&client)));
        let health_tracker = Arc::new(health::HealthTracker::new());

        Self { client, repository, config, health_tracker }
    }
}

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    let static_dir = state.config.server.static_dir.clone();

    Router::new()
        .route("/health", get(health::health_check_handler))
        .route("/health/live", get(health::liveness_handler))
        .route("/health/ready", get(health::readiness_handler))
        .route("/v1/users", get(handlers::users::list::list_users))
        .route("/v1/users/{id}", get(handlers::users::get::get_user))
        .nest_service("/static", ServeDir::new(static_dir))
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any),
        )
        .layer(CompressionLayer::new())
}

/// Graceful shutdown signal handler
///
/// Waits for SIGTERM (Kubernetes) or SIGINT (Ctrl+C) and initiates graceful
/// shutdown.
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        signal::ctrl_c().await.expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received SIGINT (Ctrl+C), initiating graceful shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown");
        }
    }

    info!("Shutdown signal received, draining connections...");
}

/// Start the REST API server
pub async fn serve(client: Arc<dyn KvClient>, config: Arc<Config>) -> anyhow::Result<()> {
    let state = AppState::new(client, Arc::clone(&config));

    // Mark service as ready to accept traffic
    state.health_tracker.set_ready(true);

    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!("Starting REST API server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;

    Ok(())
}
