//! HTTP route handlers.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    response::Json,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::error::ApiError;
use super::types::*;
use crate::config::Config;
use crate::extraction::ExtractionService;

/// Shared application state.
pub struct AppState {
    /// Transcript extraction pipeline
    pub extractor: ExtractionService,
}

impl AppState {
    /// Build state from configuration.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let extractor = ExtractionService::from_config(&config.gemini)?;
        Ok(Self { extractor })
    }
}

/// Build the application router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/api/health", get(health))
        .route("/api/extract-tasks", post(extract_tasks))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server.
pub async fn serve(config: Config) -> anyhow::Result<()> {
    let state = Arc::new(AppState::from_config(&config)?);
    if !state.extractor.is_configured() {
        tracing::warn!("GEMINI_API_KEY is not set; extraction requests will fail until it is");
    }

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Wait for SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

/// Liveness probe.
async fn root() -> &'static str {
    "Backend is running"
}

/// Health check endpoint.
async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        upstream_configured: state.extractor.is_configured(),
    })
}

/// Extract task candidates from a transcript.
async fn extract_tasks(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ExtractTasksRequest>, JsonRejection>,
) -> Result<Json<ExtractTasksResponse>, ApiError> {
    let Json(req) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let transcript = req.transcript.unwrap_or_default();

    let tasks = state.extractor.extract(&transcript).await?;
    Ok(Json(ExtractTasksResponse { tasks }))
}
