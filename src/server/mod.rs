//! HTTP surface: router, response envelope and error mapping.

pub mod envelope;
pub mod error;
pub mod extract;
pub mod frames;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::app::App;
use crate::models::Config;
use crate::{Error, Result};

pub use error::ApiError;

/// State shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub app: Arc<App>,
}

impl AppState {
    pub fn new(app: App) -> Self {
        Self { app: Arc::new(app) }
    }
}

/// Build the router with every frame route and the shared middleware.
pub fn create_router(state: AppState, max_upload_bytes: usize) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/frames", post(frames::create_frame))
        .route("/frames/ai", post(frames::create_ai_frame))
        .route("/frames/{frame_id}", get(frames::get_frame))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// Serve until Ctrl-C or SIGTERM.
pub async fn start_server(config: &Config, app: App) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .map_err(|e| Error::Config(format!("Invalid server address: {}", e)))?;

    let router = create_router(AppState::new(app), config.max_upload_bytes);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Frame server listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
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
