//! HTTP boundary
//!
//! Exposes the engine through the moderation extension protocol:
//!
//! - `POST /api/moderation` - bearer-protected extension endpoint
//! - `GET /health` - liveness probe
//!
//! # Example
//!
//! ```no_run
//! use vigil::server::{router, AppState};
//! # fn example(engine: vigil::moderation::ModerationEngine, config: vigil::config::VigilConfig) {
//! use std::sync::Arc;
//!
//! let state = AppState::new(Arc::new(engine), config.server.api_key.clone());
//! let app = router(state);
//! # }
//! ```

pub mod error;
pub mod handlers;
pub mod models;

use crate::config::{SecretString, ServerConfig};
use crate::domain::{Result, VigilError};
use crate::moderation::ModerationEngine;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tower_http::trace::TraceLayer;

pub use error::ApiError;

/// Moderation route
pub const MODERATION_PATH: &str = "/api/moderation";

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<ModerationEngine>,
    pub api_key: Arc<SecretString>,
}

impl AppState {
    pub fn new(engine: Arc<ModerationEngine>, api_key: SecretString) -> Self {
        Self {
            engine,
            api_key: Arc::new(api_key),
        }
    }
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    let protected = Router::new()
        .route(MODERATION_PATH, post(handlers::moderation))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            handlers::require_bearer,
        ));

    Router::new()
        .merge(protected)
        .route("/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve until `shutdown` flips to `true`
///
/// In-flight requests get `shutdown_timeout_seconds` to finish.
pub async fn serve(
    config: &ServerConfig,
    state: AppState,
    mut shutdown: watch::Receiver<bool>,
) -> Result<()> {
    let addr = config.socket_addr().map_err(VigilError::Configuration)?;
    let listener = tokio::net::TcpListener::bind(addr).await.map_err(|e| {
        VigilError::Configuration(format!("Failed to bind {addr}: {e}"))
    })?;

    tracing::info!(address = %addr, "Moderation server listening");

    let grace = Duration::from_secs(config.shutdown_timeout_seconds);
    let mut drain_signal = shutdown.clone();

    let signal = async move {
        while !*shutdown.borrow() {
            if shutdown.changed().await.is_err() {
                break;
            }
        }
        tracing::info!("Shutdown requested, draining in-flight requests");
    };

    let server = axum::serve(listener, router(state)).with_graceful_shutdown(signal);

    tokio::select! {
        result = server => {
            result.map_err(|e| VigilError::Io(e.to_string()))?;
        }
        _ = async {
            while !*drain_signal.borrow() {
                if drain_signal.changed().await.is_err() {
                    std::future::pending::<()>().await;
                }
            }
            tokio::time::sleep(grace).await;
        } => {
            tracing::warn!(timeout_seconds = grace.as_secs(), "Shutdown timeout elapsed, aborting in-flight requests");
        }
    }

    tracing::info!("Moderation server stopped");
    Ok(())
}
