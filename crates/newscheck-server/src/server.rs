//! HTTP server for newscheck

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use newscheck_ai::{ArtifactError, Predictor};
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::config::ServerConfig;
use crate::routes;

/// Application state shared across handlers.
///
/// Built once before the listener starts and never mutated afterwards.
pub struct AppState {
    pub predictor: Predictor,
    pub loaded_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(predictor: Predictor) -> Self {
        Self {
            predictor,
            loaded_at: Utc::now(),
        }
    }

    /// Load the model artifacts from `dir`.
    pub fn load(dir: &Path) -> Result<Self, ArtifactError> {
        Predictor::load(dir).map(Self::new)
    }
}

/// Load artifacts, bind, and serve until Ctrl-C.
///
/// Artifact loading happens before binding, so a bad artifact never leaves a
/// listening socket behind.
pub async fn run(config: &ServerConfig) -> Result<()> {
    let state = AppState::load(&config.artifacts_dir).with_context(|| {
        format!(
            "loading model artifacts from {}",
            config.artifacts_dir.display()
        )
    })?;

    let listener = TcpListener::bind((config.host.as_str(), config.port))
        .await
        .with_context(|| format!("binding {}:{}", config.host, config.port))?;

    serve(listener, state, config.max_body_bytes).await
}

/// Serve on an already-bound listener.
///
/// `max_body_bytes` caps request bodies; `None` accepts any size.
pub async fn serve(
    listener: TcpListener,
    state: AppState,
    max_body_bytes: Option<usize>,
) -> Result<()> {
    let app = routes::router_with_body_limit(Arc::new(state), max_body_bytes);

    info!(addr = %listener.local_addr()?, ?max_body_bytes, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "cannot listen for Ctrl-C, running until killed");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested, draining in-flight requests");
}
