//! API routes for newscheck

use std::sync::Arc;

use axum::extract::{DefaultBodyLimit, State};
use axum::extract::rejection::JsonRejection;
use axum::routing::{get, post};
use axum::{Json, Router};
use newscheck_core::Prediction;
use serde::Serialize;
use serde_json::Value;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::error::ApiError;
use crate::server::AppState;

pub const NEWS_CHECKER_PATH: &str = "/api/v1/news-checker";
pub const HEALTH_PATH: &str = "/api/v1/health";

type AppStateArc = Arc<AppState>;

/// Build the full router with no cap on request body size.
pub fn router(state: AppStateArc) -> Router {
    router_with_body_limit(state, None)
}

/// Build the full router. Any method other than the ones routed here gets 405.
///
/// Bodies larger than `max_body_bytes` are rejected with 413; `None` lifts
/// axum's default 2 MB cap entirely.
pub fn router_with_body_limit(state: AppStateArc, max_body_bytes: Option<usize>) -> Router {
    let body_limit = match max_body_bytes {
        Some(limit) => DefaultBodyLimit::max(limit),
        None => DefaultBodyLimit::disable(),
    };
    Router::new()
        .route(NEWS_CHECKER_PATH, post(check_news))
        .route(HEALTH_PATH, get(health))
        .with_state(state)
        .layer(body_limit)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

async fn check_news(
    State(state): State<AppStateArc>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Prediction>, ApiError> {
    let Json(payload) = payload?;
    let prediction = state.predictor.predict_from_request(&payload)?;
    Ok(Json(prediction))
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    classifier: &'static str,
    features: usize,
    loaded_at: String,
}

async fn health(State(state): State<AppStateArc>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        classifier: state.predictor.classifier_kind(),
        features: state.predictor.feature_dim(),
        loaded_at: state.loaded_at.to_rfc3339(),
    })
}
