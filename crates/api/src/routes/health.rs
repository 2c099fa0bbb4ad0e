use axum::{extract::State, routing::get, Json, Router};
use serde_json::{json, Value};

use crate::AppState;

pub fn health_router() -> Router<AppState> {
    Router::new().route("/healthz", get(healthz))
}

/// Health check endpoint, no auth required.
/// Used by systemd post-deploy check and ops scripts.
async fn healthz(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "assets": state.market.len().await,
        "feedback_records": state.feedback.len().await,
    }))
}
