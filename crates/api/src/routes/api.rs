use axum::{extract::State, routing::get, Json, Router};
use serde_json::{json, Value};

use crate::AppState;

pub fn api_router() -> Router<AppState> {
    Router::new()
        .route("/api/assets", get(get_assets))
        .route("/api/feedback/stats", get(get_feedback_stats))
}

// ─── Assets ───────────────────────────────────────────────────────────────────

async fn get_assets(State(state): State<AppState>) -> Json<Value> {
    let snapshots = state.market.snapshot_all().await;
    let assets: Vec<Value> = snapshots
        .iter()
        .map(|s| {
            json!({
                "symbol": s.symbol,
                "market": s.market_type,
                "candles": s.candles.len(),
                "last_price": s.candles.last().map(|c| c.close),
            })
        })
        .collect();

    Json(json!({ "assets": assets, "total": snapshots.len() }))
}

// ─── Feedback stats ───────────────────────────────────────────────────────────

async fn get_feedback_stats(State(state): State<AppState>) -> Json<Value> {
    let (total, wins, losses) = state.feedback.stats().await;
    Json(json!({ "total": total, "wins": wins, "losses": losses }))
}
