use std::collections::HashSet;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    response::Response,
    routing::get,
    Router,
};
use chrono::Utc;
use serde::Deserialize;
use tracing::{debug, warn};

use common::{Direction, Error, FeedbackResult, Result, SignalContext};
use scanner::ScanSession;

use crate::protocol::{ClientMessage, ServerMessage};
use crate::AppState;

pub fn ws_router() -> Router<AppState> {
    Router::new().route("/ws/scan", get(ws_scan_handler))
}

#[derive(Deserialize)]
struct WsQuery {
    token: Option<String>,
}

/// Duplex scan channel. Each connection gets its own `ScanSession`, so the
/// repeat-suppression memory is scoped to one client.
/// Auth via query param `?token=<PULSEBOT_API_TOKEN>` (header auth not
/// supported in browser WebSocket API).
async fn ws_scan_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    Query(q): Query<WsQuery>,
) -> Response {
    // Authenticate via query token (browsers can't set custom WS headers)
    let authed = q
        .token
        .as_deref()
        .map(|t| t == state.api_token)
        .unwrap_or(false);

    if !authed {
        return axum::response::IntoResponse::into_response((
            axum::http::StatusCode::UNAUTHORIZED,
            "unauthorized",
        ));
    }

    ws.on_upgrade(move |socket| handle_ws(socket, state))
}

async fn handle_ws(mut socket: WebSocket, state: AppState) {
    let mut session = ScanSession::new();

    loop {
        match socket.recv().await {
            Some(Ok(Message::Text(text))) => {
                let reply = handle_message(&state, &mut session, &text).await;
                let json = match serde_json::to_string(&reply) {
                    Ok(json) => json,
                    Err(e) => {
                        warn!(error = %e, "Failed to serialize reply");
                        continue;
                    }
                };
                if socket.send(Message::Text(json)).await.is_err() {
                    break;
                }
            }
            Some(Ok(Message::Close(_))) | None => {
                debug!("Scan client disconnected");
                break;
            }
            Some(Ok(_)) => {} // ping/pong and binary frames are ignored
            Some(Err(e)) => {
                warn!(error = %e, "WebSocket receive error");
                break;
            }
        }
    }
}

/// One request-response turn. Every inbound frame yields exactly one reply;
/// a scan is fully processed before its response is sent.
async fn handle_message(
    state: &AppState,
    session: &mut ScanSession,
    text: &str,
) -> ServerMessage {
    let msg: ClientMessage = match serde_json::from_str(text) {
        Ok(msg) => msg,
        Err(e) => {
            return ServerMessage::Error { message: format!("malformed message: {e}") };
        }
    };

    match msg {
        ClientMessage::Scan { config, muted_assets } => {
            let muted: HashSet<String> = muted_assets.into_iter().collect();
            let snapshots = state.market.snapshot_all().await;
            let history = state.feedback.read().await;
            let outcome = scanner::scan(
                &snapshots,
                &config,
                &muted,
                session,
                &history,
                state.jitter.as_ref(),
                Utc::now(),
            );
            ServerMessage::ScanResult { signal: outcome.best, log: outcome.log }
        }
        ClientMessage::Feedback { asset, direction, result, context } => {
            match submit_feedback(state, asset, direction, result, context).await {
                Ok(total) => ServerMessage::FeedbackAck { total },
                Err(e) => ServerMessage::Error { message: e.to_string() },
            }
        }
    }
}

/// Validate a feedback submission, then stamp and append it. Any
/// validation failure leaves the history unmodified.
async fn submit_feedback(
    state: &AppState,
    asset: String,
    direction: String,
    result: String,
    context: Option<SignalContext>,
) -> Result<usize> {
    if asset.trim().is_empty() {
        return Err(Error::Validation("asset must not be empty".into()));
    }
    if !state.market.contains(&asset).await {
        return Err(Error::Validation(format!("unknown asset '{asset}'")));
    }
    let direction: Direction = direction.parse()?;
    let result: FeedbackResult = result.parse()?;

    Ok(state.feedback.submit(asset, direction, result, context, Utc::now()).await)
}
