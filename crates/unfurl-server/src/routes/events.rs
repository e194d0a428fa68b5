use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use chrono::Utc;
use serde_json::{json, Value};
use tracing::{debug, info, warn};
use unfurl_core::LinkSharedEvent;
use unfurl_service::pipeline::handle_link_shared;

use super::AppState;
use crate::signature;

pub fn routes() -> Router<AppState> {
    Router::new().route("/slack/events", post(handle_events))
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> &'a str {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
}

async fn handle_events(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if let Some(ref secret) = state.signing_secret {
        let timestamp = header_str(&headers, "X-Slack-Request-Timestamp");
        let sig = header_str(&headers, "X-Slack-Signature");
        if !signature::verify(secret, timestamp, &body, sig, Utc::now().timestamp()) {
            warn!("rejected Slack request: invalid signature");
            return StatusCode::UNAUTHORIZED.into_response();
        }
    }

    let payload: Value = match serde_json::from_slice(&body) {
        Ok(v) => v,
        Err(e) => {
            warn!(error = %e, "Slack request body is not JSON");
            return StatusCode::BAD_REQUEST.into_response();
        }
    };

    if state.debug {
        info!(event = %payload, "raw Slack event");
    }

    match payload["type"].as_str() {
        Some("url_verification") => {
            let challenge = payload["challenge"].as_str().unwrap_or_default();
            Json(json!({ "challenge": challenge })).into_response()
        }
        Some("event_callback") => {
            dispatch(&state, &payload["event"]);
            StatusCode::OK.into_response()
        }
        other => {
            debug!(payload_type = ?other, "ignoring Slack payload");
            StatusCode::OK.into_response()
        }
    }
}

/// Start unfurling in the background so Slack gets its ack right away.
fn dispatch(state: &AppState, event: &Value) {
    if event["type"].as_str() != Some("link_shared") {
        debug!(event_type = ?event["type"].as_str(), "ignoring event");
        return;
    }

    let event: LinkSharedEvent = match serde_json::from_value(event.clone()) {
        Ok(e) => e,
        Err(e) => {
            warn!(error = %e, "malformed link_shared event");
            return;
        }
    };

    let state = state.clone();
    tokio::spawn(async move {
        handle_link_shared(state.source.as_ref(), state.chat.as_ref(), &event).await;
    });
}
