//! Rover-local HTTP endpoint
//!
//! Lets the control server probe this rover directly and forward operator
//! commands without waiting for the next poll. Commands received here are
//! only queued; the sync loop applies them.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use roverlink_shared::{StatusReport, WireCommand};
use serde_json::json;
use tokio::sync::{mpsc, watch};
use tracing::debug;

/// Shared handles for the local endpoint
#[derive(Clone)]
pub struct LocalApiState {
    pub status: watch::Receiver<Option<StatusReport>>,
    pub inbox: mpsc::UnboundedSender<WireCommand>,
}

pub fn router(state: LocalApiState) -> Router {
    Router::new()
        .route("/status", get(get_status))
        .route("/command", post(post_command))
        .with_state(state)
}

async fn get_status(State(state): State<LocalApiState>) -> Response {
    let latest = state.status.borrow().clone();
    match latest {
        Some(report) => Json(report).into_response(),
        None => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({"ok": false, "error": "no status yet"})),
        )
            .into_response(),
    }
}

async fn post_command(
    State(state): State<LocalApiState>,
    Json(command): Json<WireCommand>,
) -> Response {
    debug!("Forwarded command received: {:?} id={:?}", command.kind, command.id);

    match state.inbox.send(command) {
        Ok(()) => (StatusCode::ACCEPTED, Json(json!({"ok": true}))).into_response(),
        Err(_) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({"ok": false, "error": "sync loop not running"})),
        )
            .into_response(),
    }
}
