//! `/rovers` route handlers

use super::auth::RoverAuth;
use super::AppState;
use crate::command::DispatchOutcome;
use crate::error::ApiError;
use crate::registry::{ConnectionStatus, StatusUpdate};
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use roverlink_shared::WireCommand;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, info};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    address: Option<String>,
}

impl RegisterRequest {
    fn id(&self) -> Result<&str, ApiError> {
        non_blank(self.id.as_deref()).ok_or(ApiError::MissingField("id"))
    }

    fn address(&self) -> Option<String> {
        non_blank(self.address.as_deref()).map(String::from)
    }
}

#[derive(Debug, Serialize)]
pub struct ProbeResponse {
    ok: bool,
    id: String,
    connection: ConnectionStatus,
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

pub async fn list(State(state): State<AppState>) -> Json<Value> {
    Json(json!({"items": state.registry.list().await}))
}

pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<Json<Value>, ApiError> {
    let id = body.id()?;
    let rover = state.registry.create(id, body.address()).await;
    info!("Registered rover {} (address {:?})", id, rover.address);

    Ok(Json(json!({"ok": true, "rover": rover})))
}

pub async fn connect(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<Json<ProbeResponse>, ApiError> {
    let id = body.id()?;
    let address = body.address().ok_or(ApiError::MissingField("address"))?;

    state.registry.create(id, Some(address.clone())).await;
    let connection = state.probe.check(id, &address).await;

    Ok(Json(ProbeResponse {
        ok: true,
        id: id.to_string(),
        connection,
    }))
}

pub async fn check_connection(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProbeResponse>, ApiError> {
    let address = state
        .registry
        .address_of(&id)
        .await
        .ok_or_else(|| ApiError::NoAddress(id.clone()))?;

    let connection = state.probe.check(&id, &address).await;
    Ok(Json(ProbeResponse {
        ok: true,
        id,
        connection,
    }))
}

/// Full record, refreshed from the rover first when an address is on file
pub async fn get_status(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    if let Some(address) = state.registry.address_of(&id).await {
        state.probe.check(&id, &address).await;
    }

    match state.registry.get(&id).await {
        Some(rover) => Json(rover).into_response(),
        None => Json(json!({})).into_response(),
    }
}

pub async fn push_status(
    _auth: RoverAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(report): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let mut update = StatusUpdate::from_report(report).ok_or(ApiError::NotAnObject)?;
    let address = non_blank(update.address.take().as_deref()).map(String::from);
    state.registry.upsert_status(&id, update, address).await;
    debug!("Status from {}", id);

    Ok(Json(json!({"ok": true})))
}

pub async fn poll_commands(
    _auth: RoverAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<Value> {
    let items = state.queue.drain(&id).await;
    if !items.is_empty() {
        debug!("Delivering {} command(s) to {}", items.len(), id);
    }
    Json(json!({"items": items}))
}

pub async fn send_command(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(command): Json<WireCommand>,
) -> Json<DispatchOutcome> {
    Json(state.dispatcher.dispatch(&id, command).await)
}

pub async fn set_goal(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(goal): Json<Value>,
) -> Json<DispatchOutcome> {
    info!("New goal for {}", id);
    Json(state.dispatcher.set_goal(&id, goal).await)
}
