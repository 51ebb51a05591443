//! HTTP surface of the control server
//!
//! This module handles:
//! - Operator routes (register, probe, goal, command)
//! - Rover routes (status push, command poll), gated by the API key
//! - Wiring shared state into axum

mod auth;
mod rovers;

use crate::command::{CommandDispatcher, CommandQueue};
use crate::config::ServerConfig;
use crate::probe::ConnectionProbe;
use crate::registry::RoverRegistry;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Everything a request handler can reach
#[derive(Clone)]
pub struct AppState {
    pub registry: RoverRegistry,
    pub queue: CommandQueue,
    pub probe: ConnectionProbe,
    pub dispatcher: CommandDispatcher,
    pub api_key: Option<Arc<str>>,
}

impl AppState {
    pub fn new(config: &ServerConfig) -> anyhow::Result<Self> {
        let registry = RoverRegistry::new();
        let queue = CommandQueue::new(&registry);
        let probe = ConnectionProbe::new(registry.clone(), config.probe_timeout)?;
        let dispatcher = CommandDispatcher::new(registry.clone(), queue.clone(), probe.clone());

        Ok(Self {
            registry,
            queue,
            probe,
            dispatcher,
            api_key: config.api_key.as_deref().map(Arc::from),
        })
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/rovers", get(rovers::list).post(rovers::create))
        .route("/rovers/connect", post(rovers::connect))
        .route("/rovers/:id/check_connection", post(rovers::check_connection))
        .route(
            "/rovers/:id/status",
            get(rovers::get_status).post(rovers::push_status),
        )
        .route("/rovers/:id/commands", get(rovers::poll_commands))
        .route("/rovers/:id/command", post(rovers::send_command))
        .route("/rovers/:id/goal", post(rovers::set_goal))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
