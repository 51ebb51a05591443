mod api;
mod command;
mod config;
mod error;
mod probe;
mod registry;

#[cfg(test)]
mod test_support;

use config::ServerConfig;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let config = ServerConfig::from_env();
    let state = api::AppState::new(&config)?;

    info!("Control server listening on {}", config.bind_addr);
    info!("  Command epoch: {}", state.queue.epoch());
    if config.api_key.is_some() {
        info!("  Rover requests require {}", roverlink_shared::protocol::API_KEY_HEADER);
    }

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    axum::serve(listener, api::router(state)).await?;

    Ok(())
}
