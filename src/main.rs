mod api;
mod command;
mod config;
mod connection;
mod hardware;
mod navigation;
mod sync;

use config::RoverConfig;
use connection::HttpControlLink;
use hardware::RoverHardware;
use sync::SyncLoop;

use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let config = RoverConfig::from_env();

    info!("Rover starting: {}", config.rover_id);
    info!("  Control server: {}", config.server_url);
    info!("  Local endpoint: {}", config.listen_addr);
    if let Some(addr) = &config.advertise_addr {
        info!("  Advertised as: {}", addr);
    }

    let link = HttpControlLink::new(&config)?;
    let (sync_loop, api_state) = SyncLoop::new(&config, link, RoverHardware::default());

    // Spawn the rover's own status/command endpoint
    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, api::router(api_state)).await {
            error!("Local endpoint stopped: {}", e);
        }
    });

    sync_loop.run().await;
    Ok(())
}
