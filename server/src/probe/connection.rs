//! Outbound calls from the server to a rover's own endpoint

use crate::registry::{ConnectionStatus, RoverRegistry, StatusUpdate};
use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use reqwest::Client;
use roverlink_shared::{base_url, WireCommand};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Reachability checker and command forwarder
///
/// Network calls happen without holding the registry lock; only the
/// resulting state update takes it.
#[derive(Debug, Clone)]
pub struct ConnectionProbe {
    client: Client,
    registry: RoverRegistry,
}

impl ConnectionProbe {
    pub fn new(registry: RoverRegistry, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("building probe HTTP client")?;
        Ok(Self { client, registry })
    }

    /// Query the rover at `address` and record the outcome
    ///
    /// A failed probe only touches the connection field.
    pub async fn check(&self, rover_id: &str, address: &str) -> ConnectionStatus {
        let status = match self.fetch_status(address).await {
            Ok(update) => {
                self.registry
                    .upsert_status(rover_id, update, Some(address.to_string()))
                    .await;
                info!("Rover {} reachable at {}", rover_id, address);
                ConnectionStatus::online(Utc::now())
            }
            Err(e) => {
                warn!("Rover {} unreachable at {}: {:#}", rover_id, address, e);
                ConnectionStatus::offline(Utc::now(), format!("{:#}", e))
            }
        };

        self.registry
            .update_connection(rover_id, status.clone())
            .await;
        status
    }

    /// Deliver a command straight to the rover's endpoint
    pub async fn forward(&self, address: &str, command: &WireCommand) -> Result<()> {
        let url = format!("{}/command", base_url(address)?);
        debug!("Forwarding {:?} id={:?} to {}", command.kind, command.id, url);

        self.client
            .post(url)
            .json(command)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    async fn fetch_status(&self, address: &str) -> Result<StatusUpdate> {
        let url = format!("{}/status", base_url(address)?);
        let report: Value = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
            .context("malformed status body")?;
        StatusUpdate::from_report(report).ok_or_else(|| anyhow!("status body is not an object"))
    }
}
