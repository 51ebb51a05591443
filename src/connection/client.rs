//! HTTP control link (JSON over HTTP with short fixed timeouts)

use super::link::ControlLink;
use crate::config::RoverConfig;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder};
use roverlink_shared::{base_url, protocol, StatusReport, WireCommand};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct CommandBatch {
    #[serde(default)]
    items: Vec<WireCommand>,
}

/// Talks to the control server's `/rovers/{id}/...` routes
#[derive(Debug, Clone)]
pub struct HttpControlLink {
    client: Client,
    rover_url: String,
    api_key: Option<String>,
}

impl HttpControlLink {
    pub fn new(config: &RoverConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .context("building HTTP client")?;
        let server = base_url(&config.server_url)?;

        Ok(Self {
            client,
            rover_url: format!("{}/rovers/{}", server, config.rover_id),
            api_key: config.api_key.clone(),
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self
            .client
            .request(method, format!("{}/{}", self.rover_url, path));

        match &self.api_key {
            Some(key) => builder.header(protocol::API_KEY_HEADER, key),
            None => builder,
        }
    }
}

#[async_trait]
impl ControlLink for HttpControlLink {
    async fn push_status(&self, report: &StatusReport) -> Result<()> {
        self.request(Method::POST, "status")
            .json(report)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    async fn poll_commands(&self) -> Result<Vec<WireCommand>> {
        let batch: CommandBatch = self
            .request(Method::GET, "commands")
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(batch.items)
    }

    fn name(&self) -> &'static str {
        "HTTP"
    }
}
