//! Control link trait abstraction

use anyhow::Result;
use async_trait::async_trait;
use roverlink_shared::{StatusReport, WireCommand};

/// One round-trip channel to the control server
#[async_trait]
pub trait ControlLink: Send + Sync {
    /// Push the current status snapshot
    async fn push_status(&self, report: &StatusReport) -> Result<()>;

    /// Fetch and clear the commands queued for this rover
    async fn poll_commands(&self) -> Result<Vec<WireCommand>>;

    /// Human-readable name for logging
    fn name(&self) -> &'static str;
}

#[async_trait]
impl<T: ControlLink + ?Sized> ControlLink for std::sync::Arc<T> {
    async fn push_status(&self, report: &StatusReport) -> Result<()> {
        (**self).push_status(report).await
    }

    async fn poll_commands(&self) -> Result<Vec<WireCommand>> {
        (**self).poll_commands().await
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}
