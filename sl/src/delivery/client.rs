//! DeliveryClient trait and the OCM implementation

use std::time::Duration;

use async_trait::async_trait;
use eyre::{Context, Result};
use tracing::debug;

use crate::config::SendConfig;
use crate::ocm::OcmConnection;
use crate::template::ServiceLogTemplate;

/// Delivers a notice to a single target
///
/// Implementations must be safe to call concurrently; the coordinator
/// invokes `deliver` once per target from independent tasks.
#[async_trait]
pub trait DeliveryClient: Send + Sync {
    /// Deliver `notice` to `target`, returning any failure
    async fn deliver(&self, target: &str, notice: &ServiceLogTemplate) -> Result<()>;
}

/// Posts service logs through OCM, one connection per delivery
#[derive(Debug, Clone)]
pub struct OcmDeliveryClient {
    base_url: String,
    token: String,
    timeout: Duration,
}

impl OcmDeliveryClient {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>, timeout: Duration) -> Self {
        Self {
            base_url: base_url.into(),
            token: token.into(),
            timeout,
        }
    }

    pub fn from_config(config: &SendConfig) -> Self {
        debug!(base_url = %config.base_url, "OcmDeliveryClient::from_config: called");
        Self::new(config.base_url.clone(), config.auth_token.clone(), config.timeout)
    }
}

#[async_trait]
impl DeliveryClient for OcmDeliveryClient {
    async fn deliver(&self, target: &str, notice: &ServiceLogTemplate) -> Result<()> {
        debug!(%target, "OcmDeliveryClient::deliver: called");
        let connection = OcmConnection::establish(&self.base_url, &self.token, self.timeout)
            .context("error creating OCM connection")?;

        connection.post_service_log(target, notice).await?;
        Ok(())
    }
}
