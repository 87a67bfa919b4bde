//! VM-orchestration adaptor
//!
//! Queries the orchestrator's REST API for the internal and external IP
//! of every provisioned node.

use std::time::Duration;

use tracing::debug;

use crate::config::VmOrchestratorConfig;

use super::{AdaptorError, NodeAddresses};

pub struct VmAdaptor {
    config: VmOrchestratorConfig,
    client: reqwest::blocking::Client,
}

impl VmAdaptor {
    pub fn new(config: VmOrchestratorConfig) -> Result<Self, AdaptorError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { config, client })
    }

    /// Address records for every node the orchestrator manages
    pub fn info(&self) -> Result<Vec<NodeAddresses>, AdaptorError> {
        let url = format!("{}/info", self.config.base_url.trim_end_matches('/'));
        debug!("querying vm orchestrator at {}", url);

        let nodes = self
            .client
            .get(&url)
            .send()?
            .error_for_status()?
            .json::<Vec<NodeAddresses>>()?;
        Ok(nodes)
    }
}
