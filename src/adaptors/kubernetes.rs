//! Container-orchestration adaptor
//!
//! Reads the cluster endpoint by invoking `kubectl get nodes -o json` and
//! picking the first node address, preferring an external IP.

use std::process::Command;

use serde_json::Value;
use tracing::debug;

use crate::config::KubernetesConfig;

use super::{AdaptorError, ClusterEndpoint};

pub struct KubernetesAdaptor {
    config: KubernetesConfig,
}

impl KubernetesAdaptor {
    pub fn new(config: KubernetesConfig) -> Self {
        Self { config }
    }

    /// The cluster endpoint (address and API port)
    pub fn info(&self) -> Result<ClusterEndpoint, AdaptorError> {
        let mut command = Command::new(&self.config.kubectl);
        command.args(["get", "nodes", "-o", "json"]);
        if let Some(context) = &self.config.context {
            command.args(["--context", context]);
        }

        debug!("querying cluster nodes via {}", self.config.kubectl);
        let output = command.output().map_err(|e| AdaptorError::Spawn {
            program: self.config.kubectl.clone(),
            source: e,
        })?;

        if !output.status.success() {
            return Err(AdaptorError::CommandFailed {
                program: self.config.kubectl.clone(),
                detail: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let nodes: Value = serde_json::from_slice(&output.stdout)?;
        endpoint_from_node_list(&nodes, self.config.api_port)
    }
}

/// Pick the cluster address from a `kubectl get nodes -o json` payload
fn endpoint_from_node_list(nodes: &Value, port: u16) -> Result<ClusterEndpoint, AdaptorError> {
    let items = nodes
        .get("items")
        .and_then(Value::as_array)
        .ok_or_else(|| AdaptorError::malformed("node list has no items"))?;

    let addresses = items
        .first()
        .and_then(|node| node.pointer("/status/addresses"))
        .and_then(Value::as_array)
        .ok_or_else(|| AdaptorError::malformed("first node reports no addresses"))?;

    let pick = |kind: &str| {
        addresses.iter().find_map(|addr| {
            (addr.get("type").and_then(Value::as_str) == Some(kind))
                .then(|| addr.get("address").and_then(Value::as_str))
                .flatten()
        })
    };

    let ip_address = pick("ExternalIP")
        .or_else(|| pick("InternalIP"))
        .ok_or_else(|| AdaptorError::malformed("no ExternalIP or InternalIP address"))?;

    Ok(ClusterEndpoint {
        ip_address: ip_address.to_string(),
        port_number: port,
    })
}
