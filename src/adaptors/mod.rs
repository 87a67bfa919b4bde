//! Infrastructure adaptor clients
//!
//! Thin synchronous wrappers around the two orchestration backends: the
//! container adaptor shells out to `kubectl`, the VM adaptor talks to the
//! orchestrator's REST API. Both only read live deployment information;
//! submission of resolved topologies is handled elsewhere.

mod kubernetes;
mod vm;

pub use kubernetes::KubernetesAdaptor;
pub use vm::VmAdaptor;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while querying an adaptor
#[derive(Debug, Error)]
pub enum AdaptorError {
    /// The adaptor's backing command could not be spawned
    #[error("failed to run '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The backing command exited with a failure status
    #[error("'{program}' failed: {detail}")]
    CommandFailed { program: String, detail: String },

    /// The backend's response could not be interpreted
    #[error("malformed adaptor response: {reason}")]
    MalformedResponse { reason: String },

    /// JSON payload could not be decoded
    #[error("invalid JSON from adaptor: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP request to the orchestrator failed
    #[error("orchestrator request failed: {0}")]
    Http(#[from] reqwest::Error),
}

impl AdaptorError {
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedResponse {
            reason: reason.into(),
        }
    }
}

/// The cluster endpoint reported by the container adaptor
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClusterEndpoint {
    pub ip_address: String,
    pub port_number: u16,
}

/// Per-node address record reported by the VM adaptor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeAddresses {
    pub node_id: String,
    pub internal_ip: String,
    pub external_ip: Option<String>,
}
