//! Adaptor configuration
//!
//! TOML configuration for the two infrastructure adaptors. A built-in
//! default document keeps the crate usable without any config file.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when loading or parsing configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("failed to parse config TOML: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Container-orchestration adaptor settings
#[derive(Debug, Clone, Deserialize)]
pub struct KubernetesConfig {
    /// kubectl binary to invoke
    pub kubectl: String,
    /// Optional kubeconfig context
    pub context: Option<String>,
    /// Port reported as the cluster endpoint
    pub api_port: u16,
}

/// VM-orchestration adaptor settings
#[derive(Debug, Clone, Deserialize)]
pub struct VmOrchestratorConfig {
    /// Base URL of the orchestrator's REST API
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

/// Top-level submitter configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitterConfig {
    pub kubernetes: KubernetesConfig,
    pub vm_orchestrator: VmOrchestratorConfig,
}

/// Default configuration document
const DEFAULT_CONFIG: &str = r#"
[kubernetes]
kubectl = "kubectl"
api_port = 6443

[vm_orchestrator]
base_url = "http://localhost:5000"
timeout_secs = 10
"#;

impl SubmitterConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load configuration from a TOML string
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }
}

impl Default for SubmitterConfig {
    fn default() -> Self {
        Self::from_str(DEFAULT_CONFIG).expect("Default config should be valid TOML")
    }
}
