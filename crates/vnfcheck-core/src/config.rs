//! Harness configuration.
//!
//! One explicit value threaded into the engine and its collaborators at
//! construction time. Loadable from YAML; every field has a default so a
//! partial file (or none at all) works.

use serde::{Deserialize, Serialize};
use vnfcheck_proto::{Error, Result};

/// Configuration for the validation harness.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// Name of the shared volume carrying the checker binary.
    pub goss_volume: String,
    /// Mount point of the checker volume inside a sidecar.
    pub goss_mount: String,
    /// Prefix for deterministic sidecar names.
    pub sidecar_prefix: String,
    /// Fixed delay between polls in bounded waits, in milliseconds.
    pub wait_delay_ms: u64,
    /// Overall timeout for bounded waits, in seconds.
    pub wait_timeout_secs: u64,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            goss_volume: "goss-helper".into(),
            goss_mount: "/goss".into(),
            sidecar_prefix: "vnfcheck_sidecar_for".into(),
            wait_delay_ms: 100,
            wait_timeout_secs: 40,
        }
    }
}

impl HarnessConfig {
    /// Parses a configuration from YAML.
    pub fn from_yaml(raw: &str) -> Result<Self> {
        serde_yaml::from_str(raw)
            .map_err(|e| Error::Setup(format!("invalid harness configuration: {e}")))
    }

    /// Deterministic sidecar name for a deployment. Repeated provisioning
    /// for the same deployment resolves to the same name.
    pub fn sidecar_name(&self, deployment: &str) -> String {
        format!("{}_{}", self.sidecar_prefix, deployment)
    }

    /// Delay between polls for bounded waits.
    pub fn wait_delay(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.wait_delay_ms)
    }

    /// Overall timeout for bounded waits.
    pub fn wait_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.wait_timeout_secs)
    }
}
