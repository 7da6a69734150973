//! System-under-test references and related infrastructure value types.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The kind of deployment element a check executes against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetType {
    Container,
    Service,
    Network,
}

impl TargetType {
    /// The lowercase token used in test descriptions and logs.
    pub fn as_str(self) -> &'static str {
        match self {
            TargetType::Container => "container",
            TargetType::Service => "service",
            TargetType::Network => "network",
        }
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TargetType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "container" => Ok(TargetType::Container),
            "service" => Ok(TargetType::Service),
            "network" => Ok(TargetType::Network),
            other => Err(Error::Validation(format!(
                "unknown context type \"{other}\", must be one of container, service, network"
            ))),
        }
    }
}

/// Identifies where a check executes.
///
/// `target_type` must be set before any run. Network-scoped SUTs cannot
/// execute a check in place; the engine substitutes a sidecar container
/// and redirects `target` at it.
#[derive(Debug, Clone, Default)]
pub struct Sut {
    /// The declared context type; `None` until the caller sets a context.
    pub target_type: Option<TargetType>,
    /// Name or id of the deployment element.
    pub target: String,
    /// Owning service when `target` is a network-scoped placeholder.
    pub service_id: String,
}

impl Sut {
    pub fn new(target_type: TargetType, target: impl Into<String>, service_id: impl Into<String>) -> Self {
        Self {
            target_type: Some(target_type),
            target: target.into(),
            service_id: service_id.into(),
        }
    }

    /// True when the declared context is a network.
    pub fn is_network_scoped(&self) -> bool {
        self.target_type == Some(TargetType::Network)
    }
}

/// How a volume is attached to a container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolumeMount {
    /// Volume name or id.
    pub source: String,
    /// Mount point inside the container.
    pub target: String,
    pub read_only: bool,
}

impl VolumeMount {
    pub fn read_only(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            read_only: true,
        }
    }
}

/// The controller's view of a created container.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContainerHandle {
    pub id: String,
    pub name: String,
    /// Names of the networks the container is attached to.
    pub networks: Vec<String>,
}

impl ContainerHandle {
    pub fn is_attached_to(&self, network: &str) -> bool {
        self.networks.iter().any(|n| n == network)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_type_round_trips_through_str() {
        for (token, expected) in [
            ("container", TargetType::Container),
            ("service", TargetType::Service),
            ("network", TargetType::Network),
        ] {
            assert_eq!(token.parse::<TargetType>().unwrap(), expected);
            assert_eq!(expected.to_string(), token);
        }
    }

    #[test]
    fn target_type_rejects_unknown_tokens() {
        let err = "pod".parse::<TargetType>().unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn network_scope_detection() {
        let sut = Sut::new(TargetType::Network, "backend", "web_sut");
        assert!(sut.is_network_scoped());

        let sut = Sut::new(TargetType::Container, "web_1", "web");
        assert!(!sut.is_network_scoped());

        assert!(!Sut::default().is_network_scoped());
    }

    #[test]
    fn container_handle_network_membership() {
        let handle = ContainerHandle {
            id: "abc123".into(),
            name: "sidecar".into(),
            networks: vec!["backend".into()],
        };
        assert!(handle.is_attached_to("backend"));
        assert!(!handle.is_attached_to("frontend"));
    }
}
