//! Port state assertion payload (`port`).
//!
//! Rendered shape:
//!
//! ```yaml
//! port:
//!   tcp:80:
//!     listening: true
//!     ip:
//!     - 127.0.0.1
//! ```
//!
//! The `ip` list only appears when a listening address is asserted.

use super::{matcher_sense, to_yaml};
use serde_yaml::{Mapping, Value};
use vnfcheck_proto::{Error, Result};

const DEFAULT_PROTOCOL: &str = "tcp";

/// One staged port check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortCheck {
    pub port: u16,
    pub protocol: String,
    pub listening: bool,
    pub ip: Option<Vec<String>>,
}

impl PortCheck {
    /// Stages a check from raw test-case fields.
    ///
    /// The entity is `port` or `port/protocol` (`80`, `80/tcp`, `53/udp`).
    /// Property `state` maps to `listening` (`open` asserts true, `closed`
    /// false, inverted by an `is not` matcher); property `listening
    /// address` asserts the bound address.
    pub fn from_fields(entity: &str, property: &str, matcher: &str, value: &str) -> Result<Self> {
        let (port, protocol) = split_port_protocol(entity)?;
        let sense = matcher_sense(matcher)?;

        match property {
            "state" => {
                let value_sense = match value {
                    "open" => true,
                    "closed" => false,
                    other => {
                        return Err(Error::Validation(format!(
                            "value \"{other}\" is not allowed"
                        )));
                    }
                };
                Ok(Self {
                    port,
                    protocol,
                    listening: sense == value_sense,
                    ip: None,
                })
            }
            "listening address" => {
                if !sense {
                    return Err(Error::Validation(
                        "matcher \"is not\" is not allowed for a listening address".into(),
                    ));
                }
                Ok(Self {
                    port,
                    protocol,
                    listening: true,
                    ip: Some(vec![value.to_string()]),
                })
            }
            other => Err(Error::Validation(format!(
                "property \"{other}\" is not allowed"
            ))),
        }
    }

    fn resource_key(&self) -> String {
        format!("{}:{}", self.protocol, self.port)
    }
}

/// Renders staged port checks as a checker assertion document.
pub fn render(checks: &[PortCheck]) -> Result<String> {
    let mut entries = Mapping::new();
    for check in checks {
        let mut body = Mapping::new();
        body.insert("listening".into(), check.listening.into());
        if let Some(ip) = &check.ip {
            let addresses: Vec<Value> = ip.iter().map(|a| Value::from(a.clone())).collect();
            body.insert("ip".into(), Value::Sequence(addresses));
        }
        entries.insert(check.resource_key().into(), Value::Mapping(body));
    }

    let mut root = Mapping::new();
    root.insert("port".into(), Value::Mapping(entries));
    to_yaml(&Value::Mapping(root))
}

fn split_port_protocol(entity: &str) -> Result<(u16, String)> {
    let (port, protocol) = match entity.split_once('/') {
        Some((port, protocol)) => (port, protocol),
        None => (entity, DEFAULT_PROTOCOL),
    };

    if !matches!(protocol, "tcp" | "udp") {
        return Err(Error::Validation(format!(
            "entity \"{entity}\" carries an unknown protocol"
        )));
    }
    let port = port
        .trim()
        .parse::<u16>()
        .ok()
        .filter(|p| *p >= 1)
        .ok_or_else(|| Error::Validation(format!("entity \"{entity}\" is not a valid port")))?;
    Ok((port, protocol.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parsed(yaml: &str) -> serde_yaml::Value {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn stages_open_state() {
        let check = PortCheck::from_fields("80", "state", "is", "open").unwrap();
        assert_eq!(check.port, 80);
        assert_eq!(check.protocol, "tcp");
        assert!(check.listening);
        assert!(check.ip.is_none());
    }

    #[test]
    fn closed_and_negation_combine() {
        let check = PortCheck::from_fields("80", "state", "is", "closed").unwrap();
        assert!(!check.listening);

        let check = PortCheck::from_fields("80", "state", "is not", "open").unwrap();
        assert!(!check.listening);
    }

    #[test]
    fn udp_suffix_is_honored() {
        let check = PortCheck::from_fields("53/udp", "state", "is", "open").unwrap();
        assert_eq!(check.protocol, "udp");
        assert_eq!(check.port, 53);
    }

    #[test]
    fn unknown_protocol_is_rejected() {
        let err = PortCheck::from_fields("80/sctp", "state", "is", "open").unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn listening_address_asserts_the_bound_ip() {
        let check =
            PortCheck::from_fields("8080", "listening address", "is", "127.0.0.1").unwrap();
        assert!(check.listening);
        assert_eq!(check.ip, Some(vec!["127.0.0.1".to_string()]));
    }

    #[test]
    fn rendered_state_structure_matches_the_reference() {
        let check = PortCheck::from_fields("80", "state", "is", "open").unwrap();
        let rendered = render(&[check]).unwrap();

        let expected = r"
port:
  tcp:80:
    listening: true
";
        assert_eq!(parsed(&rendered), parsed(expected));
    }

    #[test]
    fn rendered_address_structure_matches_the_reference() {
        let check =
            PortCheck::from_fields("8080", "listening address", "is", "127.0.0.1").unwrap();
        let rendered = render(&[check]).unwrap();

        let expected = r"
port:
  tcp:8080:
    listening: true
    ip:
    - 127.0.0.1
";
        assert_eq!(parsed(&rendered), parsed(expected));
    }
}
