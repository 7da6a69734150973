//! Reachability assertion payload (`addr`).
//!
//! Rendered shape:
//!
//! ```yaml
//! addr:
//!   tcp://www.google.com:80:
//!     reachable: true
//!     timeout: 1000
//! ```

use super::{matcher_sense, to_yaml};
use serde_yaml::{Mapping, Value};
use vnfcheck_proto::{Error, Result};

const DEFAULT_PORT: u16 = 80;
const DEFAULT_PROTOCOL: &str = "tcp";
const TIMEOUT_MS: u64 = 1000;

/// One staged reachability check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddrCheck {
    pub address: String,
    pub port: u16,
    pub protocol: String,
    pub reachable: bool,
}

impl AddrCheck {
    /// Stages a check from raw test-case fields.
    ///
    /// The entity is `host` or `host:port`; a missing port defaults to 80.
    /// The expected reachability is the matcher sense combined with the
    /// value sense, so `is reachable` and `is not is not reachable` both
    /// assert `true`.
    pub fn from_fields(entity: &str, matcher: &str, value: &str) -> Result<Self> {
        let (address, port) = split_host_port(entity)?;
        let sense = matcher_sense(matcher)?;
        let value_sense = match value {
            "reachable" => true,
            "is not reachable" => false,
            other => {
                return Err(Error::Validation(format!(
                    "value \"{other}\" is not allowed"
                )));
            }
        };

        Ok(Self {
            address,
            port,
            protocol: DEFAULT_PROTOCOL.into(),
            reachable: sense == value_sense,
        })
    }

    fn resource_key(&self) -> String {
        format!("{}://{}:{}", self.protocol, self.address, self.port)
    }
}

/// Renders staged reachability checks as a checker assertion document.
pub fn render(checks: &[AddrCheck]) -> Result<String> {
    let mut entries = Mapping::new();
    for check in checks {
        let mut body = Mapping::new();
        body.insert("reachable".into(), check.reachable.into());
        body.insert("timeout".into(), TIMEOUT_MS.into());
        entries.insert(check.resource_key().into(), Value::Mapping(body));
    }

    let mut root = Mapping::new();
    root.insert("addr".into(), Value::Mapping(entries));
    to_yaml(&Value::Mapping(root))
}

fn split_host_port(entity: &str) -> Result<(String, u16)> {
    // A bare IP literal (IPv6 contains colons) never carries a port.
    if entity.parse::<std::net::IpAddr>().is_ok() {
        return Ok((entity.to_string(), DEFAULT_PORT));
    }
    match entity.rsplit_once(':') {
        Some((host, port)) => {
            let port = port.parse::<u16>().map_err(|_| {
                Error::Validation(format!("entity \"{entity}\" carries an invalid port"))
            })?;
            Ok((host.to_string(), port))
        }
        None => Ok((entity.to_string(), DEFAULT_PORT)),
    }
}
