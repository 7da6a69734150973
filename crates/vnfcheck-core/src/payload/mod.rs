//! Assertion payload rendering for the remote checker.
//!
//! Domains stage their raw test-case fields into one of these check
//! structures; the renderers emit the checker's YAML assertion format.
//! Renderers are pure and are tested against parsed structure equality,
//! not string equality.

pub mod addr;
pub mod port;

pub use addr::AddrCheck;
pub use port::PortCheck;

use vnfcheck_proto::{Error, Result};

/// Maps a matcher token to its boolean sense: `is` asserts, `is not`
/// negates. Anything else is a validation error.
pub(crate) fn matcher_sense(matcher: &str) -> Result<bool> {
    match matcher {
        "is" => Ok(true),
        "is not" => Ok(false),
        other => Err(Error::Validation(format!(
            "matcher \"{other}\" is not allowed"
        ))),
    }
}

pub(crate) fn to_yaml(value: &serde_yaml::Value) -> Result<String> {
    serde_yaml::to_string(value)
        .map_err(|e| Error::Validation(format!("could not render assertion payload: {e}")))
}
