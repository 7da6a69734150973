//! Error types for the vnfcheck harness.

use thiserror::Error;

/// Errors surfaced by the validation harness.
///
/// The taxonomy is closed on purpose: callers decide what to do based on
/// the variant, not on message contents. `Deployment` marks failures of
/// the infrastructure control plane, `TestTool` marks failures of the
/// remote checker itself — a caller may retry the former but never the
/// latter.
#[derive(Debug, Error)]
pub enum Error {
    /// Caller or session misconfiguration (no run context, no SUT declared).
    #[error("Setup error: {0}")]
    Setup(String),

    /// Test-case input invalid, or the remote check reported failing assertions.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A referenced infrastructure resource (network, container) is absent.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Infrastructure provisioning or remote execution failed at the controller layer.
    #[error("Deployment error: {0}")]
    Deployment(String),

    /// The remote checker rejected its input or could not run.
    #[error("Test tool error: {0}")]
    TestTool(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variants_render_their_prefix() {
        assert_eq!(
            Error::Setup("no SUT declared".into()).to_string(),
            "Setup error: no SUT declared"
        );
        assert_eq!(
            Error::Deployment("cannot reach daemon".into()).to_string(),
            "Deployment error: cannot reach daemon"
        );
        assert_eq!(
            Error::TestTool("bad gossfile".into()).to_string(),
            "Test tool error: bad gossfile"
        );
    }

    #[test]
    fn io_errors_convert() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
