//! Infrastructure control plane capability.
//!
//! Defines the [`InfrastructureController`] trait that concrete control
//! planes (a docker client, a mock) implement. The validation engine and
//! the remote test tools consume this trait without knowing which binding
//! is behind it.

use crate::error::Result;
use crate::sut::{ContainerHandle, VolumeMount};
use async_trait::async_trait;

/// Raw outcome of one remote command execution.
#[derive(Debug, Clone)]
pub struct ExecOutput {
    /// Combined output of the command as captured by the control plane.
    pub output: String,
    /// Process exit code, when the control plane reports one.
    pub exit_code: Option<i32>,
}

impl ExecOutput {
    pub fn new(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            exit_code: None,
        }
    }

    pub fn with_exit_code(mut self, code: i32) -> Self {
        self.exit_code = Some(code);
        self
    }

    /// True when the command exited zero. A non-zero exit does not by
    /// itself mean the infrastructure failed: the remote checker exits
    /// non-zero when assertions fail.
    pub fn succeeded(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Low-level container control plane operations consumed by the harness.
///
/// Implementors map these onto their runtime (create/exec/inspect/kill).
/// Absent resources are reported as [`Error::NotFound`], control-plane
/// failures as [`Error::Deployment`].
///
/// [`Error::NotFound`]: crate::Error::NotFound
/// [`Error::Deployment`]: crate::Error::Deployment
#[async_trait]
pub trait InfrastructureController: Send + Sync {
    /// Executes a command inside the named target and returns its raw output.
    async fn execute(&self, target: &str, command: &str) -> Result<ExecOutput>;

    /// Looks up a network by name. `Ok(None)` when it does not exist.
    async fn get_network(&self, name: &str) -> Result<Option<String>>;

    /// Returns the sidecar container with the given name, creating it if
    /// necessary. Creation with the same name is idempotent.
    async fn get_or_create_sidecar(
        &self,
        name: &str,
        command: &str,
        network: Option<&str>,
        volumes: &[VolumeMount],
    ) -> Result<ContainerHandle>;

    /// Attaches a volume to the container backing the given service and
    /// returns that container.
    async fn connect_volume_to_service(&self, service: &str, volume: &str)
    -> Result<ContainerHandle>;

    /// Uploads file contents into the named entity under `filename`.
    async fn put_file(&self, entity: &str, contents: &[u8], filename: &str) -> Result<()>;

    /// Kills the named container.
    async fn kill_container(&self, name: &str) -> Result<()>;

    /// Removes the named container.
    async fn remove_container(&self, name: &str) -> Result<()>;

    /// Placement constraint strings recorded for a service, e.g.
    /// `node.role == manager`.
    async fn placement_constraints(&self, service: &str) -> Result<Vec<String>>;
}
