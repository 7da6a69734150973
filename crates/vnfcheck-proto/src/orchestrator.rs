//! Deployment orchestrator capability.

use crate::controller::InfrastructureController;
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Provisioning handle for the declared infrastructure topology.
///
/// The orchestrator owns bringing the described deployment up and down;
/// the validation engine only ever asks it to ensure the deployment is
/// live and to manage the shared test tool volume. Every orchestrator
/// exposes the control plane it provisions through.
#[async_trait]
pub trait Orchestrator: Send + Sync {
    /// Ensures the target deployment exists and is running.
    async fn get_or_create_deployment(&self) -> Result<()>;

    /// Returns the id of the shared test tool volume, creating it if
    /// missing. The volume outlives individual validation runs.
    async fn check_or_create_test_tool_volume(&self, name: &str) -> Result<String>;

    /// The control plane this orchestrator provisions through.
    fn controller(&self) -> Arc<dyn InfrastructureController>;

    /// Name of the deployment this orchestrator manages.
    fn deployment_name(&self) -> String;
}
