//! Per-session run context.
//!
//! One `RunContext` spans all validation targets executed within an
//! infrastructure session. Targets run strictly sequentially against it:
//! a target fully completes, including cleanup, before the next begins,
//! so at most one target holds an active sidecar at a time.

use std::sync::Arc;
use vnfcheck_proto::{ContainerHandle, InfrastructureController, Orchestrator, Sut, TargetType};

/// Shared state for one validation session.
pub struct RunContext {
    orchestrator: Arc<dyn Orchestrator>,
    /// Where checks execute. The engine redirects this at a sidecar when
    /// the declared target cannot run a check in place.
    pub sut: Sut,
    /// Auxiliary container hosting the checker; non-`None` only between
    /// provisioning and cleanup.
    pub sidecar: Option<ContainerHandle>,
    /// Shared checker volume; intentionally left attached across runs
    /// within a session.
    pub test_volume: Option<String>,
    pub deployment_name: String,
    /// Set when test setup failed badly enough that no further validation
    /// should start.
    pub fatal_error: bool,
    /// Set as soon as a run was attempted, so downstream failures remain
    /// attributable to an attempted run.
    pub validation_attempted: bool,
}

impl RunContext {
    pub fn new(orchestrator: Arc<dyn Orchestrator>) -> Self {
        let deployment_name = orchestrator.deployment_name();
        Self {
            orchestrator,
            sut: Sut::default(),
            sidecar: None,
            test_volume: None,
            deployment_name,
            fatal_error: false,
            validation_attempted: false,
        }
    }

    pub fn orchestrator(&self) -> &Arc<dyn Orchestrator> {
        &self.orchestrator
    }

    pub fn controller(&self) -> Arc<dyn InfrastructureController> {
        self.orchestrator.controller()
    }

    /// Redirects the SUT. Fields passed as `None` keep their value;
    /// redirecting at a sidecar passes both a type and a target.
    pub fn update_sut(&mut self, target_type: Option<TargetType>, target: Option<&str>) {
        if let Some(target_type) = target_type {
            self.sut.target_type = Some(target_type);
        }
        if let Some(target) = target {
            self.sut.target = target.to_string();
        }
    }
}
