//! Recording mock of the deployment orchestrator.

use super::MockController;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use vnfcheck_proto::{Error, InfrastructureController, Orchestrator, Result};

#[derive(Default)]
struct MockState {
    deployments: usize,
    volume_requests: Vec<String>,
    deployment_error: Option<Error>,
    volume_error: Option<Error>,
}

/// Mock orchestrator wrapping a [`MockController`].
pub struct MockOrchestrator {
    controller: Arc<MockController>,
    name: String,
    volume_id: String,
    state: Mutex<MockState>,
}

impl MockOrchestrator {
    pub fn new(name: impl Into<String>, controller: Arc<MockController>) -> Self {
        Self {
            controller,
            name: name.into(),
            volume_id: "vol-goss".into(),
            state: Mutex::new(MockState::default()),
        }
    }

    /// A fresh orchestrator named `wordpress` over a fresh controller.
    pub fn with_defaults() -> Self {
        Self::new("wordpress", Arc::new(MockController::new()))
    }

    /// The concrete mock controller, for recording assertions.
    pub fn controller_mock(&self) -> Arc<MockController> {
        self.controller.clone()
    }

    pub fn deployment_count(&self) -> usize {
        self.state.lock().unwrap().deployments
    }

    pub fn volume_requests(&self) -> Vec<String> {
        self.state.lock().unwrap().volume_requests.clone()
    }

    pub fn fail_next_deployment(&self, error: Error) {
        self.state.lock().unwrap().deployment_error = Some(error);
    }

    pub fn fail_next_volume(&self, error: Error) {
        self.state.lock().unwrap().volume_error = Some(error);
    }
}

#[async_trait]
impl Orchestrator for MockOrchestrator {
    async fn get_or_create_deployment(&self) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if let Some(error) = state.deployment_error.take() {
            return Err(error);
        }
        state.deployments += 1;
        Ok(())
    }

    async fn check_or_create_test_tool_volume(&self, name: &str) -> Result<String> {
        let mut state = self.state.lock().unwrap();
        if let Some(error) = state.volume_error.take() {
            return Err(error);
        }
        state.volume_requests.push(name.to_string());
        Ok(self.volume_id.clone())
    }

    fn controller(&self) -> Arc<dyn InfrastructureController> {
        self.controller.clone()
    }

    fn deployment_name(&self) -> String {
        self.name.clone()
    }
}
