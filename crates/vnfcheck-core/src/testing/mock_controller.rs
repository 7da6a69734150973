//! Recording mock of the infrastructure control plane.

use super::PASSING_REPORT;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use vnfcheck_proto::{
    ContainerHandle, Error, ExecOutput, InfrastructureController, Result, VolumeMount,
};

/// Record of one remote execution.
#[derive(Debug, Clone)]
pub struct ExecRecord {
    pub target: String,
    pub command: String,
}

/// Record of one sidecar creation request.
#[derive(Debug, Clone)]
pub struct SidecarRecord {
    pub name: String,
    pub command: String,
    pub network: Option<String>,
    pub volumes: Vec<VolumeMount>,
}

/// Record of one file upload.
#[derive(Debug, Clone)]
pub struct PutFileRecord {
    pub entity: String,
    pub filename: String,
    pub contents: String,
}

#[derive(Default)]
struct MockState {
    exec_responses: VecDeque<Result<ExecOutput>>,
    executions: Vec<ExecRecord>,
    networks: Vec<String>,
    sidecars: Vec<SidecarRecord>,
    killed: Vec<String>,
    removed: Vec<String>,
    volumes_connected: Vec<(String, String)>,
    files: Vec<PutFileRecord>,
    constraints: Vec<String>,
    sidecar_error: Option<Error>,
    kill_error: Option<Error>,
    remove_error: Option<Error>,
    counter: usize,
}

/// Mock control plane that returns scripted responses and records every
/// operation. Wrap it in an `Arc` and hand clones to the orchestrator.
#[derive(Default)]
pub struct MockController {
    state: Mutex<MockState>,
}

impl MockController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a network so `get_network` finds it.
    pub fn add_network(&self, name: impl Into<String>) {
        self.state.lock().unwrap().networks.push(name.into());
    }

    /// Queues the next `execute` response. With no queued response,
    /// `execute` returns a passing report.
    pub fn push_exec_response(&self, response: Result<ExecOutput>) {
        self.state.lock().unwrap().exec_responses.push_back(response);
    }

    pub fn set_constraints(&self, constraints: Vec<String>) {
        self.state.lock().unwrap().constraints = constraints;
    }

    pub fn fail_next_sidecar(&self, error: Error) {
        self.state.lock().unwrap().sidecar_error = Some(error);
    }

    pub fn fail_next_kill(&self, error: Error) {
        self.state.lock().unwrap().kill_error = Some(error);
    }

    pub fn fail_next_remove(&self, error: Error) {
        self.state.lock().unwrap().remove_error = Some(error);
    }

    pub fn executions(&self) -> Vec<ExecRecord> {
        self.state.lock().unwrap().executions.clone()
    }

    pub fn sidecars(&self) -> Vec<SidecarRecord> {
        self.state.lock().unwrap().sidecars.clone()
    }

    pub fn killed(&self) -> Vec<String> {
        self.state.lock().unwrap().killed.clone()
    }

    pub fn removed(&self) -> Vec<String> {
        self.state.lock().unwrap().removed.clone()
    }

    pub fn volumes_connected(&self) -> Vec<(String, String)> {
        self.state.lock().unwrap().volumes_connected.clone()
    }

    pub fn files(&self) -> Vec<PutFileRecord> {
        self.state.lock().unwrap().files.clone()
    }
}

#[async_trait]
impl InfrastructureController for MockController {
    async fn execute(&self, target: &str, command: &str) -> Result<ExecOutput> {
        let mut state = self.state.lock().unwrap();
        state.executions.push(ExecRecord {
            target: target.to_string(),
            command: command.to_string(),
        });
        state
            .exec_responses
            .pop_front()
            .unwrap_or_else(|| Ok(ExecOutput::new(PASSING_REPORT).with_exit_code(0)))
    }

    async fn get_network(&self, name: &str) -> Result<Option<String>> {
        let state = self.state.lock().unwrap();
        Ok(state.networks.iter().find(|n| *n == name).cloned())
    }

    async fn get_or_create_sidecar(
        &self,
        name: &str,
        command: &str,
        network: Option<&str>,
        volumes: &[VolumeMount],
    ) -> Result<ContainerHandle> {
        let mut state = self.state.lock().unwrap();
        if let Some(error) = state.sidecar_error.take() {
            return Err(error);
        }

        // Idempotent by name, like the real control plane.
        let known = state.sidecars.iter().any(|s| s.name == name);
        if !known {
            state.counter += 1;
            state.sidecars.push(SidecarRecord {
                name: name.to_string(),
                command: command.to_string(),
                network: network.map(str::to_string),
                volumes: volumes.to_vec(),
            });
        }

        Ok(ContainerHandle {
            id: format!("mock-{}", state.counter),
            name: name.to_string(),
            networks: network.map(str::to_string).into_iter().collect(),
        })
    }

    async fn connect_volume_to_service(
        &self,
        service: &str,
        volume: &str,
    ) -> Result<ContainerHandle> {
        let mut state = self.state.lock().unwrap();
        state
            .volumes_connected
            .push((service.to_string(), volume.to_string()));
        state.counter += 1;
        Ok(ContainerHandle {
            id: format!("mock-{}", state.counter),
            name: format!("{service}_1"),
            networks: vec![],
        })
    }

    async fn put_file(&self, entity: &str, contents: &[u8], filename: &str) -> Result<()> {
        self.state.lock().unwrap().files.push(PutFileRecord {
            entity: entity.to_string(),
            filename: filename.to_string(),
            contents: String::from_utf8_lossy(contents).into_owned(),
        });
        Ok(())
    }

    async fn kill_container(&self, name: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.killed.push(name.to_string());
        if let Some(error) = state.kill_error.take() {
            return Err(error);
        }
        Ok(())
    }

    async fn remove_container(&self, name: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.removed.push(name.to_string());
        if let Some(error) = state.remove_error.take() {
            return Err(error);
        }
        Ok(())
    }

    async fn placement_constraints(&self, _service: &str) -> Result<Vec<String>> {
        Ok(self.state.lock().unwrap().constraints.clone())
    }
}
