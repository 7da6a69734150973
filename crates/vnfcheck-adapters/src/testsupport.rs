//! Scripted controller stub shared by the adapter unit tests.
//!
//! The full-featured recording mock lives in the core crate; using it
//! here would create a dependency cycle, so the adapters carry this
//! minimal stand-in.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use vnfcheck_proto::{
    ContainerHandle, ExecOutput, InfrastructureController, Result, VolumeMount,
};

pub struct ScriptedController {
    responses: Mutex<VecDeque<Result<ExecOutput>>>,
    constraints: Mutex<Result<Vec<String>>>,
}

impl ScriptedController {
    pub fn returning(outputs: Vec<Result<ExecOutput>>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(outputs.into()),
            constraints: Mutex::new(Ok(vec![])),
        })
    }

    pub fn with_constraints(constraints: Result<Vec<String>>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(VecDeque::new()),
            constraints: Mutex::new(constraints),
        })
    }
}

#[async_trait]
impl InfrastructureController for ScriptedController {
    async fn execute(&self, _target: &str, _command: &str) -> Result<ExecOutput> {
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(ExecOutput::new("")))
    }

    async fn get_network(&self, _name: &str) -> Result<Option<String>> {
        Ok(None)
    }

    async fn get_or_create_sidecar(
        &self,
        _name: &str,
        _command: &str,
        _network: Option<&str>,
        _volumes: &[VolumeMount],
    ) -> Result<ContainerHandle> {
        Ok(ContainerHandle::default())
    }

    async fn connect_volume_to_service(
        &self,
        _service: &str,
        _volume: &str,
    ) -> Result<ContainerHandle> {
        Ok(ContainerHandle::default())
    }

    async fn put_file(&self, _entity: &str, _contents: &[u8], _filename: &str) -> Result<()> {
        Ok(())
    }

    async fn kill_container(&self, _name: &str) -> Result<()> {
        Ok(())
    }

    async fn remove_container(&self, _name: &str) -> Result<()> {
        Ok(())
    }

    async fn placement_constraints(&self, _service: &str) -> Result<Vec<String>> {
        std::mem::replace(&mut *self.constraints.lock().unwrap(), Ok(vec![]))
    }
}
