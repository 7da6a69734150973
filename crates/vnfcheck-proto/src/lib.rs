//! # vnfcheck-proto
//!
//! Shared types for the vnfcheck validation harness: the error taxonomy,
//! the system-under-test reference, the structured result schema of the
//! external checker, and the capability traits implemented by the
//! infrastructure control plane and the deployment orchestrator.

mod controller;
mod error;
mod orchestrator;
mod report;
mod sut;
mod tool;

pub use controller::{ExecOutput, InfrastructureController};
pub use error::{Error, Result};
pub use orchestrator::Orchestrator;
pub use report::{AssertionResult, CheckReport, Summary};
pub use sut::{ContainerHandle, Sut, TargetType, VolumeMount};
pub use tool::TestTool;
