//! # vnfcheck-core
//!
//! Core of the vnfcheck validation harness.
//!
//! This crate provides:
//! - The validation target lifecycle engine (validate, transform,
//!   provision, execute, evaluate, cleanup)
//! - Domain targets for address reachability, port state, and placement
//! - Stateless validator primitives
//! - Assertion payload rendering for the remote checker
//! - The per-session run context and harness configuration
//! - Mock collaborators for deterministic testing

mod config;
mod context;
pub mod payload;
pub mod target;
pub mod testing;
pub mod validators;
mod wait;

pub use config::HarnessConfig;
pub use context::RunContext;
pub use target::{
    DomainOptions, Field, StagedCheck, TargetDomain, TestCase, ValidationTarget,
};
pub use wait::{wait_on, wait_until_some};
