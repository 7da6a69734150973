//! Placement inspector.
//!
//! Answers placement questions (which node role a service is pinned to)
//! from the orchestrator's resource metadata instead of running a remote
//! command. The outcome is synthesized into the same structured report
//! shape the remote checker produces, so evaluation shares one path.

use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;
use tracing::debug;
use vnfcheck_proto::{
    AssertionResult, CheckReport, Error, InfrastructureController, Result, Summary, Sut, TestTool,
};

/// One primed placement comparison.
#[derive(Debug, Clone)]
struct Expectation {
    property: String,
    /// True for "is not" comparisons.
    negated: bool,
    value: String,
}

/// Inspects a service's placement constraints against an expectation.
pub struct PlacementTool {
    controller: Arc<dyn InfrastructureController>,
    command: String,
    expectation: Option<Expectation>,
    results: Option<CheckReport>,
}

impl PlacementTool {
    pub fn new(controller: Arc<dyn InfrastructureController>) -> Self {
        Self {
            controller,
            command: "placement".into(),
            expectation: None,
            results: None,
        }
    }

    /// Primes the comparison to perform on the next run.
    pub fn expect(&mut self, property: impl Into<String>, negated: bool, value: impl Into<String>) {
        self.expectation = Some(Expectation {
            property: property.into(),
            negated,
            value: value.into(),
        });
    }

    /// Values asserted for `property` by equality constraints, e.g.
    /// `node.role == manager` yields `manager` for `node.role`.
    fn constrained_values(constraints: &[String], property: &str) -> Vec<String> {
        constraints
            .iter()
            .filter_map(|c| c.split_once("=="))
            .filter(|(key, _)| key.trim() == property)
            .map(|(_, value)| value.trim().to_string())
            .collect()
    }
}

#[async_trait]
impl TestTool for PlacementTool {
    fn command(&self) -> &str {
        &self.command
    }

    fn set_command(&mut self, command: String) {
        self.command = command;
    }

    fn results(&self) -> Option<&CheckReport> {
        self.results.as_ref()
    }

    async fn run(&mut self, sut: &Sut) -> Result<()> {
        let expectation = self.expectation.clone().ok_or_else(|| {
            Error::TestTool("placement tool was not primed with an expectation".into())
        })?;

        let service = if sut.service_id.is_empty() {
            &sut.target
        } else {
            &sut.service_id
        };
        if service.is_empty() {
            return Err(Error::TestTool(
                "a service is necessary to inspect placement".into(),
            ));
        }

        let constraints = self.controller.placement_constraints(service).await?;
        debug!(service, ?constraints, "inspecting placement constraints");

        let found = Self::constrained_values(&constraints, &expectation.property);
        let matched = found.contains(&expectation.value);
        let successful = if expectation.negated { !matched } else { matched };

        self.results = Some(CheckReport {
            summary: Summary {
                failed_count: u64::from(!successful),
                test_count: 1,
            },
            results: vec![AssertionResult {
                property: expectation.property,
                expected: json!([expectation.value]),
                found: json!(found),
                successful,
                resource_id: Some(service.clone()),
            }],
        });
        Ok(())
    }
}
