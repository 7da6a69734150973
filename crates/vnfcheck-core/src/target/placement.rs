//! Node placement target.
//!
//! Asserts where a service is allowed to run. Answered from the
//! orchestrator's resource metadata, so this domain declares no
//! transformation handler and needs neither sidecar nor volume.

use super::{DomainOptions, Field, StagedCheck, TargetDomain, TestCase};
use crate::validators::{self, ensure};
use async_trait::async_trait;
use std::sync::Arc;
use vnfcheck_proto::{InfrastructureController, Result, Sut, TargetType, TestTool};
use vnfcheck_adapters::PlacementTool;

const CONTEXTS: &[TargetType] = &[TargetType::Service];
const REQUIRED: &[Field] = &[Field::Property, Field::Matcher, Field::Value];
const PROPERTIES: &[(&str, &[&str])] = &[("node.role", &["is", "is not"])];
const VALUE_PATTERN: &str = r"\S+";

/// Node placement domain.
pub struct Placement;

fn matchers_for(property: &str) -> &'static [&'static str] {
    PROPERTIES
        .iter()
        .find(|(name, _)| *name == property)
        .map(|(_, matchers)| *matchers)
        .unwrap_or(&[])
}

#[async_trait]
impl TargetDomain for Placement {
    fn name(&self) -> &'static str {
        "placement"
    }

    fn allowed_contexts(&self) -> &'static [TargetType] {
        CONTEXTS
    }

    fn required_fields(&self) -> &'static [Field] {
        REQUIRED
    }

    fn options(&self) -> DomainOptions {
        DomainOptions {
            command_override: Some("placement".into()),
            ..DomainOptions::default()
        }
    }

    fn validate(&self, case: &TestCase, sut: &Sut) -> Result<bool> {
        let context = sut.target_type.map(TargetType::as_str).unwrap_or_default();
        ensure(
            &validators::Context::new(self.allowed_contexts().iter().map(|c| c.as_str()))?,
            "context",
            context,
        )?;
        ensure(
            &validators::Property::new(PROPERTIES.iter().map(|(name, _)| *name))?,
            "property",
            &case.property,
        )?;
        ensure(
            &validators::InList::new(matchers_for(&case.property).iter().copied())?,
            "matcher",
            &case.matcher,
        )?;
        ensure(&validators::Regex::new(VALUE_PATTERN)?, "value", &case.value)?;
        Ok(true)
    }

    fn prepare_transform(&self, _case: &TestCase) -> Result<Option<StagedCheck>> {
        Ok(None)
    }

    fn build_tool(
        &self,
        controller: Arc<dyn InfrastructureController>,
        case: &TestCase,
    ) -> Result<Box<dyn TestTool>> {
        let mut tool = PlacementTool::new(controller);
        tool.expect(&case.property, case.matcher == "is not", &case.value);
        Ok(Box::new(tool))
    }
}
