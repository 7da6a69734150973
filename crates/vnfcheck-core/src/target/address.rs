//! Address reachability target.
//!
//! Asserts that a host (domain name or IP literal, optionally with a
//! port) is or is not reachable from the SUT.

use super::{DomainOptions, Field, StagedCheck, TargetDomain, TestCase};
use crate::payload::AddrCheck;
use crate::validators::{self, Validator, ensure};
use async_trait::async_trait;
use std::sync::Arc;
use vnfcheck_proto::{InfrastructureController, Result, Sut, TargetType, TestTool};
use vnfcheck_adapters::GossTool;

const CONTEXTS: &[TargetType] = &[TargetType::Container, TargetType::Service, TargetType::Network];
const REQUIRED: &[Field] = &[Field::Entity, Field::Property, Field::Matcher, Field::Value];
const MATCHERS: &[&str] = &["is", "is not"];
const VALUES: &[&str] = &["reachable", "is not reachable"];

/// Address reachability domain.
pub struct Address;

#[async_trait]
impl TargetDomain for Address {
    fn name(&self) -> &'static str {
        "address"
    }

    fn allowed_contexts(&self) -> &'static [TargetType] {
        CONTEXTS
    }

    fn required_fields(&self) -> &'static [Field] {
        REQUIRED
    }

    fn options(&self) -> DomainOptions {
        DomainOptions {
            volume_required: true,
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
        ensure(&validators::InList::new(MATCHERS.iter().copied())?, "matcher", &case.matcher)?;
        ensure(&validators::InList::new(VALUES.iter().copied())?, "value", &case.value)?;

        Ok(entity_is_address(&case.entity))
    }

    fn prepare_transform(&self, case: &TestCase) -> Result<Option<StagedCheck>> {
        let check = AddrCheck::from_fields(&case.entity, &case.matcher, &case.value)?;
        Ok(Some(StagedCheck::Addr(check)))
    }

    fn build_tool(
        &self,
        controller: Arc<dyn InfrastructureController>,
        _case: &TestCase,
    ) -> Result<Box<dyn TestTool>> {
        Ok(Box::new(GossTool::new(controller)))
    }
}

/// Entity syntax: an IP literal, a domain name, or either followed by
/// `:port`. A mismatch is a boolean, not an error.
fn entity_is_address(entity: &str) -> bool {
    if validators::IpAddress.validate(entity) {
        return true;
    }
    let (host, port_ok) = match entity.rsplit_once(':') {
        Some((host, port)) => (host, validators::Port.validate(port)),
        None => (entity, true),
    };
    port_ok && (validators::Domain.validate(host) || validators::IpAddress.validate(host))
}
