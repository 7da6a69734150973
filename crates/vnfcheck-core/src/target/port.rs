//! Port state target.
//!
//! Asserts that a port on the SUT is open or closed, or that it listens
//! on a specific address. The entity is `port` or `port/protocol`.

use super::{DomainOptions, Field, StagedCheck, TargetDomain, TestCase};
use crate::payload::PortCheck;
use crate::validators::{self, Validator, ensure};
use async_trait::async_trait;
use std::sync::Arc;
use vnfcheck_proto::{Error, InfrastructureController, Result, Sut, TargetType, TestTool};
use vnfcheck_adapters::GossTool;

const CONTEXTS: &[TargetType] = &[TargetType::Container, TargetType::Service, TargetType::Network];
const REQUIRED: &[Field] = &[Field::Entity, Field::Property, Field::Matcher, Field::Value];

/// Property table: legal matchers per property. Value legality is
/// checked per property below.
const PROPERTIES: &[(&str, &[&str])] = &[
    ("state", &["is", "is not"]),
    ("listening address", &["is"]),
];

/// Port state domain.
pub struct Port;

fn matchers_for(property: &str) -> &'static [&'static str] {
    PROPERTIES
        .iter()
        .find(|(name, _)| *name == property)
        .map(|(_, matchers)| *matchers)
        .unwrap_or(&[])
}

#[async_trait]
impl TargetDomain for Port {
    fn name(&self) -> &'static str {
        "port"
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
        match case.property.as_str() {
            "state" => ensure(&validators::InList::new(["open", "closed"])?, "value", &case.value)?,
            "listening address" => ensure(&validators::IpAddress, "value", &case.value)?,
            other => {
                return Err(Error::Validation(format!(
                    "property \"{other}\" is not allowed"
                )));
            }
        }

        Ok(entity_is_port(&case.entity))
    }

    fn prepare_transform(&self, case: &TestCase) -> Result<Option<StagedCheck>> {
        let check =
            PortCheck::from_fields(&case.entity, &case.property, &case.matcher, &case.value)?;
        Ok(Some(StagedCheck::Port(check)))
    }

    fn build_tool(
        &self,
        controller: Arc<dyn InfrastructureController>,
        _case: &TestCase,
    ) -> Result<Box<dyn TestTool>> {
        Ok(Box::new(GossTool::new(controller)))
    }
}

/// Entity syntax: `80`, `80/tcp`, `53/udp`. A mismatch is a boolean,
/// not an error.
fn entity_is_port(entity: &str) -> bool {
    let (port, protocol) = match entity.split_once('/') {
        Some((port, protocol)) => (port, protocol),
        None => (entity, "tcp"),
    };
    matches!(protocol, "tcp" | "udp") && validators::Port.validate(port)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HarnessConfig;
    use crate::context::RunContext;
    use crate::target::ValidationTarget;
    use crate::testing::MockOrchestrator;

    fn target_with_case(entity: &str, property: &str, matcher: &str, value: &str) -> ValidationTarget {
        let mut target = ValidationTarget::port(HarnessConfig::default());
        target
            .set_from_map([
                ("entity", entity),
                ("property", property),
                ("matcher", matcher),
                ("value", value),
            ])
            .unwrap();
        target
    }

    fn context_with_sut() -> RunContext {
        let mut ctx = RunContext::new(Arc::new(MockOrchestrator::with_defaults()));
        ctx.sut = Sut::new(TargetType::Service, "web", "web");
        ctx
    }

    #[test]
    fn validate_passes_for_an_open_state_assertion() {
        let target = target_with_case("80", "state", "is", "open");
        assert!(target.validate(&context_with_sut()).unwrap());
    }

    #[test]
    fn out_of_range_port_fails_without_raising() {
        for entity in ["0", "65536", "http"] {
            let target = target_with_case(entity, "state", "is", "open");
            assert!(!target.validate(&context_with_sut()).unwrap(), "{entity}");
        }
    }

    #[test]
    fn unknown_property_raises() {
        let target = target_with_case("80", "status", "is", "open");
        let err = target.validate(&context_with_sut()).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn matcher_must_be_legal_for_the_property() {
        // "is not" is fine for state but not for a listening address.
        let target = target_with_case("80", "state", "is not", "open");
        assert!(target.validate(&context_with_sut()).unwrap());

        let target = target_with_case("80", "listening address", "is not", "127.0.0.1");
        let err = target.validate(&context_with_sut()).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn listening_address_value_must_be_an_ip() {
        let target = target_with_case("80", "listening address", "is", "localhost");
        let err = target.validate(&context_with_sut()).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));

        let target = target_with_case("80", "listening address", "is", "0.0.0.0");
        assert!(target.validate(&context_with_sut()).unwrap());
    }

    #[test]
    fn transform_renders_the_reference_structure() {
        let mut target = target_with_case("8080/tcp", "state", "is", "open");
        assert!(target.validate(&context_with_sut()).unwrap());

        target.transform().unwrap();
        let rendered: serde_yaml::Value =
            serde_yaml::from_str(target.transformed_data().unwrap()).unwrap();
        let expected: serde_yaml::Value =
            serde_yaml::from_str("port:\n  tcp:8080:\n    listening: true\n").unwrap();
        assert_eq!(rendered, expected);
    }

    #[test]
    fn entity_syntax_covers_protocol_suffixes() {
        assert!(entity_is_port("80"));
        assert!(entity_is_port("53/udp"));
        assert!(!entity_is_port("80/sctp"));
        assert!(!entity_is_port("0"));
    }
}
