//! Validation target lifecycle engine.
//!
//! A validation target drives one declarative test case from raw input to
//! a pass/fail outcome: validate, stage and transform the assertion
//! payload, provision auxiliary infrastructure (sidecar, shared checker
//! volume), execute the remote check, evaluate the structured results,
//! and clean up transient resources on every exit path.
//!
//! Domain specifics (property tables, matcher sets, payload shapes) live
//! in [`TargetDomain`] implementations; the engine holds no
//! domain-specific logic.

mod address;
mod case;
mod placement;
mod port;

pub use address::Address;
pub use case::{Field, TestCase};
pub use placement::Placement;
pub use port::Port;

use crate::config::HarnessConfig;
use crate::context::RunContext;
use crate::payload::{AddrCheck, PortCheck, addr, port as port_payload};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, error, info};
use vnfcheck_proto::{
    Error, InfrastructureController, Result, Sut, TargetType, TestTool, VolumeMount,
};
use vnfcheck_adapters::GossTool;

/// Intermediate assertion data staged by a domain before rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StagedCheck {
    Addr(AddrCheck),
    Port(PortCheck),
}

impl StagedCheck {
    /// Renders the staged data as the checker's assertion payload.
    pub fn render(&self) -> Result<String> {
        match self {
            StagedCheck::Addr(check) => addr::render(std::slice::from_ref(check)),
            StagedCheck::Port(check) => port_payload::render(std::slice::from_ref(check)),
        }
    }
}

/// Per-domain execution options consulted by the engine.
#[derive(Debug, Clone, Default)]
pub struct DomainOptions {
    /// The check must run from an injected sidecar container.
    pub sidecar_required: bool,
    /// The check needs the shared checker volume.
    pub volume_required: bool,
    /// Command the sidecar runs instead of the checker's default.
    pub sidecar_command: Option<String>,
    /// Command the tool dispatches instead of its own default.
    pub command_override: Option<String>,
}

/// Strategy surface implemented by each validation domain.
#[async_trait]
pub trait TargetDomain: Send + Sync {
    fn name(&self) -> &'static str;

    /// SUT scopes this domain may run against.
    fn allowed_contexts(&self) -> &'static [TargetType];

    /// Fields that must be supplied before validation runs.
    fn required_fields(&self) -> &'static [Field];

    fn options(&self) -> DomainOptions;

    /// Domain legality checks in order: context, property, matcher,
    /// value. Illegal tokens fail with [`Error::Validation`]; a plain
    /// syntactic mismatch of the entity is `Ok(false)`.
    fn validate(&self, case: &TestCase, sut: &Sut) -> Result<bool>;

    /// Stages raw fields for transformation. `Ok(None)` means the domain
    /// declares no transformation handler and the step is skipped.
    fn prepare_transform(&self, case: &TestCase) -> Result<Option<StagedCheck>>;

    /// Constructs the remote test tool for this domain.
    fn build_tool(
        &self,
        controller: Arc<dyn InfrastructureController>,
        case: &TestCase,
    ) -> Result<Box<dyn TestTool>>;

    /// Adjusts the tool right before execution. The default stages the
    /// rendered payload on the effective execution target.
    async fn prepare_run(
        &self,
        _tool: &mut dyn TestTool,
        ctx: &RunContext,
        payload: Option<&str>,
    ) -> Result<()> {
        if let Some(payload) = payload {
            GossTool::inject_gossfile(ctx.controller().as_ref(), &ctx.sut, payload).await?;
        }
        Ok(())
    }
}

/// One declarative test case plus the lifecycle driving it.
///
/// Created per test case, consumed once by [`run_test`], discarded after
/// evaluation. Not reused across runs.
///
/// [`run_test`]: ValidationTarget::run_test
pub struct ValidationTarget {
    domain: Box<dyn TargetDomain>,
    config: HarnessConfig,
    case: TestCase,
    data: Option<StagedCheck>,
    transformed_data: Option<String>,
}

impl ValidationTarget {
    pub fn new(domain: Box<dyn TargetDomain>, config: HarnessConfig) -> Self {
        Self {
            domain,
            config,
            case: TestCase::default(),
            data: None,
            transformed_data: None,
        }
    }

    /// An address reachability target.
    pub fn address(config: HarnessConfig) -> Self {
        Self::new(Box::new(Address), config)
    }

    /// A port state target.
    pub fn port(config: HarnessConfig) -> Self {
        Self::new(Box::new(Port), config)
    }

    /// A node placement target.
    pub fn placement(config: HarnessConfig) -> Self {
        Self::new(Box::new(Placement), config)
    }

    pub fn domain_name(&self) -> &'static str {
        self.domain.name()
    }

    pub fn get(&self, field: Field) -> &str {
        self.case.get(field)
    }

    pub fn set(&mut self, field: Field, value: &str) {
        self.case.set(field, value);
    }

    /// Bulk-set from tabular fixture entries; unknown keys fail.
    pub fn set_from_map<'a, I>(&mut self, entries: I) -> Result<()>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        self.case.set_from_map(entries)
    }

    pub fn case(&self) -> &TestCase {
        &self.case
    }

    /// The staged intermediate data, once prepared.
    pub fn staged(&self) -> Option<&StagedCheck> {
        self.data.as_ref()
    }

    /// The rendered assertion payload, once transformed.
    pub fn transformed_data(&self) -> Option<&str> {
        self.transformed_data.as_deref()
    }

    /// Validates the test case against the run context.
    ///
    /// Fails with [`Error::Setup`] when no SUT is declared, with
    /// [`Error::Validation`] when required fields are missing or a token
    /// is illegal for this domain. A syntactic mismatch of the entity is
    /// reported as `Ok(false)`.
    pub fn validate(&self, ctx: &RunContext) -> Result<bool> {
        if ctx.sut.target_type.is_none() {
            return Err(Error::Setup("no SUT declared".into()));
        }

        let missing = self.case.missing_fields(self.domain.required_fields());
        if !missing.is_empty() {
            return Err(Error::Validation(format!(
                "checking test data: no value supplied for {missing:?}"
            )));
        }

        self.domain.validate(&self.case, &ctx.sut)
    }

    /// Stages the raw fields and renders the assertion payload. Skipped
    /// entirely when the domain declares no transformation handler.
    pub fn transform(&mut self) -> Result<Option<&str>> {
        self.data = self.domain.prepare_transform(&self.case)?;
        if let Some(staged) = &self.data {
            self.transformed_data = Some(staged.render()?);
        }
        Ok(self.transformed_data.as_deref())
    }

    /// Entry point for a test run.
    ///
    /// Once provisioning has begun, cleanup runs exactly once before the
    /// outcome (success or any error) is propagated.
    pub async fn run_test(&mut self, ctx: &mut RunContext) -> Result<()> {
        if ctx.fatal_error {
            return Err(Error::Validation(
                "validation was not started: a fatal error occurred during test setup".into(),
            ));
        }
        if ctx.sut.target_type.is_none() {
            return Err(Error::Validation(
                "no context given: set a context type and target before running".into(),
            ));
        }
        ctx.validation_attempted = true;

        let mut options = self.domain.options();
        // Network-scoped checks cannot execute in place.
        if ctx.sut.is_network_scoped() {
            options.sidecar_required = true;
            options.volume_required = true;
        }

        if let Err(e) = self.validate_and_transform(ctx) {
            self.cleanup(ctx).await;
            return Err(e);
        }

        if let Err(e) = ctx.orchestrator().get_or_create_deployment().await {
            self.cleanup(ctx).await;
            return Err(e);
        }

        let mut tool = match self.provision(ctx, &options).await {
            Ok(tool) => tool,
            Err(e) => {
                self.cleanup(ctx).await;
                return Err(e);
            }
        };

        let run_result = tool.run(&ctx.sut).await;
        self.cleanup(ctx).await;
        run_result?;

        tool.evaluate(self.entity_label())
    }

    fn validate_and_transform(&mut self, ctx: &RunContext) -> Result<()> {
        if !self.validate(ctx)? {
            return Err(Error::Validation(format!(
                "\"{}\" is not a valid entity for a {} check",
                self.case.entity,
                self.domain.name()
            )));
        }
        self.transform()?;
        Ok(())
    }

    async fn provision(
        &mut self,
        ctx: &mut RunContext,
        options: &DomainOptions,
    ) -> Result<Box<dyn TestTool>> {
        if options.volume_required {
            let volume = ctx
                .orchestrator()
                .check_or_create_test_tool_volume(&self.config.goss_volume)
                .await?;
            ctx.test_volume = Some(volume);
        }

        if options.sidecar_required {
            self.create_sidecar(ctx, options).await?;
        }
        if !options.sidecar_required && options.volume_required {
            self.connect_volume_to_sut(ctx).await?;
        }

        let mut tool = self.domain.build_tool(ctx.controller(), &self.case)?;
        self.domain
            .prepare_run(tool.as_mut(), ctx, self.transformed_data.as_deref())
            .await?;
        if let Some(command) = &options.command_override {
            tool.set_command(command.clone());
        }
        Ok(tool)
    }

    /// Creates the sidecar and redirects the SUT at it.
    ///
    /// The name derives from the deployment name, so repeated
    /// provisioning for the same deployment is idempotent. When the SUT
    /// is network-scoped the sidecar must join that network.
    async fn create_sidecar(&self, ctx: &mut RunContext, options: &DomainOptions) -> Result<()> {
        let command = options
            .sidecar_command
            .clone()
            .unwrap_or_else(GossTool::default_command);

        let network = ctx.sut.is_network_scoped().then(|| ctx.sut.target.clone());
        if let Some(network_name) = &network {
            if ctx.controller().get_network(network_name).await?.is_none() {
                return Err(Error::NotFound(format!(
                    "cannot find network {network_name}"
                )));
            }
        }

        let mounts: Vec<VolumeMount> = ctx
            .test_volume
            .iter()
            .map(|v| VolumeMount::read_only(v.clone(), self.config.goss_mount.clone()))
            .collect();
        let name = self.config.sidecar_name(&ctx.deployment_name);

        info!(sidecar = %name, network = ?network, "provisioning sidecar");
        let handle = ctx
            .controller()
            .get_or_create_sidecar(&name, &command, network.as_deref(), &mounts)
            .await?;

        if let Some(network_name) = &network {
            if !handle.is_attached_to(network_name) {
                return Err(Error::Deployment(format!(
                    "sidecar {} did not join network {network_name}",
                    handle.name
                )));
            }
        }

        let sidecar_name = handle.name.clone();
        ctx.sidecar = Some(handle);
        ctx.update_sut(Some(TargetType::Container), Some(&sidecar_name));
        Ok(())
    }

    /// Attaches the checker volume to the SUT's owning service and
    /// redirects the SUT at that service's container.
    async fn connect_volume_to_sut(&self, ctx: &mut RunContext) -> Result<()> {
        let volume = ctx
            .test_volume
            .clone()
            .ok_or_else(|| Error::Setup("no test volume available to connect".into()))?;
        let container = ctx
            .controller()
            .connect_volume_to_service(&ctx.sut.service_id, &volume)
            .await?;
        ctx.update_sut(None, Some(&container.name));
        Ok(())
    }

    /// Releases the sidecar, if any. Safe to call when none exists and
    /// never fails: expected absence is ignored, anything else is logged.
    pub async fn cleanup(&self, ctx: &mut RunContext) {
        let Some(sidecar) = ctx.sidecar.take() else {
            return;
        };

        info!(sidecar = %sidecar.name, "cleanup: removing sidecar");
        let controller = ctx.controller();

        if let Err(e) = controller.kill_container(&sidecar.name).await {
            // Absent or already-stopped containers are expected here.
            debug!(sidecar = %sidecar.name, "cleanup: kill skipped: {e}");
        }
        match controller.remove_container(&sidecar.name).await {
            Ok(()) | Err(Error::NotFound(_)) => {}
            Err(e) => {
                error!(sidecar = %sidecar.name, "cleanup failed: could not remove sidecar: {e}");
            }
        }
    }

    fn entity_label(&self) -> &str {
        if self.case.entity.is_empty() {
            &self.case.property
        } else {
            &self.case.entity
        }
    }
}
