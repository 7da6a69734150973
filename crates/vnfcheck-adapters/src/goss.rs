//! Goss checker adapter.
//!
//! Builds the remote command line, dispatches it through the
//! infrastructure controller, parses the JSON report, and classifies the
//! checker's text-mode failures into the error taxonomy.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;
use vnfcheck_proto::{
    CheckReport, Error, ExecOutput, InfrastructureController, Result, Sut, TestTool,
};

/// Path of the goss binary inside the shared test tool volume.
pub const DEFAULT_GOSS_BINARY: &str = "/goss/goss-linux-amd64";

/// Default location of the assertion file inside the execution target.
pub const DEFAULT_GOSSFILE: &str = "/goss.yaml";

/// What a known error signature in the checker's raw output means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GossFailure {
    /// The checker was invoked with arguments it does not understand.
    Syntax,
    /// The assertion file is missing on the execution target.
    GossfileMissing,
    /// The assertion file exists but is not valid YAML.
    GossfileMalformed,
    /// The checker binary itself is absent on the execution target.
    BinaryMissing,
}

/// Ordered substring signatures for classifying raw checker output.
///
/// Compatibility surface with the checker's text output; the checker does
/// not guarantee these strings as a stable contract, so the table is kept
/// in one place and matched first-hit-wins.
const ERROR_SIGNATURES: &[(&str, GossFailure)] = &[
    ("No help topic", GossFailure::Syntax),
    ("File error: open", GossFailure::GossfileMissing),
    ("Error: yaml:", GossFailure::GossfileMalformed),
    ("invalid character", GossFailure::GossfileMalformed),
    ("no such file or directory", GossFailure::BinaryMissing),
    ("executable file not found in", GossFailure::BinaryMissing),
];

/// Runs the goss checker remotely against one SUT.
pub struct GossTool {
    controller: Arc<dyn InfrastructureController>,
    gossfile: String,
    command: String,
    results: Option<CheckReport>,
}

impl GossTool {
    pub fn new(controller: Arc<dyn InfrastructureController>) -> Self {
        Self::with_gossfile(controller, DEFAULT_GOSSFILE)
    }

    /// Creates a tool reading its assertions from a non-default location.
    pub fn with_gossfile(
        controller: Arc<dyn InfrastructureController>,
        gossfile: impl Into<String>,
    ) -> Self {
        let gossfile = gossfile.into();
        let command = Self::build_command(&gossfile);
        Self {
            controller,
            gossfile,
            command,
            results: None,
        }
    }

    /// Renders the remote command line for a given assertion file.
    pub fn build_command(gossfile: &str) -> String {
        format!("{DEFAULT_GOSS_BINARY} --gossfile {gossfile} validate --format json")
    }

    /// The command a sidecar runs when no override is given.
    pub fn default_command() -> String {
        Self::build_command(DEFAULT_GOSSFILE)
    }

    /// Uploads a rendered assertion payload as `goss.yaml` into the SUT.
    ///
    /// Payload problems are validation errors; transport problems stay
    /// deployment errors so the caller can tell the two apart.
    pub async fn inject_gossfile(
        controller: &dyn InfrastructureController,
        sut: &Sut,
        payload: &str,
    ) -> Result<()> {
        if payload.trim().is_empty() {
            return Err(Error::Validation(
                "refusing to inject an empty assertion payload".into(),
            ));
        }
        match controller
            .put_file(&sut.target, payload.as_bytes(), "goss.yaml")
            .await
        {
            Ok(()) => Ok(()),
            Err(Error::Deployment(e)) => Err(Error::Deployment(format!(
                "could not stage the checker payload on {}: {e}",
                sut.target
            ))),
            Err(e) => Err(e),
        }
    }

    /// Classifies unparseable checker output into a specific diagnosis.
    fn diagnose(&self, target: &str, raw: &str) -> Error {
        for (needle, failure) in ERROR_SIGNATURES {
            if raw.contains(needle) {
                return Error::TestTool(match failure {
                    GossFailure::Syntax => {
                        format!("syntax error while calling the checker on {target}: {raw}")
                    }
                    GossFailure::GossfileMissing => {
                        format!("gossfile {} not found on {target}: {raw}", self.gossfile)
                    }
                    GossFailure::GossfileMalformed => {
                        format!("syntax errors in gossfile {}: {raw}", self.gossfile)
                    }
                    GossFailure::BinaryMissing => {
                        format!("checker executable not found on {target}: {raw}")
                    }
                });
            }
        }
        Error::TestTool(format!("could not parse checker output: {raw}"))
    }
}

#[async_trait]
impl TestTool for GossTool {
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
        if sut.target.is_empty() {
            return Err(Error::TestTool(
                "a target is necessary to run the checker".into(),
            ));
        }

        debug!(sut = %sut.target, command = %self.command, "running remote check");

        let res: ExecOutput = match self.controller.execute(&sut.target, &self.command).await {
            Ok(out) => out,
            Err(Error::Deployment(e)) => {
                return Err(Error::Deployment(format!(
                    "could not run command in {}: {e}",
                    sut.target
                )));
            }
            Err(e) => return Err(e),
        };

        match serde_json::from_str::<CheckReport>(&res.output) {
            Ok(report) => {
                self.results = Some(report);
                Ok(())
            }
            Err(_) => Err(self.diagnose(&sut.target, &res.output)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testsupport::ScriptedController;
    use vnfcheck_proto::TargetType;

    fn sut() -> Sut {
        Sut::new(TargetType::Container, "web_1", "web")
    }

    #[test]
    fn command_template_includes_gossfile_and_format() {
        let cmd = GossTool::build_command("/goss.yaml");
        assert_eq!(
            cmd,
            "/goss/goss-linux-amd64 --gossfile /goss.yaml validate --format json"
        );
    }

    #[tokio::test]
    async fn run_parses_a_json_report() {
        let raw = r#"{"results": [], "summary": {"failed-count": 0, "test-count": 0}}"#;
        let controller =
            ScriptedController::returning(vec![Ok(ExecOutput::new(raw).with_exit_code(0))]);
        let mut tool = GossTool::new(controller);

        tool.run(&sut()).await.unwrap();
        assert!(tool.results().unwrap().passed());
    }

    #[tokio::test]
    async fn run_without_target_is_a_tool_error() {
        let controller = ScriptedController::returning(vec![]);
        let mut tool = GossTool::new(controller);

        let err = tool.run(&Sut::default()).await.unwrap_err();
        assert!(matches!(err, Error::TestTool(_)));
    }

    #[tokio::test]
    async fn missing_gossfile_diagnosis_names_the_gossfile() {
        let controller = ScriptedController::returning(vec![Ok(ExecOutput::new(
            "File error: open /goss.yaml: no such file",
        )
        .with_exit_code(1))]);
        let mut tool = GossTool::new(controller);

        let err = tool.run(&sut()).await.unwrap_err();
        match err {
            Error::TestTool(msg) => assert!(msg.contains("/goss.yaml"), "message was: {msg}"),
            other => panic!("expected a tool error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn help_topic_output_is_a_syntax_diagnosis() {
        let controller = ScriptedController::returning(vec![Ok(ExecOutput::new(
            "No help topic for 'validat'",
        ))]);
        let mut tool = GossTool::new(controller);

        let err = tool.run(&sut()).await.unwrap_err();
        match err {
            Error::TestTool(msg) => assert!(msg.contains("syntax error")),
            other => panic!("expected a tool error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_binary_diagnosis() {
        let controller = ScriptedController::returning(vec![Ok(ExecOutput::new(
            "OCI runtime exec failed: executable file not found in $PATH",
        ))]);
        let mut tool = GossTool::new(controller);

        let err = tool.run(&sut()).await.unwrap_err();
        match err {
            Error::TestTool(msg) => assert!(msg.contains("checker executable not found")),
            other => panic!("expected a tool error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn unrecognized_output_is_a_generic_tool_error_with_payload() {
        let controller =
            ScriptedController::returning(vec![Ok(ExecOutput::new("segmentation fault"))]);
        let mut tool = GossTool::new(controller);

        let err = tool.run(&sut()).await.unwrap_err();
        match err {
            Error::TestTool(msg) => assert!(msg.contains("segmentation fault")),
            other => panic!("expected a tool error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn deployment_errors_stay_deployment_errors() {
        let controller = ScriptedController::returning(vec![Err(Error::Deployment(
            "daemon unreachable".into(),
        ))]);
        let mut tool = GossTool::new(controller);

        let err = tool.run(&sut()).await.unwrap_err();
        assert!(matches!(err, Error::Deployment(_)));
    }

    #[tokio::test]
    async fn not_found_errors_pass_through_unchanged() {
        let controller =
            ScriptedController::returning(vec![Err(Error::NotFound("web_1".into()))]);
        let mut tool = GossTool::new(controller);

        let err = tool.run(&sut()).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn evaluate_requires_results() {
        let controller = ScriptedController::returning(vec![]);
        let tool = GossTool::new(controller);

        let err = tool.evaluate("www.google.com").unwrap_err();
        match err {
            Error::Validation(msg) => assert!(msg.contains("www.google.com")),
            other => panic!("expected a validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn evaluate_passes_on_zero_failed_count() {
        let raw = r#"{
            "results": [{"expected": ["true"], "found": ["true"], "property": "reachable", "successful": true}],
            "summary": {"failed-count": 0, "test-count": 1}
        }"#;
        let controller = ScriptedController::returning(vec![Ok(ExecOutput::new(raw))]);
        let mut tool = GossTool::new(controller);

        tool.run(&sut()).await.unwrap();
        tool.evaluate("www.google.com").unwrap();
    }

    #[tokio::test]
    async fn evaluate_names_the_failing_property() {
        let raw = r#"{
            "results": [{"expected": ["true"], "found": ["false"], "property": "listening", "successful": false}],
            "summary": {"failed-count": 1, "test-count": 1}
        }"#;
        let controller = ScriptedController::returning(vec![Ok(ExecOutput::new(raw))]);
        let mut tool = GossTool::new(controller);

        tool.run(&sut()).await.unwrap();
        let err = tool.evaluate("8080").unwrap_err();
        match err {
            Error::Validation(msg) => {
                assert!(msg.contains("listening"));
                assert!(msg.contains("8080"));
            }
            other => panic!("expected a validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn inject_rejects_empty_payloads() {
        let controller = ScriptedController::returning(vec![]);
        let err = GossTool::inject_gossfile(controller.as_ref(), &sut(), "  \n")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }
}
