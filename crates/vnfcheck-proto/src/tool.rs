//! Remote test tool capability.

use crate::error::{Error, Result};
use crate::report::CheckReport;
use crate::sut::Sut;
use async_trait::async_trait;
use tracing::info;

/// Executes exactly one remote check against one SUT.
///
/// A tool is constructed fresh per validation target, given the command
/// to run, executed once, and discarded after its results are evaluated.
/// Implementors translate transport and tool-level failures into the
/// closed error taxonomy: [`Error::Deployment`] when the infrastructure
/// could not run anything, [`Error::TestTool`] when the checker itself
/// rejected the input or could not start.
#[async_trait]
pub trait TestTool: Send {
    /// The remote command line this tool will dispatch.
    fn command(&self) -> &str;

    /// Overrides the remote command line.
    fn set_command(&mut self, command: String);

    /// Structured results of the last run, if any.
    fn results(&self) -> Option<&CheckReport>;

    /// Dispatches the check against the given SUT and parses the outcome.
    async fn run(&mut self, sut: &Sut) -> Result<()>;

    /// Evaluates the structured results of the last run.
    ///
    /// Requires results to be present, logs the full report, and fails
    /// with [`Error::Validation`] naming every unsuccessful assertion
    /// when the failed count is non-zero.
    fn evaluate(&self, entity: &str) -> Result<()> {
        let report = self
            .results()
            .ok_or_else(|| Error::Validation(format!("no results recorded for \"{entity}\"")))?;

        if let Ok(rendered) = serde_json::to_string_pretty(report) {
            info!(entity, "check results:\n{rendered}");
        }

        let failures: Vec<String> = report
            .failures()
            .map(|f| {
                format!(
                    "{entity}: property \"{}\", expected: {}, found: {}",
                    f.property, f.expected, f.found
                )
            })
            .collect();

        if report.summary.failed_count > 0 || !failures.is_empty() {
            for line in &failures {
                info!("{line}");
            }
            return Err(Error::Validation(format!(
                "check failed: {}",
                failures.join("; ")
            )));
        }

        Ok(())
    }
}
