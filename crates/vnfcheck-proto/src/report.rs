//! Typed mirror of the external checker's JSON result schema.
//!
//! The remote checker emits one JSON document per run: a summary with
//! counts and a list of individual assertion results. The field names
//! (`failed-count`, `resource-id`, ...) are the checker's contract, not
//! ours, hence the serde renames.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Outcome of one remote check run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckReport {
    pub summary: Summary,
    #[serde(default)]
    pub results: Vec<AssertionResult>,
}

/// Aggregate counts for one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Summary {
    /// Number of failed assertions. Typed unsigned: the schema guarantees
    /// an integer >= 0 and deserialization enforces it.
    #[serde(rename = "failed-count")]
    pub failed_count: u64,
    #[serde(rename = "test-count", default)]
    pub test_count: u64,
}

/// One individual assertion outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssertionResult {
    #[serde(default)]
    pub property: String,
    /// Expected and found are either scalars or arrays depending on the
    /// assertion kind, so they stay untyped JSON values.
    #[serde(default)]
    pub expected: Value,
    #[serde(default)]
    pub found: Value,
    pub successful: bool,
    #[serde(rename = "resource-id", default, skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<String>,
}

impl CheckReport {
    /// True when no assertion failed.
    pub fn passed(&self) -> bool {
        self.summary.failed_count == 0
    }

    /// The unsuccessful assertion results.
    pub fn failures(&self) -> impl Iterator<Item = &AssertionResult> {
        self.results.iter().filter(|r| !r.successful)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PASSING: &str = r#"{
        "results": [
            {
                "expected": ["true"],
                "found": ["true"],
                "property": "reachable",
                "resource-id": "tcp://www.google.com:80",
                "successful": true
            }
        ],
        "summary": {"failed-count": 0, "test-count": 1}
    }"#;

    const FAILING: &str = r#"{
        "results": [
            {
                "expected": ["true"],
                "found": ["false"],
                "property": "listening",
                "resource-id": "tcp:8080",
                "successful": false
            },
            {
                "expected": ["true"],
                "found": ["true"],
                "property": "reachable",
                "successful": true
            }
        ],
        "summary": {"failed-count": 1, "test-count": 2}
    }"#;

    #[test]
    fn parses_passing_report() {
        let report: CheckReport = serde_json::from_str(PASSING).unwrap();
        assert!(report.passed());
        assert_eq!(report.summary.test_count, 1);
        assert_eq!(report.failures().count(), 0);
    }

    #[test]
    fn parses_failing_report_and_lists_failures() {
        let report: CheckReport = serde_json::from_str(FAILING).unwrap();
        assert!(!report.passed());

        let failures: Vec<_> = report.failures().collect();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].property, "listening");
        assert_eq!(failures[0].resource_id.as_deref(), Some("tcp:8080"));
    }

    #[test]
    fn negative_failed_count_is_rejected() {
        let raw = r#"{"results": [], "summary": {"failed-count": -1}}"#;
        assert!(serde_json::from_str::<CheckReport>(raw).is_err());
    }
}
