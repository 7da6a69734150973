//! Mock collaborators for deterministic testing.
//!
//! The mocks record every call so tests can assert what the engine did
//! (and, just as importantly, what it did not do) to the infrastructure.

mod mock_controller;
mod mock_orchestrator;

pub use mock_controller::{ExecRecord, MockController, PutFileRecord, SidecarRecord};
pub use mock_orchestrator::MockOrchestrator;

/// A checker report with no failing assertions.
pub const PASSING_REPORT: &str = r#"{
    "results": [
        {"expected": ["true"], "found": ["true"], "property": "reachable", "successful": true}
    ],
    "summary": {"failed-count": 0, "test-count": 1}
}"#;

/// A checker report with one failing assertion on `reachable`.
pub const FAILING_REPORT: &str = r#"{
    "results": [
        {"expected": ["true"], "found": ["false"], "property": "reachable", "successful": false}
    ],
    "summary": {"failed-count": 1, "test-count": 1}
}"#;
