//! Chaos recipe vocabulary
//!
//! A recipe bundles an application topology, a sequence of failure scenarios
//! and an assertion checklist. It is consumed once per orchestration run.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One failure scenario to install against the topology.
///
/// `scenario` names the failure kind (for example `delay_requests` or
/// `abort_requests`); the effect fields mirror the fault-rule model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailureScenario {
    pub scenario: String,
    pub source: String,
    pub destination: String,
    #[serde(default)]
    pub delay: f64,
    #[serde(default)]
    pub delay_probability: f64,
    #[serde(default)]
    pub abort_probability: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abort_code: Option<u16>,
}

/// A post-hoc assertion to evaluate against the log store.
///
/// `name` selects the check kind; open-ended per-check parameters (bounds,
/// thresholds) ride along in `params`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assertion {
    pub name: String,
    pub source: String,
    #[serde(alias = "dest")]
    pub destination: String,
    #[serde(flatten)]
    pub params: serde_json::Map<String, serde_json::Value>,
}

/// Assertion checklist, optionally overriding the log-store endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Checklist {
    pub assertions: Vec<Assertion>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_server: Option<String>,
}

/// Full chaos-experiment specification as supplied by the caller.
///
/// Fields are optional here so that precondition violations surface in the
/// orchestrator rather than at deserialization time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecipeSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topology: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scenarios: Option<Vec<FailureScenario>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checklist: Option<Checklist>,
}

/// Outcome of one assertion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AssertionOutcome {
    Pass,
    Fail,
}

impl AssertionOutcome {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pass => "PASS",
            Self::Fail => "FAIL",
        }
    }
}

impl fmt::Display for AssertionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of evaluating one assertion over the experiment window
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssertionResult {
    pub name: String,
    pub source: String,
    pub destination: String,
    pub outcome: AssertionOutcome,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl AssertionResult {
    pub fn passed(&self) -> bool {
        self.outcome == AssertionOutcome::Pass
    }
}
