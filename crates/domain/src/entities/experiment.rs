//! Experiment window and state machine vocabulary

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::entities::recipe::AssertionResult;

/// ISO-8601 timestamps bracketing the period during which injected faults and
/// real traffic overlap. Used only to scope the downstream log query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperimentWindow {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

impl ExperimentWindow {
    pub const fn new(start_time: DateTime<Utc>, end_time: DateTime<Utc>) -> Self {
        Self { start_time, end_time }
    }

    /// Window start as an ISO-8601 string
    pub fn start_rfc3339(&self) -> String {
        self.start_time.to_rfc3339_opts(SecondsFormat::Micros, true)
    }

    /// Window end as an ISO-8601 string
    pub fn end_rfc3339(&self) -> String {
        self.end_time.to_rfc3339_opts(SecondsFormat::Micros, true)
    }
}

/// States of a chaos-experiment run, strictly sequential.
///
/// `Failed` is reachable from any state on a fatal precondition violation or
/// collaborator failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExperimentState {
    Idle,
    RulesInstalled,
    LoadPhase,
    WindowClosed,
    AssertionsChecked,
    Done,
    Failed,
}

impl fmt::Display for ExperimentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "IDLE",
            Self::RulesInstalled => "RULES_INSTALLED",
            Self::LoadPhase => "LOAD_PHASE",
            Self::WindowClosed => "WINDOW_CLOSED",
            Self::AssertionsChecked => "ASSERTIONS_CHECKED",
            Self::Done => "DONE",
            Self::Failed => "FAILED",
        };
        f.write_str(name)
    }
}

/// Outcome of a completed experiment run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperimentReport {
    pub window: ExperimentWindow,
    pub results: Vec<AssertionResult>,
    pub state: ExperimentState,
}

impl ExperimentReport {
    /// True iff every assertion passed
    pub fn all_passed(&self) -> bool {
        self.results.iter().all(AssertionResult::passed)
    }
}
