//! Chaos recipe orchestrator
//!
//! Drives a full experiment as a strictly sequential state machine:
//!
//! `IDLE -> RULES_INSTALLED -> LOAD_PHASE -> WINDOW_CLOSED ->
//! ASSERTIONS_CHECKED -> DONE`, with `FAILED` reachable from any state.
//!
//! One experiment at a time per invocation; each run is independent and
//! stateless apart from the timestamps it captures. Installed fault rules
//! are deliberately not cleared at the end of a run: cleanup is a separate,
//! explicit operation left to the caller, which also means re-running the
//! same recipe installs duplicate rules.

use std::sync::Arc;

use chrono::Utc;
use domain::{ExperimentReport, ExperimentState, ExperimentWindow, RecipeSpec};
use tracing::{debug, info, instrument, warn};

use crate::error::ApplicationError;
use crate::ports::{
    AssertionCheckerPort, FailureGeneratorPort, LoadScriptPort, LoadSignalPort,
    LogConvergencePolicy,
};

/// Orchestrator configuration
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Header that scopes injected faults to test traffic
    pub header: String,
    /// Header-value pattern for test traffic
    pub pattern: String,
    /// Log-store endpoint used when the checklist carries no override
    pub log_server: String,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            header: "X-Request-ID".to_string(),
            pattern: "*".to_string(),
            log_server: "http://localhost:9200".to_string(),
        }
    }
}

/// Runs chaos recipes against the mesh control plane
pub struct RecipeOrchestrator {
    failures: Arc<dyn FailureGeneratorPort>,
    assertions: Arc<dyn AssertionCheckerPort>,
    signal: Arc<dyn LoadSignalPort>,
    script: Arc<dyn LoadScriptPort>,
    convergence: Arc<dyn LogConvergencePolicy>,
    config: OrchestratorConfig,
}

impl std::fmt::Debug for RecipeOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecipeOrchestrator")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl RecipeOrchestrator {
    pub fn new(
        failures: Arc<dyn FailureGeneratorPort>,
        assertions: Arc<dyn AssertionCheckerPort>,
        signal: Arc<dyn LoadSignalPort>,
        script: Arc<dyn LoadScriptPort>,
        convergence: Arc<dyn LogConvergencePolicy>,
        config: OrchestratorConfig,
    ) -> Self {
        Self {
            failures,
            assertions,
            signal,
            script,
            convergence,
            config,
        }
    }

    /// Run one experiment to completion.
    ///
    /// `load_script`, when supplied, is run to completion as the load phase;
    /// otherwise the orchestrator blocks on the load-completion signal.
    /// Missing `topology`, `scenarios` or `checklist` is a fatal
    /// precondition violation: the run terminates before any collaborator is
    /// invoked. Collaborator failures propagate as fatal; nothing is
    /// retried, and partially applied rules are an accepted operational cost.
    #[instrument(skip(self, recipe, load_script))]
    pub async fn run(
        &self,
        recipe: RecipeSpec,
        load_script: Option<&str>,
    ) -> Result<ExperimentReport, ApplicationError> {
        match self.drive(recipe, load_script).await {
            Ok(report) => Ok(report),
            Err(err) => {
                warn!(state = %ExperimentState::Failed, error = %err, "experiment run failed");
                Err(err)
            },
        }
    }

    async fn drive(
        &self,
        recipe: RecipeSpec,
        load_script: Option<&str>,
    ) -> Result<ExperimentReport, ApplicationError> {
        let mut state = ExperimentState::Idle;

        let topology = recipe
            .topology
            .ok_or_else(|| ApplicationError::precondition("topology is required"))?;
        let scenarios = recipe
            .scenarios
            .ok_or_else(|| ApplicationError::precondition("failure scenarios are required"))?;
        let checklist = recipe
            .checklist
            .ok_or_else(|| ApplicationError::precondition("assertion checklist is required"))?;

        // Not idempotent: re-running installs the rules again, undeduplicated.
        let scoped_pattern = format!(".*?{}", self.config.pattern);
        self.failures
            .install_failures(&topology, &scenarios, &self.config.header, &scoped_pattern)
            .await?;
        state = transition(state, ExperimentState::RulesInstalled);

        // The window anchor must be taken after rules are live, not before.
        let start_time = Utc::now();
        info!(
            header = %self.config.header,
            pattern = %self.config.pattern,
            "inject test requests with the scoping header matching the pattern"
        );

        state = transition(state, ExperimentState::LoadPhase);
        match load_script {
            Some(script) => self.script.run(script).await?,
            None => self.signal.wait().await?,
        }
        let end_time = Utc::now();
        let window = ExperimentWindow::new(start_time, end_time);

        // The log store is eventually consistent and offers no flush signal.
        self.convergence.settle().await;
        self.convergence.flush().await;
        state = transition(state, ExperimentState::WindowClosed);

        let log_server = checklist
            .log_server
            .clone()
            .unwrap_or_else(|| self.config.log_server.clone());
        let results = self
            .assertions
            .check_assertions(
                &log_server,
                &self.config.header,
                &self.config.pattern,
                &window,
                &checklist,
                true,
            )
            .await?;
        state = transition(state, ExperimentState::AssertionsChecked);

        // Rules stay installed; `rule-clear` is the explicit cleanup surface.
        let state = transition(state, ExperimentState::Done);
        Ok(ExperimentReport {
            window,
            results,
            state,
        })
    }
}

fn transition(from: ExperimentState, to: ExperimentState) -> ExperimentState {
    debug!(%from, %to, "experiment state transition");
    to
}
