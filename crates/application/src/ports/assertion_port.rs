//! Assertion checking port
//!
//! Evaluates a checklist against the external log store over the experiment
//! window. With `continue_on_error`, a single assertion's evaluation failure
//! must not abort evaluation of the remaining assertions.

use async_trait::async_trait;
use domain::{AssertionResult, Checklist, ExperimentWindow};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for the assertion-checking collaborator
#[cfg_attr(test, automock)]
#[async_trait]
pub trait AssertionCheckerPort: Send + Sync {
    /// Evaluate every assertion in `checklist` against logs at `log_server`,
    /// scoped to requests whose `header` matches `pattern` within `window`.
    async fn check_assertions(
        &self,
        log_server: &str,
        header: &str,
        pattern: &str,
        window: &ExperimentWindow,
        checklist: &Checklist,
        continue_on_error: bool,
    ) -> Result<Vec<AssertionResult>, ApplicationError>;
}
