//! Failure generation port
//!
//! The failure generator translates failure scenarios against an application
//! topology into installed fault-injection rules. Installation is not
//! idempotent at the protocol level: re-running installs the rules again.

use async_trait::async_trait;
use domain::FailureScenario;
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for the failure-generation collaborator
#[cfg_attr(test, automock)]
#[async_trait]
pub trait FailureGeneratorPort: Send + Sync {
    /// Install fault-injection rules derived from `scenarios` against
    /// `topology`, scoped to requests whose `header` matches `pattern`.
    async fn install_failures(
        &self,
        topology: &serde_json::Value,
        scenarios: &[FailureScenario],
        header: &str,
        pattern: &str,
    ) -> Result<(), ApplicationError>;
}
