//! Load phase ports
//!
//! The load phase is either an operator-supplied script run to completion or
//! a wait on an external completion signal. The signal source is pluggable:
//! console input, a completion webhook, or a fixed timeout all satisfy the
//! same port.

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for the load-completion signal
#[cfg_attr(test, automock)]
#[async_trait]
pub trait LoadSignalPort: Send + Sync {
    /// Block until the load-completion signal arrives
    async fn wait(&self) -> Result<(), ApplicationError>;
}

/// Port for running an operator-supplied load script.
///
/// Trust boundary: script content is trusted input from the operator, not
/// untrusted user data.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait LoadScriptPort: Send + Sync {
    /// Persist the script, mark it executable and run it to completion
    async fn run(&self, script: &str) -> Result<(), ApplicationError>;
}
