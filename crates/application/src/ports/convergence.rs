//! Log convergence wait policy
//!
//! The log store is eventually consistent and offers no "fully flushed"
//! signal. The default policy is two unconditional fixed delays (settle,
//! then final flush); the trait keeps the orchestrator's state machine
//! unchanged if a poll-until-ready strategy replaces it later.

use std::time::Duration;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

/// Policy for waiting out log-pipeline convergence after the window closes
#[cfg_attr(test, automock)]
#[async_trait]
pub trait LogConvergencePolicy: Send + Sync {
    /// Wait for in-flight logs to reach the store
    async fn settle(&self);

    /// Wait for the store's final flush before querying
    async fn flush(&self);
}

/// Default fixed-delay convergence policy
#[derive(Debug, Clone, Copy)]
pub struct FixedDelayConvergence {
    settle: Duration,
    flush: Duration,
}

impl FixedDelayConvergence {
    pub const fn new(settle: Duration, flush: Duration) -> Self {
        Self { settle, flush }
    }
}

impl Default for FixedDelayConvergence {
    fn default() -> Self {
        Self::new(Duration::from_secs(3), Duration::from_secs(5))
    }
}

#[async_trait]
impl LogConvergencePolicy for FixedDelayConvergence {
    async fn settle(&self) {
        tokio::time::sleep(self.settle).await;
    }

    async fn flush(&self) {
        tokio::time::sleep(self.flush).await;
    }
}
