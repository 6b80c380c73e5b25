//! Load-completion signal sources

use std::time::Duration;

use application::{ApplicationError, LoadSignalPort};
use async_trait::async_trait;
use tracing::info;

/// Manual checkpoint: blocks until the operator presses a key.
///
/// Deliberately unbounded; the operator provides input or kills the process.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleSignal;

#[async_trait]
impl LoadSignalPort for ConsoleSignal {
    async fn wait(&self) -> Result<(), ApplicationError> {
        info!("when done injecting load, press Enter to continue to the validation phase");
        #[allow(clippy::print_stdout)]
        {
            println!("When done, press Enter to continue to the validation phase");
        }
        tokio::task::spawn_blocking(|| {
            use std::io::Read;
            let mut byte = [0u8; 1];
            std::io::stdin().read(&mut byte).map(|_| ())
        })
        .await
        .map_err(|e| ApplicationError::Internal(format!("signal task failed: {e}")))?
        .map_err(|e| ApplicationError::Internal(format!("stdin read failed: {e}")))
    }
}

/// Fixed-duration alternative to the manual checkpoint
#[derive(Debug, Clone, Copy)]
pub struct TimeoutSignal {
    duration: Duration,
}

impl TimeoutSignal {
    pub const fn new(duration: Duration) -> Self {
        Self { duration }
    }
}

#[async_trait]
impl LoadSignalPort for TimeoutSignal {
    async fn wait(&self) -> Result<(), ApplicationError> {
        info!(seconds = self.duration.as_secs(), "waiting out the load window");
        tokio::time::sleep(self.duration).await;
        Ok(())
    }
}
