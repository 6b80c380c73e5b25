//! Load script runner
//!
//! Persists the supplied script text to a fixed well-known path (overwritten
//! on every run; execution is sequential, so no locking), marks it
//! executable and runs it to completion. The exit status is logged but not
//! inspected. Script content is trusted operator input.

use std::path::PathBuf;

use application::{ApplicationError, LoadScriptPort};
use async_trait::async_trait;
use tracing::{info, instrument, warn};

/// Runs an operator-supplied shell script as the load phase
#[derive(Debug, Clone)]
pub struct ShellScriptRunner {
    path: PathBuf,
}

impl ShellScriptRunner {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Default for ShellScriptRunner {
    fn default() -> Self {
        Self::new("/tmp/faultmesh-load.sh")
    }
}

#[async_trait]
impl LoadScriptPort for ShellScriptRunner {
    #[instrument(skip(self, script))]
    async fn run(&self, script: &str) -> Result<(), ApplicationError> {
        tokio::fs::write(&self.path, script)
            .await
            .map_err(|e| ApplicationError::LoadScript(format!("write {:?}: {e}", self.path)))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            tokio::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o755))
                .await
                .map_err(|e| {
                    ApplicationError::LoadScript(format!("chmod {:?}: {e}", self.path))
                })?;
        }

        info!(path = ?self.path, "running load script");
        let status = tokio::process::Command::new(&self.path)
            .status()
            .await
            .map_err(|e| ApplicationError::LoadScript(format!("spawn {:?}: {e}", self.path)))?;

        if status.success() {
            info!(path = ?self.path, "load script finished");
        } else {
            // exit status is logged, not inspected; the experiment proceeds
            warn!(path = ?self.path, %status, "load script exited non-zero");
        }
        Ok(())
    }
}
