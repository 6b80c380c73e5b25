//! Faultmesh configuration
//!
//! Loaded from an optional TOML file plus `FAULTMESH_*` environment
//! overrides (double underscore as the section separator, for example
//! `FAULTMESH_CONTROLLER__TOKEN`). Every field has a default so an empty
//! configuration is valid.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Control-plane (routing and rule store) endpoint settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Controller API base URL
    pub base_url: String,
    /// Bearer token, if the controller requires one
    pub token: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:31200".to_string(),
            token: None,
            timeout_secs: 30,
        }
    }
}

/// Service registry endpoint settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Registry API base URL
    pub base_url: String,
    /// Bearer token, if the registry requires one
    pub token: Option<String>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:31300".to_string(),
            token: None,
        }
    }
}

/// Chaos experiment settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    /// Header that scopes injected faults to test traffic
    pub header: String,
    /// Header-value pattern for test traffic
    pub pattern: String,
    /// Default log-store endpoint for assertion checking
    pub log_server: String,
    /// Log-pipeline settle wait after the window closes, in seconds
    pub settle_secs: u64,
    /// Final log flush wait before querying, in seconds
    pub flush_secs: u64,
    /// Well-known path for the scratch load script, overwritten per run
    pub script_path: String,
}

impl ExperimentConfig {
    pub const fn settle(&self) -> Duration {
        Duration::from_secs(self.settle_secs)
    }

    pub const fn flush(&self) -> Duration {
        Duration::from_secs(self.flush_secs)
    }
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            header: "X-Request-ID".to_string(),
            pattern: "*".to_string(),
            log_server: "http://localhost:9200".to_string(),
            settle_secs: 3,
            flush_secs: 5,
            script_path: "/tmp/faultmesh-load.sh".to_string(),
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FaultmeshConfig {
    pub controller: ControllerConfig,
    pub registry: RegistryConfig,
    pub experiment: ExperimentConfig,
}

impl FaultmeshConfig {
    /// Load configuration from an optional file and the environment.
    ///
    /// Without an explicit path, `faultmesh.toml` in the working directory is
    /// used when present.
    pub fn load(path: Option<&Path>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();
        builder = match path {
            Some(path) => builder.add_source(config::File::from(path)),
            None => builder.add_source(config::File::with_name("faultmesh").required(false)),
        };
        builder = builder.add_source(
            config::Environment::with_prefix("FAULTMESH").separator("__"),
        );
        builder.build()?.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_complete() {
        let config = FaultmeshConfig::default();
        assert_eq!(config.controller.base_url, "http://localhost:31200");
        assert_eq!(config.controller.timeout_secs, 30);
        assert_eq!(config.experiment.header, "X-Request-ID");
        assert_eq!(config.experiment.pattern, "*");
        assert_eq!(config.experiment.settle(), Duration::from_secs(3));
        assert_eq!(config.experiment.flush(), Duration::from_secs(5));
        assert_eq!(config.experiment.script_path, "/tmp/faultmesh-load.sh");
    }

    #[test]
    fn partial_toml_keeps_defaults_elsewhere() {
        let parsed: FaultmeshConfig = toml::from_str(
            r#"
            [controller]
            base_url = "http://controller.mesh:8080"
            token = "secret"

            [experiment]
            pattern = "test-"
            "#,
        )
        .unwrap();

        assert_eq!(parsed.controller.base_url, "http://controller.mesh:8080");
        assert_eq!(parsed.controller.token.as_deref(), Some("secret"));
        assert_eq!(parsed.experiment.pattern, "test-");
        // untouched sections keep their defaults
        assert_eq!(parsed.registry.base_url, "http://localhost:31300");
        assert_eq!(parsed.experiment.header, "X-Request-ID");
    }

    #[test]
    fn env_overrides_use_prefix_and_section_separator() {
        let mut vars = config::Map::new();
        vars.insert(
            "FAULTMESH_CONTROLLER__TOKEN".to_string(),
            "from-env".to_string(),
        );
        vars.insert(
            "FAULTMESH_EXPERIMENT__PATTERN".to_string(),
            "canary-".to_string(),
        );

        let config: FaultmeshConfig = config::Config::builder()
            .add_source(
                config::Environment::with_prefix("FAULTMESH")
                    .separator("__")
                    .source(Some(vars)),
            )
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.controller.token.as_deref(), Some("from-env"));
        assert_eq!(config.experiment.pattern, "canary-");
        assert_eq!(config.registry.base_url, "http://localhost:31300");
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("faultmesh.toml");
        std::fs::write(&path, "[registry]\nbase_url = \"http://registry.mesh\"\n").unwrap();

        let config = FaultmeshConfig::load(Some(&path)).unwrap();
        assert_eq!(config.registry.base_url, "http://registry.mesh");
        assert_eq!(config.controller.base_url, "http://localhost:31200");
    }
}
