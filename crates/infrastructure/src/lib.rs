//! Infrastructure layer - Adapters and external integrations
//!
//! Implements the application ports against the mesh control plane, the
//! service registry and the log store, plus configuration loading, the load
//! phase (script runner and completion signals) and telemetry setup.

pub mod adapters;
pub mod config;
pub mod http;
pub mod load;
pub mod telemetry;

pub use adapters::{LogStoreAssertionChecker, ScenarioFailureGenerator};
pub use config::{
    ControllerConfig, ExperimentConfig, FaultmeshConfig, RegistryConfig,
};
pub use http::{ClientError, ControllerClient, RegistryClient};
pub use load::{ConsoleSignal, ShellScriptRunner, TimeoutSignal};
pub use telemetry::init_telemetry;
