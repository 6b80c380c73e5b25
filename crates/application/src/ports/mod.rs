//! Port definitions for application layer
//!
//! Ports are interfaces that define how the application interacts with
//! external systems. Adapters in the infrastructure layer implement these
//! ports against the control plane, the service registry and the log store.

mod assertion_port;
mod convergence;
mod fault_rule_port;
mod failure_port;
mod load_port;
mod registry_port;
mod routing_port;

pub use assertion_port::AssertionCheckerPort;
#[cfg(test)]
pub use assertion_port::MockAssertionCheckerPort;
pub use convergence::{FixedDelayConvergence, LogConvergencePolicy};
#[cfg(test)]
pub use convergence::MockLogConvergencePolicy;
pub use fault_rule_port::FaultRuleStorePort;
#[cfg(test)]
pub use fault_rule_port::MockFaultRuleStorePort;
pub use failure_port::FailureGeneratorPort;
#[cfg(test)]
pub use failure_port::MockFailureGeneratorPort;
pub use load_port::{LoadScriptPort, LoadSignalPort};
#[cfg(test)]
pub use load_port::{MockLoadScriptPort, MockLoadSignalPort};
pub use registry_port::ServiceRegistryPort;
#[cfg(test)]
pub use registry_port::MockServiceRegistryPort;
pub use routing_port::RoutingStorePort;
#[cfg(test)]
pub use routing_port::MockRoutingStorePort;
