//! Application layer - Use cases and orchestration
//!
//! Contains the routing-view builder, the fault-rule service and the chaos
//! recipe orchestrator, plus the port definitions they drive. Ports are
//! implemented by adapters in the infrastructure layer.

pub mod error;
pub mod ports;
pub mod services;

pub use error::ApplicationError;
pub use ports::*;
pub use services::*;
