//! Service registry port
//!
//! Read-only view of the mesh's service registry: service names and their
//! registered instances, each optionally carrying version metadata.

use async_trait::async_trait;
use domain::ServiceInstance;
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for service registry queries
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ServiceRegistryPort: Send + Sync {
    /// List all service names known to the registry
    async fn list_services(&self) -> Result<Vec<String>, ApplicationError>;

    /// List the registered instances of a service
    async fn service_instances(
        &self,
        service: &str,
    ) -> Result<Vec<ServiceInstance>, ApplicationError>;

    /// Registry URL for a service's instance listing
    fn service_href(&self, service: &str) -> String;
}
