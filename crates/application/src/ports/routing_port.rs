//! Routing policy store port
//!
//! Read/write access to per-service routing policy: a default version plus
//! an encoded selector list, keyed by service name.

use async_trait::async_trait;
use domain::RoutingPolicy;
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for the routing policy store
#[cfg_attr(test, automock)]
#[async_trait]
pub trait RoutingStorePort: Send + Sync {
    /// Read every stored routing policy entry
    async fn list_policies(&self) -> Result<Vec<RoutingPolicy>, ApplicationError>;

    /// Write (create or replace) a service's routing policy
    async fn set_policy(&self, policy: &RoutingPolicy) -> Result<(), ApplicationError>;

    /// Delete a service's routing policy
    async fn delete_policy(&self, service: &str) -> Result<(), ApplicationError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trait_is_object_safe_and_send_sync() {
        fn assert_send_sync<T: Send + Sync + ?Sized>() {}
        assert_send_sync::<dyn RoutingStorePort>();
    }
}
