//! Fault rule store port
//!
//! The store API is batch-shaped: create accepts a list of rules per request
//! even when callers submit one at a time, and returns the assigned ids.

use async_trait::async_trait;
use domain::FaultInjectionRule;
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for the fault-injection rule store
#[cfg_attr(test, automock)]
#[async_trait]
pub trait FaultRuleStorePort: Send + Sync {
    /// Batch-create rules, returning the ids assigned by the store
    async fn create_rules(
        &self,
        rules: &[FaultInjectionRule],
    ) -> Result<Vec<String>, ApplicationError>;

    /// List all installed rules
    async fn list_rules(&self) -> Result<Vec<FaultInjectionRule>, ApplicationError>;

    /// Delete one rule by its assigned id
    async fn delete_rule(&self, id: &str) -> Result<(), ApplicationError>;

    /// Delete every installed rule
    async fn clear_rules(&self) -> Result<(), ApplicationError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trait_is_object_safe_and_send_sync() {
        fn assert_send_sync<T: Send + Sync + ?Sized>() {}
        assert_send_sync::<dyn FaultRuleStorePort>();
    }
}
