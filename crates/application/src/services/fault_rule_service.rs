//! Fault rule service
//!
//! Validates rule requests and manages the installed rule set through the
//! rule store port. The store API is batch-shaped, so a single rule still
//! goes up as a one-element batch.

use std::sync::Arc;

use domain::{FaultInjectionRule, FaultRuleRequest};
use tracing::{info, instrument};

use crate::error::ApplicationError;
use crate::ports::FaultRuleStorePort;

/// Service for fault-injection rule management
pub struct FaultRuleService {
    store: Arc<dyn FaultRuleStorePort>,
}

impl std::fmt::Debug for FaultRuleService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FaultRuleService").finish_non_exhaustive()
    }
}

impl FaultRuleService {
    pub fn new(store: Arc<dyn FaultRuleStorePort>) -> Self {
        Self { store }
    }

    /// Validate a rule request and submit it, returning the assigned ids.
    ///
    /// A rule satisfying neither effect pair is rejected before reaching the
    /// network.
    #[instrument(skip(self, request))]
    pub async fn submit(&self, request: FaultRuleRequest) -> Result<Vec<String>, ApplicationError> {
        let rule = request.validate()?;
        info!(source = %rule.source, destination = %rule.destination, "submitting fault rule");
        self.store.create_rules(std::slice::from_ref(&rule)).await
    }

    /// List all installed rules
    pub async fn list(&self) -> Result<Vec<FaultInjectionRule>, ApplicationError> {
        self.store.list_rules().await
    }

    /// Delete one rule by id
    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<(), ApplicationError> {
        self.store.delete_rule(id).await
    }

    /// Clear all installed rules
    #[instrument(skip(self))]
    pub async fn clear(&self) -> Result<(), ApplicationError> {
        self.store.clear_rules().await
    }
}
