//! Domain entities

mod experiment;
mod fault_rule;
mod recipe;
mod routing_view;

pub use experiment::{ExperimentReport, ExperimentState, ExperimentWindow};
pub use fault_rule::{FaultInjectionRule, FaultRuleRequest, MATCH_ALL};
pub use recipe::{
    Assertion, AssertionOutcome, AssertionResult, Checklist, FailureScenario, RecipeSpec,
};
pub use routing_view::{
    InstanceMetadata, RoutingPolicy, ServiceInstance, ServiceRoutingView, VersionCount,
};
