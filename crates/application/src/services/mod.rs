//! Application services

mod fault_rule_service;
mod recipe_orchestrator;
mod routing_view_service;

pub use fault_rule_service::FaultRuleService;
pub use recipe_orchestrator::{OrchestratorConfig, RecipeOrchestrator};
pub use routing_view_service::{RoutingViewService, build_view};
