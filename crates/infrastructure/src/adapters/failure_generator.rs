//! Scenario-driven failure generator
//!
//! Translates failure scenarios into fault-injection rules and installs them
//! through the rule store in one batch. Scenarios are checked against the
//! topology's service list before anything reaches the network.

use std::sync::Arc;

use application::{ApplicationError, FailureGeneratorPort, FaultRuleStorePort};
use async_trait::async_trait;
use domain::{FailureScenario, FaultInjectionRule, FaultRuleRequest};
use tracing::{info, instrument};

/// Installs fault rules derived from failure scenarios
pub struct ScenarioFailureGenerator {
    store: Arc<dyn FaultRuleStorePort>,
}

impl std::fmt::Debug for ScenarioFailureGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScenarioFailureGenerator").finish_non_exhaustive()
    }
}

impl ScenarioFailureGenerator {
    pub fn new(store: Arc<dyn FaultRuleStorePort>) -> Self {
        Self { store }
    }

    fn rule_for(
        scenario: &FailureScenario,
        header: &str,
        pattern: &str,
    ) -> Result<FaultInjectionRule, ApplicationError> {
        let request = FaultRuleRequest {
            source: Some(scenario.source.clone()),
            destination: Some(scenario.destination.clone()),
            header: Some(header.to_string()),
            header_pattern: None,
            delay: scenario.delay,
            delay_probability: scenario.delay_probability,
            abort_probability: scenario.abort_probability,
            abort_code: scenario.abort_code,
        };
        let mut rule = request.validate()?;
        // the orchestrator hands over a pre-scoped pattern; use it verbatim
        rule.header_pattern = pattern.to_string();
        Ok(rule)
    }
}

/// Service names from the topology, when it carries a `services` list.
///
/// Entries may be plain names or objects with a `name` field.
fn topology_services(topology: &serde_json::Value) -> Option<Vec<String>> {
    let services = topology.get("services")?.as_array()?;
    Some(
        services
            .iter()
            .filter_map(|entry| {
                entry
                    .as_str()
                    .or_else(|| entry.get("name").and_then(|name| name.as_str()))
                    .map(str::to_string)
            })
            .collect(),
    )
}

#[async_trait]
impl FailureGeneratorPort for ScenarioFailureGenerator {
    #[instrument(skip(self, topology, scenarios), fields(scenarios = scenarios.len()))]
    async fn install_failures(
        &self,
        topology: &serde_json::Value,
        scenarios: &[FailureScenario],
        header: &str,
        pattern: &str,
    ) -> Result<(), ApplicationError> {
        let known = topology_services(topology);
        let mut rules = Vec::with_capacity(scenarios.len());
        for scenario in scenarios {
            if let Some(known) = &known {
                for endpoint in [&scenario.source, &scenario.destination] {
                    if !known.contains(endpoint) {
                        return Err(ApplicationError::precondition(format!(
                            "scenario '{}' references a service not in the topology: {endpoint}",
                            scenario.scenario
                        )));
                    }
                }
            }
            rules.push(Self::rule_for(scenario, header, pattern)?);
        }

        let ids = self.store.create_rules(&rules).await?;
        info!(installed = ids.len(), "failure scenarios installed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Records batches instead of talking to a controller
    #[derive(Default)]
    struct RecordingStore {
        batches: Mutex<Vec<Vec<FaultInjectionRule>>>,
    }

    #[async_trait]
    impl FaultRuleStorePort for RecordingStore {
        async fn create_rules(
            &self,
            rules: &[FaultInjectionRule],
        ) -> Result<Vec<String>, ApplicationError> {
            let ids = (0..rules.len()).map(|i| format!("r-{i}")).collect();
            self.batches
                .lock()
                .map_err(|_| ApplicationError::Internal("poisoned".to_string()))?
                .push(rules.to_vec());
            Ok(ids)
        }

        async fn list_rules(&self) -> Result<Vec<FaultInjectionRule>, ApplicationError> {
            Ok(Vec::new())
        }

        async fn delete_rule(&self, _id: &str) -> Result<(), ApplicationError> {
            Ok(())
        }

        async fn clear_rules(&self) -> Result<(), ApplicationError> {
            Ok(())
        }
    }

    fn delay_scenario(source: &str, destination: &str) -> FailureScenario {
        FailureScenario {
            scenario: "delay_requests".to_string(),
            source: source.to_string(),
            destination: destination.to_string(),
            delay: 2.0,
            delay_probability: 1.0,
            abort_probability: 0.0,
            abort_code: None,
        }
    }

    #[tokio::test]
    async fn installs_one_batch_with_scoped_pattern() {
        let store = Arc::new(RecordingStore::default());
        let generator = ScenarioFailureGenerator::new(store.clone());
        let topology = serde_json::json!({"services": ["gateway", "reviews"]});

        generator
            .install_failures(
                &topology,
                &[delay_scenario("gateway", "reviews")],
                "X-Request-ID",
                ".*?test-7",
            )
            .await
            .unwrap();

        let batches = store.batches.lock().unwrap();
        assert_eq!(batches.len(), 1);
        let rule = &batches[0][0];
        assert_eq!(rule.source, "gateway");
        assert_eq!(rule.header, "X-Request-ID");
        assert_eq!(rule.header_pattern, ".*?test-7");
        assert!((rule.delay - 2.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn rejects_scenario_outside_topology() {
        let store = Arc::new(RecordingStore::default());
        let generator = ScenarioFailureGenerator::new(store.clone());
        let topology = serde_json::json!({"services": ["gateway"]});

        let err = generator
            .install_failures(
                &topology,
                &[delay_scenario("gateway", "reviews")],
                "X-Request-ID",
                ".*",
            )
            .await
            .unwrap_err();

        assert!(matches!(err, ApplicationError::Precondition(_)));
        assert!(err.to_string().contains("reviews"));
        assert!(store.batches.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn topology_without_service_list_is_not_checked() {
        let store = Arc::new(RecordingStore::default());
        let generator = ScenarioFailureGenerator::new(store.clone());
        let topology = serde_json::json!({"edges": [["gateway", "reviews"]]});

        generator
            .install_failures(
                &topology,
                &[delay_scenario("gateway", "reviews")],
                "X-Request-ID",
                ".*",
            )
            .await
            .unwrap();
        assert_eq!(store.batches.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn effectless_scenario_is_rejected_before_the_store() {
        let store = Arc::new(RecordingStore::default());
        let generator = ScenarioFailureGenerator::new(store.clone());
        let scenario = FailureScenario {
            delay: 0.0,
            delay_probability: 0.0,
            ..delay_scenario("gateway", "reviews")
        };

        let err = generator
            .install_failures(&serde_json::json!({}), &[scenario], "X-Request-ID", ".*")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("no effect specified"));
        assert!(store.batches.lock().unwrap().is_empty());
    }

    #[test]
    fn topology_services_accepts_objects() {
        let topology = serde_json::json!({"services": [{"name": "gateway"}, "reviews"]});
        assert_eq!(
            topology_services(&topology),
            Some(vec!["gateway".to_string(), "reviews".to_string()])
        );
    }
}
