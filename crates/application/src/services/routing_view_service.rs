//! Routing view builder
//!
//! Joins the service registry's instance data with the routing policy store
//! to produce a per-service view. The view is a pure function of the two
//! snapshots: rebuilt fresh on every query, nothing cached across calls.

use std::sync::Arc;

use domain::{
    RoutingPolicy, ServiceInstance, ServiceRoutingView, UNVERSIONED, VersionCount,
    VersionSelector, decode_selectors, encode_selectors,
};
use tracing::{debug, instrument};

use crate::error::ApplicationError;
use crate::ports::{RoutingStorePort, ServiceRegistryPort};

/// Build one service's routing view from its registry instances and optional
/// routing policy entry.
///
/// Instances lacking version metadata are counted under [`UNVERSIONED`]; a
/// service with no policy entry gets the sentinel default, no selectors, and
/// `is_active` computed against the sentinel.
pub fn build_view(
    name: &str,
    registry_href: String,
    instances: &[ServiceInstance],
    policy: Option<&RoutingPolicy>,
) -> Result<ServiceRoutingView, ApplicationError> {
    let mut versions: Vec<VersionCount> = Vec::new();
    for instance in instances {
        let version = instance.resolved_version();
        match versions.iter_mut().find(|count| count.name == version) {
            Some(count) => count.instances += 1,
            None => versions.push(VersionCount {
                name: version.to_string(),
                instances: 1,
            }),
        }
    }

    let (default_version, selectors) = match policy {
        Some(policy) => {
            let default_version = policy
                .default_version
                .clone()
                .unwrap_or_else(|| UNVERSIONED.to_string());
            let selectors = match policy.selectors.as_deref() {
                Some(encoded) => decode_selectors(encoded)?,
                None => Vec::new(),
            };
            (default_version, selectors)
        },
        None => (UNVERSIONED.to_string(), Vec::new()),
    };

    let is_active = instances
        .iter()
        .any(|instance| instance.resolved_version() == default_version);

    Ok(ServiceRoutingView {
        name: name.to_string(),
        registry_href,
        versions,
        default_version,
        selectors,
        is_active,
    })
}

/// Builds routing views and manages routing policy writes
pub struct RoutingViewService {
    registry: Arc<dyn ServiceRegistryPort>,
    routing: Arc<dyn RoutingStorePort>,
}

impl std::fmt::Debug for RoutingViewService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoutingViewService").finish_non_exhaustive()
    }
}

impl RoutingViewService {
    pub fn new(registry: Arc<dyn ServiceRegistryPort>, routing: Arc<dyn RoutingStorePort>) -> Self {
        Self { registry, routing }
    }

    /// Build the routing view for every service known to the registry
    #[instrument(skip(self))]
    pub async fn list_views(&self) -> Result<Vec<ServiceRoutingView>, ApplicationError> {
        let services = self.registry.list_services().await?;
        let policies = self.routing.list_policies().await?;
        debug!(services = services.len(), policies = policies.len(), "building routing views");

        let mut views = Vec::with_capacity(services.len());
        for service in &services {
            let instances = self.registry.service_instances(service).await?;
            let policy = policies.iter().find(|policy| &policy.service == service);
            let href = self.registry.service_href(service);
            views.push(build_view(service, href, &instances, policy)?);
        }
        Ok(views)
    }

    /// Set a service's routing policy from a default version and selectors.
    ///
    /// At least one of the two must be supplied.
    #[instrument(skip(self, selectors))]
    pub async fn set_routing(
        &self,
        service: &str,
        default_version: Option<String>,
        selectors: &[VersionSelector],
    ) -> Result<(), ApplicationError> {
        if default_version.is_none() && selectors.is_empty() {
            return Err(ApplicationError::precondition(
                "a default version or at least one selector is required",
            ));
        }
        let policy = RoutingPolicy {
            service: service.to_string(),
            default_version,
            selectors: if selectors.is_empty() {
                None
            } else {
                Some(encode_selectors(selectors))
            },
        };
        self.routing.set_policy(&policy).await
    }

    /// Delete a service's routing policy
    #[instrument(skip(self))]
    pub async fn delete_routing(&self, service: &str) -> Result<(), ApplicationError> {
        self.routing.delete_policy(service).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::{MockRoutingStorePort, MockServiceRegistryPort};
    use domain::InstanceMetadata;

    fn instances_v1_v1_unversioned() -> Vec<ServiceInstance> {
        vec![
            ServiceInstance::with_version("v1"),
            ServiceInstance::with_version("v1"),
            ServiceInstance {
                metadata: Some(InstanceMetadata { version: None }),
            },
        ]
    }

    #[test]
    fn counts_versions_and_computes_active() {
        let policy = RoutingPolicy {
            service: "reviews".to_string(),
            default_version: Some("v1".to_string()),
            selectors: None,
        };
        let view = build_view(
            "reviews",
            "http://registry/api/v1/services/reviews".to_string(),
            &instances_v1_v1_unversioned(),
            Some(&policy),
        )
        .unwrap();

        assert!(view.is_active);
        assert_eq!(
            view.versions,
            vec![
                VersionCount { name: "v1".to_string(), instances: 2 },
                VersionCount { name: UNVERSIONED.to_string(), instances: 1 },
            ]
        );
    }

    #[test]
    fn no_policy_entry_defaults_to_unversioned() {
        let view = build_view(
            "reviews",
            String::new(),
            &[ServiceInstance::with_version("v1")],
            None,
        )
        .unwrap();

        assert_eq!(view.default_version, UNVERSIONED);
        assert!(view.selectors.is_empty());
        // no instance reports UNVERSIONED, so the default is not live
        assert!(!view.is_active);
    }

    #[test]
    fn no_policy_active_when_instance_unversioned() {
        let view =
            build_view("reviews", String::new(), &[ServiceInstance::default()], None).unwrap();
        assert!(view.is_active);
    }

    #[test]
    fn policy_without_default_uses_sentinel() {
        let policy = RoutingPolicy {
            service: "reviews".to_string(),
            default_version: None,
            selectors: Some("{v2={user=alice}}".to_string()),
        };
        let view = build_view("reviews", String::new(), &[], Some(&policy)).unwrap();
        assert_eq!(view.default_version, UNVERSIONED);
        assert_eq!(view.selectors, vec![VersionSelector::new("v2", "user=alice")]);
        assert!(!view.is_active);
    }

    #[test]
    fn malformed_selectors_fail_the_build() {
        let policy = RoutingPolicy {
            service: "reviews".to_string(),
            default_version: Some("v1".to_string()),
            selectors: Some("{v2user=alice}".to_string()),
        };
        let err = build_view("reviews", String::new(), &[], Some(&policy)).unwrap_err();
        assert!(err.to_string().contains("malformed selector segment"));
    }

    #[tokio::test]
    async fn list_views_joins_both_snapshots() {
        let mut registry = MockServiceRegistryPort::new();
        registry
            .expect_list_services()
            .returning(|| Ok(vec!["reviews".to_string(), "ratings".to_string()]));
        registry
            .expect_service_instances()
            .returning(|service| {
                if service == "reviews" {
                    Ok(vec![ServiceInstance::with_version("v1")])
                } else {
                    Ok(vec![ServiceInstance::default()])
                }
            });
        registry
            .expect_service_href()
            .returning(|service| format!("http://registry/api/v1/services/{service}"));

        let mut routing = MockRoutingStorePort::new();
        routing.expect_list_policies().returning(|| {
            Ok(vec![RoutingPolicy {
                service: "reviews".to_string(),
                default_version: Some("v1".to_string()),
                selectors: None,
            }])
        });

        let service = RoutingViewService::new(Arc::new(registry), Arc::new(routing));
        let views = service.list_views().await.unwrap();

        assert_eq!(views.len(), 2);
        assert!(views[0].is_active);
        assert_eq!(views[0].registry_href, "http://registry/api/v1/services/reviews");
        assert_eq!(views[1].default_version, UNVERSIONED);
        assert!(views[1].is_active);
    }

    #[tokio::test]
    async fn set_routing_requires_default_or_selector() {
        let registry = MockServiceRegistryPort::new();
        let routing = MockRoutingStorePort::new();
        let service = RoutingViewService::new(Arc::new(registry), Arc::new(routing));

        let err = service.set_routing("reviews", None, &[]).await.unwrap_err();
        assert!(matches!(err, ApplicationError::Precondition(_)));
    }

    #[tokio::test]
    async fn set_routing_encodes_selectors() {
        let registry = MockServiceRegistryPort::new();
        let mut routing = MockRoutingStorePort::new();
        routing
            .expect_set_policy()
            .withf(|policy| {
                policy.service == "reviews"
                    && policy.default_version.as_deref() == Some("v1")
                    && policy.selectors.as_deref() == Some("{v2={user=alice}}")
            })
            .times(1)
            .returning(|_| Ok(()));

        let service = RoutingViewService::new(Arc::new(registry), Arc::new(routing));
        service
            .set_routing(
                "reviews",
                Some("v1".to_string()),
                &[VersionSelector::new("v2", "user=alice")],
            )
            .await
            .unwrap();
    }
}
