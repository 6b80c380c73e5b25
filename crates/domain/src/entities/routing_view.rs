//! Service routing view and its input snapshots
//!
//! The view joins two independent external snapshots: registry instance data
//! and routing policy. It is rebuilt fresh on every query and never persisted.

use serde::{Deserialize, Serialize};

use crate::value_objects::{UNVERSIONED, VersionSelector};

/// Instance metadata as reported by the service registry
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InstanceMetadata {
    /// Version label, absent for unversioned deployments
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// A registered service instance
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceInstance {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<InstanceMetadata>,
}

impl ServiceInstance {
    /// Version this instance reports, or the [`UNVERSIONED`] sentinel
    pub fn resolved_version(&self) -> &str {
        self.metadata
            .as_ref()
            .and_then(|m| m.version.as_deref())
            .unwrap_or(UNVERSIONED)
    }

    /// Instance reporting the given version
    pub fn with_version(version: impl Into<String>) -> Self {
        Self {
            metadata: Some(InstanceMetadata {
                version: Some(version.into()),
            }),
        }
    }
}

/// Routing policy entry for one service, as stored by the policy store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingPolicy {
    pub service: String,
    /// Default version, absent meaning unversioned
    #[serde(default, rename = "default", skip_serializing_if = "Option::is_none")]
    pub default_version: Option<String>,
    /// Encoded selector list, see the selector codec
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selectors: Option<String>,
}

/// Instance count for one version of a service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionCount {
    pub name: String,
    pub instances: usize,
}

/// Per-service routing view joining registry and policy data.
///
/// `is_active` is true iff at least one registered instance reports a version
/// equal to the resolved default version.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceRoutingView {
    pub name: String,
    pub registry_href: String,
    pub versions: Vec<VersionCount>,
    pub default_version: String,
    pub selectors: Vec<VersionSelector>,
    pub is_active: bool,
}
