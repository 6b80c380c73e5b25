//! Service version sentinel

/// Version assigned to instances and services that carry no version metadata.
///
/// A service with no routing policy routes to this sentinel by default, and
/// registry instances without a `metadata.version` field are counted under it.
pub const UNVERSIONED: &str = "UNVERSIONED";
