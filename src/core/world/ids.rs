//=========================================================================
// World Identifiers
//=========================================================================

use std::fmt;

//=== ContainerId =========================================================

/// Identity of a container object in the [`World`](super::World).
///
/// Ids are allocated monotonically and never reused, so a stale id
/// simply stops resolving once its container is torn down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContainerId(pub(crate) u64);

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "container#{}", self.0)
    }
}

//=== InstanceId ==========================================================

/// Identity of one attached capability.
///
/// Two capabilities of the same type holding equal values are still
/// different instances. Duplicate detection compares these ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstanceId(pub(crate) u64);

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "instance#{}", self.0)
    }
}
