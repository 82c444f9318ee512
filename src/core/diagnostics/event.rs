//=========================================================================
// Lifecycle Events
//=========================================================================

use std::fmt;

use crate::core::singleton::DuplicatePolicy;
use crate::core::world::{ContainerId, InstanceId};

//=== LifecycleEvent ======================================================

/// Notifications published to [`crate::Host::subscribe`] receivers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleEvent {
    /// The on-create hook ran.
    Created {
        type_name: &'static str,
        instance: InstanceId,
        frame: u64,
    },

    /// The on-first-activate hook ran.
    Activated {
        type_name: &'static str,
        instance: InstanceId,
        frame: u64,
    },

    /// The registered instance was torn down.
    Destroyed {
        type_name: &'static str,
        instance: InstanceId,
        frame: u64,
    },

    /// An attach was refused, either because another instance is
    /// registered or because the type was already destroyed.
    DuplicateRejected {
        type_name: &'static str,
        instance: InstanceId,
        registered: Option<InstanceId>,
        policy: DuplicatePolicy,
        frame: u64,
    },

    /// A lookup found nothing and built a fresh container.
    LazilyConstructed {
        type_name: &'static str,
        container: ContainerId,
        frame: u64,
    },
}

impl LifecycleEvent {
    /// Full type name of the singleton the event concerns.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Created { type_name, .. }
            | Self::Activated { type_name, .. }
            | Self::Destroyed { type_name, .. }
            | Self::DuplicateRejected { type_name, .. }
            | Self::LazilyConstructed { type_name, .. } => type_name,
        }
    }
}

impl fmt::Display for LifecycleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created { type_name, instance, frame } => {
                write!(f, "created {{ type_name: {}, {}, frame: {} }}", type_name, instance, frame)
            }
            Self::Activated { type_name, instance, frame } => {
                write!(f, "activated {{ type_name: {}, {}, frame: {} }}", type_name, instance, frame)
            }
            Self::Destroyed { type_name, instance, frame } => {
                write!(f, "destroyed {{ type_name: {}, {}, frame: {} }}", type_name, instance, frame)
            }
            Self::DuplicateRejected { type_name, instance, policy, frame, .. } => {
                write!(
                    f,
                    "duplicate {{ type_name: {}, {}, policy: {:?}, frame: {} }}",
                    type_name, instance, policy, frame
                )
            }
            Self::LazilyConstructed { type_name, container, frame } => {
                write!(f, "lazy {{ type_name: {}, {}, frame: {} }}", type_name, container, frame)
            }
        }
    }
}
