//=========================================================================
// World Errors
//=========================================================================
//
// Host-model misuse reported by the World. These never originate from
// the singleton lifecycle itself, which recovers locally instead.
//
//=========================================================================

use super::ContainerId;

//=== WorldError ==========================================================

/// Errors returned by container and capability operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorldError {
    /// The container was never spawned or has been torn down.
    ContainerNotFound(ContainerId),

    /// The container already carries a capability of this type.
    CapabilityExists {
        container: ContainerId,
        type_name: &'static str,
    },
}

//--- Trait Implementations -----------------------------------------------

impl std::fmt::Display for WorldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ContainerNotFound(id) => write!(f, "Container not found: {}", id),
            Self::CapabilityExists { container, type_name } => {
                write!(f, "{} already carries a {} capability", container, type_name)
            }
        }
    }
}

impl std::error::Error for WorldError {}

//=========================================================================
// Tests
//=========================================================================
