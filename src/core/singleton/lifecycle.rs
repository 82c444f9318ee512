//=========================================================================
// Lifecycle State
//=========================================================================
//
// Per-type latches and the registered reference.
//
// State machine:
//   Uninitialized ──attach──> Awakened ──first tick──> Started
//                                │                       │
//                                └──────detach───────────┴──> Destroyed
//
// Every latch moves false → true once and never resets.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::world::InstanceId;

//=== LifecyclePhase ======================================================

/// Coarse lifecycle phase of a singleton type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LifecyclePhase {
    /// No instance has been attached yet.
    Uninitialized,

    /// The on-create hook has run.
    Awakened,

    /// The on-first-activate hook has run.
    Started,

    /// The registered instance was torn down. Terminal.
    Destroyed,
}

//=== LifecycleFlags ======================================================

/// The three one-way latches tracked for each singleton type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LifecycleFlags {
    awakened: bool,
    started: bool,
    destroyed: bool,
}

impl LifecycleFlags {
    pub fn is_awakened(&self) -> bool {
        self.awakened
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Latches `awakened`. Returns true on the first call only.
    pub(crate) fn latch_awakened(&mut self) -> bool {
        !std::mem::replace(&mut self.awakened, true)
    }

    /// Latches `started`. Refused until `awakened` is set.
    pub(crate) fn latch_started(&mut self) -> bool {
        if !self.awakened {
            return false;
        }
        !std::mem::replace(&mut self.started, true)
    }

    /// Latches `destroyed`. Returns true on the first call only.
    pub(crate) fn latch_destroyed(&mut self) -> bool {
        !std::mem::replace(&mut self.destroyed, true)
    }

    /// Most advanced phase reached.
    pub fn phase(&self) -> LifecyclePhase {
        if self.destroyed {
            LifecyclePhase::Destroyed
        } else if self.started {
            LifecyclePhase::Started
        } else if self.awakened {
            LifecyclePhase::Awakened
        } else {
            LifecyclePhase::Uninitialized
        }
    }
}

//=== SingletonState ======================================================

/// Registry entry for one singleton type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SingletonState {
    pub(crate) instance: Option<InstanceId>,
    pub(crate) flags: LifecycleFlags,
}

impl SingletonState {
    /// The registered instance, if any.
    ///
    /// Always `None` once the type is destroyed.
    pub fn instance(&self) -> Option<InstanceId> {
        self.instance
    }

    pub fn flags(&self) -> LifecycleFlags {
        self.flags
    }

    pub fn phase(&self) -> LifecyclePhase {
        self.flags.phase()
    }
}

//=========================================================================
// Tests
//=========================================================================
