//=========================================================================
// Singleton Lifecycle
//=========================================================================
//
// Host-driven singleton capabilities.
//
// Architecture:
//   Singleton (trait, user types)
//     └─ hooks: on_created / on_first_activate / on_destroyed / on_duplicate
//
//   SingletonRegistry
//     └─ slots: HashMap<TypeId, Box<dyn LifecycleSlot>>
//          └─ Slot<T>: SingletonState { instance, flags }
//
// Flow:
//   Host::attach ──> on_attach ──> (register | duplicate policy) ──> on_created
//   Host::tick   ──> on_activate_first_frame ──> on_first_activate
//   teardown     ──> on_detach ──> on_destroyed (registered instance only)
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;

use log::{error, info, warn};

//=== Internal Dependencies ===============================================

use crate::core::diagnostics;
use crate::core::world::{ContainerId, InstanceId};

//=== Module Declarations =================================================

mod lifecycle;
mod registry;
mod slot;

//=== Public API ==========================================================

pub use lifecycle::{LifecycleFlags, LifecyclePhase, SingletonState};
pub use registry::SingletonRegistry;
pub(crate) use slot::{AttachOutcome, Dispatch};

//=== DuplicatePolicy =====================================================

/// Corrective action applied to a rejected duplicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    /// Remove only the duplicate capability. Other capabilities on its
    /// container stay intact.
    #[default]
    RemoveCapability,

    /// Tear down the duplicate's whole container, dispatching detach
    /// callbacks for everything it carries.
    DestroyContainer,
}

//=== LifecycleContext ====================================================

/// Information handed to every lifecycle hook.
///
/// `log`, `warn` and `error` emit `[frame][TYPENAME] message` lines when
/// tracing is enabled for the instance (`Singleton::print_trace`) or for
/// the whole host (`HostBuilder::with_trace`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LifecycleContext {
    /// Full type name of the singleton.
    pub type_name: &'static str,

    /// The instance the hook runs on.
    pub instance: InstanceId,

    /// Container carrying the instance.
    pub container: ContainerId,

    pub container_name: String,

    /// Host frame counter at dispatch time.
    pub frame: u64,

    pub(crate) trace: bool,
    pub(crate) rich_text: bool,
}

impl LifecycleContext {
    /// True when the trace helpers below produce output.
    pub fn trace_enabled(&self) -> bool {
        self.trace
    }

    /// The formatted line, whether or not tracing is enabled.
    pub fn format_line(&self, message: impl fmt::Display) -> String {
        diagnostics::format_line(self.rich_text, self.frame, self.type_name, format_args!("{}", message))
    }

    pub fn log(&self, message: impl fmt::Display) {
        if self.trace {
            info!("{}", self.format_line(message));
        }
    }

    pub fn warn(&self, message: impl fmt::Display) {
        if self.trace {
            warn!("{}", self.format_line(message));
        }
    }

    pub fn error(&self, message: impl fmt::Display) {
        if self.trace {
            error!("{}", self.format_line(message));
        }
    }
}

//=== Singleton Trait =====================================================

/// A capability of which at most one logical instance is live per host.
///
/// Every hook has an empty default. `Default` is used when the host has
/// to construct the instance lazily.
///
/// ```rust
/// use lifecycle_singleton::prelude::*;
///
/// #[derive(Default)]
/// struct AudioService {
///     channels: u32,
/// }
///
/// impl Singleton for AudioService {
///     fn on_created(&mut self, _cx: &LifecycleContext) {
///         self.channels = 32;
///     }
/// }
/// ```
pub trait Singleton: Default + Send + 'static {
    /// Runs once per host lifetime, when the first instance is attached.
    fn on_created(&mut self, _cx: &LifecycleContext) {}

    /// Runs once, on the first tick after the registered instance attached.
    fn on_first_activate(&mut self, _cx: &LifecycleContext) {}

    /// Runs once, when the registered instance is torn down.
    fn on_destroyed(&mut self, _cx: &LifecycleContext) {}

    /// Runs on a rejected duplicate instance.
    ///
    /// The returned policy is applied by the host after the hook returns.
    fn on_duplicate(&mut self, _cx: &LifecycleContext) -> DuplicatePolicy {
        DuplicatePolicy::RemoveCapability
    }

    /// Enables the frame-tagged trace lines for this instance.
    fn print_trace(&self) -> bool {
        false
    }
}

//=== Helpers =============================================================

/// Last path segment of a type name, without generic arguments.
///
/// `app::audio::Mixer<f32>` becomes `Mixer`.
pub fn short_type_name(full: &str) -> &str {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

//=========================================================================
// Tests
//=========================================================================
