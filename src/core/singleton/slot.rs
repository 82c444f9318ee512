//=========================================================================
// Lifecycle Slot
//=========================================================================
//
// Type-erased per-singleton state machine.
//
// The registry stores one `Slot<T>` per singleton type behind the
// `LifecycleSlot` trait, so teardown and first-frame dispatch can run
// from a `TypeId` without knowing `T` at compile time.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::marker::PhantomData;

//=== Internal Dependencies ===============================================

use super::{DuplicatePolicy, LifecycleContext, Singleton, SingletonState};
use crate::core::diagnostics::{Diagnostics, LifecycleEvent};
use crate::core::scene::SceneKey;
use crate::core::world::{InstanceId, World};

//=== Dispatch ============================================================

/// Host state borrowed for the duration of one lifecycle callback.
pub(crate) struct Dispatch<'a, S: SceneKey> {
    pub world: &'a mut World<S>,
    pub diagnostics: &'a mut Diagnostics,
    pub frame: u64,
}

impl<S: SceneKey> Dispatch<'_, S> {
    /// Builds the hook context for a live instance of `T`.
    fn context<T: Singleton>(&self, instance: InstanceId) -> Option<LifecycleContext> {
        let container = self.world.locate(instance)?;
        let value = self.world.get::<T>(instance)?;
        Some(LifecycleContext {
            type_name: std::any::type_name::<T>(),
            instance,
            container,
            container_name: self.world.name(container)?.to_string(),
            frame: self.frame,
            trace: value.print_trace() || self.diagnostics.trace_all(),
            rich_text: self.diagnostics.rich_text(),
        })
    }
}

//=== AttachOutcome =======================================================

/// Result of dispatching the attach callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AttachOutcome {
    /// The instance is the registered one and awaits its first frame.
    Registered,

    /// The instance was refused; the host must apply the policy.
    Rejected(DuplicatePolicy),

    /// The instance is not in the world.
    Missing,
}

//=== LifecycleSlot Trait =================================================

/// Object-safe view of a `Slot<T>`.
pub(crate) trait LifecycleSlot<S: SceneKey>: Send {
    fn state(&self) -> &SingletonState;

    fn type_name(&self) -> &'static str;

    fn attach(&mut self, dispatch: &mut Dispatch<'_, S>, instance: InstanceId) -> AttachOutcome;

    fn activate_first_frame(&mut self, dispatch: &mut Dispatch<'_, S>, instance: InstanceId) -> bool;

    fn detach(&mut self, dispatch: &mut Dispatch<'_, S>, instance: InstanceId) -> bool;
}

//=== Slot ================================================================

/// Registry entry and callback logic for singleton type `T`.
pub(crate) struct Slot<T: Singleton> {
    state: SingletonState,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Singleton> Slot<T> {
    pub(crate) fn new() -> Self {
        Self {
            state: SingletonState::default(),
            _marker: PhantomData,
        }
    }
}

impl<T: Singleton, S: SceneKey> LifecycleSlot<S> for Slot<T> {
    fn state(&self) -> &SingletonState {
        &self.state
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }

    //--- attach -----------------------------------------------------------
    //
    // 1. Destroyed type or foreign registered instance → reject.
    // 2. No registered instance → register and mark persistent.
    // 3. First attach ever → on_created, then latch Awakened.
    //
    fn attach(&mut self, dispatch: &mut Dispatch<'_, S>, instance: InstanceId) -> AttachOutcome {
        let type_name = std::any::type_name::<T>();
        let Some(cx) = dispatch.context::<T>(instance) else {
            return AttachOutcome::Missing;
        };

        let destroyed = self.state.flags.is_destroyed();
        let foreign = self.state.instance.is_some_and(|current| current != instance);

        if destroyed || foreign {
            if destroyed {
                dispatch.diagnostics.warn(
                    cx.frame,
                    type_name,
                    format_args!(
                        "Rejected an instance of the destroyed Singleton with type {} in the container {}",
                        type_name, cx.container_name
                    ),
                );
            } else {
                dispatch.diagnostics.warn(
                    cx.frame,
                    type_name,
                    format_args!(
                        "Found a duplicated instance of a Singleton with type {} in the container {}",
                        type_name, cx.container_name
                    ),
                );
            }

            let policy = dispatch
                .world
                .get_mut::<T>(instance)
                .map(|duplicate| duplicate.on_duplicate(&cx))
                .unwrap_or_default();
            dispatch.world.mark_attached(instance);

            dispatch.diagnostics.publish(LifecycleEvent::DuplicateRejected {
                type_name,
                instance,
                registered: self.state.instance,
                policy,
                frame: cx.frame,
            });

            return AttachOutcome::Rejected(policy);
        }

        if self.state.instance.is_none() {
            self.state.instance = Some(instance);
            dispatch.world.mark_persistent(cx.container);
        }
        dispatch.world.mark_attached(instance);

        if !self.state.flags.is_awakened() {
            if let Some(value) = dispatch.world.get_mut::<T>(instance) {
                dispatch.diagnostics.trace(
                    value.print_trace(),
                    cx.frame,
                    type_name,
                    format_args!(
                        "Awake() Singleton with type {} in the container {}",
                        type_name, cx.container_name
                    ),
                );
                value.on_created(&cx);
            }
            self.state.flags.latch_awakened();

            dispatch.diagnostics.publish(LifecycleEvent::Created {
                type_name,
                instance,
                frame: cx.frame,
            });
        }

        AttachOutcome::Registered
    }

    //--- activate_first_frame ---------------------------------------------

    fn activate_first_frame(&mut self, dispatch: &mut Dispatch<'_, S>, instance: InstanceId) -> bool {
        let flags = self.state.flags;
        if flags.is_started() || flags.is_destroyed() || !flags.is_awakened() {
            return false;
        }

        let type_name = std::any::type_name::<T>();
        let Some(cx) = dispatch.context::<T>(instance) else {
            return false;
        };
        let Some(value) = dispatch.world.get_mut::<T>(instance) else {
            return false;
        };

        dispatch.diagnostics.trace(
            value.print_trace(),
            cx.frame,
            type_name,
            format_args!(
                "Start() Singleton with type {} in the container {}",
                type_name, cx.container_name
            ),
        );
        value.on_first_activate(&cx);
        self.state.flags.latch_started();

        dispatch.diagnostics.publish(LifecycleEvent::Activated {
            type_name,
            instance,
            frame: cx.frame,
        });

        true
    }

    //--- detach -----------------------------------------------------------
    //
    // Only the registered instance shuts the singleton down. Duplicates
    // were already handled at attach time.
    //
    fn detach(&mut self, dispatch: &mut Dispatch<'_, S>, instance: InstanceId) -> bool {
        if self.state.instance != Some(instance) {
            return false;
        }

        // Latched before the hook so lookups made during teardown cannot
        // construct a replacement.
        self.state.flags.latch_destroyed();
        self.state.instance = None;

        let type_name = std::any::type_name::<T>();
        if let Some(cx) = dispatch.context::<T>(instance) {
            if let Some(value) = dispatch.world.get_mut::<T>(instance) {
                dispatch.diagnostics.trace(
                    value.print_trace(),
                    cx.frame,
                    type_name,
                    format_args!(
                        "Destroy() Singleton with type {} in the container {}",
                        type_name, cx.container_name
                    ),
                );
                value.on_destroyed(&cx);
            }
        }

        dispatch.diagnostics.publish(LifecycleEvent::Destroyed {
            type_name,
            instance,
            frame: dispatch.frame,
        });

        true
    }
}

//=========================================================================
// Tests
//=========================================================================
