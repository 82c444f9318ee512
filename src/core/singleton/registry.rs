//=========================================================================
// Singleton Registry
//=========================================================================
//
// Per-type lifecycle state, keyed by TypeId.
//
// Architecture:
//   Host ──track<T>()──────────────────> slots[TypeId::of::<T>()]
//   Host ──erased_mut(type_id).detach()─> slots[type_id]
//
// Entries are created on first use and live as long as the registry.
// A fresh registry (fresh Host) is the only way to reset a type.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::any::TypeId;
use std::collections::HashMap;

//=== Internal Dependencies ===============================================

use super::slot::{Dispatch, LifecycleSlot, Slot};
use super::{LifecyclePhase, Singleton, SingletonState};
use crate::core::scene::SceneKey;
use crate::core::world::InstanceId;

//=========================================================================

/// Registry of singleton lifecycle state for one host.
pub struct SingletonRegistry<S: SceneKey> {
    slots: HashMap<TypeId, Box<dyn LifecycleSlot<S>>>,
}

impl<S: SceneKey> SingletonRegistry<S> {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            slots: HashMap::new(),
        }
    }

    //--- Query API --------------------------------------------------------

    /// Snapshot of the entry for `T`. Untracked types report the default state.
    pub fn state<T: Singleton>(&self) -> SingletonState {
        self.slots
            .get(&TypeId::of::<T>())
            .map(|slot| *slot.state())
            .unwrap_or_default()
    }

    pub fn phase<T: Singleton>(&self) -> LifecyclePhase {
        self.state::<T>().phase()
    }

    /// The registered instance of `T`, if any.
    pub fn registered<T: Singleton>(&self) -> Option<InstanceId> {
        self.state::<T>().instance()
    }

    pub fn is_awakened<T: Singleton>(&self) -> bool {
        self.state::<T>().flags().is_awakened()
    }

    pub fn is_started<T: Singleton>(&self) -> bool {
        self.state::<T>().flags().is_started()
    }

    pub fn is_destroyed<T: Singleton>(&self) -> bool {
        self.state::<T>().flags().is_destroyed()
    }

    /// Returns true if `T` has an entry.
    pub fn is_tracked<T: Singleton>(&self) -> bool {
        self.slots.contains_key(&TypeId::of::<T>())
    }

    /// Number of tracked singleton types.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Type names of every tracked singleton, sorted.
    pub fn type_names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.slots.values().map(|slot| slot.type_name()).collect();
        names.sort_unstable();
        names
    }

    //--- Lifecycle Dispatch (host only) -----------------------------------

    /// Entry for `T`, created on first use.
    pub(crate) fn track<T: Singleton>(&mut self) -> &mut (dyn LifecycleSlot<S> + 'static) {
        let slot = self
            .slots
            .entry(TypeId::of::<T>())
            .or_insert_with(|| Box::new(Slot::<T>::new()));
        &mut **slot
    }

    /// Entry for an erased type, if it is a tracked singleton.
    pub(crate) fn erased_mut(
        &mut self,
        type_id: TypeId,
    ) -> Option<&mut (dyn LifecycleSlot<S> + 'static)> {
        self.slots.get_mut(&type_id).map(|slot| &mut **slot)
    }

    pub(crate) fn on_activate_first_frame<T: Singleton>(
        &mut self,
        dispatch: &mut Dispatch<'_, S>,
        instance: InstanceId,
    ) -> bool {
        self.track::<T>().activate_first_frame(dispatch, instance)
    }

    pub(crate) fn on_detach<T: Singleton>(
        &mut self,
        dispatch: &mut Dispatch<'_, S>,
        instance: InstanceId,
    ) -> bool {
        self.track::<T>().detach(dispatch, instance)
    }
}

impl<S: SceneKey> Default for SingletonRegistry<S> {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Tests
//=========================================================================
