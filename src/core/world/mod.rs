//=========================================================================
// World
//=========================================================================
//
// In-process object graph owned by the host.
//
// Architecture:
//   World
//     ├─ containers: BTreeMap<ContainerId, Container>
//     │     └─ capabilities: Vec<CapabilityRecord> (attach order)
//     ├─ instances: HashMap<InstanceId, ContainerId> (reverse index)
//     └─ loaded_scenes: Vec<S> (last = active)
//
// The World owns every capability value. Lifecycle logic lives in the
// singleton registry; the World only answers structural queries and
// performs the raw mutations the host asks for.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::any::{Any, TypeId};
use std::collections::{BTreeMap, HashMap};

//=== Internal Dependencies ===============================================

use crate::core::scene::SceneKey;

//=== Module Declarations =================================================

mod error;
mod ids;

//=== Public API ==========================================================

pub use error::WorldError;
pub use ids::{ContainerId, InstanceId};

//=== Storage Records =====================================================

/// One capability attached to a container.
struct CapabilityRecord {
    type_id: TypeId,
    type_name: &'static str,
    instance: InstanceId,

    /// Set once the host has dispatched the attach callback.
    attached: bool,

    value: Box<dyn Any + Send>,
}

/// Container object carrying independent capabilities.
struct Container<S: SceneKey> {
    name: String,
    scene: Option<S>,
    persistent: bool,
    active: bool,
    capabilities: Vec<CapabilityRecord>,
}

impl<S: SceneKey> Container<S> {
    fn record(&self, type_id: TypeId) -> Option<&CapabilityRecord> {
        self.capabilities.iter().find(|r| r.type_id == type_id)
    }
}

//=== World ===============================================================

/// Object graph of containers, capabilities and loaded scenes.
///
/// Read access is public. Mutation goes through [`crate::Host`], which
/// dispatches the lifecycle callbacks that must accompany it.
pub struct World<S: SceneKey> {
    containers: BTreeMap<ContainerId, Container<S>>,
    instances: HashMap<InstanceId, ContainerId>,
    loaded_scenes: Vec<S>,
    next_container: u64,
    next_instance: u64,
}

impl<S: SceneKey> World<S> {
    //--- Construction -----------------------------------------------------

    /// Creates an empty world with no scene loaded.
    pub fn new() -> Self {
        Self {
            containers: BTreeMap::new(),
            instances: HashMap::new(),
            loaded_scenes: Vec::new(),
            next_container: 0,
            next_instance: 0,
        }
    }

    //--- Container Queries ------------------------------------------------

    /// Returns true if the container is alive.
    pub fn contains(&self, container: ContainerId) -> bool {
        self.containers.contains_key(&container)
    }

    /// Returns the container's name.
    pub fn name(&self, container: ContainerId) -> Option<&str> {
        self.containers.get(&container).map(|c| c.name.as_str())
    }

    /// Returns true if the container is active.
    pub fn is_active(&self, container: ContainerId) -> bool {
        self.containers.get(&container).is_some_and(|c| c.active)
    }

    /// Returns true if the container survives scene unloads.
    pub fn is_persistent(&self, container: ContainerId) -> bool {
        self.containers.get(&container).is_some_and(|c| c.persistent)
    }

    /// Returns the scene the container belongs to.
    ///
    /// `None` for persistent containers and for containers spawned while
    /// no scene was loaded.
    pub fn scene_of(&self, container: ContainerId) -> Option<S> {
        self.containers.get(&container).and_then(|c| c.scene)
    }

    /// Number of live containers.
    pub fn len(&self) -> usize {
        self.containers.len()
    }

    /// Returns true if no container is alive.
    pub fn is_empty(&self) -> bool {
        self.containers.is_empty()
    }

    /// Iterates live container ids in spawn order.
    pub fn containers(&self) -> impl Iterator<Item = ContainerId> + '_ {
        self.containers.keys().copied()
    }

    /// Non-persistent containers belonging to `scene`, in spawn order.
    pub fn containers_in(&self, scene: S) -> Vec<ContainerId> {
        self.containers
            .iter()
            .filter(|(_, c)| !c.persistent && c.scene == Some(scene))
            .map(|(&id, _)| id)
            .collect()
    }

    /// Non-persistent containers spawned while no scene was loaded.
    pub fn containers_without_scene(&self) -> Vec<ContainerId> {
        self.containers
            .iter()
            .filter(|(_, c)| !c.persistent && c.scene.is_none())
            .map(|(&id, _)| id)
            .collect()
    }

    //--- Capability Queries -----------------------------------------------

    /// Returns the container's capability of type `T`.
    pub fn capability<T: Any + Send>(&self, container: ContainerId) -> Option<&T> {
        self.containers
            .get(&container)?
            .record(TypeId::of::<T>())?
            .value
            .downcast_ref::<T>()
    }

    /// Returns true if the container carries a capability of type `T`.
    pub fn has_capability<T: Any + Send>(&self, container: ContainerId) -> bool {
        self.instance_of::<T>(container).is_some()
    }

    /// Returns the instance id of the container's capability of type `T`.
    pub fn instance_of<T: Any + Send>(&self, container: ContainerId) -> Option<InstanceId> {
        self.containers
            .get(&container)?
            .record(TypeId::of::<T>())
            .map(|r| r.instance)
    }

    /// Resolves an instance to its value.
    ///
    /// Returns `None` if the instance is gone or is not a `T`.
    pub fn get<T: Any + Send>(&self, instance: InstanceId) -> Option<&T> {
        let container = self.instances.get(&instance)?;
        self.containers
            .get(container)?
            .capabilities
            .iter()
            .find(|r| r.instance == instance)?
            .value
            .downcast_ref::<T>()
    }

    /// Returns the container carrying the instance.
    pub fn locate(&self, instance: InstanceId) -> Option<ContainerId> {
        self.instances.get(&instance).copied()
    }

    /// Returns true if the instance is still attached to a live container.
    pub fn contains_instance(&self, instance: InstanceId) -> bool {
        self.instances.contains_key(&instance)
    }

    /// Enumerates every live capability of type `T`, in container order.
    ///
    /// Includes capabilities on inactive containers.
    pub fn find_all<T: Any + Send>(&self) -> Vec<InstanceId> {
        let type_id = TypeId::of::<T>();
        self.containers
            .values()
            .filter_map(|c| c.record(type_id))
            .map(|r| r.instance)
            .collect()
    }

    /// Type name of the capability behind an instance.
    pub fn type_name_of(&self, instance: InstanceId) -> Option<&'static str> {
        let container = self.instances.get(&instance)?;
        self.containers
            .get(container)?
            .capabilities
            .iter()
            .find(|r| r.instance == instance)
            .map(|r| r.type_name)
    }

    /// Returns true if the attach callback already ran for the instance.
    pub fn is_attached(&self, instance: InstanceId) -> bool {
        self.instances
            .get(&instance)
            .and_then(|c| self.containers.get(c))
            .and_then(|c| c.capabilities.iter().find(|r| r.instance == instance))
            .is_some_and(|r| r.attached)
    }

    //--- Scene Queries ----------------------------------------------------

    /// Scenes currently loaded, oldest first.
    pub fn loaded_scenes(&self) -> &[S] {
        &self.loaded_scenes
    }

    /// The most recently loaded scene. New containers are spawned into it.
    pub fn active_scene(&self) -> Option<S> {
        self.loaded_scenes.last().copied()
    }

    /// Returns true if the scene is loaded.
    pub fn is_loaded(&self, scene: S) -> bool {
        self.loaded_scenes.contains(&scene)
    }

    //--- Container Mutation (host only) -----------------------------------

    /// Spawns a container into the active scene.
    pub(crate) fn spawn(&mut self, name: String, active: bool) -> ContainerId {
        let id = ContainerId(self.next_container);
        self.next_container += 1;

        let scene = self.active_scene();
        self.containers.insert(
            id,
            Container {
                name,
                scene,
                persistent: false,
                active,
                capabilities: Vec::new(),
            },
        );

        id
    }

    /// Sets the active flag. Returns the previous value.
    pub(crate) fn set_active(
        &mut self,
        container: ContainerId,
        active: bool,
    ) -> Result<bool, WorldError> {
        let entry = self
            .containers
            .get_mut(&container)
            .ok_or(WorldError::ContainerNotFound(container))?;

        Ok(std::mem::replace(&mut entry.active, active))
    }

    /// Exempts the container from scene teardown.
    ///
    /// Detaches it from its scene. Returns false for unknown containers.
    pub(crate) fn mark_persistent(&mut self, container: ContainerId) -> bool {
        match self.containers.get_mut(&container) {
            Some(entry) => {
                entry.persistent = true;
                entry.scene = None;
                true
            }
            None => false,
        }
    }

    /// Removes the container and every capability it carries.
    pub(crate) fn remove_container(&mut self, container: ContainerId) -> bool {
        let Some(entry) = self.containers.remove(&container) else {
            return false;
        };

        for record in &entry.capabilities {
            self.instances.remove(&record.instance);
        }

        true
    }

    //--- Capability Mutation (host only) ----------------------------------

    /// Attaches a capability value and allocates its instance id.
    ///
    /// The attach callback is not dispatched here; the record starts
    /// out unattached.
    pub(crate) fn add_capability<T: Any + Send>(
        &mut self,
        container: ContainerId,
        value: T,
    ) -> Result<InstanceId, WorldError> {
        let type_id = TypeId::of::<T>();
        let entry = self
            .containers
            .get_mut(&container)
            .ok_or(WorldError::ContainerNotFound(container))?;

        if entry.record(type_id).is_some() {
            return Err(WorldError::CapabilityExists {
                container,
                type_name: std::any::type_name::<T>(),
            });
        }

        let instance = InstanceId(self.next_instance);
        self.next_instance += 1;

        entry.capabilities.push(CapabilityRecord {
            type_id,
            type_name: std::any::type_name::<T>(),
            instance,
            attached: false,
            value: Box::new(value),
        });
        self.instances.insert(instance, container);

        Ok(instance)
    }

    /// Removes the container's capability of the given type.
    pub(crate) fn remove_capability(
        &mut self,
        container: ContainerId,
        type_id: TypeId,
    ) -> Option<InstanceId> {
        let entry = self.containers.get_mut(&container)?;
        let pos = entry.capabilities.iter().position(|r| r.type_id == type_id)?;
        let record = entry.capabilities.remove(pos);
        self.instances.remove(&record.instance);
        Some(record.instance)
    }

    /// Mutable access to an instance's value.
    pub(crate) fn get_mut<T: Any + Send>(&mut self, instance: InstanceId) -> Option<&mut T> {
        let container = self.instances.get(&instance)?;
        self.containers
            .get_mut(container)?
            .capabilities
            .iter_mut()
            .find(|r| r.instance == instance)?
            .value
            .downcast_mut::<T>()
    }

    /// Capabilities of a container as `(type, instance, attached)`, in attach order.
    pub(crate) fn capability_records(&self, container: ContainerId) -> Vec<(TypeId, InstanceId, bool)> {
        self.containers
            .get(&container)
            .map(|c| {
                c.capabilities
                    .iter()
                    .map(|r| (r.type_id, r.instance, r.attached))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Records that the attach callback ran for an instance.
    pub(crate) fn mark_attached(&mut self, instance: InstanceId) {
        let Some(container) = self.instances.get(&instance) else {
            return;
        };

        if let Some(record) = self
            .containers
            .get_mut(container)
            .and_then(|c| c.capabilities.iter_mut().find(|r| r.instance == instance))
        {
            record.attached = true;
        }
    }

    //--- Scene Mutation (host only) ---------------------------------------

    /// Marks a scene as loaded and active. Returns false if already loaded.
    pub(crate) fn load_scene(&mut self, scene: S) -> bool {
        if self.loaded_scenes.contains(&scene) {
            return false;
        }
        self.loaded_scenes.push(scene);
        true
    }

    /// Marks a scene as unloaded. Containers are not touched.
    pub(crate) fn unload_scene(&mut self, scene: S) -> bool {
        match self.loaded_scenes.iter().position(|&s| s == scene) {
            Some(pos) => {
                self.loaded_scenes.remove(pos);
                true
            }
            None => false,
        }
    }
}

impl<S: SceneKey> Default for World<S> {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Tests
//=========================================================================
