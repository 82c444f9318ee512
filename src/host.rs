//=========================================================================
// Host
//
// Process-wide context that owns the object graph, the singleton
// registry and the frame counter.
//
// Architecture:
// ```text
//     HostBuilder  ──build()──>  Host
//         │                       ├─ World          (containers, scenes)
//         ├─ with_trace()         ├─ SingletonRegistry (per-type state)
//         ├─ with_rich_text()     ├─ Diagnostics    (log lines, events)
//         ├─ with_event_capacity()└─ TransitionQueue
//         └─ with_initial_scene()
// ```
//
// The embedding application drives everything: it spawns containers,
// attaches capabilities, calls `tick()` once per frame and `shutdown()`
// on exit. Lifecycle callbacks are dispatched from those calls.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::any::{Any, TypeId};

use crossbeam_channel::Receiver;
use log::{debug, info, warn};

//=== Internal Dependencies ===============================================

use crate::core::diagnostics::{Diagnostics, LifecycleEvent};
use crate::core::scene::{SceneKey, SceneTransition, TransitionQueue};
use crate::core::singleton::{
    short_type_name, AttachOutcome, Dispatch, DuplicatePolicy, Singleton,
    SingletonRegistry,
};
use crate::core::world::{ContainerId, InstanceId, World, WorldError};

//=== HostBuilder =========================================================

/// Builder for configuring and constructing a [`Host`].
///
/// # Default Values
///
/// - **Trace**: off (only singletons whose `print_trace` is true log)
/// - **Rich text**: off
/// - **Event capacity**: 64 events per subscriber
/// - **Initial scene**: none
///
/// # Examples
///
/// ```rust
/// use lifecycle_singleton::prelude::*;
///
/// #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// enum Level { Boot }
/// impl SceneKey for Level {}
///
/// let host = HostBuilder::<Level>::new()
///     .with_trace(true)
///     .with_initial_scene(Level::Boot)
///     .build();
///
/// assert_eq!(host.world().active_scene(), Some(Level::Boot));
/// ```
pub struct HostBuilder<S: SceneKey> {
    trace: bool,
    rich_text: bool,
    event_capacity: usize,
    initial_scene: Option<S>,
}

impl<S: SceneKey> HostBuilder<S> {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            trace: false,
            rich_text: false,
            event_capacity: 64,
            initial_scene: None,
        }
    }

    /// Forces lifecycle trace lines on for every singleton.
    pub fn with_trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }

    /// Wraps diagnostic lines in `<b>` markup for rich-text consoles.
    pub fn with_rich_text(mut self, rich_text: bool) -> Self {
        self.rich_text = rich_text;
        self
    }

    /// Sets the per-subscriber lifecycle event buffer.
    ///
    /// Default: 64
    ///
    /// # Panics
    ///
    /// Panics if `capacity == 0`.
    pub fn with_event_capacity(mut self, capacity: usize) -> Self {
        assert!(capacity > 0, "Event capacity must be positive");
        self.event_capacity = capacity;
        self
    }

    /// Scene loaded before the first container is spawned.
    pub fn with_initial_scene(mut self, scene: S) -> Self {
        self.initial_scene = Some(scene);
        self
    }

    /// Builds the host.
    pub fn build(self) -> Host<S> {
        info!(
            "Building host (trace: {}, rich text: {}, event capacity: {})",
            self.trace, self.rich_text, self.event_capacity
        );

        let mut world = World::new();
        if let Some(scene) = self.initial_scene {
            world.load_scene(scene);
            debug!("Initial scene {:?} loaded", scene);
        }

        Host {
            world,
            singletons: SingletonRegistry::new(),
            diagnostics: Diagnostics::new(self.trace, self.rich_text, self.event_capacity),
            transitions: TransitionQueue::new(),
            pending_activation: Vec::new(),
            frame: 0,
        }
    }
}

impl<S: SceneKey> Default for HostBuilder<S> {
    fn default() -> Self {
        Self::new()
    }
}

//=== Host ================================================================

/// Single-threaded host context for singleton capabilities.
///
/// Every method runs on the thread that owns the host. There are no
/// process-global statics: a fresh host is a fresh set of singletons.
///
/// # Examples
///
/// ```rust
/// use lifecycle_singleton::prelude::*;
///
/// #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// enum Level { Main }
/// impl SceneKey for Level {}
///
/// #[derive(Default)]
/// struct Scoreboard { points: u32 }
/// impl Singleton for Scoreboard {}
///
/// let mut host = HostBuilder::new().with_initial_scene(Level::Main).build();
///
/// // Nothing attached yet: the lookup builds a container for it.
/// host.instance::<Scoreboard>().unwrap().points += 10;
/// host.tick();
///
/// host.shutdown();
/// assert!(host.get_instance::<Scoreboard>().is_none());
/// ```
pub struct Host<S: SceneKey> {
    world: World<S>,
    singletons: SingletonRegistry<S>,
    diagnostics: Diagnostics,
    transitions: TransitionQueue<S>,
    pending_activation: Vec<(TypeId, InstanceId)>,
    frame: u64,
}

impl<S: SceneKey> Host<S> {
    //--- Accessors --------------------------------------------------------

    /// Read-only view of the object graph.
    pub fn world(&self) -> &World<S> {
        &self.world
    }

    /// Read-only view of per-type lifecycle state.
    pub fn singletons(&self) -> &SingletonRegistry<S> {
        &self.singletons
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Number of completed ticks.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Instances waiting for their first-frame activation.
    pub fn pending_activations(&self) -> usize {
        self.pending_activation.len()
    }

    /// Opens a bounded receiver of lifecycle events.
    pub fn subscribe(&mut self) -> Receiver<LifecycleEvent> {
        self.diagnostics.subscribe()
    }

    //--- Containers -------------------------------------------------------

    /// Spawns an active container into the active scene.
    pub fn spawn(&mut self, name: impl Into<String>) -> ContainerId {
        self.world.spawn(name.into(), true)
    }

    /// Spawns an inactive container. Attach callbacks for its capabilities
    /// are deferred until [`Host::activate`].
    pub fn spawn_inactive(&mut self, name: impl Into<String>) -> ContainerId {
        self.world.spawn(name.into(), false)
    }

    /// Activates a container, dispatching deferred attach callbacks in
    /// attach order.
    pub fn activate(&mut self, container: ContainerId) -> Result<(), WorldError> {
        if self.world.set_active(container, true)? {
            return Ok(());
        }

        for (type_id, instance, attached) in self.world.capability_records(container) {
            // An earlier duplicate policy may have torn the container down.
            if !attached && self.world.contains_instance(instance) {
                self.run_attach(type_id, instance);
            }
        }

        Ok(())
    }

    /// Deactivates a container. Lifecycle state is unaffected.
    pub fn deactivate(&mut self, container: ContainerId) -> Result<(), WorldError> {
        self.world.set_active(container, false).map(|_| ())
    }

    /// Exempts a container from scene teardown.
    pub fn mark_persistent(&mut self, container: ContainerId) -> bool {
        self.world.mark_persistent(container)
    }

    /// Tears down a container, dispatching detach callbacks for its
    /// capabilities in attach order. Returns false if it was not alive.
    pub fn destroy_container(&mut self, container: ContainerId) -> bool {
        if !self.world.contains(container) {
            return false;
        }

        for (type_id, instance, _) in self.world.capability_records(container) {
            self.run_detach(type_id, instance);
        }

        debug!("Destroying {}", container);
        self.world.remove_container(container)
    }

    //--- Capabilities -----------------------------------------------------

    /// Attaches a singleton capability.
    ///
    /// On an active container the attach callback runs immediately: the
    /// instance is registered, or rejected as a duplicate and handled by
    /// its duplicate policy. Check [`SingletonRegistry::registered`] to
    /// see which happened.
    pub fn attach<T: Singleton>(
        &mut self,
        container: ContainerId,
        value: T,
    ) -> Result<InstanceId, WorldError> {
        let instance = self.world.add_capability(container, value)?;
        self.track::<T>();

        if self.world.is_active(container) {
            self.run_attach(TypeId::of::<T>(), instance);
        }

        Ok(instance)
    }

    /// Attaches a plain capability with no lifecycle.
    ///
    /// Singleton types attached here follow the singleton rules once the
    /// type is known to the host (see [`Host::attach`]).
    pub fn attach_capability<C: Any + Send>(
        &mut self,
        container: ContainerId,
        value: C,
    ) -> Result<InstanceId, WorldError> {
        let instance = self.world.add_capability(container, value)?;

        if self.world.is_active(container) {
            self.run_attach(TypeId::of::<C>(), instance);
        }

        Ok(instance)
    }

    /// Removes the container's capability of type `C`, dispatching its
    /// detach callback first. Sibling capabilities are untouched.
    pub fn remove_capability<C: Any + Send>(&mut self, container: ContainerId) -> bool {
        let Some(instance) = self.world.instance_of::<C>(container) else {
            return false;
        };

        let type_id = TypeId::of::<C>();
        self.run_detach(type_id, instance);
        self.world.remove_capability(container, type_id).is_some()
    }

    //--- Singleton Lookup -------------------------------------------------

    /// Returns the registered instance of `T`.
    ///
    /// If none is registered and `T` was never destroyed, a `T` on an
    /// active container is recovered, or a `__<Type>(Singleton)` container
    /// is built. Both paths run the attach callback before returning.
    /// Once `T` is destroyed this returns `None` forever.
    pub fn get_instance<T: Singleton>(&mut self) -> Option<InstanceId> {
        let state = self.singletons.state::<T>();
        if let Some(instance) = state.instance() {
            return Some(instance);
        }

        let type_name = std::any::type_name::<T>();
        if state.flags().is_destroyed() {
            debug!("Lookup of destroyed singleton {} refused", type_name);
            return None;
        }

        let type_id = TypeId::of::<T>();
        if let Some(instance) = self.track::<T>() {
            return Some(instance);
        }

        for existing in self.world.find_all::<T>() {
            let active = self.world.locate(existing).is_some_and(|c| self.world.is_active(c));
            if !active {
                continue;
            }

            debug!("Recovering existing {} as {}", existing, type_name);
            self.run_attach(type_id, existing);

            if let Some(instance) = self.singletons.registered::<T>() {
                return Some(instance);
            }
        }

        let name = format!("__{}(Singleton)", short_type_name(type_name));
        let container = self.world.spawn(name, true);
        let instance = match self.world.add_capability(container, T::default()) {
            Ok(instance) => instance,
            Err(e) => {
                warn!("Lazy construction of {} failed: {}", type_name, e);
                return None;
            }
        };

        self.diagnostics.publish(LifecycleEvent::LazilyConstructed {
            type_name,
            container,
            frame: self.frame,
        });
        self.run_attach(type_id, instance);

        self.singletons.registered::<T>()
    }

    /// Mutable access to the singleton, constructing it if needed.
    pub fn instance<T: Singleton>(&mut self) -> Option<&mut T> {
        let instance = self.get_instance::<T>()?;
        self.world.get_mut::<T>(instance)
    }

    /// Shared access to the registered singleton. Never constructs.
    pub fn peek<T: Singleton>(&self) -> Option<&T> {
        self.world.get::<T>(self.singletons.registered::<T>()?)
    }

    //--- Manual Dispatch --------------------------------------------------
    //
    // Entry points for applications that drive the callbacks from their
    // own loop. Calling them out of order is a contract violation and is
    // not guarded against.
    //

    /// Dispatches the attach callback. Returns true if `instance` is the
    /// registered instance afterwards.
    pub fn on_attach<T: Singleton>(&mut self, instance: InstanceId) -> bool {
        self.track::<T>();
        self.run_attach(TypeId::of::<T>(), instance);
        self.singletons.registered::<T>() == Some(instance)
    }

    /// Dispatches the first-frame callback. Returns true if the hook ran.
    pub fn on_activate_first_frame<T: Singleton>(&mut self, instance: InstanceId) -> bool {
        let mut dispatch = Dispatch {
            world: &mut self.world,
            diagnostics: &mut self.diagnostics,
            frame: self.frame,
        };
        self.singletons.on_activate_first_frame::<T>(&mut dispatch, instance)
    }

    /// Dispatches the detach callback without removing the instance.
    /// Returns true if the singleton was shut down.
    pub fn on_detach<T: Singleton>(&mut self, instance: InstanceId) -> bool {
        let mut dispatch = Dispatch {
            world: &mut self.world,
            diagnostics: &mut self.diagnostics,
            frame: self.frame,
        };
        self.singletons.on_detach::<T>(&mut dispatch, instance)
    }

    //--- Scenes -----------------------------------------------------------

    /// Unloads every loaded scene, then loads `scene`.
    pub fn load_scene(&mut self, scene: S) {
        info!("Loading scene {:?}", scene);

        let loaded: Vec<S> = self.world.loaded_scenes().to_vec();
        for previous in loaded {
            self.unload_scene(previous);
        }

        // Spawned before any scene was loaded.
        for container in self.world.containers_without_scene() {
            self.destroy_container(container);
        }

        self.world.load_scene(scene);
    }

    /// Loads `scene` alongside the current ones.
    pub fn load_scene_additive(&mut self, scene: S) -> bool {
        if !self.world.load_scene(scene) {
            warn!("Scene {:?} is already loaded, skipping", scene);
            return false;
        }

        info!("Loaded scene {:?} additively", scene);
        true
    }

    /// Unloads `scene`, tearing down its non-persistent containers.
    pub fn unload_scene(&mut self, scene: S) -> bool {
        if !self.world.is_loaded(scene) {
            debug!("Scene {:?} not loaded, skipping unload", scene);
            return false;
        }

        for container in self.world.containers_in(scene) {
            self.destroy_container(container);
        }

        debug!("Unloaded scene {:?}", scene);
        self.world.unload_scene(scene)
    }

    /// Queues a transition for the end of the next tick.
    pub fn request_transition(&mut self, transition: SceneTransition<S>) {
        self.transitions.push(transition);
    }

    //--- Frame Loop -------------------------------------------------------

    /// Advances one frame.
    ///
    /// 1. Increments the frame counter
    /// 2. Dispatches first-frame activations for instances still alive;
    ///    those on inactive containers stay queued until reactivated
    /// 3. Applies queued scene transitions in FIFO order
    pub fn tick(&mut self) {
        self.frame += 1;

        for (type_id, instance) in std::mem::take(&mut self.pending_activation) {
            let Some(container) = self.world.locate(instance) else {
                continue;
            };

            if !self.world.is_active(container) {
                self.pending_activation.push((type_id, instance));
                continue;
            }

            if let Some(slot) = self.singletons.erased_mut(type_id) {
                let mut dispatch = Dispatch {
                    world: &mut self.world,
                    diagnostics: &mut self.diagnostics,
                    frame: self.frame,
                };
                slot.activate_first_frame(&mut dispatch, instance);
            }
        }

        for transition in self.transitions.take() {
            self.apply_transition(transition);
        }
    }

    /// Tears everything down: scene containers first, then persistent
    /// ones. Every registered singleton is destroyed.
    pub fn shutdown(&mut self) {
        info!("Shutting down host at frame {}", self.frame);

        let loaded: Vec<S> = self.world.loaded_scenes().to_vec();
        for scene in loaded {
            self.unload_scene(scene);
        }

        let remaining: Vec<ContainerId> = self.world.containers().collect();
        for container in remaining {
            self.destroy_container(container);
        }

        self.pending_activation.clear();
        self.transitions.take();

        info!("Host shutdown complete");
    }

    //--- Internal Helpers -------------------------------------------------

    /// Starts tracking `T`, returning its registered instance.
    ///
    /// The first time `T` is seen, instances added earlier through
    /// [`Host::attach_capability`] on active containers are put through
    /// the attach callback in container order: the first one registers and
    /// the rest are handled as duplicates.
    fn track<T: Singleton>(&mut self) -> Option<InstanceId> {
        if !self.singletons.is_tracked::<T>() {
            self.singletons.track::<T>();

            for existing in self.world.find_all::<T>() {
                if self.world.is_attached(existing) {
                    debug!("Adopting {} as {}", existing, std::any::type_name::<T>());
                    self.run_attach(TypeId::of::<T>(), existing);
                }
            }
        }

        self.singletons.registered::<T>()
    }

    fn apply_transition(&mut self, transition: SceneTransition<S>) {
        match transition {
            SceneTransition::Load(scene) => self.load_scene(scene),
            SceneTransition::Additive(scene) => {
                self.load_scene_additive(scene);
            }
            SceneTransition::Unload(scene) => {
                self.unload_scene(scene);
            }
            SceneTransition::Empty => {}
        }
    }

    fn run_attach(&mut self, type_id: TypeId, instance: InstanceId) {
        let Some(slot) = self.singletons.erased_mut(type_id) else {
            self.world.mark_attached(instance);
            return;
        };

        let mut dispatch = Dispatch {
            world: &mut self.world,
            diagnostics: &mut self.diagnostics,
            frame: self.frame,
        };

        match slot.attach(&mut dispatch, instance) {
            AttachOutcome::Registered => self.pending_activation.push((type_id, instance)),
            AttachOutcome::Rejected(policy) => self.apply_duplicate_policy(type_id, instance, policy),
            AttachOutcome::Missing => {}
        }
    }

    fn run_detach(&mut self, type_id: TypeId, instance: InstanceId) {
        if let Some(slot) = self.singletons.erased_mut(type_id) {
            let mut dispatch = Dispatch {
                world: &mut self.world,
                diagnostics: &mut self.diagnostics,
                frame: self.frame,
            };
            slot.detach(&mut dispatch, instance);
        }
    }

    fn apply_duplicate_policy(&mut self, type_id: TypeId, instance: InstanceId, policy: DuplicatePolicy) {
        let Some(container) = self.world.locate(instance) else {
            return;
        };

        match policy {
            DuplicatePolicy::RemoveCapability => {
                self.run_detach(type_id, instance);
                self.world.remove_capability(container, type_id);
            }
            DuplicatePolicy::DestroyContainer => {
                self.destroy_container(container);
            }
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::diagnostics::capture;
    use crate::core::singleton::{LifecycleContext, LifecyclePhase};
    use log::Level;
    use std::cell::RefCell;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum TestScene {
        Menu,
        Level,
    }

    impl SceneKey for TestScene {}

    //--- Hook Journal -----------------------------------------------------
    //
    // Each test runs on its own thread, so a thread-local journal isolates
    // hook records between tests.
    //

    thread_local! {
        static JOURNAL: RefCell<Vec<String>> = const { RefCell::new(Vec::new()) };
    }

    fn record(entry: String) {
        JOURNAL.with(|j| j.borrow_mut().push(entry));
    }

    fn journal() -> Vec<String> {
        JOURNAL.with(|j| j.borrow().clone())
    }

    fn count(prefix: &str) -> usize {
        journal().iter().filter(|e| e.starts_with(prefix)).count()
    }

    #[derive(Default)]
    struct GameManager {
        score: u32,
    }

    impl Singleton for GameManager {
        fn on_created(&mut self, cx: &LifecycleContext) {
            record(format!("created:{}", cx.container_name));
        }

        fn on_first_activate(&mut self, cx: &LifecycleContext) {
            record(format!("activated:{}", cx.container_name));
        }

        fn on_destroyed(&mut self, cx: &LifecycleContext) {
            record(format!("destroyed:{}", cx.container_name));
        }

        fn on_duplicate(&mut self, cx: &LifecycleContext) -> DuplicatePolicy {
            record(format!("duplicate:{}", cx.container_name));
            DuplicatePolicy::RemoveCapability
        }
    }

    #[derive(Default)]
    struct StrictManager;

    impl Singleton for StrictManager {
        fn on_duplicate(&mut self, _cx: &LifecycleContext) -> DuplicatePolicy {
            DuplicatePolicy::DestroyContainer
        }
    }

    #[derive(Default)]
    struct TracedManager;

    impl Singleton for TracedManager {
        fn on_created(&mut self, cx: &LifecycleContext) {
            cx.log("ready");
        }

        fn print_trace(&self) -> bool {
            true
        }
    }

    #[derive(Default)]
    struct QuietLogger;

    impl Singleton for QuietLogger {
        fn on_created(&mut self, cx: &LifecycleContext) {
            cx.error("failed");
        }
    }

    #[derive(Debug, PartialEq)]
    struct Transform(i32);

    fn host() -> Host<TestScene> {
        HostBuilder::new().with_initial_scene(TestScene::Menu).build()
    }

    fn drain(rx: &Receiver<LifecycleEvent>) -> Vec<LifecycleEvent> {
        rx.try_iter().collect()
    }

    //=====================================================================
    // HostBuilder Tests
    //=====================================================================

    #[test]
    fn builder_defaults() {
        let builder = HostBuilder::<TestScene>::new();
        assert!(!builder.trace);
        assert!(!builder.rich_text);
        assert_eq!(builder.event_capacity, 64);
        assert_eq!(builder.initial_scene, None);
    }

    #[test]
    fn builder_fluent_api_chaining() {
        let host = HostBuilder::new()
            .with_trace(true)
            .with_rich_text(true)
            .with_event_capacity(8)
            .with_initial_scene(TestScene::Level)
            .build();

        assert!(host.diagnostics().trace_all());
        assert_eq!(host.world().loaded_scenes(), &[TestScene::Level]);
        assert_eq!(host.frame(), 0);
    }

    #[test]
    #[should_panic(expected = "Event capacity must be positive")]
    fn builder_with_event_capacity_panics_on_zero() {
        HostBuilder::<TestScene>::new().with_event_capacity(0);
    }

    //=====================================================================
    // Lifecycle Properties
    //=====================================================================

    #[test]
    fn duplicate_attach_never_replaces_registered_instance() {
        let mut host = host();
        let a = host.spawn("A");
        let b = host.spawn("B");

        let ia = host.attach(a, GameManager::default()).unwrap();
        let ib = host.attach(b, GameManager::default()).unwrap();

        assert_eq!(host.singletons().registered::<GameManager>(), Some(ia));
        assert_ne!(ia, ib);
        assert_eq!(count("duplicate:"), 1);
        assert_eq!(journal(), vec!["created:A", "duplicate:B"]);
    }

    #[test]
    fn on_created_fires_once_across_duplicate_cycles() {
        let mut host = host();
        let a = host.spawn("A");
        host.attach(a, GameManager::default()).unwrap();

        for i in 0..3 {
            let dup = host.spawn(format!("dup{}", i));
            host.attach(dup, GameManager::default()).unwrap();
            host.destroy_container(dup);
        }

        assert_eq!(count("created:"), 1);
        assert_eq!(count("duplicate:"), 3);
        assert_eq!(count("destroyed:"), 0);
        assert_eq!(host.singletons().phase::<GameManager>(), LifecyclePhase::Awakened);
    }

    #[test]
    fn destroyed_singleton_is_never_resurrected() {
        let mut host = host();
        let a = host.spawn("A");
        host.attach(a, GameManager::default()).unwrap();
        host.destroy_container(a);

        assert_eq!(host.get_instance::<GameManager>(), None);

        let c = host.spawn("C");
        let ic = host.attach(c, GameManager::default()).unwrap();

        assert_eq!(host.get_instance::<GameManager>(), None);
        assert!(host.instance::<GameManager>().is_none());
        assert!(!host.world().contains_instance(ic));
        assert!(host.world().contains(c));
        assert_eq!(host.world().len(), 1);
        assert_eq!(count("created:"), 1);
    }

    #[test]
    fn first_frame_activation_runs_once() {
        let mut host = host();
        let a = host.spawn("A");
        let ia = host.attach(a, GameManager::default()).unwrap();
        assert_eq!(host.pending_activations(), 1);

        host.tick();
        host.tick();
        assert!(!host.on_activate_first_frame::<GameManager>(ia));

        assert_eq!(count("activated:"), 1);
        assert_eq!(host.pending_activations(), 0);
        assert!(host.singletons().is_started::<GameManager>());
    }

    #[test]
    fn full_lifecycle_scenario() {
        let mut host = host();
        let events = host.subscribe();

        let a = host.spawn("A");
        let b = host.spawn("B");
        host.attach_capability(b, Transform(7)).unwrap();

        let ia = host.attach(a, GameManager::default()).unwrap();
        let ib = host.attach(b, GameManager::default()).unwrap();

        assert_eq!(host.singletons().registered::<GameManager>(), Some(ia));
        assert!(!host.world().has_capability::<GameManager>(b));
        assert_eq!(host.world().capability::<Transform>(b), Some(&Transform(7)));

        host.tick();
        assert_eq!(host.singletons().phase::<GameManager>(), LifecyclePhase::Started);

        assert!(host.destroy_container(a));
        assert!(host.singletons().is_destroyed::<GameManager>());
        assert_eq!(host.get_instance::<GameManager>(), None);

        assert_eq!(
            journal(),
            vec!["created:A", "duplicate:B", "activated:A", "destroyed:A"]
        );

        let type_name = std::any::type_name::<GameManager>();
        assert_eq!(
            drain(&events),
            vec![
                LifecycleEvent::Created { type_name, instance: ia, frame: 0 },
                LifecycleEvent::DuplicateRejected {
                    type_name,
                    instance: ib,
                    registered: Some(ia),
                    policy: DuplicatePolicy::RemoveCapability,
                    frame: 0,
                },
                LifecycleEvent::Activated { type_name, instance: ia, frame: 1 },
                LifecycleEvent::Destroyed { type_name, instance: ia, frame: 1 },
            ]
        );
    }

    #[test]
    fn lazy_lookup_constructs_and_attaches() {
        let mut host = host();
        let events = host.subscribe();

        let instance = host.get_instance::<GameManager>().unwrap();
        let container = host.world().locate(instance).unwrap();

        assert_eq!(host.world().name(container), Some("__GameManager(Singleton)"));
        assert!(host.world().is_persistent(container));
        assert!(host.singletons().is_awakened::<GameManager>());
        assert_eq!(journal(), vec!["created:__GameManager(Singleton)"]);

        assert_eq!(host.get_instance::<GameManager>(), Some(instance));
        assert_eq!(host.world().len(), 1);

        let received = drain(&events);
        assert!(matches!(
            received.first(),
            Some(LifecycleEvent::LazilyConstructed { container: c, .. }) if *c == container
        ));
        assert!(matches!(received.get(1), Some(LifecycleEvent::Created { .. })));
    }

    //=====================================================================
    // Duplicate Policies
    //=====================================================================

    #[test]
    fn remove_capability_policy_keeps_sibling_capabilities() {
        let mut host = host();
        let a = host.spawn("A");
        let b = host.spawn("B");
        host.attach(a, GameManager::default()).unwrap();
        host.attach_capability(b, Transform(1)).unwrap();
        host.attach(b, GameManager::default()).unwrap();

        assert!(host.world().contains(b));
        assert!(host.world().has_capability::<Transform>(b));
        assert!(!host.world().has_capability::<GameManager>(b));
    }

    #[test]
    fn destroy_container_policy_removes_whole_duplicate() {
        let mut host = host();
        let a = host.spawn("A");
        let b = host.spawn("B");
        host.attach(a, StrictManager).unwrap();
        host.attach_capability(b, Transform(1)).unwrap();
        host.attach(b, StrictManager).unwrap();

        assert!(!host.world().contains(b));
        assert!(host.world().contains(a));
        assert!(host.singletons().registered::<StrictManager>().is_some());
    }

    //=====================================================================
    // Scenes
    //=====================================================================

    #[test]
    fn registered_singleton_survives_scene_load() {
        let mut host = host();
        let manager = host.spawn("Manager");
        let prop = host.spawn("Prop");
        host.attach(manager, GameManager::default()).unwrap();
        host.attach_capability(prop, Transform(0)).unwrap();

        host.load_scene(TestScene::Level);

        assert!(host.world().contains(manager));
        assert!(!host.world().contains(prop));
        assert_eq!(host.world().loaded_scenes(), &[TestScene::Level]);
        assert_eq!(count("destroyed:"), 0);
    }

    #[test]
    fn queued_transition_applies_after_activation() {
        let mut host = host();
        let manager = host.spawn("Manager");
        host.attach(manager, GameManager::default()).unwrap();
        host.request_transition(SceneTransition::Additive(TestScene::Level));

        assert!(!host.world().is_loaded(TestScene::Level));
        host.tick();

        assert!(host.world().is_loaded(TestScene::Level));
        assert_eq!(host.world().active_scene(), Some(TestScene::Level));
        assert_eq!(journal(), vec!["created:Manager", "activated:Manager"]);
    }

    #[test]
    fn unload_scene_tears_down_members_only() {
        let mut host = host();
        host.load_scene_additive(TestScene::Level);
        let level_prop = host.spawn("LevelProp");
        host.attach_capability(level_prop, Transform(2)).unwrap();

        assert!(host.unload_scene(TestScene::Level));
        assert!(!host.world().contains(level_prop));
        assert!(!host.unload_scene(TestScene::Level));
        assert_eq!(host.world().active_scene(), Some(TestScene::Menu));
    }

    #[test]
    fn additive_load_of_loaded_scene_is_refused() {
        let mut host = host();
        assert!(!host.load_scene_additive(TestScene::Menu));
        assert_eq!(host.world().loaded_scenes(), &[TestScene::Menu]);
    }

    //=====================================================================
    // Activation, Recovery, Teardown
    //=====================================================================

    #[test]
    fn inactive_container_defers_attach_until_activation() {
        let mut host = host();
        let c = host.spawn_inactive("Dormant");
        let instance = host.attach(c, GameManager::default()).unwrap();

        assert_eq!(host.singletons().registered::<GameManager>(), None);
        assert_eq!(count("created:"), 0);

        host.activate(c).unwrap();
        assert_eq!(host.singletons().registered::<GameManager>(), Some(instance));
        assert_eq!(count("created:"), 1);

        host.deactivate(c).unwrap();
        host.activate(c).unwrap();
        assert_eq!(count("created:"), 1);
    }

    #[test]
    fn lookup_ignores_instances_on_inactive_containers() {
        let mut host = host();
        let c = host.spawn_inactive("Dormant");
        let dormant = host.attach(c, GameManager::default()).unwrap();

        let instance = host.get_instance::<GameManager>().unwrap();
        assert_ne!(instance, dormant);
        assert_eq!(host.world().len(), 2);
        assert_eq!(journal(), vec!["created:__GameManager(Singleton)"]);

        host.tick();
        host.activate(c).unwrap();

        assert!(!host.world().contains_instance(dormant));
        assert_eq!(
            journal(),
            vec![
                "created:__GameManager(Singleton)",
                "activated:__GameManager(Singleton)",
                "duplicate:Dormant",
            ]
        );
    }

    #[test]
    fn lookup_recovers_active_instance_before_constructing() {
        let mut host = host();
        let c = host.spawn("Plain");
        let instance = host.attach_capability(c, GameManager::default()).unwrap();

        assert_eq!(host.get_instance::<GameManager>(), Some(instance));
        assert_eq!(host.world().len(), 1);
        assert_eq!(journal(), vec!["created:Plain"]);
    }

    #[test]
    fn plain_attach_of_singleton_type_is_deduplicated() {
        let mut host = host();
        let a = host.spawn("A");
        let b = host.spawn("B");

        let ia = host.attach_capability(a, GameManager::default()).unwrap();
        host.attach(b, GameManager::default()).unwrap();

        assert_eq!(host.world().find_all::<GameManager>(), vec![ia]);
        assert_eq!(host.singletons().registered::<GameManager>(), Some(ia));
        assert_eq!(journal(), vec!["created:A", "duplicate:B"]);

        let c = host.spawn("C");
        host.attach_capability(c, GameManager::default()).unwrap();
        assert_eq!(host.world().find_all::<GameManager>(), vec![ia]);
        assert_eq!(count("duplicate:"), 2);
    }

    #[test]
    fn first_activation_waits_for_active_container() {
        let mut host = host();
        let a = host.spawn("A");
        host.attach(a, GameManager::default()).unwrap();
        host.deactivate(a).unwrap();

        host.tick();
        assert_eq!(count("activated:"), 0);
        assert_eq!(host.pending_activations(), 1);

        host.activate(a).unwrap();
        host.tick();

        assert_eq!(journal(), vec!["created:A", "activated:A"]);
        assert_eq!(host.pending_activations(), 0);
    }

    #[test]
    fn single_load_tears_down_containers_spawned_without_scene() {
        let mut host = HostBuilder::<TestScene>::new().build();
        let prop = host.spawn("Prop");
        let manager = host.get_instance::<GameManager>().unwrap();

        host.load_scene(TestScene::Menu);

        assert!(!host.world().contains(prop));
        assert!(host.world().contains_instance(manager));
        assert_eq!(host.world().len(), 1);
    }

    #[test]
    fn duplicate_attach_logs_warning_line() {
        capture::install();
        let mut host = host();
        let a = host.spawn("A");
        let b = host.spawn("B");
        host.attach(a, GameManager::default()).unwrap();
        host.attach(b, GameManager::default()).unwrap();

        let type_name = std::any::type_name::<GameManager>();
        let expected = host.diagnostics().format_line(
            0,
            type_name,
            format_args!(
                "Found a duplicated instance of a Singleton with type {} in the container B",
                type_name
            ),
        );
        let warnings: Vec<String> = capture::lines(Level::Warn)
            .into_iter()
            .filter(|line| line.starts_with("[0][GAMEMANAGER]"))
            .collect();

        assert_eq!(warnings, vec![expected]);
    }

    #[test]
    fn traced_singleton_logs_from_its_hooks() {
        capture::install();
        let mut host = host();
        let t = host.spawn("T");
        host.attach(t, TracedManager).unwrap();
        let quiet = host.spawn("Quiet");
        host.attach(quiet, GameManager::default()).unwrap();

        let infos = capture::lines(Level::Info);
        assert!(infos.contains(&"[0][TRACEDMANAGER] ready".to_string()));
        assert!(infos.iter().any(|l| l.starts_with("[0][TRACEDMANAGER] Awake()")));
        assert!(!infos.iter().any(|l| l.starts_with("[0][GAMEMANAGER]")));
    }

    #[test]
    fn host_wide_trace_enables_hook_logging() {
        capture::install();
        let mut host = HostBuilder::new()
            .with_trace(true)
            .with_initial_scene(TestScene::Menu)
            .build();
        let q = host.spawn("Q");
        host.attach(q, QuietLogger).unwrap();

        assert!(capture::lines(Level::Error).contains(&"[0][QUIETLOGGER] failed".to_string()));
    }

    #[test]
    fn teardown_before_first_frame_skips_activation() {
        let mut host = host();
        let a = host.spawn("A");
        host.attach(a, GameManager::default()).unwrap();
        host.destroy_container(a);
        host.tick();

        assert_eq!(journal(), vec!["created:A", "destroyed:A"]);
        assert_eq!(host.singletons().phase::<GameManager>(), LifecyclePhase::Destroyed);
        assert!(!host.singletons().is_started::<GameManager>());
    }

    #[test]
    fn removing_registered_capability_destroys_singleton_but_keeps_container() {
        let mut host = host();
        let a = host.spawn("A");
        host.attach_capability(a, Transform(3)).unwrap();
        host.attach(a, GameManager::default()).unwrap();

        assert!(host.remove_capability::<GameManager>(a));
        assert!(host.world().contains(a));
        assert!(host.singletons().is_destroyed::<GameManager>());
        assert!(!host.remove_capability::<GameManager>(a));
        assert_eq!(count("destroyed:"), 1);
    }

    #[test]
    fn shutdown_destroys_persistent_singletons() {
        let mut host = host();
        host.get_instance::<GameManager>().unwrap();
        let prop = host.spawn("Prop");
        host.attach_capability(prop, Transform(0)).unwrap();

        host.shutdown();

        assert!(host.world().is_empty());
        assert!(host.world().loaded_scenes().is_empty());
        assert_eq!(host.get_instance::<GameManager>(), None);
        assert_eq!(count("destroyed:"), 1);
    }

    #[test]
    fn instance_and_peek_share_state() {
        let mut host = host();
        assert!(host.peek::<GameManager>().is_none());

        host.instance::<GameManager>().unwrap().score = 5;
        assert_eq!(host.peek::<GameManager>().map(|m| m.score), Some(5));
    }

    #[test]
    fn manual_dispatch_follows_same_rules() {
        let mut host = host();
        let a = host.spawn_inactive("A");
        let b = host.spawn_inactive("B");
        let ia = host.attach(a, GameManager::default()).unwrap();
        let ib = host.attach(b, GameManager::default()).unwrap();

        assert!(host.on_attach::<GameManager>(ia));
        assert!(!host.on_attach::<GameManager>(ib));
        assert!(!host.on_detach::<GameManager>(ib));
        assert!(host.on_detach::<GameManager>(ia));
        assert_eq!(host.get_instance::<GameManager>(), None);
    }

    #[test]
    fn attach_to_missing_container_fails() {
        let mut host = host();
        let c = host.spawn("Gone");
        host.destroy_container(c);

        assert_eq!(
            host.attach(c, GameManager::default()),
            Err(WorldError::ContainerNotFound(c))
        );
        assert!(!host.destroy_container(c));
        assert_eq!(host.activate(c), Err(WorldError::ContainerNotFound(c)));
    }
}
