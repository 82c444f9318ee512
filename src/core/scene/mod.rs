//=========================================================================
// Scene System
//=========================================================================
//
// Scene identifiers and context transitions.
//
// Architecture:
//   Host::request_transition() → TransitionQueue → Host::tick()
//                                                   └─ apply_transition()
//
// A transition unloads scenes, which tears down every non-persistent
// container spawned into them. Persistent containers survive.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt::Debug;
use std::hash::Hash;

//=== Module Declarations =================================================

mod transition_queue;

//=== Public API ==========================================================

pub use transition_queue::TransitionQueue;

//=== Scene Key Trait =====================================================

/// Marker trait for scene identifiers.
///
/// Scene keys identify the scene a container was spawned into.
/// Typically implemented by game-specific enums.
pub trait SceneKey: Clone + Copy + Eq + Hash + Debug + Send + 'static {}

//=== Scene Transition ====================================================

/// Context transition requested by the embedding application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneTransition<K: SceneKey> {
    /// Unloads every loaded scene, then loads the given one.
    Load(K),

    /// Loads a scene alongside the ones already loaded.
    Additive(K),

    /// Unloads a specific scene.
    Unload(K),

    /// No transition occurs.
    Empty,
}

impl<K: SceneKey> Default for SceneTransition<K> {
    fn default() -> Self {
        Self::Empty
    }
}

//=== Tests ===============================================================
