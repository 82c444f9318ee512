//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use lifecycle_singleton::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Host facade
pub use crate::host::{Host, HostBuilder};

// Singleton lifecycle
pub use crate::core::singleton::{DuplicatePolicy, LifecycleContext, LifecyclePhase, Singleton};

// Object graph
pub use crate::core::world::{ContainerId, InstanceId, World, WorldError};

// Scene system
pub use crate::core::scene::{SceneKey, SceneTransition};

// Diagnostics
pub use crate::core::diagnostics::LifecycleEvent;

// UI utilities
pub use crate::core::text::RichText;
pub use crate::core::tween::{TweenOptions, Tweening};
