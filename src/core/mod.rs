//=========================================================================
// Core Systems
//
// Building blocks driven by the `Host`.
//
// Modules:
// - `world`       containers, capabilities and instance identity
// - `singleton`   per-type lifecycle registry and the `Singleton` trait
// - `scene`       scene keys and queued transitions
// - `diagnostics` frame-tagged log lines and lifecycle events
// - `text`        rich-text markup helpers
// - `tween`       tweening collaborator interface
//
//=========================================================================

pub mod diagnostics;
pub mod scene;
pub mod singleton;
pub mod text;
pub mod tween;
pub mod world;
