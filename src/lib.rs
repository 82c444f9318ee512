//=========================================================================
// Lifecycle Singleton - Library Root
//
// Host-driven singleton capabilities: at most one live instance per type,
// duplicate detection, scene persistence and teardown guards.
//
// Responsibilities:
// - Expose the host facade (`Host`, `HostBuilder`)
// - Expose the object graph, registry and diagnostics under `core`
//
// Typical usage:
// ```no_run
// use lifecycle_singleton::prelude::*;
//
// let mut host = HostBuilder::<MyScene>::new().build();
// loop {
//     host.tick();
// }
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` holds the world model, singleton registry, scenes and
// diagnostics. Most applications only need the `Host` facade.
//
pub mod core;
pub mod prelude;

//--- Internal Modules ----------------------------------------------------

mod host;

//--- Public Exports ------------------------------------------------------

pub use host::{Host, HostBuilder};
