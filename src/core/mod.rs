//=========================================================================
// Core Systems
//
// Everything the game loop drives, independent of any window or renderer.
//
// Layout:
// - `structs`, `events`, `data`: building blocks (ordered list, typed
//   emitter, key/value store)
// - `gameobjects`, `display`, `update`: entities and the two per-scene
//   lists that draw and tick them
// - `plugins`, `scene`: plugin registry and the scene state machine
// - `time_step`, `textures`: game-wide frame clock and texture readiness
//
//=========================================================================

pub mod data;
pub mod display;
pub mod events;
pub mod gameobjects;
pub mod plugins;
pub mod scene;
pub mod structs;
pub mod textures;
pub mod time_step;
pub mod update;
