//=========================================================================
// Scene System
//=========================================================================
//
// Scene lifecycle, per-scene systems and cross-scene orchestration.
//
// Architecture:
//   SceneManager<S>
//     └─ scenes (render order)
//          ├─ Box<dyn Scene<S>>   user hooks
//          └─ Systems<S>          state machine, lists, objects, plugins
//
// Flow:
//   SceneManager::update() → Systems::step() → Scene::update()
//   SceneManager::render() → Systems::render() → Renderer::render()
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::data::DataValue;

//=== Module Declarations =================================================

mod event;
mod scene_manager;
mod settings;
mod systems;
mod transition_queue;

//=== Public API ==========================================================

pub use event::SceneEvent;
pub use scene_manager::{SceneKey, SceneManager, SceneTransition, TransitionConfig};
pub use settings::{SceneConfig, SceneSettings, SceneStatus};
pub use systems::Systems;

//=== Scene Trait =========================================================

/// Defines scene behavior with lifecycle hooks and update logic.
///
/// Scenes are registered in the SceneManager and own their state between
/// runs. Every hook receives the scene's `Systems`, which holds its
/// objects, lists, events and plugins.
///
/// # Minimal Implementation
///
/// Only `update()` is required. Lifecycle hooks have default empty implementations:
///
/// ```rust
/// # use stagecraft::prelude::*;
/// # #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// # enum GameScene { Main }
/// # impl SceneKey for GameScene {}
/// struct MyScene;
///
/// impl Scene<GameScene> for MyScene {
///     fn update(&mut self, sys: &mut Systems<GameScene>, time: f64, delta: f64) {
///         // Only this method is required
///     }
/// }
/// ```
pub trait Scene<S: SceneKey> {
    /// Registration options. Read once, when the scene is created.
    fn config(&self) -> SceneConfig {
        SceneConfig::default()
    }

    /// Called first on every start, with the start data.
    fn init(&mut self, _sys: &mut Systems<S>, _data: Option<&DataValue>) {}

    /// Called after `init` while the scene is LOADING.
    fn preload(&mut self, _sys: &mut Systems<S>) {}

    /// Called once loading finished; build the scene's objects here.
    fn create(&mut self, _sys: &mut Systems<S>, _data: Option<&DataValue>) {}

    /// Called every frame while the scene is running, after the objects'
    /// `pre_update` pass.
    fn update(&mut self, sys: &mut Systems<S>, time: f64, delta: f64);
}
