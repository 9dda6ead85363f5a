//=========================================================================
// Scene Plugin Trait
//=========================================================================
//
// Contract for feature plugins (physics, input, tweens...) installed into
// each scene by `Systems::init`.
//
// Plugins are booted once, see every scene event before user listeners,
// and clean up after themselves on SHUTDOWN/DESTROY. Typed access from
// scene code goes through `Any` downcasting on the plugin's mapping name.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::any::Any;

//=== Internal Dependencies ===============================================

use crate::core::gameobjects::GameObjectId;
use crate::core::scene::SceneEvent;

//=== ScenePlugin =========================================================

pub trait ScenePlugin: Any {
    /// One-time setup. `Systems` guarantees a single call per instance.
    fn boot(&mut self) {}

    /// Every scene event, delivered before the scene's own listeners.
    fn on_scene_event(&mut self, _event: &SceneEvent) {}

    /// A game object of this scene was destroyed.
    ///
    /// Input and physics plugins drop whatever they track for it here.
    fn object_destroyed(&mut self, _id: GameObjectId) {}

    /// Downcasts to `&dyn Any` for typed lookup.
    fn as_any(&self) -> &dyn Any;

    /// Downcasts to `&mut dyn Any` for typed lookup.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}
