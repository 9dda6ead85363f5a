//=========================================================================
// Renderer Interface
//=========================================================================
//
// Boundary between the lifecycle core and whatever draws pixels.
//
// Per frame (normal path):
//   Game::step
//     ├─ renderer.pre_render()
//     ├─ for each visible scene: renderer.render(&RenderPass)
//     └─ renderer.post_render()
//
// The core never inspects pixels; it only guarantees call order and that
// `children` is already depth-sorted.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::gameobjects::{GameObject, GameObjectId, GameObjects};

//=== RenderPass ==========================================================

/// Read-only view of one scene's display list for a single draw.
pub struct RenderPass<'a> {
    pub children: &'a [GameObjectId],
    pub objects: &'a GameObjects,
}

impl<'a> RenderPass<'a> {
    /// Top-level children in draw order, skipping stale ids.
    pub fn iter(&self) -> impl Iterator<Item = (GameObjectId, &'a GameObject)> + 'a {
        let objects = self.objects;
        self.children
            .iter()
            .filter_map(move |&id| objects.get(id).map(|object| (id, object)))
    }

    /// Resolves any id, including container children.
    pub fn get(&self, id: GameObjectId) -> Option<&'a GameObject> {
        self.objects.get(id)
    }
}

//=== Renderer Trait ======================================================

pub trait Renderer {
    /// Called once per frame before any scene draws.
    fn pre_render(&mut self) {}

    /// Draws one scene.
    fn render(&mut self, pass: &RenderPass<'_>);

    /// Called once per frame after every scene drew.
    fn post_render(&mut self) {}

    /// Releases GPU/canvas resources. Called once during game teardown.
    fn destroy(&mut self) {}
}
