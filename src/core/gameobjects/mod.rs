//=========================================================================
// Game Objects
//=========================================================================
//
// Scene entities and the arena that owns them.
//
// Architecture:
//   Systems
//     └─ objects: SlotMap<GameObjectId, GameObject>
//          ▲
//          └─ DisplayList / UpdateList / containers hold ids only
//
// An id outliving its object is harmless: lookups return `None` and
// every list pass skips it.
//
//=========================================================================

//=== Module Declarations =================================================

mod behavior;
mod capabilities;
mod game_object;

//=== Public API ==========================================================

pub use behavior::{Behavior, UpdateFlow};
pub use capabilities::{InteractiveState, ObjectState, PhysicsBody, RenderFlags};
pub use game_object::{GameObject, GameObjectEvent};

//=== Arena ===============================================================

slotmap::new_key_type! {
    /// Stable identity of a game object within its scene.
    pub struct GameObjectId;
}

/// Per-scene object arena.
pub type GameObjects = slotmap::SlotMap<GameObjectId, GameObject>;
