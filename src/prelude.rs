//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use stagecraft::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Game root
pub use crate::config::{FpsConfig, GameConfig};
pub use crate::error::GameError;
pub use crate::game::{Game, GameBuilder, GameEvent, GameHandle};

// Scene system
pub use crate::core::scene::{
    Scene, SceneConfig, SceneEvent, SceneKey, SceneManager, SceneStatus, SceneTransition, Systems,
    TransitionConfig,
};

// Game objects and lists
pub use crate::core::display::{DisplayList, DisplayOwner};
pub use crate::core::gameobjects::{Behavior, GameObject, GameObjectEvent, GameObjectId, UpdateFlow};
pub use crate::core::update::UpdateList;

// Events, data and plugins
pub use crate::core::data::{DataManager, DataValue};
pub use crate::core::events::{EventEmitter, NamedEvent};
pub use crate::core::plugins::{PluginCache, ScenePlugin};

// Rendering
pub use crate::renderer::{RenderPass, Renderer};
