//=========================================================================
// Plugins
//=========================================================================
//
// Registry and contract for everything that plugs into a scene.
//
//=========================================================================

mod plugin_cache;
mod scene_plugin;

pub use plugin_cache::{
    ObjectFactory, PluginCache, PluginFactory, CORE_DISPLAY_LIST, CORE_EVENT_EMITTER,
    CORE_GAME_OBJECT_FACTORY, CORE_UPDATE_LIST,
};
pub use scene_plugin::ScenePlugin;
