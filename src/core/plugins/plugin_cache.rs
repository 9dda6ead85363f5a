//=========================================================================
// Plugin Cache
//=========================================================================
//
// Explicit registry of core plugins, scene plugins and game object
// factories.
//
// Architecture:
//   PluginCache (built by the app, moved into the Game)
//     ├─ core:      key → mapping            (boot gate)
//     ├─ scene:     key → mapping + factory  (instantiated per scene)
//     └─ factories: kind → fn() -> GameObject
//
// There is no ambient global: every Game gets its own cache, so several
// games can coexist in one process (tests do this constantly).
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;
use std::fmt;

use log::{debug, warn};

//=== Internal Dependencies ===============================================

use super::ScenePlugin;
use crate::core::gameobjects::GameObject;

//=== Core Plugin Keys ====================================================

pub const CORE_EVENT_EMITTER: &str = "EventEmitter";
pub const CORE_DISPLAY_LIST: &str = "DisplayList";
pub const CORE_UPDATE_LIST: &str = "UpdateList";
pub const CORE_GAME_OBJECT_FACTORY: &str = "GameObjectFactory";

//=== Factory Types =======================================================

/// Builds a fresh plugin instance for one scene.
pub type PluginFactory = Box<dyn Fn() -> Box<dyn ScenePlugin>>;

/// Builds a game object of a registered kind.
pub type ObjectFactory = fn() -> GameObject;

//=== Entries =============================================================

struct ScenePluginEntry {
    key: String,
    mapping: String,
    default: bool,
    factory: PluginFactory,
}

//=== PluginCache =========================================================

pub struct PluginCache {
    core: HashMap<String, String>,
    scene: Vec<ScenePluginEntry>,
    factories: HashMap<String, ObjectFactory>,
}

impl PluginCache {
    //--- Construction -----------------------------------------------------

    /// Creates an empty cache. A game booted with it aborts; use
    /// [`with_core_plugins`](Self::with_core_plugins) for a working setup.
    pub fn new() -> Self {
        Self {
            core: HashMap::new(),
            scene: Vec::new(),
            factories: HashMap::new(),
        }
    }

    /// Creates a cache with the built-in core plugins and the container
    /// factory registered.
    pub fn with_core_plugins() -> Self {
        let mut cache = Self::new();
        cache.register_core(CORE_EVENT_EMITTER, "events");
        cache.register_core(CORE_DISPLAY_LIST, "displayList");
        cache.register_core(CORE_UPDATE_LIST, "updateList");
        cache.register_core(CORE_GAME_OBJECT_FACTORY, "add");
        cache.register_object_factory("Container", GameObject::container);
        cache
    }

    //--- Core Plugins -----------------------------------------------------

    pub fn register_core(&mut self, key: &str, mapping: &str) {
        if self.core.insert(key.to_string(), mapping.to_string()).is_some() {
            warn!("Core plugin '{}' was already registered and has been replaced", key);
        }
    }

    pub fn has_core(&self, key: &str) -> bool {
        self.core.contains_key(key)
    }

    /// Core keys from `required` that are not registered.
    pub fn missing_core(&self, required: &[&str]) -> Vec<String> {
        required
            .iter()
            .filter(|key| !self.has_core(key))
            .map(|key| key.to_string())
            .collect()
    }

    //--- Scene Plugins ----------------------------------------------------

    /// Registers a scene plugin under `key`, injected as `mapping`.
    ///
    /// `default` plugins are installed into every scene that does not list
    /// its plugins explicitly.
    pub fn register_scene_plugin<F>(&mut self, key: &str, mapping: &str, default: bool, factory: F)
    where
        F: Fn() -> Box<dyn ScenePlugin> + 'static,
    {
        let entry = ScenePluginEntry {
            key: key.to_string(),
            mapping: mapping.to_string(),
            default,
            factory: Box::new(factory),
        };

        if let Some(existing) = self.scene.iter_mut().find(|e| e.key == key) {
            warn!("Scene plugin '{}' was already registered and has been replaced", key);
            *existing = entry;
        } else {
            debug!("Registered scene plugin '{}' as '{}'", key, mapping);
            self.scene.push(entry);
        }
    }

    pub fn has_scene_plugin(&self, key: &str) -> bool {
        self.scene.iter().any(|entry| entry.key == key)
    }

    pub fn scene_plugin_mapping(&self, key: &str) -> Option<&str> {
        self.scene
            .iter()
            .find(|entry| entry.key == key)
            .map(|entry| entry.mapping.as_str())
    }

    /// Keys of the plugins every scene gets by default, in registration
    /// order.
    pub fn default_scene_plugins(&self) -> Vec<String> {
        self.scene
            .iter()
            .filter(|entry| entry.default)
            .map(|entry| entry.key.clone())
            .collect()
    }

    /// Builds a new instance of the plugin registered under `key`.
    ///
    /// Returns the mapping name together with the instance.
    pub fn instantiate(&self, key: &str) -> Option<(String, Box<dyn ScenePlugin>)> {
        self.scene
            .iter()
            .find(|entry| entry.key == key)
            .map(|entry| (entry.mapping.clone(), (entry.factory)()))
    }

    pub fn remove_scene_plugin(&mut self, key: &str) -> bool {
        let before = self.scene.len();
        self.scene.retain(|entry| entry.key != key);
        before != self.scene.len()
    }

    //--- Game Object Factories --------------------------------------------

    pub fn register_object_factory(&mut self, kind: &str, factory: ObjectFactory) {
        if self.factories.insert(kind.to_string(), factory).is_some() {
            warn!("Game object factory '{}' was already registered and has been replaced", kind);
        }
    }

    pub fn has_object_factory(&self, kind: &str) -> bool {
        self.factories.contains_key(kind)
    }

    /// Builds an object of `kind`, warning if the kind is not registered.
    pub fn create_object(&self, kind: &str) -> Option<GameObject> {
        match self.factories.get(kind) {
            Some(factory) => Some(factory()),
            None => {
                warn!("No game object factory registered for '{}'", kind);
                None
            }
        }
    }
}

impl Default for PluginCache {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for PluginCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scene: Vec<&str> = self.scene.iter().map(|entry| entry.key.as_str()).collect();
        let mut factories: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        factories.sort_unstable();
        f.debug_struct("PluginCache")
            .field("core", &self.core)
            .field("scene", &scene)
            .field("factories", &factories)
            .finish()
    }
}

//=========================================================================
// Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::any::Any;

    struct Tweens {
        booted: bool,
    }

    impl ScenePlugin for Tweens {
        fn boot(&mut self) {
            self.booted = true;
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    #[test]
    fn new_cache_has_no_core_plugins() {
        let cache = PluginCache::new();
        assert!(!cache.has_core(CORE_EVENT_EMITTER));
        assert_eq!(cache.missing_core(&[CORE_EVENT_EMITTER]), vec!["EventEmitter"]);
    }

    #[test]
    fn with_core_plugins_registers_builtins() {
        let cache = PluginCache::with_core_plugins();
        assert!(cache.missing_core(&[CORE_EVENT_EMITTER, CORE_DISPLAY_LIST, CORE_UPDATE_LIST]).is_empty());
        assert!(cache.has_object_factory("Container"));
    }

    #[test]
    fn scene_plugins_instantiate_fresh_instances() {
        let mut cache = PluginCache::new();
        cache.register_scene_plugin("TweenManager", "tweens", true, || {
            Box::new(Tweens { booted: false })
        });

        let (mapping, plugin) = cache.instantiate("TweenManager").expect("registered");
        assert_eq!(mapping, "tweens");
        let tweens = plugin.as_any().downcast_ref::<Tweens>().expect("tweens plugin");
        assert!(!tweens.booted);

        assert!(cache.instantiate("Physics").is_none());
        assert_eq!(cache.default_scene_plugins(), vec!["TweenManager"]);
    }

    #[test]
    fn re_registering_replaces_entry() {
        let mut cache = PluginCache::new();
        cache.register_scene_plugin("Tweens", "tweens", true, || Box::new(Tweens { booted: false }));
        cache.register_scene_plugin("Tweens", "tw", false, || Box::new(Tweens { booted: false }));

        assert_eq!(cache.scene_plugin_mapping("Tweens"), Some("tw"));
        assert!(cache.default_scene_plugins().is_empty());
        assert!(cache.remove_scene_plugin("Tweens"));
        assert!(!cache.has_scene_plugin("Tweens"));
    }

    #[test]
    fn unknown_object_factory_yields_nothing() {
        let cache = PluginCache::with_core_plugins();
        assert!(cache.create_object("Spine").is_none());
        assert!(cache.create_object("Container").is_some_and(|object| object.is_container()));
    }
}
