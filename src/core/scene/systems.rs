//=========================================================================
// Scene Systems
//=========================================================================
//
// Per-scene state machine and dependency context.
//
// Architecture:
//   Systems<S>
//     ├─ settings:     SceneSettings<S>   (status, active, visible)
//     ├─ objects:      GameObjects        (arena, owns every object)
//     ├─ display_list: DisplayList        (ids, render order)
//     ├─ update_list:  UpdateList         (ids, pre_update order)
//     ├─ events:       EventEmitter<SceneEvent>
//     ├─ plugins:      installed ScenePlugins, by mapping
//     └─ operations:   scene ops for the SceneManager (next frame)
//
// Frame:
//   step()   → merge → PRE_UPDATE → pre_update pass → UPDATE
//              → Scene::update → POST_UPDATE → deferred destroys
//   render() → depth sort → PRE_RENDER → Renderer::render → RENDER
//
// Every status change updates settings first and emits one event after.
// Plugins see each event before the scene's listeners.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::rc::Rc;

use log::{debug, trace, warn};

//=== Internal Dependencies ===============================================

use super::{Scene, SceneConfig, SceneEvent, SceneKey, SceneSettings, SceneStatus, SceneTransition, TransitionConfig};
use super::transition_queue::TransitionQueue;
use crate::core::data::DataValue;
use crate::core::display::{DisplayList, DisplayOwner};
use crate::core::events::EventEmitter;
use crate::core::gameobjects::{GameObject, GameObjectEvent, GameObjectId, GameObjects};
use crate::core::plugins::{PluginCache, ScenePlugin, CORE_DISPLAY_LIST, CORE_UPDATE_LIST};
use crate::core::update::UpdateList;
use crate::renderer::{RenderPass, Renderer};

//=== Installed Plugin ====================================================

struct InstalledPlugin {
    key: String,
    mapping: String,
    plugin: Box<dyn ScenePlugin>,
}

//=== Systems =============================================================

pub struct Systems<S: SceneKey> {
    settings: SceneSettings<S>,
    objects: GameObjects,
    display_list: DisplayList,
    update_list: UpdateList,
    events: EventEmitter<SceneEvent>,
    plugins: Vec<InstalledPlugin>,
    cache: Rc<PluginCache>,
    operations: TransitionQueue<S>,
}

impl<S: SceneKey> Systems<S> {
    //--- Construction -----------------------------------------------------

    /// Creates the record for a freshly registered scene (status Pending).
    pub fn new(key: S, config: &SceneConfig, cache: Rc<PluginCache>) -> Self {
        Self {
            settings: SceneSettings::new(key, config),
            objects: GameObjects::with_key(),
            display_list: DisplayList::new(),
            update_list: UpdateList::new(),
            events: EventEmitter::new(),
            plugins: Vec::new(),
            cache,
            operations: TransitionQueue::new(),
        }
    }

    /// Installs the scene's plugins and emits BOOT.
    ///
    /// Runs once; a destroyed record refuses it.
    pub fn init(&mut self) -> bool {
        let key = self.settings.key;
        if self.settings.status == SceneStatus::Destroyed {
            warn!("Cannot init destroyed scene {:?}", key);
            return false;
        }
        if self.settings.is_booted {
            debug!("Scene {:?} is already initialised", key);
            return false;
        }

        for core in [CORE_DISPLAY_LIST, CORE_UPDATE_LIST] {
            if !self.cache.has_core(core) {
                warn!("Scene {:?}: core plugin '{}' is not registered, continuing without it", key, core);
            }
        }

        let requested = self
            .settings
            .plugins
            .clone()
            .unwrap_or_else(|| self.cache.default_scene_plugins());
        for plugin_key in &requested {
            self.install_plugin(plugin_key);
        }

        self.settings.status = SceneStatus::Init;
        self.settings.is_booted = true;
        debug!("Scene {:?} initialised with {} plugin(s)", key, self.plugins.len());
        self.emit(SceneEvent::Boot);
        true
    }

    /// Instantiates and boots the cache plugin `key` for this scene.
    ///
    /// Unknown keys and mapping clashes are skipped with a warning.
    pub fn install_plugin(&mut self, key: &str) -> bool {
        let scene = self.settings.key;
        if self.plugins.iter().any(|installed| installed.key == key) {
            warn!("Scene {:?}: plugin '{}' is already installed", scene, key);
            return false;
        }

        let Some((mapping, mut plugin)) = self.cache.instantiate(key) else {
            warn!("Scene {:?}: unknown scene plugin '{}', skipped", scene, key);
            return false;
        };

        if self.plugins.iter().any(|installed| installed.mapping == mapping) {
            warn!(
                "Scene {:?}: mapping '{}' is already taken, plugin '{}' skipped",
                scene, mapping, key
            );
            return false;
        }

        plugin.boot();
        trace!("Scene {:?}: installed plugin '{}' as '{}'", scene, key, mapping);
        self.plugins.push(InstalledPlugin {
            key: key.to_string(),
            mapping,
            plugin,
        });
        true
    }

    //--- Lifecycle --------------------------------------------------------

    /// Marks the scene started and visible; emits START then READY.
    pub fn start(&mut self, data: Option<DataValue>) -> bool {
        if self.settings.status == SceneStatus::Destroyed {
            warn!("Cannot start destroyed scene {:?}", self.settings.key);
            return false;
        }

        if data.is_some() {
            self.settings.data = data;
        }
        self.settings.status = SceneStatus::Start;
        self.settings.active = true;
        self.settings.visible = true;

        self.emit(SceneEvent::Start);
        let data = self.settings.data.clone();
        self.emit(SceneEvent::Ready { data });
        true
    }

    /// Stops updates while keeping the scene visible.
    ///
    /// Only a creating or running scene can pause.
    pub fn pause(&mut self, data: Option<DataValue>) -> bool {
        let status = self.settings.status;
        if status != SceneStatus::Creating && status != SceneStatus::Running {
            warn!("Cannot pause non-running scene {:?} ({:?})", self.settings.key, status);
            return false;
        }
        if !self.settings.active {
            return false;
        }

        self.settings.status = SceneStatus::Paused;
        self.settings.active = false;
        self.emit(SceneEvent::Pause { data });
        true
    }

    /// Resumes an inactive scene.
    pub fn resume(&mut self, data: Option<DataValue>) -> bool {
        if self.settings.status == SceneStatus::Destroyed {
            warn!("Cannot resume destroyed scene {:?}", self.settings.key);
            return false;
        }
        if self.settings.active {
            return false;
        }

        self.settings.status = SceneStatus::Running;
        self.settings.active = true;
        self.emit(SceneEvent::Resume { data });
        true
    }

    /// Stops updates and rendering. Same guard as [`pause`](Self::pause).
    pub fn sleep(&mut self, data: Option<DataValue>) -> bool {
        let status = self.settings.status;
        if status != SceneStatus::Creating && status != SceneStatus::Running {
            warn!("Cannot sleep non-running scene {:?} ({:?})", self.settings.key, status);
            return false;
        }

        self.settings.status = SceneStatus::Sleeping;
        self.settings.active = false;
        self.settings.visible = false;
        self.emit(SceneEvent::Sleep { data });
        true
    }

    /// Brings the scene back to running, visible and active.
    pub fn wake(&mut self, data: Option<DataValue>) -> bool {
        if self.settings.status == SceneStatus::Destroyed {
            warn!("Cannot wake destroyed scene {:?}", self.settings.key);
            return false;
        }

        self.settings.status = SceneStatus::Running;
        self.settings.active = true;
        self.settings.visible = true;
        self.emit(SceneEvent::Wake { data });

        if self.settings.is_transition {
            let duration = self.settings.transition_duration;
            self.emit(SceneEvent::TransitionWake { duration });
        }
        true
    }

    /// Tears down the scene's content; the scene can be started again.
    pub fn shutdown(&mut self, data: Option<DataValue>) -> bool {
        if self.settings.status == SceneStatus::Destroyed {
            warn!("Cannot shut down destroyed scene {:?}", self.settings.key);
            return false;
        }
        if self.settings.status == SceneStatus::Shutdown {
            debug!("Scene {:?} is already shut down", self.settings.key);
            return false;
        }

        for name in SceneEvent::TRANSITION_EVENTS {
            self.events.off_named(name);
        }

        self.settings.status = SceneStatus::Shutdown;
        self.settings.active = false;
        self.settings.visible = false;

        self.teardown_lists();
        debug!("Scene {:?} shut down", self.settings.key);
        self.emit(SceneEvent::Shutdown { data });
        true
    }

    /// Final teardown. The record is unusable afterwards.
    pub fn destroy(&mut self) -> bool {
        if self.settings.status == SceneStatus::Destroyed {
            debug!("Scene {:?} is already destroyed", self.settings.key);
            return false;
        }

        self.settings.status = SceneStatus::Destroyed;
        self.settings.active = false;
        self.settings.visible = false;
        self.settings.clear_transition();

        self.teardown_lists();
        self.emit(SceneEvent::Destroy);

        self.events.remove_all_listeners();
        self.plugins.clear();
        self.update_list.destroy();
        self.display_list.clear();
        self.objects.clear();
        self.operations.clear();

        debug!("Scene {:?} destroyed", self.settings.key);
        true
    }

    /// Destroys every display member and empties the update list.
    fn teardown_lists(&mut self) {
        // Each destroy shrinks the list, so always take the head.
        while let Some(first) = self.display_list.first() {
            if !self.destroy_object(first, true) && !self.remove_from_display_list(first) {
                self.display_list.remove(first);
            }
        }

        let listed = self.update_list.get_active().iter().chain(self.update_list.pending());
        for &id in listed {
            if let Some(object) = self.objects.get_mut(id) {
                object.update_listed = false;
            }
        }
        self.update_list.shutdown();
    }

    //--- Frame ------------------------------------------------------------

    /// Runs one update pass for this scene.
    pub fn step(&mut self, scene: &mut dyn Scene<S>, time: f64, delta: f64) {
        self.update_list.merge();

        self.emit(SceneEvent::PreUpdate { time, delta });
        let doomed = self.update_list.run(&mut self.objects, time, delta);

        self.emit(SceneEvent::Update { time, delta });
        scene.update(self, time, delta);
        self.emit(SceneEvent::PostUpdate { time, delta });

        for id in doomed {
            self.destroy_object(id, false);
        }
    }

    /// Hands the depth-sorted display list to the renderer.
    pub fn render(&mut self, renderer: &mut dyn Renderer) {
        self.display_list.depth_sort(&self.objects);
        self.sort_containers();

        self.emit(SceneEvent::PreRender);
        renderer.render(&RenderPass {
            children: self.display_list.get_children(),
            objects: &self.objects,
        });
        self.emit(SceneEvent::Render);
    }

    fn sort_containers(&mut self) {
        let dirty: Vec<GameObjectId> = self
            .objects
            .iter()
            .filter(|(_, object)| object.children.as_ref().is_some_and(DisplayList::needs_depth_sort))
            .map(|(id, _)| id)
            .collect();

        for id in dirty {
            let Some(mut children) = self.objects.get_mut(id).and_then(|object| object.children.take()) else {
                continue;
            };
            children.depth_sort(&self.objects);
            if let Some(object) = self.objects.get_mut(id) {
                object.children = Some(children);
            }
        }
    }

    //--- Objects ----------------------------------------------------------

    /// Inserts `object` and puts it on the display list, plus the update
    /// list if it has a behavior.
    pub fn add(&mut self, object: GameObject) -> GameObjectId {
        let id = self.objects.insert(object);
        self.add_to_display_list(id, None);
        self.add_to_update_list(id);
        id
    }

    /// Inserts `object` without listing it anywhere.
    pub fn make(&mut self, object: GameObject) -> GameObjectId {
        self.objects.insert(object)
    }

    /// Builds an object of a registered kind and adds it.
    pub fn spawn(&mut self, kind: &str) -> Option<GameObjectId> {
        let object = self.cache.create_object(kind)?;
        Some(self.add(object))
    }

    /// Destroys an object exactly once.
    ///
    /// Returns false if the object is already gone or ignores destroy.
    pub fn destroy_object(&mut self, id: GameObjectId, from_scene: bool) -> bool {
        let Some(object) = self.objects.get_mut(id) else {
            return false;
        };
        if object.ignores_destroy() {
            trace!("Object {:?} ignores destroy", id);
            return false;
        }

        object.run_pre_destroy();
        object.emit(GameObjectEvent::Destroy { from_scene });
        object.events_mut().remove_all_listeners();

        self.remove_from_display_list(id);
        self.remove_from_update_list(id);

        let children = self.objects.get_mut(id).and_then(|object| object.children.take());
        if let Some(children) = children {
            for &child in children.get_children() {
                if !self.destroy_object(child, from_scene) {
                    if let Some(survivor) = self.objects.get_mut(child) {
                        survivor.display_owner = None;
                    }
                }
            }
        }

        let had_input = self
            .objects
            .get_mut(id)
            .is_some_and(GameObject::release_resources);
        for installed in &mut self.plugins {
            installed.plugin.object_destroyed(id);
        }
        if had_input {
            trace!("Object {:?} released its input state", id);
        }

        self.objects.remove(id);
        true
    }

    pub fn object(&self, id: GameObjectId) -> Option<&GameObject> {
        self.objects.get(id)
    }

    pub fn object_mut(&mut self, id: GameObjectId) -> Option<&mut GameObject> {
        self.objects.get_mut(id)
    }

    pub fn objects(&self) -> &GameObjects {
        &self.objects
    }

    /// Changes depth and queues a sort on whichever list holds the object.
    pub fn set_depth(&mut self, id: GameObjectId, depth: f32) -> bool {
        let Some(object) = self.objects.get_mut(id) else {
            return false;
        };
        object.set_depth_value(depth);
        let owner = object.display_owner();

        if let Some(list) = owner.and_then(|owner| self.owner_list_mut(owner)) {
            list.queue_depth_sort();
        }
        true
    }

    /// Index chain from the scene list down through parent containers.
    ///
    /// Empty when the object is not on any display list.
    pub fn index_path(&self, id: GameObjectId) -> Vec<usize> {
        let mut path = Vec::new();
        let mut current = id;

        while let Some(owner) = self.objects.get(current).and_then(GameObject::display_owner) {
            match owner {
                DisplayOwner::Scene => {
                    if let Some(index) = self.display_list.get_index(current) {
                        path.push(index);
                    }
                    break;
                }
                DisplayOwner::Container(parent) => {
                    let index = self
                        .objects
                        .get(parent)
                        .and_then(|parent| parent.children.as_ref())
                        .and_then(|children| children.get_index(current));
                    let Some(index) = index else {
                        warn!("Object {:?} claims parent {:?}, which does not list it", current, parent);
                        break;
                    };
                    path.push(index);
                    current = parent;
                }
            }
        }

        path.reverse();
        path
    }

    //--- Display Membership -----------------------------------------------

    /// Puts the object on `target` (the scene list by default).
    ///
    /// An object already held elsewhere is detached first. Emits
    /// ADDED_TO_SCENE on the object, then on the scene.
    pub fn add_to_display_list(&mut self, id: GameObjectId, target: Option<DisplayOwner>) -> bool {
        let target = target.unwrap_or(DisplayOwner::Scene);
        let Some(current) = self.objects.get(id).map(GameObject::display_owner) else {
            warn!("Cannot list unknown object {:?}", id);
            return false;
        };
        if current == Some(target) {
            return false;
        }
        if let DisplayOwner::Container(parent) = target {
            if !self.can_parent(id, parent) {
                return false;
            }
        }

        if current.is_some() {
            self.remove_from_display_list(id);
        }

        if let Some(list) = self.owner_list_mut(target) {
            list.add(id);
        }
        if let Some(object) = self.objects.get_mut(id) {
            object.display_owner = Some(target);
            object.emit(GameObjectEvent::AddedToScene);
        }
        self.emit(SceneEvent::AddedToScene(id));
        true
    }

    /// Takes the object off whichever list holds it. Emits
    /// REMOVED_FROM_SCENE on the object, then on the scene.
    pub fn remove_from_display_list(&mut self, id: GameObjectId) -> bool {
        let Some(owner) = self.objects.get(id).and_then(GameObject::display_owner) else {
            return false;
        };

        if let Some(list) = self.owner_list_mut(owner) {
            list.remove(id);
        }
        if let Some(object) = self.objects.get_mut(id) {
            object.display_owner = None;
            object.emit(GameObjectEvent::RemovedFromScene);
        }
        self.emit(SceneEvent::RemovedFromScene(id));
        true
    }

    fn can_parent(&self, id: GameObjectId, parent: GameObjectId) -> bool {
        match self.objects.get(parent) {
            Some(object) if object.is_container() => {}
            _ => {
                warn!("Cannot parent {:?} to {:?}: not a container in this scene", id, parent);
                return false;
            }
        }

        let mut cursor = Some(parent);
        while let Some(ancestor) = cursor {
            if ancestor == id {
                warn!("Cannot parent {:?} to its own descendant {:?}", id, parent);
                return false;
            }
            cursor = match self.objects.get(ancestor).and_then(GameObject::display_owner) {
                Some(DisplayOwner::Container(next)) => Some(next),
                _ => None,
            };
        }
        true
    }

    fn owner_list_mut(&mut self, owner: DisplayOwner) -> Option<&mut DisplayList> {
        match owner {
            DisplayOwner::Scene => Some(&mut self.display_list),
            DisplayOwner::Container(parent) => self
                .objects
                .get_mut(parent)
                .and_then(|object| object.children.as_mut()),
        }
    }

    pub fn display_list(&self) -> &DisplayList {
        &self.display_list
    }

    //--- Ordering ---------------------------------------------------------

    /// Applies `reorder` to the list holding `id`.
    fn reorder<F>(&mut self, id: GameObjectId, reorder: F) -> bool
    where
        F: FnOnce(&mut DisplayList, GameObjectId) -> bool,
    {
        let owner = self.objects.get(id).and_then(GameObject::display_owner);
        match owner.and_then(|owner| self.owner_list_mut(owner)) {
            Some(list) => reorder(list, id),
            None => false,
        }
    }

    pub fn bring_to_top(&mut self, id: GameObjectId) -> bool {
        self.reorder(id, DisplayList::bring_to_top)
    }

    pub fn send_to_back(&mut self, id: GameObjectId) -> bool {
        self.reorder(id, DisplayList::send_to_back)
    }

    pub fn move_up(&mut self, id: GameObjectId) -> bool {
        self.reorder(id, DisplayList::move_up)
    }

    pub fn move_down(&mut self, id: GameObjectId) -> bool {
        self.reorder(id, DisplayList::move_down)
    }

    /// Swaps two objects held by the same list.
    pub fn swap(&mut self, a: GameObjectId, b: GameObjectId) -> bool {
        let owner_a = self.objects.get(a).and_then(GameObject::display_owner);
        let owner_b = self.objects.get(b).and_then(GameObject::display_owner);
        if owner_a.is_none() || owner_a != owner_b {
            return false;
        }
        self.reorder(a, |list, a| list.swap(a, b))
    }

    pub fn queue_depth_sort(&mut self) {
        self.display_list.queue_depth_sort();
    }

    /// Sorts the scene list now if a sort is queued.
    pub fn depth_sort(&mut self) -> bool {
        self.display_list.depth_sort(&self.objects)
    }

    //--- Update Membership ------------------------------------------------

    /// Stages the object for `pre_update`. Objects without a behavior are
    /// never listed.
    pub fn add_to_update_list(&mut self, id: GameObjectId) -> bool {
        let Some(object) = self.objects.get_mut(id) else {
            return false;
        };
        if !object.has_behavior() || object.update_listed {
            return false;
        }

        object.update_listed = true;
        self.update_list.add(id);
        true
    }

    pub fn remove_from_update_list(&mut self, id: GameObjectId) -> bool {
        let Some(object) = self.objects.get_mut(id) else {
            return false;
        };
        if !object.update_listed {
            return false;
        }

        object.update_listed = false;
        self.update_list.remove(id);
        true
    }

    pub fn update_list(&self) -> &UpdateList {
        &self.update_list
    }

    //--- Events -----------------------------------------------------------

    pub fn events_mut(&mut self) -> &mut EventEmitter<SceneEvent> {
        &mut self.events
    }

    pub fn events(&self) -> &EventEmitter<SceneEvent> {
        &self.events
    }

    pub(crate) fn emit(&mut self, event: SceneEvent) {
        for installed in &mut self.plugins {
            installed.plugin.on_scene_event(&event);
        }
        self.events.emit(&event);
    }

    //--- Plugins ----------------------------------------------------------

    /// Typed access to the plugin installed under `mapping`.
    pub fn plugin<T: 'static>(&self, mapping: &str) -> Option<&T> {
        self.plugins
            .iter()
            .find(|installed| installed.mapping == mapping)
            .and_then(|installed| installed.plugin.as_any().downcast_ref::<T>())
    }

    pub fn plugin_mut<T: 'static>(&mut self, mapping: &str) -> Option<&mut T> {
        self.plugins
            .iter_mut()
            .find(|installed| installed.mapping == mapping)
            .and_then(|installed| installed.plugin.as_any_mut().downcast_mut::<T>())
    }

    pub fn has_plugin(&self, mapping: &str) -> bool {
        self.plugins.iter().any(|installed| installed.mapping == mapping)
    }

    pub fn plugin_mappings(&self) -> impl Iterator<Item = &str> {
        self.plugins.iter().map(|installed| installed.mapping.as_str())
    }

    //--- Scene Operations -------------------------------------------------

    /// Queues a scene operation; the manager applies it next frame.
    pub fn queue_op(&mut self, op: SceneTransition<S>) {
        self.operations.push(op);
    }

    pub fn start_scene(&mut self, key: S, data: Option<DataValue>) {
        self.queue_op(SceneTransition::Start(key, data));
    }

    pub fn stop_scene(&mut self, key: S) {
        self.queue_op(SceneTransition::Stop(key, None));
    }

    /// Restarts this scene next frame.
    pub fn restart(&mut self, data: Option<DataValue>) {
        self.start_scene(self.settings.key, data);
    }

    /// Sleeps this scene and runs `target` next frame.
    pub fn switch_to(&mut self, target: S, data: Option<DataValue>) {
        self.queue_op(SceneTransition::Switch(self.settings.key, target, data));
    }

    /// Starts a timed transition from this scene to `config.target`.
    pub fn transition_to(&mut self, config: TransitionConfig<S>) {
        self.queue_op(SceneTransition::Transition(self.settings.key, config));
    }

    pub(crate) fn take_operations(&mut self) -> Vec<SceneTransition<S>> {
        self.operations.take()
    }

    //--- Queries ----------------------------------------------------------

    pub fn key(&self) -> S {
        self.settings.key
    }

    pub fn status(&self) -> SceneStatus {
        self.settings.status
    }

    pub fn settings(&self) -> &SceneSettings<S> {
        &self.settings
    }

    pub(crate) fn settings_mut(&mut self) -> &mut SceneSettings<S> {
        &mut self.settings
    }

    /// Data from the latest `start`, or the registration config.
    pub fn data(&self) -> Option<&DataValue> {
        self.settings.data.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.settings.status == SceneStatus::Running
    }

    pub fn is_paused(&self) -> bool {
        self.settings.status == SceneStatus::Paused
    }

    pub fn is_sleeping(&self) -> bool {
        self.settings.status == SceneStatus::Sleeping
    }

    pub fn is_visible(&self) -> bool {
        self.settings.visible
    }

    pub fn can_input(&self) -> bool {
        let status = self.settings.status;
        status > SceneStatus::Pending && status <= SceneStatus::Running
    }

    pub fn is_transitioning(&self) -> bool {
        self.settings.is_transition || self.settings.transition_target.is_some()
    }

    pub fn is_transition_in(&self) -> bool {
        self.settings.is_transition
    }

    pub fn is_transition_out(&self) -> bool {
        self.settings.transition_target.is_some()
    }

    pub fn set_visible(&mut self, visible: bool) -> &mut Self {
        self.settings.visible = visible;
        self
    }

    /// Resumes when `active`, pauses otherwise.
    pub fn set_active(&mut self, active: bool, data: Option<DataValue>) -> bool {
        if active {
            self.resume(data)
        } else {
            self.pause(data)
        }
    }
}

impl<S: SceneKey> std::fmt::Debug for Systems<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Systems")
            .field("key", &self.settings.key)
            .field("status", &self.settings.status)
            .field("active", &self.settings.active)
            .field("visible", &self.settings.visible)
            .field("objects", &self.objects.len())
            .field("plugins", &self.plugins.iter().map(|p| p.mapping.as_str()).collect::<Vec<_>>())
            .finish()
    }
}

//=========================================================================
// Tests
//=========================================================================
