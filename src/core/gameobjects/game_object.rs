//=========================================================================
// Game Object
//=========================================================================
//
// Base entity placed in a scene.
//
// A `GameObject` value is created on its own (`GameObject::new`) and
// joins a scene when it is inserted into that scene's object arena
// (`Systems::add` / `Systems::make`). Everything that needs the arena or
// the scene lists (display membership, update membership, destroy) is
// driven through `Systems`; this type holds identity, flags and the
// optional capabilities.
//
// Capability composition:
//   GameObject
//     ├─ behavior:  Option<Box<dyn Behavior>>    → update list eligible
//     ├─ children:  Option<DisplayList>          → container
//     ├─ data:      Option<DataManager>
//     ├─ input:     Option<InteractiveState>
//     └─ body:      Option<Box<dyn PhysicsBody>>
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;

//=== Internal Dependencies ===============================================

use super::{Behavior, GameObjectId, InteractiveState, ObjectState, PhysicsBody, RenderFlags, UpdateFlow};
use crate::core::data::{DataManager, DataValue};
use crate::core::display::{DisplayList, DisplayOwner};
use crate::core::events::{EventEmitter, NamedEvent};

//=== GameObjectEvent =====================================================

/// Events emitted on an object's own emitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameObjectEvent {
    /// Joined a display list.
    AddedToScene,

    /// Left a display list.
    RemovedFromScene,

    /// Being destroyed; `from_scene` is set when the scene tore it down.
    Destroy { from_scene: bool },
}

impl NamedEvent for GameObjectEvent {
    fn name(&self) -> &'static str {
        match self {
            GameObjectEvent::AddedToScene => "addedtoscene",
            GameObjectEvent::RemovedFromScene => "removedfromscene",
            GameObjectEvent::Destroy { .. } => "destroy",
        }
    }
}

//=== GameObject ==========================================================

pub struct GameObject {
    kind: String,
    name: String,
    active: bool,
    render_flags: RenderFlags,
    camera_filter: u32,
    state: ObjectState,
    depth: f32,
    ignore_destroy: bool,
    post_pipelines: Vec<String>,

    pub(crate) display_owner: Option<DisplayOwner>,
    pub(crate) update_listed: bool,
    pub(crate) children: Option<DisplayList>,

    data: Option<DataManager>,
    input: Option<InteractiveState>,
    body: Option<Box<dyn PhysicsBody>>,
    behavior: Option<Box<dyn Behavior>>,
    events: EventEmitter<GameObjectEvent>,
}

impl GameObject {
    //--- Construction -----------------------------------------------------

    /// Creates a detached object tagged with `kind` (e.g. `"Sprite"`).
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            name: String::new(),
            active: true,
            render_flags: RenderFlags::default(),
            camera_filter: 0,
            state: ObjectState::default(),
            depth: 0.0,
            ignore_destroy: false,
            post_pipelines: Vec::new(),
            display_owner: None,
            update_listed: false,
            children: None,
            data: None,
            input: None,
            body: None,
            behavior: None,
            events: EventEmitter::new(),
        }
    }

    /// Creates an empty container object.
    pub fn container() -> Self {
        Self::new("Container").with_children()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the initial depth. Use `Systems::set_depth` once the object is
    /// listed so its display list re-sorts.
    pub fn with_depth(mut self, depth: f32) -> Self {
        self.depth = depth;
        self
    }

    /// Attaches per-frame logic, making the object update-list eligible.
    pub fn with_behavior<B>(mut self, behavior: B) -> Self
    where
        B: Behavior + 'static,
    {
        self.behavior = Some(Box::new(behavior));
        self
    }

    /// Gives the object its own child display list.
    pub fn with_children(mut self) -> Self {
        if self.children.is_none() {
            self.children = Some(DisplayList::new());
        }
        self
    }

    pub fn with_body<B>(mut self, body: B) -> Self
    where
        B: PhysicsBody + 'static,
    {
        self.body = Some(Box::new(body));
        self
    }

    //--- Identity ---------------------------------------------------------

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.name = name.into();
        self
    }

    pub fn state(&self) -> &ObjectState {
        &self.state
    }

    pub fn set_state(&mut self, state: impl Into<ObjectState>) -> &mut Self {
        self.state = state.into();
        self
    }

    //--- Flags ------------------------------------------------------------

    pub fn active(&self) -> bool {
        self.active
    }

    pub fn set_active(&mut self, active: bool) -> &mut Self {
        self.active = active;
        self
    }

    pub fn visible(&self) -> bool {
        self.render_flags.contains(RenderFlags::VISIBLE)
    }

    pub fn set_visible(&mut self, visible: bool) -> &mut Self {
        self.set_render_flag(RenderFlags::VISIBLE, visible)
    }

    pub fn render_flags(&self) -> RenderFlags {
        self.render_flags
    }

    /// Lets capability components (alpha, scale, size) veto rendering.
    pub fn set_render_flag(&mut self, flag: RenderFlags, on: bool) -> &mut Self {
        self.render_flags.set(flag, on);
        self
    }

    /// Bitmask of camera ids this object is hidden from.
    pub fn set_camera_filter(&mut self, mask: u32) -> &mut Self {
        self.camera_filter = mask;
        self
    }

    pub fn camera_filter(&self) -> u32 {
        self.camera_filter
    }

    /// True when every render flag is set and `camera_id` is not filtered.
    pub fn will_render(&self, camera_id: u32) -> bool {
        self.render_flags == RenderFlags::all() && (self.camera_filter & camera_id) == 0
    }

    pub fn depth(&self) -> f32 {
        self.depth
    }

    pub(crate) fn set_depth_value(&mut self, depth: f32) {
        self.depth = depth;
    }

    /// Protects the object from `destroy` (e.g. shared across scenes).
    pub fn set_ignore_destroy(&mut self, ignore: bool) -> &mut Self {
        self.ignore_destroy = ignore;
        self
    }

    pub fn ignores_destroy(&self) -> bool {
        self.ignore_destroy
    }

    //--- Membership -------------------------------------------------------

    /// Display list currently holding this object, if any.
    pub fn display_owner(&self) -> Option<DisplayOwner> {
        self.display_owner
    }

    /// Whether the object is on (or staged for) its scene's update list.
    pub fn is_update_listed(&self) -> bool {
        self.update_listed
    }

    pub fn has_behavior(&self) -> bool {
        self.behavior.is_some()
    }

    pub fn is_container(&self) -> bool {
        self.children.is_some()
    }

    /// Child ids in draw order (containers only).
    pub fn children(&self) -> Option<&[GameObjectId]> {
        self.children.as_ref().map(DisplayList::get_children)
    }

    //--- Data -------------------------------------------------------------

    /// Creates the data manager if missing.
    pub fn set_data_enabled(&mut self) -> &mut Self {
        if self.data.is_none() {
            self.data = Some(DataManager::new());
        }
        self
    }

    pub fn data(&self) -> Option<&DataManager> {
        self.data.as_ref()
    }

    pub fn data_mut(&mut self) -> Option<&mut DataManager> {
        self.data.as_mut()
    }

    pub fn set_data(&mut self, key: &str, value: impl Into<DataValue>) -> &mut Self {
        self.data
            .get_or_insert_with(DataManager::new)
            .set(key, value);
        self
    }

    pub fn get_data(&self, key: &str) -> Option<&DataValue> {
        self.data.as_ref().and_then(|data| data.get(key))
    }

    pub fn inc_data(&mut self, key: &str, amount: f64) -> &mut Self {
        self.data
            .get_or_insert_with(DataManager::new)
            .inc(key, amount);
        self
    }

    pub fn toggle_data(&mut self, key: &str) -> &mut Self {
        self.data.get_or_insert_with(DataManager::new).toggle(key);
        self
    }

    //--- Input ------------------------------------------------------------

    pub fn set_interactive(&mut self, state: InteractiveState) -> &mut Self {
        self.input = Some(InteractiveState {
            enabled: true,
            ..state
        });
        self
    }

    /// Keeps the input state but stops it from receiving input.
    pub fn disable_interactive(&mut self) -> &mut Self {
        if let Some(input) = self.input.as_mut() {
            input.enabled = false;
        }
        self
    }

    pub fn remove_interactive(&mut self) -> &mut Self {
        self.input = None;
        self
    }

    pub fn input(&self) -> Option<&InteractiveState> {
        self.input.as_ref()
    }

    //--- Physics & Pipelines ----------------------------------------------

    pub fn has_body(&self) -> bool {
        self.body.is_some()
    }

    pub fn set_post_pipeline(&mut self, pipeline: impl Into<String>) -> &mut Self {
        let pipeline = pipeline.into();
        if !self.post_pipelines.contains(&pipeline) {
            self.post_pipelines.push(pipeline);
        }
        self
    }

    pub fn post_pipelines(&self) -> &[String] {
        &self.post_pipelines
    }

    pub fn reset_post_pipeline(&mut self) -> &mut Self {
        self.post_pipelines.clear();
        self
    }

    //--- Events -----------------------------------------------------------

    pub fn events_mut(&mut self) -> &mut EventEmitter<GameObjectEvent> {
        &mut self.events
    }

    pub(crate) fn emit(&mut self, event: GameObjectEvent) {
        self.events.emit(&event);
    }

    //--- Lifecycle Hooks --------------------------------------------------

    /// Runs the attached behavior, if any.
    ///
    /// The behavior is lifted out for the call so it can borrow the object
    /// mutably; a behavior installed during the call wins over the old one.
    pub(crate) fn run_pre_update(&mut self, time: f64, delta: f64) -> UpdateFlow {
        let Some(mut behavior) = self.behavior.take() else {
            return UpdateFlow::Continue;
        };
        let flow = behavior.pre_update(self, time, delta);
        if self.behavior.is_none() {
            self.behavior = Some(behavior);
        }
        flow
    }

    pub(crate) fn run_pre_destroy(&mut self) {
        if let Some(mut behavior) = self.behavior.take() {
            behavior.pre_destroy(self);
        }
    }

    /// Releases every optional sub-resource. Absent ones are skipped.
    ///
    /// Returns true if the object was interactive, so the owner can tell
    /// the input plugin.
    pub(crate) fn release_resources(&mut self) -> bool {
        let had_input = self.input.take().is_some();
        if let Some(mut data) = self.data.take() {
            data.destroy();
        }
        if let Some(mut body) = self.body.take() {
            body.destroy();
        }
        self.post_pipelines.clear();
        self.behavior = None;
        self.active = false;
        self.render_flags.remove(RenderFlags::VISIBLE);
        had_input
    }
}

impl fmt::Debug for GameObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameObject")
            .field("kind", &self.kind)
            .field("name", &self.name)
            .field("active", &self.active)
            .field("visible", &self.visible())
            .field("depth", &self.depth)
            .field("state", &self.state)
            .field("display_owner", &self.display_owner)
            .field("update_listed", &self.update_listed)
            .field("container", &self.children.is_some())
            .field("behavior", &self.behavior.is_some())
            .finish()
    }
}

//=========================================================================
// Tests
//=========================================================================
