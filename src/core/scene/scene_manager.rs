//=========================================================================
// Scene Manager
//=========================================================================
//
// Owns every scene in render order and sequences cross-scene operations.
//
// Architecture:
//   SceneManager<S>
//     ├─ scenes:      Vec<{ Box<dyn Scene<S>>, Systems<S> }>  (0 = bottom)
//     ├─ pending:     scenes added before boot / mid-frame
//     ├─ queue:       TransitionQueue<S>  (ops applied next frame)
//     └─ transitions: running timed hand-overs
//
// Frame:
//   update() → process queue → step scenes top-down → advance transitions
//   render() → render visible scenes bottom-up
//
// Operations issued before boot or while a frame is being processed are
// queued; anything else applies immediately.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt::Debug;
use std::hash::Hash;
use std::rc::Rc;

use log::{debug, info, trace, warn};

//=== Internal Dependencies ===============================================

use super::transition_queue::TransitionQueue;
use super::{Scene, SceneEvent, SceneStatus, Systems};
use crate::core::data::DataValue;
use crate::core::plugins::PluginCache;
use crate::renderer::Renderer;

//=== Scene Transition ====================================================

/// Encapsulates scene operations.
///
/// Scenes queue these through `Systems`; the manager applies them at the
/// start of the next frame.
#[derive(Debug, Clone, PartialEq)]
pub enum SceneTransition<K: SceneKey> {
    /// Starts (or restarts) a scene.
    Start(K, Option<DataValue>),

    /// Shuts a scene down.
    Stop(K, Option<DataValue>),

    Pause(K, Option<DataValue>),
    Resume(K, Option<DataValue>),
    Sleep(K, Option<DataValue>),
    Wake(K, Option<DataValue>),

    /// Wakes, resumes or starts, whichever applies.
    Run(K, Option<DataValue>),

    /// Sleeps the first scene and runs the second.
    Switch(K, K, Option<DataValue>),

    /// Destroys a scene and forgets it.
    Remove(K),

    BringToTop(K),
    SendToBack(K),
    MoveUp(K),
    MoveDown(K),

    /// Moves the second scene directly above the first.
    MoveAbove(K, K),

    /// Moves the second scene directly below the first.
    MoveBelow(K, K),

    /// Timed hand-over from the first scene to `config.target`.
    Transition(K, TransitionConfig<K>),

    /// No operation.
    Empty,
}

impl<K: SceneKey> Default for SceneTransition<K> {
    fn default() -> Self {
        Self::Empty
    }
}

//=== Transition Config ===================================================

/// Options for a timed scene transition.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionConfig<K> {
    pub target: K,

    /// Milliseconds until the origin is released.
    pub duration: f64,

    /// Sleep the origin instead of stopping it.
    pub sleep: bool,

    /// Remove the origin instead of stopping it. Wins over `sleep`.
    pub remove: bool,

    /// Whether the origin keeps receiving input meanwhile.
    pub allow_input: bool,

    pub move_above: bool,
    pub move_below: bool,

    /// Handed to the target's start or wake.
    pub data: Option<DataValue>,
}

impl<K> TransitionConfig<K> {
    pub fn new(target: K) -> Self {
        Self {
            target,
            duration: 1000.0,
            sleep: false,
            remove: false,
            allow_input: false,
            move_above: false,
            move_below: false,
            data: None,
        }
    }

    pub fn with_duration(mut self, duration: f64) -> Self {
        self.duration = duration;
        self
    }

    pub fn sleep_origin(mut self) -> Self {
        self.sleep = true;
        self
    }

    pub fn remove_origin(mut self) -> Self {
        self.remove = true;
        self
    }

    pub fn with_data(mut self, data: impl Into<DataValue>) -> Self {
        self.data = Some(data.into());
        self
    }
}

//=== Scene Key Trait =====================================================

/// Marker trait for scene identifiers.
///
/// Scene keys uniquely identify scenes in the SceneManager.
/// Typically implemented by game-specific enums.
pub trait SceneKey: Clone + Copy + Eq + Hash + Debug + Send + 'static {}

//=== Entries =============================================================

struct SceneEntry<S: SceneKey> {
    scene: Box<dyn Scene<S>>,
    sys: Systems<S>,
}

struct PendingScene<S: SceneKey> {
    key: S,
    scene: Box<dyn Scene<S>>,
    autostart: bool,
    data: Option<DataValue>,
}

struct ActiveTransition<S> {
    origin: S,
    target: S,
    elapsed: f64,
    duration: f64,
    will_sleep: bool,
    will_remove: bool,
}

//=== Scene Manager =======================================================

/// Manages scene registration, ordering and lifecycle.
///
/// Scenes are registered once and referenced by key. The position in the
/// scene list is the render order: index 0 renders first (bottom).
pub struct SceneManager<S: SceneKey> {
    cache: Rc<PluginCache>,
    scenes: Vec<SceneEntry<S>>,
    pending: Vec<PendingScene<S>>,
    queue: TransitionQueue<S>,
    transitions: Vec<ActiveTransition<S>>,
    is_booted: bool,
    is_processing: bool,
}

impl<S: SceneKey> SceneManager<S> {
    //--- Construction -----------------------------------------------------

    /// Creates an empty manager. Scenes added now wait for `boot_queue`.
    pub fn new(cache: Rc<PluginCache>) -> Self {
        Self {
            cache,
            scenes: Vec::new(),
            pending: Vec::new(),
            queue: TransitionQueue::new(),
            transitions: Vec::new(),
            is_booted: false,
            is_processing: false,
        }
    }

    //--- Registration -----------------------------------------------------

    /// Adds a scene under `key`.
    ///
    /// Before boot (or mid-frame) the scene waits in the pending queue.
    /// Duplicate keys are refused with a warning.
    pub fn add<T>(&mut self, key: S, scene: T, autostart: bool, data: Option<DataValue>) -> bool
    where
        T: Scene<S> + 'static,
    {
        if self.has_key(key) {
            warn!("Cannot add scene with duplicate key {:?}", key);
            return false;
        }

        self.pending.push(PendingScene {
            key,
            scene: Box::new(scene),
            autostart,
            data,
        });

        if self.is_booted && !self.is_processing {
            self.flush_pending();
        }
        true
    }

    /// Registers a scene; it autostarts only if its config says so.
    pub fn register_scene<T>(&mut self, key: S, scene: T) -> bool
    where
        T: Scene<S> + 'static,
    {
        self.add(key, scene, false, None)
    }

    /// Registers a scene that starts as soon as the manager boots.
    pub fn register_default<T>(&mut self, key: S, scene: T) -> bool
    where
        T: Scene<S> + 'static,
    {
        let added = self.add(key, scene, true, None);
        if added {
            debug!("Registered scene {:?} as default", key);
        }
        added
    }

    /// Creates every pending scene, then starts the autostart ones.
    ///
    /// The first scene in the queue always autostarts.
    pub fn boot_queue(&mut self) {
        if self.is_booted {
            debug!("Scene manager already booted");
            return;
        }
        self.is_booted = true;

        if let Some(first) = self.pending.first_mut() {
            first.autostart = true;
        }
        info!("Booting scene manager with {} scene(s)", self.pending.len());
        self.flush_pending();
    }

    fn flush_pending(&mut self) {
        let mut starts = Vec::new();

        for pending in std::mem::take(&mut self.pending) {
            let config = pending.scene.config();
            let mut sys = Systems::new(pending.key, &config, self.cache.clone());
            sys.init();

            if pending.autostart || config.active {
                starts.push((pending.key, pending.data.or(config.data)));
            }
            self.scenes.push(SceneEntry {
                scene: pending.scene,
                sys,
            });
        }

        for (key, data) in starts {
            self.start_now(key, data);
        }
    }

    //--- Operations -------------------------------------------------------

    /// Applies `op` now, or queues it when booting or mid-frame.
    pub fn dispatch(&mut self, op: SceneTransition<S>) {
        if !self.is_booted || self.is_processing {
            trace!("Queued scene operation {:?}", op);
            self.queue.push(op);
        } else {
            self.apply(op);
        }
    }

    pub fn start(&mut self, key: S, data: Option<DataValue>) {
        self.dispatch(SceneTransition::Start(key, data));
    }

    pub fn stop(&mut self, key: S, data: Option<DataValue>) {
        self.dispatch(SceneTransition::Stop(key, data));
    }

    pub fn pause(&mut self, key: S, data: Option<DataValue>) {
        self.dispatch(SceneTransition::Pause(key, data));
    }

    pub fn resume(&mut self, key: S, data: Option<DataValue>) {
        self.dispatch(SceneTransition::Resume(key, data));
    }

    pub fn sleep(&mut self, key: S, data: Option<DataValue>) {
        self.dispatch(SceneTransition::Sleep(key, data));
    }

    pub fn wake(&mut self, key: S, data: Option<DataValue>) {
        self.dispatch(SceneTransition::Wake(key, data));
    }

    pub fn run(&mut self, key: S, data: Option<DataValue>) {
        self.dispatch(SceneTransition::Run(key, data));
    }

    pub fn switch(&mut self, from: S, to: S, data: Option<DataValue>) {
        self.dispatch(SceneTransition::Switch(from, to, data));
    }

    pub fn remove(&mut self, key: S) {
        self.dispatch(SceneTransition::Remove(key));
    }

    pub fn bring_to_top(&mut self, key: S) {
        self.dispatch(SceneTransition::BringToTop(key));
    }

    pub fn send_to_back(&mut self, key: S) {
        self.dispatch(SceneTransition::SendToBack(key));
    }

    pub fn move_up(&mut self, key: S) {
        self.dispatch(SceneTransition::MoveUp(key));
    }

    pub fn move_down(&mut self, key: S) {
        self.dispatch(SceneTransition::MoveDown(key));
    }

    pub fn move_above(&mut self, anchor: S, key: S) {
        self.dispatch(SceneTransition::MoveAbove(anchor, key));
    }

    pub fn move_below(&mut self, anchor: S, key: S) {
        self.dispatch(SceneTransition::MoveBelow(anchor, key));
    }

    pub fn transition(&mut self, origin: S, config: TransitionConfig<S>) {
        self.dispatch(SceneTransition::Transition(origin, config));
    }

    //--- Update Loop ------------------------------------------------------

    /// Applies queued operations, then steps every updatable scene from
    /// the top down and advances running transitions.
    pub fn update(&mut self, time: f64, delta: f64) {
        self.process_queue();
        self.is_processing = true;

        for entry in self.scenes.iter_mut().rev() {
            let status = entry.sys.status();
            if status > SceneStatus::Start && status <= SceneStatus::Running {
                entry.sys.step(entry.scene.as_mut(), time, delta);
            }
        }

        for entry in &mut self.scenes {
            for op in entry.sys.take_operations() {
                self.queue.push(op);
            }
        }

        self.advance_transitions(delta);
        self.is_processing = false;
    }

    /// Renders every visible scene from the bottom up.
    pub fn render(&mut self, renderer: &mut dyn Renderer) {
        for entry in &mut self.scenes {
            let status = entry.sys.status();
            if entry.sys.is_visible() && status >= SceneStatus::Loading && status < SceneStatus::Sleeping {
                entry.sys.render(renderer);
            }
        }
    }

    /// Applies pending scenes and every queued operation.
    pub fn process_queue(&mut self) {
        if !self.is_booted {
            return;
        }
        if !self.pending.is_empty() {
            self.flush_pending();
        }

        if self.queue.is_empty() {
            return;
        }
        let ops = self.queue.take();
        trace!("Processing {} queued scene operation(s)", ops.len());
        for op in ops {
            self.apply(op);
        }
    }

    //--- Operation Processing ---------------------------------------------

    fn apply(&mut self, op: SceneTransition<S>) {
        match op {
            SceneTransition::Start(key, data) => self.start_now(key, data),
            SceneTransition::Stop(key, data) => self.stop_now(key, data),
            SceneTransition::Pause(key, data) => {
                self.with_systems(key, |sys| sys.pause(data));
            }
            SceneTransition::Resume(key, data) => {
                self.with_systems(key, |sys| sys.resume(data));
            }
            SceneTransition::Sleep(key, data) => {
                self.with_systems(key, |sys| sys.sleep(data));
            }
            SceneTransition::Wake(key, data) => {
                self.with_systems(key, |sys| sys.wake(data));
            }
            SceneTransition::Run(key, data) => self.run_now(key, data),
            SceneTransition::Switch(from, to, data) => self.switch_now(from, to, data),
            SceneTransition::Remove(key) => self.remove_now(key),
            SceneTransition::BringToTop(key) => {
                if let Some(index) = self.index_of(key) {
                    let entry = self.scenes.remove(index);
                    self.scenes.push(entry);
                }
            }
            SceneTransition::SendToBack(key) => {
                if let Some(index) = self.index_of(key) {
                    let entry = self.scenes.remove(index);
                    self.scenes.insert(0, entry);
                }
            }
            SceneTransition::MoveUp(key) => {
                if let Some(index) = self.index_of(key) {
                    if index + 1 < self.scenes.len() {
                        self.scenes.swap(index, index + 1);
                    }
                }
            }
            SceneTransition::MoveDown(key) => {
                if let Some(index) = self.index_of(key) {
                    if index > 0 {
                        self.scenes.swap(index, index - 1);
                    }
                }
            }
            SceneTransition::MoveAbove(anchor, key) => self.move_relative(anchor, key, 1),
            SceneTransition::MoveBelow(anchor, key) => self.move_relative(anchor, key, 0),
            SceneTransition::Transition(origin, config) => self.transition_now(origin, config),
            SceneTransition::Empty => {}
        }
    }

    fn with_systems<F>(&mut self, key: S, op: F)
    where
        F: FnOnce(&mut Systems<S>) -> bool,
    {
        match self.systems_mut(key) {
            Some(sys) => {
                op(sys);
            }
            None => warn!("Scene {:?} not found", key),
        }
    }

    /// Starts (or restarts) a scene and runs its boot sequence.
    fn start_now(&mut self, key: S, data: Option<DataValue>) {
        let Some(index) = self.index_of(key) else {
            warn!("Cannot start unknown scene {:?}", key);
            return;
        };
        let entry = &mut self.scenes[index];

        if entry.sys.is_active() || entry.sys.is_paused() {
            debug!("Restarting scene {:?}", key);
            entry.sys.shutdown(None);
        }
        if !entry.sys.start(data) {
            return;
        }

        Self::boot_scene(entry);
    }

    /// START → init → LOADING → preload → CREATING → create → RUNNING.
    fn boot_scene(entry: &mut SceneEntry<S>) {
        let SceneEntry { scene, sys } = entry;
        let data = sys.data().cloned();

        scene.init(sys, data.as_ref());
        if sys.settings().is_transition {
            let duration = sys.settings().transition_duration;
            sys.emit(SceneEvent::TransitionInit { duration });
        }

        sys.settings_mut().status = SceneStatus::Loading;
        scene.preload(sys);

        sys.settings_mut().status = SceneStatus::Creating;
        scene.create(sys, data.as_ref());
        if sys.status() != SceneStatus::Creating {
            debug!("Scene {:?} left create as {:?}", sys.key(), sys.status());
            return;
        }

        if sys.settings().is_transition {
            let duration = sys.settings().transition_duration;
            sys.emit(SceneEvent::TransitionStart { duration });
        }

        sys.settings_mut().status = SceneStatus::Running;
        debug!("Scene {:?} running", sys.key());
        sys.emit(SceneEvent::Create);
    }

    fn stop_now(&mut self, key: S, data: Option<DataValue>) {
        let Some(sys) = self.systems_mut(key) else {
            warn!("Cannot stop unknown scene {:?}", key);
            return;
        };
        if sys.is_transitioning() {
            warn!("Cannot stop scene {:?} while it is transitioning", key);
            return;
        }
        if sys.status() == SceneStatus::Pending || sys.status() >= SceneStatus::Shutdown {
            debug!("Scene {:?} is not running, nothing to stop", key);
            return;
        }
        sys.shutdown(data);
    }

    fn run_now(&mut self, key: S, data: Option<DataValue>) {
        let Some(sys) = self.systems_mut(key) else {
            warn!("Cannot run unknown scene {:?}", key);
            return;
        };

        if sys.is_sleeping() {
            sys.wake(data);
        } else if sys.is_paused() {
            sys.resume(data);
        } else if sys.is_active() {
            debug!("Scene {:?} is already running", key);
        } else {
            self.start_now(key, data);
        }
    }

    fn switch_now(&mut self, from: S, to: S, data: Option<DataValue>) {
        if from == to {
            warn!("Cannot switch scene {:?} to itself", from);
            return;
        }
        if self.index_of(to).is_none() {
            warn!("Cannot switch to unknown scene {:?}", to);
            return;
        }

        self.with_systems(from, |sys| sys.sleep(None));

        let target_sleeping = self.systems(to).is_some_and(Systems::is_sleeping);
        if target_sleeping {
            self.with_systems(to, |sys| sys.wake(data));
        } else {
            self.start_now(to, data);
        }
    }

    fn remove_now(&mut self, key: S) {
        let Some(index) = self.index_of(key) else {
            debug!("Scene {:?} not found, skipping removal", key);
            return;
        };

        let mut entry = self.scenes.remove(index);
        entry.sys.destroy();

        let (orphaned, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.transitions)
            .into_iter()
            .partition(|t| t.origin == key || t.target == key);
        self.transitions = kept;
        for transition in orphaned {
            for other in [transition.origin, transition.target] {
                if let Some(sys) = self.systems_mut(other) {
                    sys.settings_mut().clear_transition();
                }
            }
        }

        debug!("Removed scene {:?}", key);
    }

    /// Places `key` at `anchor`'s index plus `offset` (1 = above, 0 = below).
    fn move_relative(&mut self, anchor: S, key: S, offset: usize) {
        if anchor == key {
            return;
        }
        let Some(index) = self.index_of(key) else {
            warn!("Cannot move unknown scene {:?}", key);
            return;
        };
        let entry = self.scenes.remove(index);

        match self.index_of(anchor) {
            Some(anchor_index) => self.scenes.insert(anchor_index + offset, entry),
            None => {
                warn!("Cannot move scene {:?} next to unknown scene {:?}", key, anchor);
                self.scenes.insert(index, entry);
            }
        }
    }

    //--- Transitions ------------------------------------------------------

    fn transition_now(&mut self, origin: S, config: TransitionConfig<S>) {
        let target = config.target;
        if origin == target {
            warn!("Scene {:?} cannot transition to itself", origin);
            return;
        }

        let (Some(origin_sys), Some(target_sys)) = (self.systems(origin), self.systems(target)) else {
            warn!("Cannot transition between {:?} and {:?}: unknown scene", origin, target);
            return;
        };
        if origin_sys.is_transitioning() || target_sys.is_transitioning() {
            warn!("Cannot transition {:?} → {:?}: a transition is already running", origin, target);
            return;
        }
        if target_sys.is_active() {
            warn!("Cannot transition {:?} → {:?}: target is already running", origin, target);
            return;
        }

        let duration = config.duration.max(0.0);
        if let Some(sys) = self.systems_mut(origin) {
            let settings = sys.settings_mut();
            settings.transition_target = Some(target);
            settings.transition_duration = duration;
            settings.transition_allow_input = config.allow_input;
        }
        if let Some(sys) = self.systems_mut(target) {
            let settings = sys.settings_mut();
            settings.is_transition = true;
            settings.transition_from = Some(origin);
            settings.transition_duration = duration;
            settings.transition_allow_input = config.allow_input;
        }

        if config.move_above {
            self.move_relative(origin, target, 1);
        } else if config.move_below {
            self.move_relative(origin, target, 0);
        }

        let target_sleeping = self.systems(target).is_some_and(Systems::is_sleeping);
        if target_sleeping {
            self.with_systems(target, |sys| sys.wake(config.data));
        } else {
            self.start_now(target, config.data);
        }

        if let Some(sys) = self.systems_mut(origin) {
            sys.emit(SceneEvent::TransitionOut { duration });
        }

        debug!("Transition {:?} → {:?} over {}ms", origin, target, duration);
        self.transitions.push(ActiveTransition {
            origin,
            target,
            elapsed: 0.0,
            duration,
            will_sleep: config.sleep,
            will_remove: config.remove,
        });
    }

    /// Advances transitions whose origin is still updating.
    fn advance_transitions(&mut self, delta: f64) {
        let mut finished = Vec::new();
        let mut index = 0;

        while index < self.transitions.len() {
            let transition = &mut self.transitions[index];
            let origin_status = find(&self.scenes, transition.origin).map(|entry| entry.sys.status());

            match origin_status {
                Some(status) if status > SceneStatus::Start && status <= SceneStatus::Running => {
                    transition.elapsed += delta;
                    if transition.elapsed >= transition.duration {
                        finished.push(self.transitions.remove(index));
                        continue;
                    }
                }
                Some(_) => {}
                None => {
                    self.transitions.remove(index);
                    continue;
                }
            }
            index += 1;
        }

        for transition in finished {
            self.complete_transition(transition);
        }
    }

    fn complete_transition(&mut self, transition: ActiveTransition<S>) {
        if let Some(sys) = self.systems_mut(transition.target) {
            sys.emit(SceneEvent::TransitionComplete);
            let settings = sys.settings_mut();
            settings.is_transition = false;
            settings.transition_from = None;
            settings.transition_duration = 0.0;
        }
        if let Some(sys) = self.systems_mut(transition.origin) {
            sys.settings_mut().transition_target = None;
        }

        if transition.will_remove {
            self.dispatch(SceneTransition::Remove(transition.origin));
        } else if transition.will_sleep {
            self.with_systems(transition.origin, |sys| sys.sleep(None));
        } else {
            self.dispatch(SceneTransition::Stop(transition.origin, None));
        }
        debug!("Transition {:?} → {:?} complete", transition.origin, transition.target);
    }

    //--- Teardown ---------------------------------------------------------

    /// Destroys every scene, top first, and drops everything queued.
    pub fn destroy(&mut self) {
        for entry in self.scenes.iter_mut().rev() {
            entry.sys.destroy();
        }
        self.scenes.clear();
        self.pending.clear();
        self.queue.clear();
        self.transitions.clear();
        info!("Scene manager destroyed");
    }

    //--- Queries ----------------------------------------------------------

    fn index_of(&self, key: S) -> Option<usize> {
        self.scenes.iter().position(|entry| entry.sys.key() == key)
    }

    /// Position in render order (0 = bottom).
    pub fn get_index(&self, key: S) -> Option<usize> {
        self.index_of(key)
    }

    /// True if `key` is registered or waiting to be.
    pub fn has_key(&self, key: S) -> bool {
        self.index_of(key).is_some() || self.pending.iter().any(|pending| pending.key == key)
    }

    pub fn systems(&self, key: S) -> Option<&Systems<S>> {
        find(&self.scenes, key).map(|entry| &entry.sys)
    }

    pub fn systems_mut(&mut self, key: S) -> Option<&mut Systems<S>> {
        self.scenes
            .iter_mut()
            .find(|entry| entry.sys.key() == key)
            .map(|entry| &mut entry.sys)
    }

    pub fn status(&self, key: S) -> Option<SceneStatus> {
        self.systems(key).map(Systems::status)
    }

    pub fn is_active(&self, key: S) -> bool {
        self.systems(key).is_some_and(Systems::is_active)
    }

    pub fn is_paused(&self, key: S) -> bool {
        self.systems(key).is_some_and(Systems::is_paused)
    }

    pub fn is_sleeping(&self, key: S) -> bool {
        self.systems(key).is_some_and(Systems::is_sleeping)
    }

    pub fn is_visible(&self, key: S) -> bool {
        self.systems(key).is_some_and(Systems::is_visible)
    }

    /// Keys in render order, bottom first.
    pub fn keys(&self) -> Vec<S> {
        self.scenes.iter().map(|entry| entry.sys.key()).collect()
    }

    /// Running scenes, top first.
    pub fn running_scenes(&self) -> Vec<S> {
        self.scenes
            .iter()
            .rev()
            .filter(|entry| entry.sys.is_active())
            .map(|entry| entry.sys.key())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    pub fn is_booted(&self) -> bool {
        self.is_booted
    }

    pub fn is_processing(&self) -> bool {
        self.is_processing
    }

    /// Number of operations waiting for the next frame.
    pub fn queued(&self) -> usize {
        self.queue.len()
    }
}

fn find<S: SceneKey>(scenes: &[SceneEntry<S>], key: S) -> Option<&SceneEntry<S>> {
    scenes.iter().find(|entry| entry.sys.key() == key)
}

//=== Tests ===============================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::events::NamedEvent;
    use std::cell::RefCell;

    // Mock types for testing
    #[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
    enum TestScene {
        A,
        B,
        C,
    }

    impl SceneKey for TestScene {}

    type Log = Rc<RefCell<Vec<String>>>;

    struct Recorder {
        name: &'static str,
        log: Log,
    }

    impl Recorder {
        fn new(name: &'static str, log: &Log) -> Self {
            Self {
                name,
                log: log.clone(),
            }
        }

        fn push(&self, what: &str) {
            self.log.borrow_mut().push(format!("{}:{}", self.name, what));
        }
    }

    impl Scene<TestScene> for Recorder {
        fn init(&mut self, _sys: &mut Systems<TestScene>, _data: Option<&DataValue>) {
            self.push("init");
        }

        fn preload(&mut self, _sys: &mut Systems<TestScene>) {
            self.push("preload");
        }

        fn create(&mut self, _sys: &mut Systems<TestScene>, _data: Option<&DataValue>) {
            self.push("create");
        }

        fn update(&mut self, _sys: &mut Systems<TestScene>, _time: f64, _delta: f64) {
            self.push("update");
        }
    }

    fn manager() -> SceneManager<TestScene> {
        SceneManager::new(Rc::new(PluginCache::with_core_plugins()))
    }

    fn booted(log: &Log) -> SceneManager<TestScene> {
        let mut manager = manager();
        manager.register_default(TestScene::A, Recorder::new("A", log));
        manager.register_scene(TestScene::B, Recorder::new("B", log));
        manager.register_scene(TestScene::C, Recorder::new("C", log));
        manager.boot_queue();
        log.borrow_mut().clear();
        manager
    }

    //--- SceneTransition Tests --------------------------------------------

    #[test]
    fn transition_default_is_empty() {
        let transition: SceneTransition<TestScene> = SceneTransition::default();
        assert_eq!(transition, SceneTransition::Empty);
    }

    #[test]
    fn transition_config_defaults() {
        let config = TransitionConfig::new(TestScene::B).with_duration(250.0).sleep_origin();
        assert_eq!(config.target, TestScene::B);
        assert_eq!(config.duration, 250.0);
        assert!(config.sleep);
        assert!(!config.remove);
    }

    //--- Boot -------------------------------------------------------------

    #[test]
    fn boot_runs_scene_lifecycle_in_order() {
        let log: Log = Rc::default();
        let mut manager = manager();
        manager.register_scene(TestScene::A, Recorder::new("A", &log));
        manager.register_scene(TestScene::B, Recorder::new("B", &log));
        assert!(manager.is_empty());

        manager.boot_queue();
        assert_eq!(*log.borrow(), vec!["A:init", "A:preload", "A:create"]);
        assert_eq!(manager.status(TestScene::A), Some(SceneStatus::Running));
        assert_eq!(manager.status(TestScene::B), Some(SceneStatus::Init));
        assert_eq!(manager.keys(), vec![TestScene::A, TestScene::B]);
    }

    #[test]
    fn duplicate_keys_are_refused() {
        let log: Log = Rc::default();
        let mut manager = manager();
        assert!(manager.register_scene(TestScene::A, Recorder::new("A", &log)));
        assert!(!manager.register_scene(TestScene::A, Recorder::new("A2", &log)));
    }

    #[test]
    fn operations_before_boot_are_queued() {
        let log: Log = Rc::default();
        let mut manager = manager();
        manager.register_scene(TestScene::A, Recorder::new("A", &log));
        manager.register_scene(TestScene::B, Recorder::new("B", &log));
        manager.start(TestScene::B, None);
        assert_eq!(manager.queued(), 1);

        manager.boot_queue();
        assert!(!manager.is_active(TestScene::B));

        manager.update(0.0, 16.0);
        assert!(manager.is_active(TestScene::B));
    }

    //--- Update & Render --------------------------------------------------

    #[test]
    fn update_steps_running_scenes_top_down() {
        let log: Log = Rc::default();
        let mut manager = booted(&log);
        manager.start(TestScene::B, None);
        log.borrow_mut().clear();

        manager.update(0.0, 16.0);
        assert_eq!(*log.borrow(), vec!["B:update", "A:update"]);
    }

    #[test]
    fn paused_scenes_render_but_do_not_update() {
        struct Count(usize);
        impl Renderer for Count {
            fn render(&mut self, _pass: &crate::renderer::RenderPass<'_>) {
                self.0 += 1;
            }
        }

        let log: Log = Rc::default();
        let mut manager = booted(&log);
        manager.pause(TestScene::A, None);

        manager.update(0.0, 16.0);
        assert!(log.borrow().is_empty());

        let mut renderer = Count(0);
        manager.render(&mut renderer);
        assert_eq!(renderer.0, 1);

        manager.resume(TestScene::A, None);
        manager.sleep(TestScene::A, None);
        manager.render(&mut renderer);
        assert_eq!(renderer.0, 1);
    }

    #[test]
    fn ops_from_scenes_apply_next_frame() {
        struct Launcher;
        impl Scene<TestScene> for Launcher {
            fn update(&mut self, sys: &mut Systems<TestScene>, _time: f64, _delta: f64) {
                sys.start_scene(TestScene::B, None);
            }
        }

        let log: Log = Rc::default();
        let mut manager = manager();
        manager.register_default(TestScene::A, Launcher);
        manager.register_scene(TestScene::B, Recorder::new("B", &log));
        manager.boot_queue();

        manager.update(0.0, 16.0);
        assert!(!manager.is_active(TestScene::B));
        assert_eq!(manager.queued(), 1);

        manager.update(16.0, 16.0);
        assert!(manager.is_active(TestScene::B));
    }

    //--- Operations -------------------------------------------------------

    #[test]
    fn restart_shuts_down_first() {
        let log: Log = Rc::default();
        let mut manager = booted(&log);
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = events.clone();
        if let Some(sys) = manager.systems_mut(TestScene::A) {
            sys.events_mut().on(move |event: &SceneEvent| sink.borrow_mut().push(event.name()));
        }

        manager.start(TestScene::A, None);
        assert_eq!(*events.borrow(), vec!["shutdown", "start", "ready", "create"]);
        assert_eq!(*log.borrow(), vec!["A:init", "A:preload", "A:create"]);
    }

    #[test]
    fn run_wakes_resumes_or_starts() {
        let log: Log = Rc::default();
        let mut manager = booted(&log);

        manager.sleep(TestScene::A, None);
        manager.run(TestScene::A, None);
        assert!(manager.is_active(TestScene::A));
        assert!(manager.is_visible(TestScene::A));

        manager.pause(TestScene::A, None);
        manager.run(TestScene::A, None);
        assert!(manager.is_active(TestScene::A));

        manager.run(TestScene::B, None);
        assert!(manager.is_active(TestScene::B));
    }

    #[test]
    fn switch_sleeps_origin() {
        let log: Log = Rc::default();
        let mut manager = booted(&log);

        manager.switch(TestScene::A, TestScene::B, None);
        assert!(manager.is_sleeping(TestScene::A));
        assert!(manager.is_active(TestScene::B));

        manager.switch(TestScene::B, TestScene::A, None);
        assert!(manager.is_active(TestScene::A));
        assert!(manager.is_sleeping(TestScene::B));
    }

    #[test]
    fn reordering() {
        let log: Log = Rc::default();
        let mut manager = booted(&log);

        manager.bring_to_top(TestScene::A);
        assert_eq!(manager.keys(), vec![TestScene::B, TestScene::C, TestScene::A]);

        manager.send_to_back(TestScene::C);
        assert_eq!(manager.keys(), vec![TestScene::C, TestScene::B, TestScene::A]);

        manager.move_up(TestScene::C);
        assert_eq!(manager.keys(), vec![TestScene::B, TestScene::C, TestScene::A]);

        manager.move_down(TestScene::A);
        assert_eq!(manager.keys(), vec![TestScene::B, TestScene::A, TestScene::C]);

        manager.move_below(TestScene::B, TestScene::C);
        assert_eq!(manager.keys(), vec![TestScene::C, TestScene::B, TestScene::A]);

        manager.move_above(TestScene::A, TestScene::C);
        assert_eq!(manager.keys(), vec![TestScene::B, TestScene::A, TestScene::C]);
    }

    #[test]
    fn remove_destroys_scene() {
        let log: Log = Rc::default();
        let mut manager = booted(&log);

        manager.remove(TestScene::A);
        assert!(manager.systems(TestScene::A).is_none());
        assert!(!manager.has_key(TestScene::A));
        assert_eq!(manager.len(), 2);
    }

    //--- Transitions ------------------------------------------------------

    #[test]
    fn transition_hands_over_after_duration() {
        let log: Log = Rc::default();
        let mut manager = booted(&log);
        let target_events = Rc::new(RefCell::new(Vec::new()));
        let sink = target_events.clone();
        if let Some(sys) = manager.systems_mut(TestScene::B) {
            sys.events_mut().on(move |event: &SceneEvent| sink.borrow_mut().push(event.name()));
        }

        manager.transition(TestScene::A, TransitionConfig::new(TestScene::B).with_duration(30.0));
        assert!(manager.is_active(TestScene::B));
        assert!(manager.systems(TestScene::A).is_some_and(Systems::is_transition_out));
        assert!(manager.systems(TestScene::B).is_some_and(Systems::is_transition_in));
        assert!(target_events.borrow().contains(&"transitionstart"));

        manager.update(0.0, 16.0);
        assert!(manager.is_active(TestScene::A));

        manager.update(16.0, 16.0);
        assert!(target_events.borrow().contains(&"transitioncomplete"));
        assert!(!manager.systems(TestScene::B).is_some_and(Systems::is_transitioning));

        manager.update(32.0, 16.0);
        assert_eq!(manager.status(TestScene::A), Some(SceneStatus::Shutdown));
    }

    #[test]
    fn transition_can_sleep_origin() {
        let log: Log = Rc::default();
        let mut manager = booted(&log);

        manager.transition(
            TestScene::A,
            TransitionConfig::new(TestScene::B).with_duration(10.0).sleep_origin(),
        );
        manager.update(0.0, 16.0);
        assert!(manager.is_sleeping(TestScene::A));
    }

    #[test]
    fn second_transition_is_refused_while_running() {
        let log: Log = Rc::default();
        let mut manager = booted(&log);

        manager.transition(TestScene::A, TransitionConfig::new(TestScene::B));
        manager.transition(TestScene::A, TransitionConfig::new(TestScene::C));
        assert!(!manager.is_active(TestScene::C));
    }

    #[test]
    fn transition_to_running_scene_is_refused() {
        let log: Log = Rc::default();
        let mut manager = booted(&log);
        manager.start(TestScene::B, None);
        log.borrow_mut().clear();

        manager.transition(TestScene::A, TransitionConfig::new(TestScene::B));
        assert!(manager.is_active(TestScene::B));
        assert!(!manager.systems(TestScene::A).is_some_and(Systems::is_transition_out));
        assert!(!manager.systems(TestScene::B).is_some_and(Systems::is_transition_in));
        assert!(log.borrow().is_empty(), "target was not restarted");
    }

    #[test]
    fn destroy_tears_everything_down() {
        let log: Log = Rc::default();
        let mut manager = booted(&log);
        manager.destroy();
        assert!(manager.is_empty());
        assert_eq!(manager.queued(), 0);
    }
}
