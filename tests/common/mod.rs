//=========================================================================
// Shared Test Helpers
//=========================================================================
//
// Recorders for game, scene and renderer activity, plus the scene keys
// every integration test uses.
//
//=========================================================================

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use stagecraft::prelude::*;

//=== Scene Keys ==========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TestScene {
    Menu,
    Level,
    Hud,
}

impl SceneKey for TestScene {}

//=== Log =================================================================

pub type Log = Rc<RefCell<Vec<String>>>;

pub fn new_log() -> Log {
    Rc::new(RefCell::new(Vec::new()))
}

pub fn entries(log: &Log) -> Vec<String> {
    log.borrow().clone()
}

//=== Recorder Scene ======================================================

type Hook = Box<dyn FnMut(&mut Systems<TestScene>)>;

/// Scene that logs its hooks as `"<label>:<hook>"`.
pub struct Recorder {
    label: &'static str,
    log: Log,
    on_create: Option<Hook>,
    on_update: Option<Hook>,
}

impl Recorder {
    pub fn new(label: &'static str, log: &Log) -> Self {
        Self {
            label,
            log: log.clone(),
            on_create: None,
            on_update: None,
        }
    }

    pub fn on_create(mut self, hook: impl FnMut(&mut Systems<TestScene>) + 'static) -> Self {
        self.on_create = Some(Box::new(hook));
        self
    }

    pub fn on_update(mut self, hook: impl FnMut(&mut Systems<TestScene>) + 'static) -> Self {
        self.on_update = Some(Box::new(hook));
        self
    }

    fn push(&self, hook: &str) {
        self.log.borrow_mut().push(format!("{}:{}", self.label, hook));
    }
}

impl Scene<TestScene> for Recorder {
    fn init(&mut self, _sys: &mut Systems<TestScene>, _data: Option<&DataValue>) {
        self.push("init");
    }

    fn preload(&mut self, _sys: &mut Systems<TestScene>) {
        self.push("preload");
    }

    fn create(&mut self, sys: &mut Systems<TestScene>, _data: Option<&DataValue>) {
        self.push("create");
        if let Some(hook) = self.on_create.as_mut() {
            hook(sys);
        }
    }

    fn update(&mut self, sys: &mut Systems<TestScene>, _time: f64, _delta: f64) {
        self.push("update");
        if let Some(hook) = self.on_update.as_mut() {
            hook(sys);
        }
    }
}

//=== Event Recorders =====================================================

pub fn record_game_events(game: &mut Game<TestScene>) -> Log {
    let log = new_log();
    let sink = log.clone();
    game.events_mut()
        .on(move |event| sink.borrow_mut().push(event.name().to_string()));
    log
}

/// Records scene lifecycle events, skipping per-frame and membership ones.
pub fn record_scene_events(scenes: &mut SceneManager<TestScene>, key: TestScene) -> Log {
    let log = new_log();
    let sink = log.clone();
    scenes
        .systems_mut(key)
        .expect("scene exists")
        .events_mut()
        .on(move |event| {
            let name = event.name();
            if !matches!(
                name,
                "preupdate" | "update" | "postupdate" | "prerender" | "render" | "addedtoscene" | "removedfromscene"
            ) {
                sink.borrow_mut().push(name.to_string());
            }
        });
    log
}

//=== Counting Renderer ===================================================

#[derive(Debug, Default)]
pub struct RenderLog {
    pub pre: u32,
    pub post: u32,
    /// Object names per `render` call, in draw order.
    pub passes: Vec<Vec<String>>,
    pub destroyed: bool,
}

pub struct CountingRenderer {
    pub log: Rc<RefCell<RenderLog>>,
}

impl CountingRenderer {
    pub fn new() -> (Self, Rc<RefCell<RenderLog>>) {
        let log = Rc::new(RefCell::new(RenderLog::default()));
        (Self { log: log.clone() }, log)
    }
}

impl Renderer for CountingRenderer {
    fn pre_render(&mut self) {
        self.log.borrow_mut().pre += 1;
    }

    fn render(&mut self, pass: &RenderPass<'_>) {
        let names = pass.iter().map(|(_, object)| object.name().to_string()).collect();
        self.log.borrow_mut().passes.push(names);
    }

    fn post_render(&mut self) {
        self.log.borrow_mut().post += 1;
    }

    fn destroy(&mut self) {
        self.log.borrow_mut().destroyed = true;
    }
}

//=== Builders ============================================================

pub fn booted_manager(scenes: Vec<(TestScene, Recorder)>) -> SceneManager<TestScene> {
    let mut manager = SceneManager::new(Rc::new(PluginCache::with_core_plugins()));
    for (key, scene) in scenes {
        manager.register_scene(key, scene);
    }
    manager.boot_queue();
    manager
}

pub fn sprite(name: &str, depth: f32) -> GameObject {
    GameObject::new("Sprite").with_name(name).with_depth(depth)
}
