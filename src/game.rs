//=========================================================================
// Game
//
// Root object: owns the scene manager, frame clock and global managers,
// and runs the per-frame sequence.
//
// Architecture:
// ```text
//     GameBuilder  ──build()──>  Game  ──run()──>  [Platform loop]
//         │                        │
//         ├─ with_fps()            ├─ boot()   textures ready → start()
//         ├─ with_renderer()       ├─ tick()   TimeStep → step()
//         └─ headless()            └─ destroy() deferred to next step
// ```
//
// Frame:
//   commands → PRE_STEP → STEP → scenes.update → POST_STEP
//            → PRE_RENDER → scenes.render → POST_RENDER
//
//=========================================================================

//=== External Dependencies ===============================================

use std::path::Path;
use std::rc::Rc;

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use log::{debug, info, trace, warn};

//=== Internal Dependencies ===============================================

use crate::config::{ConfigError, GameConfig};
use crate::core::data::DataManager;
use crate::core::events::{EventEmitter, NamedEvent};
use crate::core::plugins::{PluginCache, CORE_EVENT_EMITTER};
use crate::core::scene::{SceneKey, SceneManager};
use crate::core::textures::TextureManager;
use crate::core::time_step::TimeStep;
use crate::error::GameError;
use crate::platform;
use crate::renderer::Renderer;

//=== GameEvent ===========================================================

#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    Boot,
    Ready,
    PreStep { time: f64, delta: f64 },
    Step { time: f64, delta: f64 },
    PostStep { time: f64, delta: f64 },
    PreRender { has_renderer: bool },
    PostRender { has_renderer: bool },
    Pause,
    Resume,
    Hidden,
    Visible,
    Blur,
    Focus,
    Destroy,
}

impl NamedEvent for GameEvent {
    fn name(&self) -> &'static str {
        match self {
            GameEvent::Boot => "boot",
            GameEvent::Ready => "ready",
            GameEvent::PreStep { .. } => "prestep",
            GameEvent::Step { .. } => "step",
            GameEvent::PostStep { .. } => "poststep",
            GameEvent::PreRender { .. } => "prerender",
            GameEvent::PostRender { .. } => "postrender",
            GameEvent::Pause => "pause",
            GameEvent::Resume => "resume",
            GameEvent::Hidden => "hidden",
            GameEvent::Visible => "visible",
            GameEvent::Blur => "blur",
            GameEvent::Focus => "focus",
            GameEvent::Destroy => "destroy",
        }
    }
}

//=== GameCommand / GameHandle ============================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameCommand {
    Pause,
    Resume,
    Destroy { remove_canvas: bool, no_return: bool },
}

/// Queues commands for the game from places that cannot borrow it,
/// such as event listeners. Commands apply at the start of the next step.
#[derive(Debug, Clone)]
pub struct GameHandle {
    sender: Sender<GameCommand>,
}

impl GameHandle {
    pub fn pause(&self) {
        self.send(GameCommand::Pause);
    }

    pub fn resume(&self) {
        self.send(GameCommand::Resume);
    }

    pub fn destroy(&self, remove_canvas: bool, no_return: bool) {
        self.send(GameCommand::Destroy {
            remove_canvas,
            no_return,
        });
    }

    pub fn send(&self, command: GameCommand) {
        match self.sender.try_send(command) {
            Ok(()) => trace!("Queued game command {:?}", command),
            Err(TrySendError::Full(command)) => {
                warn!("Game command channel full, dropping {:?}", command)
            }
            Err(TrySendError::Disconnected(command)) => {
                debug!("Game is gone, dropping {:?}", command)
            }
        }
    }
}

//=== GameBuilder =========================================================

/// Builder for configuring and constructing a [`Game`].
///
/// # Default Values
///
/// - **Title**: "Stagecraft"
/// - **Size**: 1024x768
/// - **FPS**: 60 target, 5 min, smoothed
/// - **Plugins**: [`PluginCache::with_core_plugins`]
///
/// # Examples
///
/// ```no_run
/// use stagecraft::prelude::*;
///
/// #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// enum GameScene { Main }
/// impl SceneKey for GameScene {}
///
/// struct Main;
/// impl Scene<GameScene> for Main {
///     fn update(&mut self, _sys: &mut Systems<GameScene>, _time: f64, _delta: f64) {}
/// }
///
/// GameBuilder::<GameScene>::new()
///     .with_title("Asteroids")
///     .with_fps(120.0)
///     .build()
///     .init(|scenes| {
///         scenes.register_default(GameScene::Main, Main);
///     })
///     .run()
///     .expect("game loop failed");
/// ```
pub struct GameBuilder<S: SceneKey> {
    config: GameConfig,
    plugins: Option<PluginCache>,
    renderer: Option<Box<dyn Renderer>>,
    _phantom: std::marker::PhantomData<S>,
}

impl<S: SceneKey> GameBuilder<S> {
    pub fn new() -> Self {
        Self::from_config(GameConfig::default())
    }

    pub fn from_config(config: GameConfig) -> Self {
        Self {
            config,
            plugins: None,
            renderer: None,
            _phantom: std::marker::PhantomData,
        }
    }

    /// Starts from a `.toml` or `.ron` config file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Ok(Self::from_config(GameConfig::load_from_file(path)?))
    }

    pub fn with_config(mut self, config: GameConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.config.title = title.into();
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.config.width = width;
        self.config.height = height;
        self
    }

    /// Sets the target frames per second.
    ///
    /// # Panics
    ///
    /// Panics if `fps <= 0.0`.
    pub fn with_fps(mut self, fps: f64) -> Self {
        assert!(fps > 0.0, "FPS must be positive, got {}", fps);
        self.config.fps.target = fps;
        self
    }

    /// Sets the capacity of the [`GameHandle`] command channel.
    ///
    /// # Panics
    ///
    /// Panics if `capacity == 0`.
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        assert!(capacity > 0, "Channel capacity must be positive");
        self.config.channel_capacity = capacity;
        self
    }

    pub fn with_renderer<R: Renderer + 'static>(mut self, renderer: R) -> Self {
        self.renderer = Some(Box::new(renderer));
        self
    }

    /// Replaces the default plugin registry.
    pub fn with_plugins(mut self, plugins: PluginCache) -> Self {
        self.plugins = Some(plugins);
        self
    }

    /// Runs without rendering, even if a renderer was supplied.
    pub fn headless(mut self) -> Self {
        self.config.headless = true;
        self
    }

    pub fn build(self) -> Game<S> {
        info!(
            "Building game '{}' ({}x{}, {} fps, channel: {})",
            self.config.title,
            self.config.width,
            self.config.height,
            self.config.fps.target,
            self.config.channel_capacity
        );

        let plugins = self.plugins.unwrap_or_else(PluginCache::with_core_plugins);
        let mut game = Game::new(self.config, plugins);
        game.renderer = self.renderer;
        game
    }
}

impl<S: SceneKey> Default for GameBuilder<S> {
    fn default() -> Self {
        Self::new()
    }
}

//=== Game ================================================================

/// The game root.
///
/// Construct with [`GameBuilder`]. A game is driven either by
/// [`Game::run`], which hands it to the platform loop, or manually by
/// calling [`Game::boot`] and then [`Game::tick`] with the current time.
pub struct Game<S: SceneKey> {
    config: GameConfig,
    plugins: Rc<PluginCache>,
    scenes: SceneManager<S>,
    time_step: TimeStep,
    textures: TextureManager,
    registry: DataManager,
    events: EventEmitter<GameEvent>,
    renderer: Option<Box<dyn Renderer>>,

    command_tx: Sender<GameCommand>,
    command_rx: Receiver<GameCommand>,

    is_booted: bool,
    is_running: bool,
    is_paused: bool,
    headless: bool,
    has_focus: bool,
    pending_destroy: bool,
    remove_canvas: bool,
    no_return: bool,
    destroyed: bool,
}

impl<S: SceneKey> Game<S> {
    //--- Construction -----------------------------------------------------

    pub fn new(config: GameConfig, plugins: PluginCache) -> Self {
        let plugins = Rc::new(plugins);
        let (command_tx, command_rx) = bounded(config.channel_capacity.max(1));

        Self {
            scenes: SceneManager::new(plugins.clone()),
            time_step: TimeStep::new(&config.fps),
            textures: TextureManager::new(),
            registry: DataManager::new(),
            events: EventEmitter::new(),
            renderer: None,
            plugins,
            command_tx,
            command_rx,
            is_booted: false,
            is_running: false,
            is_paused: false,
            headless: config.headless,
            has_focus: false,
            pending_destroy: false,
            remove_canvas: false,
            no_return: false,
            destroyed: false,
            config,
        }
    }

    /// Gives setup code access to the scene manager before the game runs.
    pub fn init<F>(mut self, init_fn: F) -> Self
    where
        F: FnOnce(&mut SceneManager<S>),
    {
        info!("Initializing game scenes");
        init_fn(&mut self.scenes);
        self
    }

    //--- Boot -------------------------------------------------------------

    /// Boots the game once.
    ///
    /// Fails if the event emitter core plugin is missing. Scenes start
    /// as soon as the texture manager reports ready, which may be on a
    /// later `tick`.
    pub fn boot(&mut self) -> Result<(), GameError> {
        if self.destroyed {
            return Err(GameError::Destroyed);
        }
        if self.is_booted {
            warn!("Game '{}' already booted", self.config.title);
            return Ok(());
        }

        let missing = self.plugins.missing_core(&[CORE_EVENT_EMITTER]);
        if !missing.is_empty() {
            warn!("Aborting boot, core plugin(s) missing: {}", missing.join(", "));
            return Err(GameError::MissingCorePlugins(missing));
        }

        self.is_booted = true;
        self.headless = self.config.headless || self.renderer.is_none();
        info!(
            "Booting game '{}' ({})",
            self.config.title,
            if self.headless { "headless" } else { "renderer" }
        );
        self.emit(GameEvent::Boot);

        if self.textures.boot() {
            self.textures_ready();
        } else {
            debug!("Waiting on {} texture load(s)", self.textures.pending());
        }
        Ok(())
    }

    fn textures_ready(&mut self) {
        if self.is_running {
            return;
        }
        self.emit(GameEvent::Ready);
        self.scenes.boot_queue();
        self.start();
    }

    /// Marks the game running and starts the frame clock.
    pub fn start(&mut self) {
        if self.is_running || self.destroyed {
            return;
        }
        self.is_running = true;
        self.has_focus = true;
        self.time_step.start();
        info!("Game '{}' running", self.config.title);
    }

    //--- Frame ------------------------------------------------------------

    /// Advances the frame clock to `now` (milliseconds) and runs a step if
    /// the clock produced one.
    pub fn tick(&mut self, now: f64) {
        if self.destroyed {
            return;
        }
        if self.is_booted && !self.is_running && self.textures.is_ready() {
            self.textures_ready();
        }

        match self.time_step.step(now) {
            Some((time, delta)) if self.headless => self.headless_step(time, delta),
            Some((time, delta)) => self.step(time, delta),
            None => {
                // Clock is paused or not started, but teardown must not wait.
                self.drain_commands();
                if self.pending_destroy {
                    self.run_destroy();
                }
            }
        }
    }

    /// Runs one full frame with rendering.
    pub fn step(&mut self, time: f64, delta: f64) {
        if !self.begin_frame() {
            return;
        }
        self.update_scenes(time, delta);

        let has_renderer = self.renderer.is_some();
        if let Some(renderer) = self.renderer.as_deref_mut() {
            renderer.pre_render();
        }
        self.emit(GameEvent::PreRender { has_renderer });

        if let Some(renderer) = self.renderer.as_deref_mut() {
            self.scenes.render(renderer);
            renderer.post_render();
        }
        self.emit(GameEvent::PostRender { has_renderer });
    }

    /// Runs one frame without touching the renderer.
    pub fn headless_step(&mut self, time: f64, delta: f64) {
        if !self.begin_frame() {
            return;
        }
        self.update_scenes(time, delta);
        self.emit(GameEvent::PreRender { has_renderer: false });
        self.emit(GameEvent::PostRender { has_renderer: false });
    }

    /// Applies queued commands. Returns false if the frame must not run.
    fn begin_frame(&mut self) -> bool {
        if self.destroyed {
            return false;
        }
        self.drain_commands();
        if self.pending_destroy {
            self.run_destroy();
            return false;
        }
        !self.is_paused
    }

    fn update_scenes(&mut self, time: f64, delta: f64) {
        self.emit(GameEvent::PreStep { time, delta });
        self.emit(GameEvent::Step { time, delta });
        self.scenes.update(time, delta);
        self.emit(GameEvent::PostStep { time, delta });
    }

    fn drain_commands(&mut self) {
        while let Ok(command) = self.command_rx.try_recv() {
            match command {
                GameCommand::Pause => self.pause(),
                GameCommand::Resume => self.resume(),
                GameCommand::Destroy {
                    remove_canvas,
                    no_return,
                } => self.destroy(remove_canvas, no_return),
            }
        }
    }

    //--- Pause / Visibility -----------------------------------------------

    pub fn pause(&mut self) {
        let was_paused = self.is_paused;
        self.is_paused = true;
        if !was_paused {
            debug!("Game paused");
            self.emit(GameEvent::Pause);
        }
    }

    pub fn resume(&mut self) {
        let was_paused = self.is_paused;
        self.is_paused = false;
        if was_paused {
            debug!("Game resumed");
            self.emit(GameEvent::Resume);
        }
    }

    /// The window was hidden: stop the clock.
    pub fn on_hidden(&mut self) {
        self.time_step.pause();
        self.emit(GameEvent::Hidden);
    }

    /// The window is visible again: restart the clock without a delta spike.
    pub fn on_visible(&mut self) {
        self.time_step.resume();
        self.emit(GameEvent::Visible);
    }

    pub fn on_blur(&mut self) {
        self.has_focus = false;
        self.time_step.blur();
        self.emit(GameEvent::Blur);
        if self.config.pause_on_blur {
            self.pause();
        }
    }

    pub fn on_focus(&mut self) {
        self.has_focus = true;
        self.time_step.focus();
        self.emit(GameEvent::Focus);
        if self.config.pause_on_blur {
            self.resume();
        }
    }

    //--- Destroy ----------------------------------------------------------

    /// Flags the game for teardown at the start of the next step.
    pub fn destroy(&mut self, remove_canvas: bool, no_return: bool) {
        if self.destroyed {
            return;
        }
        debug!("Game destroy requested (remove_canvas: {}, no_return: {})", remove_canvas, no_return);
        self.pending_destroy = true;
        self.remove_canvas = remove_canvas;
        self.no_return = no_return;
    }

    fn run_destroy(&mut self) {
        info!("Destroying game '{}'", self.config.title);

        self.scenes.destroy();
        self.emit(GameEvent::Destroy);
        self.events.remove_all_listeners();
        self.registry.destroy();
        self.textures.destroy();

        if let Some(mut renderer) = self.renderer.take() {
            renderer.destroy();
        }
        self.time_step.destroy();

        self.pending_destroy = false;
        self.is_running = false;
        self.destroyed = true;
    }

    //--- Execution --------------------------------------------------------

    /// Boots the game if needed and hands it to the platform loop. Blocks
    /// until the game is destroyed.
    pub fn run(mut self) -> Result<(), GameError> {
        if !self.is_booted {
            self.boot()?;
        }
        if self.headless {
            platform::run_headless(self)
        } else {
            platform::run(self)
        }
    }

    //--- Accessors --------------------------------------------------------

    fn emit(&mut self, event: GameEvent) {
        self.events.emit(&event);
    }

    pub fn handle(&self) -> GameHandle {
        GameHandle {
            sender: self.command_tx.clone(),
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn plugins(&self) -> &Rc<PluginCache> {
        &self.plugins
    }

    pub fn scenes(&self) -> &SceneManager<S> {
        &self.scenes
    }

    pub fn scenes_mut(&mut self) -> &mut SceneManager<S> {
        &mut self.scenes
    }

    pub fn events_mut(&mut self) -> &mut EventEmitter<GameEvent> {
        &mut self.events
    }

    /// Game-wide data store shared by every scene.
    pub fn registry(&self) -> &DataManager {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut DataManager {
        &mut self.registry
    }

    pub fn textures(&self) -> &TextureManager {
        &self.textures
    }

    pub fn textures_mut(&mut self) -> &mut TextureManager {
        &mut self.textures
    }

    pub fn time_step(&self) -> &TimeStep {
        &self.time_step
    }

    /// Frames stepped so far.
    pub fn frame(&self) -> u64 {
        self.time_step.frame()
    }

    /// Time of the current frame in milliseconds.
    pub fn time(&self) -> f64 {
        self.time_step.now()
    }

    pub fn is_booted(&self) -> bool {
        self.is_booted
    }

    pub fn is_running(&self) -> bool {
        self.is_running
    }

    pub fn is_paused(&self) -> bool {
        self.is_paused
    }

    pub fn is_headless(&self) -> bool {
        self.headless
    }

    pub fn has_focus(&self) -> bool {
        self.has_focus
    }

    pub fn is_pending_destroy(&self) -> bool {
        self.pending_destroy
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Whether teardown should also close the window.
    pub fn removes_canvas(&self) -> bool {
        self.remove_canvas
    }

    pub fn no_return(&self) -> bool {
        self.no_return
    }
}

//=========================================================================
// Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::scene::{Scene, Systems};
    use std::cell::RefCell;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum TestScene {
        Main,
    }

    impl SceneKey for TestScene {}

    struct Counter(Rc<RefCell<u32>>);

    impl Scene<TestScene> for Counter {
        fn update(&mut self, _sys: &mut Systems<TestScene>, _time: f64, _delta: f64) {
            *self.0.borrow_mut() += 1;
        }
    }

    fn record(game: &mut Game<TestScene>) -> Rc<RefCell<Vec<&'static str>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = log.clone();
        game.events_mut().on(move |event| sink.borrow_mut().push(event.name()));
        log
    }

    //=====================================================================
    // GameBuilder Tests
    //=====================================================================

    #[test]
    fn builder_defaults() {
        let builder = GameBuilder::<TestScene>::new();
        assert_eq!(builder.config, GameConfig::default());
        assert!(builder.renderer.is_none());
    }

    #[test]
    fn builder_fluent_api_chaining() {
        let game = GameBuilder::<TestScene>::new()
            .with_title("Asteroids")
            .with_size(640, 480)
            .with_fps(120.0)
            .with_channel_capacity(4)
            .headless()
            .build();

        assert_eq!(game.config().title, "Asteroids");
        assert_eq!((game.config().width, game.config().height), (640, 480));
        assert_eq!(game.time_step().target_interval(), 1000.0 / 120.0);
        assert!(game.config().headless);
    }

    #[test]
    #[should_panic(expected = "FPS must be positive")]
    fn builder_with_fps_panics_on_zero() {
        GameBuilder::<TestScene>::new().with_fps(0.0);
    }

    #[test]
    #[should_panic(expected = "Channel capacity must be positive")]
    fn builder_with_channel_capacity_panics_on_zero() {
        GameBuilder::<TestScene>::new().with_channel_capacity(0);
    }

    //=====================================================================
    // Game Tests
    //=====================================================================

    #[test]
    fn boot_starts_default_scene() {
        let updates = Rc::new(RefCell::new(0));
        let mut game = GameBuilder::<TestScene>::new()
            .build()
            .init(|scenes| {
                scenes.register_default(TestScene::Main, Counter(updates.clone()));
            });

        game.boot().expect("boot");
        assert!(game.is_running());
        assert!(game.is_headless());
        assert!(game.scenes().is_active(TestScene::Main));

        game.tick(0.0);
        game.tick(16.0);
        assert_eq!(*updates.borrow(), 2);
        assert_eq!(game.frame(), 2);
        assert_eq!(game.time(), 16.0);
    }

    #[test]
    fn boot_waits_for_pending_textures() {
        let mut game = GameBuilder::<TestScene>::new().build();
        game.textures_mut().begin_load();

        game.boot().expect("boot");
        assert!(!game.is_running());

        game.textures_mut().complete_load("ship");
        game.tick(0.0);
        assert!(game.is_running());
    }

    #[test]
    fn missing_event_emitter_aborts_boot() {
        let mut game = GameBuilder::<TestScene>::new()
            .with_plugins(PluginCache::new())
            .build();
        let log = record(&mut game);

        let result = game.boot();
        assert!(matches!(result, Err(GameError::MissingCorePlugins(ref keys)) if keys == &[CORE_EVENT_EMITTER]));
        assert!(!game.is_booted());
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn headless_frame_sequence() {
        let mut game = GameBuilder::<TestScene>::new().build();
        game.boot().expect("boot");
        let log = record(&mut game);

        game.headless_step(0.0, 16.0);
        assert_eq!(
            *log.borrow(),
            vec!["prestep", "step", "poststep", "prerender", "postrender"]
        );
    }

    #[test]
    fn pause_emits_only_on_change() {
        let mut game = GameBuilder::<TestScene>::new().build();
        game.boot().expect("boot");
        let log = record(&mut game);

        game.pause();
        game.pause();
        game.step(0.0, 16.0);
        game.resume();
        game.resume();

        assert_eq!(*log.borrow(), vec!["pause", "resume"]);
    }

    #[test]
    fn handle_commands_apply_next_step() {
        let mut game = GameBuilder::<TestScene>::new().build();
        game.boot().expect("boot");
        let handle = game.handle();

        handle.pause();
        assert!(!game.is_paused());
        game.headless_step(0.0, 16.0);
        assert!(game.is_paused());
    }

    #[test]
    fn destroy_is_deferred_to_next_step() {
        let mut game = GameBuilder::<TestScene>::new().build();
        game.boot().expect("boot");
        let log = record(&mut game);

        game.destroy(true, false);
        assert!(game.is_pending_destroy());
        assert!(!game.is_destroyed());

        game.headless_step(0.0, 16.0);
        assert!(game.is_destroyed());
        assert!(game.removes_canvas());
        assert_eq!(*log.borrow(), vec!["destroy"]);
        assert!(matches!(game.boot(), Err(GameError::Destroyed)));
    }

    #[test]
    fn destroy_runs_while_hidden() {
        let mut game = GameBuilder::<TestScene>::new().build();
        game.boot().expect("boot");
        game.tick(0.0);
        game.on_hidden();

        game.handle().destroy(false, false);
        game.tick(16.0);
        assert!(game.is_destroyed());
    }

    #[test]
    fn pause_on_blur_follows_focus() {
        let mut config = GameConfig::default();
        config.pause_on_blur = true;
        let mut game = GameBuilder::<TestScene>::from_config(config).build();
        game.boot().expect("boot");

        game.on_blur();
        assert!(game.is_paused());
        assert!(!game.has_focus());
        game.on_focus();
        assert!(!game.is_paused());
    }
}
