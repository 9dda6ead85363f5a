//=========================================================================
// Game Loop Scenarios
//=========================================================================
//
// Frame sequencing, deferred commands and teardown of the Game root,
// stepped by hand instead of through the platform loop.
//
//=========================================================================

mod common;

use std::cell::RefCell;
use std::rc::Rc;

use common::*;
use stagecraft::core::plugins::{CORE_DISPLAY_LIST, CORE_UPDATE_LIST};
use stagecraft::prelude::*;

fn builder() -> GameBuilder<TestScene> {
    GameBuilder::<TestScene>::new().with_title("Test")
}

fn booted(builder: GameBuilder<TestScene>, log: &Log) -> Game<TestScene> {
    let level = Recorder::new("level", log).on_create(|sys| {
        sys.add(sprite("ship", 0.0));
    });
    let mut game = builder.build().init(|scenes| {
        scenes.register_default(TestScene::Level, level);
    });
    game.boot().expect("boot");
    game
}

fn updates(log: &Log) -> usize {
    entries(log).iter().filter(|entry| *entry == "level:update").count()
}

//=====================================================================
// Frame Sequence
//=====================================================================

#[test]
fn destroy_from_step_listener_lets_the_frame_finish() {
    let log = new_log();
    let (renderer, frames) = CountingRenderer::new();
    let mut game = booted(builder().with_renderer(renderer), &log);
    let events = record_game_events(&mut game);

    let handle = game.handle();
    game.events_mut().once_named("step", move |_| handle.destroy(true, false));

    game.step(0.0, 16.0);
    assert_eq!(
        entries(&events),
        vec!["prestep", "step", "poststep", "prerender", "postrender"]
    );
    assert_eq!(updates(&log), 1);
    {
        let frames = frames.borrow();
        assert_eq!((frames.pre, frames.post), (1, 1));
        assert_eq!(frames.passes, vec![vec!["ship"]]);
        assert!(!frames.destroyed);
    }
    assert!(!game.is_destroyed());

    game.step(16.0, 16.0);
    assert!(game.is_destroyed());
    assert!(game.removes_canvas());
    assert!(frames.borrow().destroyed);
    assert_eq!(entries(&events).last().map(String::as_str), Some("destroy"));
    assert_eq!(updates(&log), 1, "no scene update after teardown");
    assert!(game.scenes().is_empty());

    game.step(32.0, 16.0);
    assert_eq!(frames.borrow().pre, 1);
}

#[test]
fn headless_render_events_carry_no_renderer() {
    let log = new_log();
    let (renderer, frames) = CountingRenderer::new();
    let mut game = booted(builder().with_renderer(renderer).headless(), &log);
    assert!(game.is_headless());

    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    game.events_mut().on(move |event| {
        if matches!(event, GameEvent::PreRender { .. } | GameEvent::PostRender { .. }) {
            sink.borrow_mut().push(event.clone());
        }
    });

    game.tick(0.0);
    game.tick(16.0);

    assert_eq!(
        *seen.borrow(),
        vec![
            GameEvent::PreRender { has_renderer: false },
            GameEvent::PostRender { has_renderer: false },
            GameEvent::PreRender { has_renderer: false },
            GameEvent::PostRender { has_renderer: false },
        ]
    );
    assert_eq!(updates(&log), 2);
    assert!(frames.borrow().passes.is_empty());
}

#[test]
fn renderer_frames_render_the_scene() {
    let log = new_log();
    let (renderer, frames) = CountingRenderer::new();
    let mut game = booted(builder().with_renderer(renderer), &log);
    assert!(!game.is_headless());

    game.tick(0.0);
    game.tick(16.0);

    let frames = frames.borrow();
    assert_eq!((frames.pre, frames.post), (2, 2));
    assert_eq!(frames.passes.len(), 2);
}

//=====================================================================
// Boot
//=====================================================================

#[test]
fn boot_fails_without_event_emitter() {
    let mut plugins = PluginCache::new();
    plugins.register_core(CORE_DISPLAY_LIST, "displayList");
    plugins.register_core(CORE_UPDATE_LIST, "updateList");

    let log = new_log();
    let mut game = GameBuilder::<TestScene>::new()
        .with_plugins(plugins)
        .build()
        .init(|scenes| {
            scenes.register_default(TestScene::Level, Recorder::new("level", &log));
        });
    let events = record_game_events(&mut game);

    match game.boot() {
        Err(GameError::MissingCorePlugins(missing)) => assert_eq!(missing, vec!["EventEmitter"]),
        other => panic!("Expected missing core plugins, got {:?}", other),
    }
    assert!(!game.is_running());
    assert!(!game.scenes().is_booted());
    assert!(entries(&events).is_empty());
    assert!(entries(&log).is_empty());
}

#[test]
fn boot_emits_boot_then_ready() {
    let log = new_log();
    let mut game = GameBuilder::<TestScene>::new().build();
    let events = record_game_events(&mut game);
    game.scenes_mut()
        .register_default(TestScene::Level, Recorder::new("level", &log));

    game.boot().expect("boot");
    game.boot().expect("second boot is a no-op");

    assert_eq!(entries(&events), vec!["boot", "ready"]);
    assert_eq!(entries(&log), vec!["level:init", "level:preload", "level:create"]);
}

//=====================================================================
// Commands and Visibility
//=====================================================================

#[test]
fn pause_and_resume_through_the_handle() {
    let log = new_log();
    let mut game = booted(builder(), &log);
    let events = record_game_events(&mut game);
    let handle = game.handle();

    handle.pause();
    handle.pause();
    game.tick(0.0);
    game.tick(16.0);
    assert!(game.is_paused());
    assert_eq!(updates(&log), 0);

    handle.resume();
    game.tick(32.0);
    assert!(!game.is_paused());
    assert_eq!(updates(&log), 1);

    let names = entries(&events);
    assert_eq!(names.iter().filter(|name| *name == "pause").count(), 1);
    assert_eq!(names.iter().filter(|name| *name == "resume").count(), 1);
}

#[test]
fn hidden_game_skips_frames_without_a_delta_spike() {
    let log = new_log();
    let mut game = booted(builder(), &log);

    let deltas = Rc::new(RefCell::new(Vec::new()));
    let sink = deltas.clone();
    game.events_mut().on(move |event| {
        if let GameEvent::Step { delta, .. } = event {
            sink.borrow_mut().push(*delta);
        }
    });

    game.tick(0.0);
    game.on_hidden();
    game.tick(5_000.0);
    assert_eq!(game.frame(), 1);

    game.on_visible();
    game.tick(60_000.0);
    assert_eq!(game.frame(), 2);
    assert_eq!(game.time(), 60_000.0);

    let last = deltas.borrow().last().copied().expect("stepped");
    assert!(last <= game.time_step().target_interval(), "delta {} spiked", last);
}

#[test]
fn registry_outlives_scenes_until_destroy() {
    let log = new_log();
    let mut game = booted(builder(), &log);

    game.registry_mut().set("score", 10.0);
    game.scenes_mut().stop(TestScene::Level, None);
    assert_eq!(game.registry().get("score"), Some(&DataValue::from(10.0)));

    game.destroy(false, false);
    game.tick(0.0);
    assert!(game.is_destroyed());
    assert_eq!(game.registry().count(), 0);
}

//=====================================================================
// Configuration
//=====================================================================

#[test]
fn builder_from_config_file() {
    let path = std::env::temp_dir().join("stagecraft-game-loop-test.toml");
    std::fs::write(&path, "title = \"From File\"\nheadless = true\n[fps]\ntarget = 30.0\n")
        .expect("temp file");

    let game = GameBuilder::<TestScene>::from_file(&path).map(GameBuilder::build);
    let _ = std::fs::remove_file(&path);

    let game = game.expect("config loads");
    assert_eq!(game.config().title, "From File");
    assert!(game.config().headless);
    assert_eq!(game.time_step().target_interval(), 1000.0 / 30.0);
}
