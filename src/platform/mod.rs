//=========================================================================
// Platform Subsystem
//
// Drives a `Game` from the OS event loop.
//
// Architecture:
// ```text
//  Main Thread:
//  ┌──────────────────────────────────────────┐
//  │  Winit Event Loop                        │
//  │   ├─ Focused(bool)   → on_focus/on_blur  │
//  │   ├─ Occluded(bool)  → on_hidden/visible │
//  │   ├─ CloseRequested  → destroy (deferred)│
//  │   └─ RedrawRequested → Game::tick(ms)    │
//  │                          ↓               │
//  │                   destroyed? → exit      │
//  └──────────────────────────────────────────┘
//
//  Frame Boundary: RedrawRequested
//    → one tick per redraw, paced by the display
//    → next redraw requested until the game is torn down
// ```
//
// Headless games never open a window; `run_headless` ticks them on the
// calling thread at the target frame rate instead.
//
//=========================================================================

//=== External Crates =====================================================

use std::thread;
use std::time::{Duration, Instant};

use log::*;
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    window::{Window, WindowAttributes, WindowId},
};

//=== Internal Imports ====================================================

use crate::core::scene::SceneKey;
use crate::error::GameError;
use crate::game::Game;

//=== Entry Points ========================================================

/// Runs the game inside a winit event loop. Returns once the game has been
/// destroyed and the loop exited.
pub(crate) fn run<S: SceneKey>(game: Game<S>) -> Result<(), GameError> {
    debug!(target: "platform", "Starting Winit event loop");

    let event_loop = EventLoop::new().map_err(|e| {
        error!(target: "platform", "Event loop creation failed: {}", e);
        GameError::Platform(e)
    })?;

    let mut platform = Platform::new(game);
    event_loop.run_app(&mut platform)?;

    info!(target: "platform", "Platform event loop exited");
    Ok(())
}

/// Ticks a game without a window until it is destroyed.
pub(crate) fn run_headless<S: SceneKey>(mut game: Game<S>) -> Result<(), GameError> {
    let frame_duration = Duration::from_secs_f64(game.time_step().target_interval() / 1000.0);
    let clock = Instant::now();
    info!(target: "platform", "Running headless ({:.2}ms per frame)", frame_duration.as_secs_f64() * 1000.0);

    while !game.is_destroyed() {
        let frame_start = Instant::now();
        game.tick(elapsed_ms(clock));

        let elapsed = frame_start.elapsed();
        if elapsed < frame_duration {
            thread::sleep(frame_duration - elapsed);
        }
    }

    info!(target: "platform", "Headless loop exited");
    Ok(())
}

fn elapsed_ms(clock: Instant) -> f64 {
    clock.elapsed().as_secs_f64() * 1000.0
}

//=== Platform ============================================================

/// Window owner and event translator.
///
/// Runs on the main thread (Winit requirement on macOS/iOS). The window is
/// created lazily in `resumed()` for mobile compatibility.
pub(crate) struct Platform<S: SceneKey> {
    game: Game<S>,

    /// OS window handle (None until `resumed()` called).
    window: Option<Window>,

    /// Origin of the millisecond timestamps passed to `Game::tick`.
    clock: Instant,
}

impl<S: SceneKey> Platform<S> {
    pub fn new(game: Game<S>) -> Self {
        info!(target: "platform", "Platform subsystem initialized");
        Self {
            game,
            window: None,
            clock: Instant::now(),
        }
    }

    fn request_redraw(&self) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    /// Ticks the game and exits the loop once it has been torn down.
    fn frame(&mut self, event_loop: &ActiveEventLoop) {
        self.game.tick(elapsed_ms(self.clock));

        if self.game.is_destroyed() {
            if self.game.removes_canvas() {
                debug!(target: "platform", "Closing window");
                self.window = None;
            }
            event_loop.exit();
        } else {
            self.request_redraw();
        }
    }

    //--- Test Accessors ---------------------------------------------------

    #[cfg(test)]
    pub(crate) fn window(&self) -> Option<&Window> {
        self.window.as_ref()
    }
}

//=== Winit Integration ===================================================

impl<S: SceneKey> ApplicationHandler for Platform<S> {
    /// Called when app becomes active (startup or mobile resume).
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            debug!(target: "platform", "Window already exists (mobile resume?)");
            return;
        }

        let config = self.game.config();
        let attrs = WindowAttributes::default()
            .with_title(config.title.clone())
            .with_inner_size(LogicalSize::new(config.width, config.height));
        let auto_focus = config.auto_focus;

        match event_loop.create_window(attrs) {
            Ok(window) => {
                info!(
                    target: "platform",
                    "Window created: {}x{} @ {}x DPI",
                    window.inner_size().width,
                    window.inner_size().height,
                    window.scale_factor()
                );
                if auto_focus {
                    window.focus_window();
                }
                window.request_redraw();
                self.window = Some(window);
            }
            Err(e) => {
                error!(target: "platform", "Window creation failed: {}", e);
                self.game.destroy(true, true);
                self.frame(event_loop);
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                info!(target: "platform", "Window close requested");
                self.game.destroy(true, false);
                self.request_redraw();
            }

            WindowEvent::Focused(true) => {
                trace!(target: "platform", "Window focused");
                self.game.on_focus();
            }

            WindowEvent::Focused(false) => {
                trace!(target: "platform", "Window blurred");
                self.game.on_blur();
            }

            WindowEvent::Occluded(true) => {
                debug!(target: "platform", "Window hidden");
                self.game.on_hidden();
            }

            WindowEvent::Occluded(false) => {
                debug!(target: "platform", "Window visible");
                self.game.on_visible();
                self.request_redraw();
            }

            WindowEvent::RedrawRequested => self.frame(event_loop),

            _ => {}
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{GameBuilder, GameEvent};

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum TestScene {
        Main,
    }

    impl SceneKey for TestScene {}

    #[test]
    fn platform_creation() {
        let game = GameBuilder::<TestScene>::new().build();
        let platform = Platform::new(game);
        assert!(platform.window().is_none(), "Window should be created lazily");
    }

    #[test]
    fn headless_loop_exits_after_destroy() {
        let mut game = GameBuilder::<TestScene>::new().with_fps(1000.0).headless().build();
        game.boot().expect("boot");

        let handle = game.handle();
        game.events_mut().on(move |event| {
            if let GameEvent::Step { .. } = event {
                handle.destroy(false, false);
            }
        });

        run_headless(game).expect("headless loop");
    }

    #[test]
    fn elapsed_is_monotonic() {
        let clock = Instant::now();
        let first = elapsed_ms(clock);
        assert!(elapsed_ms(clock) >= first);
    }
}
