//=========================================================================
// Stagecraft Library Root
//
// Scene and game-object lifecycle core for 2D games.
//
// Responsibilities:
// - Expose the game root (`Game`, `GameBuilder`) and its configuration
// - Expose the scene, display-list and game-object systems under `core`
// - Keep the OS event loop (`platform`) internal
//
// Typical usage:
// ```no_run
// use stagecraft::prelude::*;
//
// GameBuilder::<MyScenes>::new()
//     .build()
//     .init(|scenes| { scenes.register_default(MyScenes::Main, Main); })
//     .run()?;
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------

pub mod config;
pub mod core;
pub mod error;
pub mod game;
pub mod prelude;
pub mod renderer;

//--- Internal Modules ----------------------------------------------------
//
// `platform` owns the winit event loop and is reached through `Game::run`.
//
mod platform;

//--- Public Exports ------------------------------------------------------

pub use config::{ConfigError, FpsConfig, GameConfig};
pub use error::GameError;
pub use game::{Game, GameBuilder, GameCommand, GameEvent, GameHandle};

/// Initialises `env_logger` from `RUST_LOG`, defaulting to `info`.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .try_init();
}
