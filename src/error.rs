//=========================================================================
// Errors
//=========================================================================
//
// Hard failures only. Per-frame misuse is logged and ignored; the game
// fails outright when it cannot boot or the platform loop dies.
//
//=========================================================================

use crate::config::ConfigError;

#[derive(thiserror::Error, Debug)]
pub enum GameError {
    #[error("Missing core plugin(s): {}", .0.join(", "))]
    MissingCorePlugins(Vec<String>),

    #[error("Game has already been destroyed")]
    Destroyed,

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Platform error: {0}")]
    Platform(#[from] winit::error::EventLoopError),
}
