//=========================================================================
// Configuration
//=========================================================================
//
// Game settings, loadable from `.toml` or `.ron` files.
//
// Every field has a default, so a config file only lists what it
// changes:
//
//   title = "Asteroids"
//   headless = true
//
//   [fps]
//   target = 120.0
//
//=========================================================================

//=== External Dependencies ===============================================

use std::path::Path;

use log::debug;
use serde::Deserialize;

//=== ConfigError =========================================================

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

//=== FpsConfig ===========================================================

/// Frame clock settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FpsConfig {
    /// Frames per second the clock aims for.
    pub target: f64,

    /// Lowest rate the delta is allowed to describe; larger gaps are
    /// clamped to `1000 / min`.
    pub min: f64,

    /// Average the delta over `delta_history` frames.
    pub smooth_step: bool,
    pub delta_history: usize,

    /// Frames after a reset during which the delta is capped at the
    /// target interval.
    pub panic_max: u32,
}

impl Default for FpsConfig {
    fn default() -> Self {
        Self {
            target: 60.0,
            min: 5.0,
            smooth_step: true,
            delta_history: 10,
            panic_max: 120,
        }
    }
}

//=== GameConfig ==========================================================

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,

    /// Run without a renderer, even if one is supplied.
    pub headless: bool,

    pub fps: FpsConfig,

    /// Focus the window when it opens.
    pub auto_focus: bool,

    /// Pause the game while the window is unfocused.
    pub pause_on_blur: bool,

    /// Capacity of the `GameHandle` command channel.
    pub channel_capacity: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            title: "Stagecraft".to_string(),
            width: 1024,
            height: 768,
            headless: false,
            fps: FpsConfig::default(),
            auto_focus: true,
            pause_on_blur: false,
            channel_capacity: 128,
        }
    }
}

impl GameConfig {
    /// Loads a config file, picking the format from its extension.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;

        let config = match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml_str(&contents)?,
            Some("ron") => Self::from_ron_str(&contents)?,
            _ => return Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        };
        debug!("Loaded game config from {}", path.display());
        Ok(config)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()
    }

    pub fn from_ron_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()
    }

    /// Rejects values the runtime cannot work with.
    pub fn validate(self) -> Result<Self, ConfigError> {
        if self.fps.target <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "fps.target",
                reason: format!("must be positive, got {}", self.fps.target),
            });
        }
        if self.fps.min <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "fps.min",
                reason: format!("must be positive, got {}", self.fps.min),
            });
        }
        if self.channel_capacity == 0 {
            return Err(ConfigError::Invalid {
                field: "channel_capacity",
                reason: "must be positive".to_string(),
            });
        }
        Ok(self)
    }
}

//=========================================================================
// Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = GameConfig::from_toml_str(
            r#"
            title = "Asteroids"
            headless = true

            [fps]
            target = 120.0
            "#,
        )
        .expect("valid toml");

        assert_eq!(config.title, "Asteroids");
        assert!(config.headless);
        assert_eq!(config.fps.target, 120.0);
        assert_eq!(config.fps.min, 5.0);
        assert_eq!(config.width, 1024);
    }

    #[test]
    fn ron_is_supported() {
        let config = GameConfig::from_ron_str("(width: 640, height: 480, fps: (smooth_step: false))")
            .expect("valid ron");
        assert_eq!((config.width, config.height), (640, 480));
        assert!(!config.fps.smooth_step);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let result = GameConfig::from_toml_str("channel_capacity = 0");
        assert!(matches!(result, Err(ConfigError::Invalid { field: "channel_capacity", .. })));

        let result = GameConfig::from_toml_str("[fps]\ntarget = -1.0");
        assert!(matches!(result, Err(ConfigError::Invalid { field: "fps.target", .. })));
    }

    #[test]
    fn malformed_input_is_a_parse_error() {
        assert!(matches!(GameConfig::from_toml_str("title = "), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let path = std::env::temp_dir().join("stagecraft-config-test.yaml");
        std::fs::write(&path, "title: nope").expect("temp file");
        let result = GameConfig::load_from_file(&path);
        let _ = std::fs::remove_file(&path);
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
    }
}
