//=========================================================================
// Scene Settings
//=========================================================================
//
// Lifecycle status and the per-scene settings snapshot held by `Systems`.
//
// Status progression:
//   Pending → Init → Start → Loading → Creating → Running
//   Running ⇄ Paused, Running ⇄ Sleeping
//   Running/Paused/Sleeping → Shutdown → Destroyed (terminal)
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::data::DataValue;

//=== SceneStatus =========================================================

/// Scene lifecycle status. The numeric order is the lifecycle order;
/// `SceneManager` range-checks it to decide what to step and render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum SceneStatus {
    #[default]
    Pending = 0,
    Init = 1,
    Start = 2,
    Loading = 3,
    Creating = 4,
    Running = 5,
    Paused = 6,
    Sleeping = 7,
    Shutdown = 8,
    Destroyed = 9,
}

//=== SceneConfig =========================================================

/// Registration-time options a scene declares through `Scene::config`.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneConfig {
    /// Start automatically once the manager boots.
    pub active: bool,

    /// Initial visibility.
    pub visible: bool,

    /// Scene plugin keys to install. `None` installs the cache defaults.
    pub plugins: Option<Vec<String>>,

    /// Data handed to the first `start`.
    pub data: Option<DataValue>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            active: false,
            visible: true,
            plugins: None,
            data: None,
        }
    }
}

//=== SceneSettings =======================================================

/// Mutable settings snapshot of one scene.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneSettings<S> {
    pub key: S,
    pub status: SceneStatus,
    pub active: bool,
    pub visible: bool,
    pub is_booted: bool,

    /// Set on the target of a running transition.
    pub is_transition: bool,
    pub transition_from: Option<S>,
    pub transition_duration: f64,
    pub transition_allow_input: bool,

    /// Set on the origin of a running transition.
    pub transition_target: Option<S>,

    pub data: Option<DataValue>,
    pub plugins: Option<Vec<String>>,
}

impl<S> SceneSettings<S> {
    pub fn new(key: S, config: &SceneConfig) -> Self {
        Self {
            key,
            status: SceneStatus::Pending,
            active: config.active,
            visible: config.visible,
            is_booted: false,
            is_transition: false,
            transition_from: None,
            transition_duration: 0.0,
            transition_allow_input: true,
            transition_target: None,
            data: config.data.clone(),
            plugins: config.plugins.clone(),
        }
    }

    /// Drops every transition marker, on either side.
    pub(crate) fn clear_transition(&mut self) {
        self.is_transition = false;
        self.transition_from = None;
        self.transition_duration = 0.0;
        self.transition_allow_input = true;
        self.transition_target = None;
    }
}

//=========================================================================
// Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_order_matches_lifecycle() {
        assert!(SceneStatus::Start < SceneStatus::Loading);
        assert!(SceneStatus::Running < SceneStatus::Paused);
        assert!(SceneStatus::Paused < SceneStatus::Sleeping);
        assert_eq!(SceneStatus::Destroyed as u8, 9);
        assert_eq!(SceneStatus::default(), SceneStatus::Pending);
    }

    #[test]
    fn settings_copy_config() {
        let config = SceneConfig {
            active: true,
            plugins: Some(vec!["Clock".into()]),
            ..SceneConfig::default()
        };
        let settings = SceneSettings::new("main", &config);

        assert!(settings.active);
        assert!(settings.visible);
        assert_eq!(settings.status, SceneStatus::Pending);
        assert_eq!(settings.plugins.as_deref(), Some(&["Clock".to_string()][..]));
    }
}
