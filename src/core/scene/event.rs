//=========================================================================
// Scene Events
//=========================================================================
//
// Events emitted on a scene's own emitter by `Systems`.
//
// Every lifecycle transition emits exactly one of these, after the
// status has been updated.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::data::DataValue;
use crate::core::events::NamedEvent;
use crate::core::gameobjects::GameObjectId;

//=== SceneEvent ==========================================================

#[derive(Debug, Clone, PartialEq)]
pub enum SceneEvent {
    /// Plugins installed (`Systems::init`).
    Boot,
    Start,
    Ready { data: Option<DataValue> },
    Create,

    PreUpdate { time: f64, delta: f64 },
    Update { time: f64, delta: f64 },
    PostUpdate { time: f64, delta: f64 },
    PreRender,
    Render,

    Pause { data: Option<DataValue> },
    Resume { data: Option<DataValue> },
    Sleep { data: Option<DataValue> },
    Wake { data: Option<DataValue> },

    TransitionInit { duration: f64 },
    TransitionStart { duration: f64 },
    TransitionWake { duration: f64 },
    TransitionOut { duration: f64 },
    TransitionComplete,

    Shutdown { data: Option<DataValue> },
    Destroy,

    AddedToScene(GameObjectId),
    RemovedFromScene(GameObjectId),
}

impl SceneEvent {
    /// Names of the transition events dropped on shutdown.
    pub const TRANSITION_EVENTS: [&'static str; 5] = [
        "transitioninit",
        "transitionstart",
        "transitionwake",
        "transitionout",
        "transitioncomplete",
    ];
}

impl NamedEvent for SceneEvent {
    fn name(&self) -> &'static str {
        match self {
            SceneEvent::Boot => "boot",
            SceneEvent::Start => "start",
            SceneEvent::Ready { .. } => "ready",
            SceneEvent::Create => "create",
            SceneEvent::PreUpdate { .. } => "preupdate",
            SceneEvent::Update { .. } => "update",
            SceneEvent::PostUpdate { .. } => "postupdate",
            SceneEvent::PreRender => "prerender",
            SceneEvent::Render => "render",
            SceneEvent::Pause { .. } => "pause",
            SceneEvent::Resume { .. } => "resume",
            SceneEvent::Sleep { .. } => "sleep",
            SceneEvent::Wake { .. } => "wake",
            SceneEvent::TransitionInit { .. } => "transitioninit",
            SceneEvent::TransitionStart { .. } => "transitionstart",
            SceneEvent::TransitionWake { .. } => "transitionwake",
            SceneEvent::TransitionOut { .. } => "transitionout",
            SceneEvent::TransitionComplete => "transitioncomplete",
            SceneEvent::Shutdown { .. } => "shutdown",
            SceneEvent::Destroy => "destroy",
            SceneEvent::AddedToScene(_) => "addedtoscene",
            SceneEvent::RemovedFromScene(_) => "removedfromscene",
        }
    }
}
