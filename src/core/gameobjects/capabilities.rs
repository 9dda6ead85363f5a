//=========================================================================
// Capabilities
//=========================================================================
//
// Optional sub-resources a game object may carry, and the render flag set
// shared with capability components (visibility, alpha, scale, size).
//
// Physics and input are external collaborators; the core only needs to
// know that these resources exist and how to let go of them on destroy.
//
//=========================================================================

use bitflags::bitflags;

//=== Render Flags ========================================================

bitflags! {
    /// Render eligibility bits. An object renders only when all are set.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct RenderFlags: u8 {
        const VISIBLE = 0b0001;
        const ALPHA   = 0b0010;
        const SCALE   = 0b0100;
        const SIZE    = 0b1000;
    }
}

impl Default for RenderFlags {
    fn default() -> Self {
        RenderFlags::all()
    }
}

//=== Object State ========================================================

/// Free-form state value. The engine never reads it.
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectState {
    Number(f64),
    Text(String),
}

impl Default for ObjectState {
    fn default() -> Self {
        ObjectState::Number(0.0)
    }
}

impl From<f64> for ObjectState {
    fn from(value: f64) -> Self {
        ObjectState::Number(value)
    }
}

impl From<i32> for ObjectState {
    fn from(value: i32) -> Self {
        ObjectState::Number(f64::from(value))
    }
}

impl From<&str> for ObjectState {
    fn from(value: &str) -> Self {
        ObjectState::Text(value.to_string())
    }
}

impl From<String> for ObjectState {
    fn from(value: String) -> Self {
        ObjectState::Text(value)
    }
}

//=== Interactive State ===================================================

/// Input bookkeeping attached by `set_interactive`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct InteractiveState {
    pub enabled: bool,
    pub draggable: bool,
    pub drop_zone: bool,
    pub cursor: Option<String>,
}

//=== Physics Body ========================================================

/// Handle to a body living in an external physics world.
pub trait PhysicsBody {
    /// Removes the body from its world. Called at most once.
    fn destroy(&mut self);
}
