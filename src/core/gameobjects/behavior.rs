//=========================================================================
// Behavior
//=========================================================================
//
// The per-frame logic capability of a game object.
//
// A plain `GameObject` only renders (if a renderer cares about it).
// Attaching a `Behavior` is what makes it eligible for the update list.
// Closures with the right shape are behaviors too.
//
//=========================================================================

use super::GameObject;

//=== UpdateFlow ==========================================================

/// What an object wants to happen after its `pre_update`.
///
/// Objects cannot touch the update list while it is iterating, so they
/// answer with a request and the list applies it at a safe point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UpdateFlow {
    /// Keep receiving `pre_update`.
    #[default]
    Continue,

    /// Leave the update list at the next merge (stays in the scene).
    RemoveFromUpdateList,

    /// Destroy the object once the current pass is over.
    Destroy,
}

//=== Behavior Trait ======================================================

/// Logic attached to a single game object.
pub trait Behavior {
    /// Called once per frame while the object is live and active.
    fn pre_update(&mut self, object: &mut GameObject, time: f64, delta: f64) -> UpdateFlow;

    /// Called at the start of `destroy`, before any event fires.
    fn pre_destroy(&mut self, _object: &mut GameObject) {}
}

impl<F> Behavior for F
where
    F: FnMut(&mut GameObject, f64, f64) -> UpdateFlow,
{
    fn pre_update(&mut self, object: &mut GameObject, time: f64, delta: f64) -> UpdateFlow {
        self(object, time, delta)
    }
}
