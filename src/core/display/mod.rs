//=========================================================================
// Display
//=========================================================================
//
// Draw-order bookkeeping for scenes and parent containers.
//
//=========================================================================

mod display_list;

pub use display_list::DisplayList;

use crate::core::gameobjects::GameObjectId;

//=== Display Owner =======================================================

/// Which display list an object currently belongs to.
///
/// An object has at most one owner at any instant: the scene's own display
/// list or the child list of a parent container object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DisplayOwner {
    /// The scene's root display list.
    Scene,

    /// The child list of a container object.
    Container(GameObjectId),
}
