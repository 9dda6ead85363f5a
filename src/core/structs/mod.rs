//=========================================================================
// Structures
//=========================================================================
//
// Generic containers shared by the display and scene layers.
//
//=========================================================================

mod list;

pub use list::List;
