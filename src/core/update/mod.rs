//=========================================================================
// Update
//=========================================================================
//
// Per-frame logic dispatch for scene objects.
//
//=========================================================================

mod update_list;

pub use update_list::{MergeReport, UpdateList};
