//=========================================================================
// Data
//=========================================================================
//
// Dynamic values and the key/value store built on them.
//
//=========================================================================

mod data_manager;
mod value;

pub use data_manager::{DataEvent, DataManager};
pub use value::DataValue;
