//=========================================================================
// Events
//=========================================================================
//
// Typed, synchronous lifecycle signalling.
//
// Every owner (Game, Scene Systems, GameObject, DataManager, textures)
// defines one event enum and owns one `EventEmitter` for it. There is no
// string-keyed global bus: the enum is the channel.
//
//=========================================================================

//=== Module Declarations =================================================

mod emitter;

//=== Public API ==========================================================

pub use emitter::{EventEmitter, ListenerId, NamedEvent};
