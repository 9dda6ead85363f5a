//=========================================================================
// Event Emitter
//=========================================================================
//
// Synchronous, single-threaded pub/sub used by every lifecycle owner.
//
// Architecture:
//   owner.emit(&E) → listeners (registration order)
//                       ├─ catch-all   (on / once)
//                       └─ named       (on_named / once_named)
//
// Delivery happens inside `emit`, before it returns. Listeners only see
// the event value, so they can never re-enter the emitter that is
// currently delivering.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;

use log::trace;

//=== Named Event Trait ===================================================

/// Event payloads that expose a stable string name.
///
/// Names let listeners subscribe to one kind of event and let owners drop
/// every listener of a kind (`off_named`) without knowing who added them.
pub trait NamedEvent {
    /// Stable, lowercase event name (e.g. `"pause"`).
    fn name(&self) -> &'static str;
}

//=== Listener Handle =====================================================

/// Handle returned on subscription; pass it to [`EventEmitter::off`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

struct Listener<E> {
    id: ListenerId,
    name: Option<&'static str>,
    once: bool,
    callback: Box<dyn FnMut(&E)>,
}

//=== EventEmitter ========================================================

/// Ordered listener registry for one event enum.
pub struct EventEmitter<E: NamedEvent> {
    listeners: Vec<Listener<E>>,
    next_id: u64,
}

impl<E: NamedEvent> EventEmitter<E> {
    //--- Construction -----------------------------------------------------

    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
            next_id: 0,
        }
    }

    //--- Subscription -----------------------------------------------------

    /// Subscribes to every event.
    pub fn on<F>(&mut self, callback: F) -> ListenerId
    where
        F: FnMut(&E) + 'static,
    {
        self.push(None, false, Box::new(callback))
    }

    /// Subscribes to the next event only.
    pub fn once<F>(&mut self, callback: F) -> ListenerId
    where
        F: FnMut(&E) + 'static,
    {
        self.push(None, true, Box::new(callback))
    }

    /// Subscribes to events with the given name.
    pub fn on_named<F>(&mut self, name: &'static str, callback: F) -> ListenerId
    where
        F: FnMut(&E) + 'static,
    {
        self.push(Some(name), false, Box::new(callback))
    }

    /// Subscribes to the next event with the given name.
    pub fn once_named<F>(&mut self, name: &'static str, callback: F) -> ListenerId
    where
        F: FnMut(&E) + 'static,
    {
        self.push(Some(name), true, Box::new(callback))
    }

    /// Removes a single listener. Returns false if it was already gone.
    pub fn off(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|listener| listener.id != id);
        before != self.listeners.len()
    }

    /// Removes every listener registered for `name`.
    ///
    /// Catch-all listeners are left in place.
    pub fn off_named(&mut self, name: &str) -> usize {
        let before = self.listeners.len();
        self.listeners
            .retain(|listener| listener.name.map_or(true, |n| n != name));
        before - self.listeners.len()
    }

    /// Drops every listener.
    pub fn remove_all_listeners(&mut self) {
        self.listeners.clear();
    }

    //--- Delivery ---------------------------------------------------------

    /// Delivers `event` to all matching listeners in registration order.
    ///
    /// Returns true if at least one listener ran.
    pub fn emit(&mut self, event: &E) -> bool {
        let name = event.name();
        let mut delivered = 0usize;

        self.listeners.retain_mut(|listener| {
            if listener.name.map_or(true, |n| n == name) {
                (listener.callback)(event);
                delivered += 1;
                !listener.once
            } else {
                true
            }
        });

        if delivered > 0 {
            trace!("event '{}' delivered to {} listener(s)", name, delivered);
        }
        delivered > 0
    }

    //--- Queries ----------------------------------------------------------

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Number of listeners that would receive an event called `name`.
    pub fn listener_count_for(&self, name: &str) -> usize {
        self.listeners
            .iter()
            .filter(|listener| listener.name.map_or(true, |n| n == name))
            .count()
    }

    //--- Internal Helpers -------------------------------------------------

    fn push(
        &mut self,
        name: Option<&'static str>,
        once: bool,
        callback: Box<dyn FnMut(&E)>,
    ) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push(Listener {
            id,
            name,
            once,
            callback,
        });
        id
    }
}

impl<E: NamedEvent> Default for EventEmitter<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: NamedEvent> fmt::Debug for EventEmitter<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventEmitter")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

//=========================================================================
// Tests
//=========================================================================
