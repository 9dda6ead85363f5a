//=========================================================================
// Data Manager
//=========================================================================
//
// Key/value store with change events.
//
// Used per game object (`GameObject::set_data`) and as the game-wide
// registry (`Game::registry`). A frozen store ignores writes; a destroyed
// store is empty, silent and frozen for good.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::BTreeMap;

use log::debug;

//=== Internal Dependencies ===============================================

use super::DataValue;
use crate::core::events::{EventEmitter, NamedEvent};

//=== DataEvent ===========================================================

/// Notifications raised by a [`DataManager`].
#[derive(Debug, Clone, PartialEq)]
pub enum DataEvent {
    /// A key was written for the first time.
    SetData { key: String, value: DataValue },

    /// An existing key changed value.
    ChangeData {
        key: String,
        value: DataValue,
        previous: DataValue,
    },

    /// A key was removed.
    RemoveData { key: String, value: DataValue },

    /// The store was destroyed.
    Destroy,
}

impl NamedEvent for DataEvent {
    fn name(&self) -> &'static str {
        match self {
            DataEvent::SetData { .. } => "setdata",
            DataEvent::ChangeData { .. } => "changedata",
            DataEvent::RemoveData { .. } => "removedata",
            DataEvent::Destroy => "destroy",
        }
    }
}

//=== DataManager =========================================================

#[derive(Debug, Default)]
pub struct DataManager {
    values: BTreeMap<String, DataValue>,
    frozen: bool,
    destroyed: bool,
    events: EventEmitter<DataEvent>,
}

impl DataManager {
    pub fn new() -> Self {
        Self::default()
    }

    //--- Writing ----------------------------------------------------------

    /// Stores `value` under `key`, emitting SET_DATA or CHANGE_DATA.
    ///
    /// Writing an identical value is silent. Returns false when frozen.
    pub fn set(&mut self, key: &str, value: impl Into<DataValue>) -> bool {
        if self.frozen {
            debug!("DataManager is frozen, ignoring write to '{}'", key);
            return false;
        }

        let value = value.into();
        match self.values.insert(key.to_string(), value.clone()) {
            None => {
                self.events.emit(&DataEvent::SetData {
                    key: key.to_string(),
                    value,
                });
            }
            Some(previous) if previous != value => {
                self.events.emit(&DataEvent::ChangeData {
                    key: key.to_string(),
                    value,
                    previous,
                });
            }
            Some(_) => {}
        }
        true
    }

    /// Adds `amount` to a numeric value (missing keys start at 0).
    pub fn inc(&mut self, key: &str, amount: f64) -> Option<f64> {
        let current = match self.values.get(key) {
            None => 0.0,
            Some(value) => value.as_number()?,
        };
        let next = current + amount;
        self.set(key, next).then_some(next)
    }

    /// Flips a boolean value (missing keys start at false).
    pub fn toggle(&mut self, key: &str) -> Option<bool> {
        let current = match self.values.get(key) {
            None => false,
            Some(value) => value.as_bool()?,
        };
        self.set(key, !current).then_some(!current)
    }

    /// Copies every entry of `values`; existing keys are replaced only when
    /// `overwrite` is set.
    pub fn merge(&mut self, values: BTreeMap<String, DataValue>, overwrite: bool) {
        for (key, value) in values {
            if overwrite || !self.values.contains_key(&key) {
                self.set(&key, value);
            }
        }
    }

    pub fn remove(&mut self, key: &str) -> bool {
        self.pop(key).is_some()
    }

    /// Removes `key` and hands back its value.
    pub fn pop(&mut self, key: &str) -> Option<DataValue> {
        if self.frozen {
            return None;
        }
        let value = self.values.remove(key)?;
        self.events.emit(&DataEvent::RemoveData {
            key: key.to_string(),
            value: value.clone(),
        });
        Some(value)
    }

    /// Drops every value and unfreezes the store.
    pub fn reset(&mut self) {
        if self.destroyed {
            return;
        }
        self.values.clear();
        self.frozen = false;
    }

    //--- Reading ----------------------------------------------------------

    pub fn get(&self, key: &str) -> Option<&DataValue> {
        self.values.get(key)
    }

    pub fn has(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn count(&self) -> usize {
        self.values.len()
    }

    pub fn each<F>(&self, mut callback: F)
    where
        F: FnMut(&str, &DataValue),
    {
        for (key, value) in &self.values {
            callback(key, value);
        }
    }

    //--- State ------------------------------------------------------------

    pub fn set_freeze(&mut self, frozen: bool) {
        if !self.destroyed {
            self.frozen = frozen;
        }
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    pub fn events_mut(&mut self) -> &mut EventEmitter<DataEvent> {
        &mut self.events
    }

    /// Clears the store, emits DESTROY and drops all listeners.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.values.clear();
        self.events.emit(&DataEvent::Destroy);
        self.events.remove_all_listeners();
        self.frozen = true;
        self.destroyed = true;
    }
}

//=========================================================================
// Tests
//=========================================================================
