//=========================================================================
// Texture Manager
//=========================================================================
//
// Readiness tracking for the game-wide texture cache.
//
// The game waits for READY before starting its scenes. Decoding is not
// done here: a loader registers a key as pending, then completes or
// fails it, and READY fires once boot is over and nothing is pending.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::BTreeSet;

use log::{debug, warn};

//=== Internal Dependencies ===============================================

use crate::core::events::{EventEmitter, NamedEvent};

//=== Built-in Keys =======================================================

pub const DEFAULT_TEXTURE: &str = "__DEFAULT";
pub const MISSING_TEXTURE: &str = "__MISSING";
pub const WHITE_TEXTURE: &str = "__WHITE";

//=== TextureEvent ========================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextureEvent {
    Ready,
    Added(String),
    Removed(String),
    Error(String),
}

impl NamedEvent for TextureEvent {
    fn name(&self) -> &'static str {
        match self {
            TextureEvent::Ready => "ready",
            TextureEvent::Added(_) => "addtexture",
            TextureEvent::Removed(_) => "removetexture",
            TextureEvent::Error(_) => "onerror",
        }
    }
}

//=== TextureManager ======================================================

#[derive(Debug, Default)]
pub struct TextureManager {
    keys: BTreeSet<String>,
    pending: usize,
    booted: bool,
    ready: bool,
    events: EventEmitter<TextureEvent>,
}

impl TextureManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the built-in textures and emits READY unless a load is
    /// still pending. Returns true if the manager is ready afterwards.
    pub fn boot(&mut self) -> bool {
        if self.booted {
            return self.ready;
        }
        self.booted = true;

        for key in [DEFAULT_TEXTURE, MISSING_TEXTURE, WHITE_TEXTURE] {
            self.keys.insert(key.to_string());
        }
        debug!("Texture manager booted ({} pending)", self.pending);
        self.check_ready()
    }

    //--- Pending Work -----------------------------------------------------

    /// Marks one texture as loading. Delays READY if called before boot
    /// completes.
    pub fn begin_load(&mut self) {
        self.pending += 1;
    }

    /// Finishes one pending load and adds `key`.
    pub fn complete_load(&mut self, key: &str) -> bool {
        self.finish_pending();
        let added = self.add(key);
        self.check_ready();
        added
    }

    /// Finishes one pending load that could not be decoded.
    pub fn fail_load(&mut self, key: &str) {
        self.finish_pending();
        warn!("Texture '{}' failed to load", key);
        self.events.emit(&TextureEvent::Error(key.to_string()));
        self.check_ready();
    }

    fn finish_pending(&mut self) {
        if self.pending == 0 {
            warn!("Texture load finished with nothing pending");
        }
        self.pending = self.pending.saturating_sub(1);
    }

    fn check_ready(&mut self) -> bool {
        if !self.ready && self.booted && self.pending == 0 {
            self.ready = true;
            debug!("Texture manager ready");
            self.events.emit(&TextureEvent::Ready);
        }
        self.ready
    }

    //--- Keys -------------------------------------------------------------

    pub fn add(&mut self, key: &str) -> bool {
        if !self.keys.insert(key.to_string()) {
            warn!("Texture key '{}' is already in use", key);
            return false;
        }
        self.events.emit(&TextureEvent::Added(key.to_string()));
        true
    }

    /// Removes a texture. Built-in keys cannot be removed.
    pub fn remove(&mut self, key: &str) -> bool {
        if [DEFAULT_TEXTURE, MISSING_TEXTURE, WHITE_TEXTURE].contains(&key) {
            warn!("Cannot remove built-in texture '{}'", key);
            return false;
        }
        if !self.keys.remove(key) {
            return false;
        }
        self.events.emit(&TextureEvent::Removed(key.to_string()));
        true
    }

    pub fn exists(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    pub fn pending(&self) -> usize {
        self.pending
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn events_mut(&mut self) -> &mut EventEmitter<TextureEvent> {
        &mut self.events
    }

    pub fn destroy(&mut self) {
        self.keys.clear();
        self.pending = 0;
        self.events.remove_all_listeners();
    }
}

//=========================================================================
// Tests
//=========================================================================
