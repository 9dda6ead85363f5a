//=========================================================================
// Update List
//=========================================================================
//
// Objects that need a per-frame `pre_update` call.
//
// Architecture:
//   add(id)    ──► pending_insertion ─┐
//   remove(id) ──► pending_removal  ──┼─ merge() at the start of a pass
//                                     ▼
//                                  active ──► run(): pre_update on each
//
// The active sequence is only ever touched by `merge`. Anything an
// object does to the list while `run` is iterating (removing itself,
// adding a sibling) lands in the staging queues and takes effect at the
// next merge, so iteration can never be invalidated.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::trace;

//=== Internal Dependencies ===============================================

use crate::core::gameobjects::{GameObjectId, GameObjects, UpdateFlow};

//=== Merge Report ========================================================

/// What a merge moved in and out of the active sequence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeReport {
    pub added: usize,
    pub removed: usize,
}

//=== UpdateList ==========================================================

/// Double-buffered list of objects receiving `pre_update`.
#[derive(Debug, Default)]
pub struct UpdateList {
    active: Vec<GameObjectId>,
    pending_insertion: Vec<GameObjectId>,
    pending_removal: Vec<GameObjectId>,
}

impl UpdateList {
    //--- Construction -----------------------------------------------------

    pub fn new() -> Self {
        Self::default()
    }

    //--- Staging ----------------------------------------------------------

    /// Stages `id` for insertion at the next merge.
    ///
    /// Re-adding a live object (that is not on its way out) or an already
    /// staged one is a no-op. Returns true if something was staged.
    pub fn add(&mut self, id: GameObjectId) -> bool {
        if self.is_active(id) && !self.is_destroying(id) {
            return false;
        }
        if self.is_pending(id) {
            return false;
        }
        self.pending_insertion.push(id);
        true
    }

    /// Stages `id` for removal at the next merge.
    ///
    /// An object that was only staged for insertion is simply un-staged, so
    /// it never reaches the active sequence. Unknown objects are ignored.
    pub fn remove(&mut self, id: GameObjectId) -> bool {
        if let Some(index) = self.pending_insertion.iter().position(|&p| p == id) {
            self.pending_insertion.remove(index);
            return true;
        }
        if self.is_active(id) && !self.is_destroying(id) {
            self.pending_removal.push(id);
            return true;
        }
        false
    }

    /// Stages removal of every live object.
    pub fn remove_all(&mut self) -> usize {
        let staged: Vec<GameObjectId> = self
            .active
            .iter()
            .copied()
            .filter(|&id| !self.is_destroying(id))
            .collect();
        let count = staged.len();
        self.pending_removal.extend(staged);
        count
    }

    //--- Processing -------------------------------------------------------

    /// Applies staged removals, then staged insertions.
    pub fn merge(&mut self) -> MergeReport {
        let mut report = MergeReport::default();

        for id in self.pending_removal.drain(..) {
            if let Some(index) = self.active.iter().position(|&a| a == id) {
                self.active.remove(index);
                report.removed += 1;
            }
        }

        for id in self.pending_insertion.drain(..) {
            if !self.active.contains(&id) {
                self.active.push(id);
                report.added += 1;
            }
        }

        if report != MergeReport::default() {
            trace!(
                "update list merged: +{} -{} ({} live)",
                report.added,
                report.removed,
                self.active.len()
            );
        }
        report
    }

    /// Calls `pre_update` on every live, active object in insertion order.
    ///
    /// Objects that ask to leave are staged for removal; objects that ask
    /// to be destroyed are returned so the owner can destroy them once the
    /// pass is over.
    pub fn run(&mut self, objects: &mut GameObjects, time: f64, delta: f64) -> Vec<GameObjectId> {
        let mut doomed = Vec::new();

        for index in 0..self.active.len() {
            let id = self.active[index];
            let Some(object) = objects.get_mut(id) else {
                continue;
            };
            if !object.active() {
                continue;
            }

            match object.run_pre_update(time, delta) {
                UpdateFlow::Continue => {}
                UpdateFlow::RemoveFromUpdateList => {
                    object.update_listed = false;
                    self.remove(id);
                }
                UpdateFlow::Destroy => doomed.push(id),
            }
        }

        doomed
    }

    /// Merge followed by a `pre_update` pass.
    pub fn update(&mut self, objects: &mut GameObjects, time: f64, delta: f64) -> Vec<GameObjectId> {
        self.merge();
        self.run(objects, time, delta)
    }

    //--- Queries ----------------------------------------------------------

    pub fn is_active(&self, id: GameObjectId) -> bool {
        self.active.contains(&id)
    }

    pub fn is_pending(&self, id: GameObjectId) -> bool {
        self.pending_insertion.contains(&id)
    }

    pub fn is_destroying(&self, id: GameObjectId) -> bool {
        self.pending_removal.contains(&id)
    }

    /// Objects staged for insertion at the next merge.
    pub fn pending(&self) -> &[GameObjectId] {
        &self.pending_insertion
    }

    /// The live sequence, as of the last merge.
    pub fn get_active(&self) -> &[GameObjectId] {
        &self.active
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    //--- Teardown ---------------------------------------------------------

    /// Stages removal of all live objects without destroying them.
    pub fn shutdown(&mut self) {
        self.pending_insertion.clear();
        self.remove_all();
    }

    /// Drops everything immediately.
    pub fn destroy(&mut self) {
        self.active.clear();
        self.pending_insertion.clear();
        self.pending_removal.clear();
    }
}

//=========================================================================
// Tests
//=========================================================================
