//=========================================================================
// Display List
//=========================================================================
//
// Ordered collection of renderable objects owned by one scene (or by one
// parent container object).
//
// Architecture:
//   DisplayList
//     ├─ list: List<GameObjectId>    (draw order, bottom → top)
//     └─ sort_children_flag          (dirty bit)
//
//   add/remove/set_depth → queue_depth_sort()  (flag only)
//   render pass          → depth_sort()        (stable sort, once)
//
// Ownership rules (detaching from a previous owner, added/removed events)
// need the object arena and the scene channel, so they live in
// `Systems`. This type only keeps order and the dirty flag honest.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::trace;

//=== Internal Dependencies ===============================================

use crate::core::gameobjects::{GameObjectId, GameObjects};
use crate::core::structs::List;

//=== DisplayList =========================================================

/// Depth-sorted draw list.
#[derive(Debug, Default)]
pub struct DisplayList {
    list: List<GameObjectId>,
    sort_children_flag: bool,
}

impl DisplayList {
    //--- Construction -----------------------------------------------------

    pub fn new() -> Self {
        Self {
            list: List::new(),
            sort_children_flag: false,
        }
    }

    //--- Membership -------------------------------------------------------

    /// Appends `id` and queues a depth sort. Returns false for members.
    pub fn add(&mut self, id: GameObjectId) -> bool {
        if !self.list.add_silent(id) {
            return false;
        }
        self.queue_depth_sort();
        true
    }

    /// Inserts `id` at `index` and queues a depth sort.
    pub fn add_at(&mut self, id: GameObjectId, index: usize) -> bool {
        if !self.list.add_at(id, index, true) {
            return false;
        }
        self.queue_depth_sort();
        true
    }

    /// Removes `id` and queues a depth sort. Returns false for strangers.
    pub fn remove(&mut self, id: GameObjectId) -> bool {
        if self.list.remove(&id, true).is_none() {
            return false;
        }
        self.queue_depth_sort();
        true
    }

    pub fn exists(&self, id: GameObjectId) -> bool {
        self.list.exists(&id)
    }

    pub fn get_index(&self, id: GameObjectId) -> Option<usize> {
        self.list.get_index(&id)
    }

    pub fn first(&self) -> Option<GameObjectId> {
        self.list.first().copied()
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Members in draw order. Renderers read this; they never mutate it.
    pub fn get_children(&self) -> &[GameObjectId] {
        self.list.as_slice()
    }

    //--- Reordering -------------------------------------------------------

    pub fn bring_to_top(&mut self, id: GameObjectId) -> bool {
        self.list.bring_to_top(&id)
    }

    pub fn send_to_back(&mut self, id: GameObjectId) -> bool {
        self.list.send_to_back(&id)
    }

    pub fn swap(&mut self, a: GameObjectId, b: GameObjectId) -> bool {
        self.list.swap(&a, &b)
    }

    pub fn move_up(&mut self, id: GameObjectId) -> bool {
        self.list.move_up(&id)
    }

    pub fn move_down(&mut self, id: GameObjectId) -> bool {
        self.list.move_down(&id)
    }

    //--- Depth Sorting ----------------------------------------------------

    /// Marks the list for sorting on the next `depth_sort` call.
    pub fn queue_depth_sort(&mut self) {
        self.sort_children_flag = true;
    }

    pub fn needs_depth_sort(&self) -> bool {
        self.sort_children_flag
    }

    /// Stable-sorts members by depth if (and only if) a sort is queued.
    ///
    /// Members missing from `objects` sort as depth 0. Returns true if a
    /// sort actually ran.
    pub fn depth_sort(&mut self, objects: &GameObjects) -> bool {
        if !self.sort_children_flag {
            return false;
        }

        let depth_of = |id: &GameObjectId| objects.get(*id).map_or(0.0, |object| object.depth());
        self.list
            .sort_by(|a, b| depth_of(a).total_cmp(&depth_of(b)));
        self.sort_children_flag = false;

        trace!("display list depth-sorted ({} members)", self.list.len());
        true
    }

    //--- Teardown ---------------------------------------------------------

    /// Drops every member without touching the objects themselves.
    ///
    /// Destroying members is the owner's job (see `Systems::shutdown`).
    pub(crate) fn clear(&mut self) {
        self.list.remove_all(true);
        self.sort_children_flag = false;
    }
}

//=========================================================================
// Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::gameobjects::GameObject;

    fn spawn(objects: &mut GameObjects, depth: f32) -> GameObjectId {
        objects.insert(GameObject::new("Image").with_depth(depth))
    }

    #[test]
    fn add_queues_sort_and_refuses_duplicates() {
        let mut objects = GameObjects::with_key();
        let id = spawn(&mut objects, 0.0);
        let mut list = DisplayList::new();

        assert!(list.add(id));
        assert!(list.needs_depth_sort());
        assert!(!list.add(id));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn depth_sort_is_stable() {
        let mut objects = GameObjects::with_key();
        let ids: Vec<_> = [3.0, 1.0, 3.0, 2.0]
            .into_iter()
            .map(|depth| spawn(&mut objects, depth))
            .collect();

        let mut list = DisplayList::new();
        ids.iter().for_each(|id| {
            list.add(*id);
        });

        assert!(list.depth_sort(&objects));
        assert_eq!(list.get_children(), &[ids[1], ids[3], ids[0], ids[2]]);
    }

    #[test]
    fn depth_sort_without_changes_is_a_no_op() {
        let mut objects = GameObjects::with_key();
        let a = spawn(&mut objects, 5.0);
        let b = spawn(&mut objects, 1.0);
        let mut list = DisplayList::new();
        list.add(a);
        list.add(b);

        assert!(list.depth_sort(&objects));
        let first = list.get_children().to_vec();

        assert!(!list.needs_depth_sort());
        assert!(!list.depth_sort(&objects));
        assert_eq!(list.get_children(), first.as_slice());
    }

    #[test]
    fn remove_queues_sort_and_ignores_strangers() {
        let mut objects = GameObjects::with_key();
        let a = spawn(&mut objects, 0.0);
        let b = spawn(&mut objects, 0.0);
        let mut list = DisplayList::new();
        list.add(a);
        list.depth_sort(&objects);

        assert!(!list.remove(b));
        assert!(!list.needs_depth_sort());
        assert!(list.remove(a));
        assert!(list.needs_depth_sort());
        assert!(list.is_empty());
    }

    #[test]
    fn reorder_helpers_do_not_queue_sort() {
        let mut objects = GameObjects::with_key();
        let a = spawn(&mut objects, 0.0);
        let b = spawn(&mut objects, 0.0);
        let mut list = DisplayList::new();
        list.add(a);
        list.add(b);
        list.depth_sort(&objects);

        list.bring_to_top(a);
        assert_eq!(list.get_children(), &[b, a]);
        assert!(!list.needs_depth_sort());
    }
}
