//=========================================================================
// List
//=========================================================================
//
// Ordered container with unique membership.
//
// Insertion order is iteration order. No item ever appears twice; every
// mutating call fires the configured add/remove callback synchronously
// before returning (unless the caller asks to skip it).
//
// List knows nothing about scenes. Owners that need side effects on
// membership changes (display lists, containers) either install the
// callbacks or skip them and perform the work themselves.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cmp::Ordering;
use std::fmt;

use log::debug;

//=== Callback Type =======================================================

type ListCallback<T> = Box<dyn FnMut(&T)>;

//=== List ================================================================

/// Ordered, unique-membership sequence.
pub struct List<T> {
    items: Vec<T>,
    max_size: Option<usize>,
    add_callback: Option<ListCallback<T>>,
    remove_callback: Option<ListCallback<T>>,
}

impl<T: PartialEq + Clone> List<T> {
    //--- Construction -----------------------------------------------------

    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            max_size: None,
            add_callback: None,
            remove_callback: None,
        }
    }

    /// Caps the number of members; adds beyond the cap are refused.
    pub fn with_max_size(mut self, max_size: usize) -> Self {
        self.max_size = Some(max_size);
        self
    }

    /// Installs the hook fired after an item joins the list.
    pub fn set_add_callback<F>(&mut self, callback: F)
    where
        F: FnMut(&T) + 'static,
    {
        self.add_callback = Some(Box::new(callback));
    }

    /// Installs the hook fired after an item leaves the list.
    pub fn set_remove_callback<F>(&mut self, callback: F)
    where
        F: FnMut(&T) + 'static,
    {
        self.remove_callback = Some(Box::new(callback));
    }

    //--- Adding -----------------------------------------------------------

    /// Appends `item` unless it is already a member.
    ///
    /// A member is never duplicated. With `skip_if_exists` the repeated add
    /// is silent; without it the refusal is logged at debug level.
    /// Returns true if the item was inserted.
    pub fn add(&mut self, item: T, skip_if_exists: bool) -> bool {
        let len = self.items.len();
        self.insert_at(len, item, skip_if_exists, false)
    }

    /// Like [`add`](Self::add) but never fires the add callback.
    pub fn add_silent(&mut self, item: T) -> bool {
        let len = self.items.len();
        self.insert_at(len, item, true, true)
    }

    /// Inserts `item` at `index` (clamped to the list length).
    pub fn add_at(&mut self, item: T, index: usize, skip_callback: bool) -> bool {
        let index = index.min(self.items.len());
        self.insert_at(index, item, true, skip_callback)
    }

    /// Appends every item in input order, skipping existing members.
    ///
    /// Returns the number of items actually inserted.
    pub fn add_multiple<I>(&mut self, items: I) -> usize
    where
        I: IntoIterator<Item = T>,
    {
        items
            .into_iter()
            .filter(|item| self.add(item.clone(), true))
            .count()
    }

    //--- Access -----------------------------------------------------------

    pub fn get_at(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    /// Position of `item`, or `None` if it is not a member.
    pub fn get_index(&self, item: &T) -> Option<usize> {
        self.items.iter().position(|member| member == item)
    }

    pub fn exists(&self, item: &T) -> bool {
        self.items.contains(item)
    }

    pub fn first(&self) -> Option<&T> {
        self.items.first()
    }

    pub fn last(&self) -> Option<&T> {
        self.items.last()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Clones every member matching `predicate`, in list order.
    pub fn get_all<P>(&self, mut predicate: P) -> Vec<T>
    where
        P: FnMut(&T) -> bool,
    {
        self.items.iter().filter(|item| predicate(item)).cloned().collect()
    }

    //--- Removing ---------------------------------------------------------

    /// Removes `item` by identity. Missing items are a no-op.
    pub fn remove(&mut self, item: &T, skip_callback: bool) -> Option<T> {
        let index = self.get_index(item)?;
        self.remove_at(index, skip_callback)
    }

    pub fn remove_at(&mut self, index: usize, skip_callback: bool) -> Option<T> {
        if index >= self.items.len() {
            return None;
        }
        let removed = self.items.remove(index);
        if !skip_callback {
            if let Some(callback) = self.remove_callback.as_mut() {
                callback(&removed);
            }
        }
        Some(removed)
    }

    /// Removes the members in `start..end` (clamped), firing callbacks in
    /// list order.
    pub fn remove_between(&mut self, start: usize, end: usize, skip_callback: bool) -> Vec<T> {
        let end = end.min(self.items.len());
        if start >= end {
            return Vec::new();
        }
        let removed: Vec<T> = self.items.drain(start..end).collect();
        if !skip_callback {
            if let Some(callback) = self.remove_callback.as_mut() {
                removed.iter().for_each(|item| callback(item));
            }
        }
        removed
    }

    /// Empties the list.
    pub fn remove_all(&mut self, skip_callback: bool) -> Vec<T> {
        let len = self.items.len();
        self.remove_between(0, len, skip_callback)
    }

    //--- Reordering -------------------------------------------------------

    /// Exchanges the positions of two members. Nothing else moves.
    pub fn swap(&mut self, a: &T, b: &T) -> bool {
        match (self.get_index(a), self.get_index(b)) {
            (Some(ia), Some(ib)) => {
                self.items.swap(ia, ib);
                true
            }
            _ => false,
        }
    }

    /// Moves `item` to `index`, shifting the members in between.
    pub fn move_to(&mut self, item: &T, index: usize) -> bool {
        let Some(current) = self.get_index(item) else {
            return false;
        };
        let target = index.min(self.items.len() - 1);
        let moved = self.items.remove(current);
        self.items.insert(target, moved);
        true
    }

    /// Moves `item` one place towards the end.
    pub fn move_up(&mut self, item: &T) -> bool {
        match self.get_index(item) {
            Some(index) if index + 1 < self.items.len() => {
                self.items.swap(index, index + 1);
                true
            }
            _ => false,
        }
    }

    /// Moves `item` one place towards the start.
    pub fn move_down(&mut self, item: &T) -> bool {
        match self.get_index(item) {
            Some(index) if index > 0 => {
                self.items.swap(index, index - 1);
                true
            }
            _ => false,
        }
    }

    pub fn bring_to_top(&mut self, item: &T) -> bool {
        let last = self.items.len().saturating_sub(1);
        self.move_to(item, last)
    }

    pub fn send_to_back(&mut self, item: &T) -> bool {
        self.move_to(item, 0)
    }

    /// Puts `new` where `old` was. Refused if `new` is already a member.
    pub fn replace(&mut self, old: &T, new: T) -> Option<T> {
        if self.exists(&new) {
            return None;
        }
        let index = self.get_index(old)?;
        let previous = std::mem::replace(&mut self.items[index], new);
        if let Some(callback) = self.remove_callback.as_mut() {
            callback(&previous);
        }
        if let Some(callback) = self.add_callback.as_mut() {
            callback(&self.items[index]);
        }
        Some(previous)
    }

    pub fn reverse(&mut self) {
        self.items.reverse();
    }

    /// Stable sort: members comparing equal keep their relative order.
    pub fn sort_by<F>(&mut self, compare: F)
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        self.items.sort_by(compare);
    }

    //--- Internal Helpers -------------------------------------------------

    fn insert_at(&mut self, index: usize, item: T, skip_if_exists: bool, skip_callback: bool) -> bool {
        if self.exists(&item) {
            if !skip_if_exists {
                debug!("List::add refused a duplicate member");
            }
            return false;
        }

        if let Some(max) = self.max_size {
            if self.items.len() >= max {
                debug!("List is full ({} members), add refused", max);
                return false;
            }
        }

        self.items.insert(index, item);
        if !skip_callback {
            if let Some(callback) = self.add_callback.as_mut() {
                callback(&self.items[index]);
            }
        }
        true
    }
}

impl<T: PartialEq + Clone> Default for List<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for List<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("List")
            .field("items", &self.items)
            .field("max_size", &self.max_size)
            .finish()
    }
}

impl<'a, T> IntoIterator for &'a List<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

//=========================================================================
// Tests
//=========================================================================
