#![forbid(unsafe_code)]

//! Indexed, restartable traversal over a point-in-time copy of a sequence.
//!
//! [`Snapshot<T>`] is immutable and cheap to clone (the items sit behind an
//! `Rc<[T]>`). Mutating the source after taking a snapshot does not affect
//! it, so a traversal can never observe a half-applied change.

use std::rc::Rc;

/// Frozen view of a sequence's items at the time it was taken.
pub struct Snapshot<T> {
    items: Rc<[T]>,
}

impl<T> Clone for Snapshot<T> {
    fn clone(&self) -> Self {
        Self {
            items: Rc::clone(&self.items),
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Snapshot<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.items.iter()).finish()
    }
}

impl<T> Default for Snapshot<T> {
    fn default() -> Self {
        Self {
            items: Rc::from(Vec::new()),
        }
    }
}

impl<T> Snapshot<T> {
    /// Freeze `items` into a snapshot.
    #[must_use]
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items: Rc::from(items),
        }
    }

    /// Number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the snapshot holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Item at `index`, if any.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    /// The items as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Iterate items in order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Iterate `(index, item)` pairs in order.
    pub fn iter_indexed(&self) -> impl Iterator<Item = (usize, &T)> {
        self.items.iter().enumerate()
    }
}

impl<T> From<Vec<T>> for Snapshot<T> {
    fn from(items: Vec<T>) -> Self {
        Self::new(items)
    }
}

impl<T> FromIterator<T> for Snapshot<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a, T> IntoIterator for &'a Snapshot<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// A container that can hand out snapshots of its items.
///
/// Implementors only provide [`snapshot`](Self::snapshot); traversal helpers
/// all go through it, so they see a consistent view even if a callback
/// mutates the container mid-traversal.
pub trait Enumerable {
    /// Item type yielded by traversal.
    type Item;

    /// Copy of the current items, in order.
    fn snapshot(&self) -> Snapshot<Self::Item>;

    /// Call `f(item, index)` for every item, in order.
    fn for_each<F>(&self, mut f: F)
    where
        F: FnMut(&Self::Item, usize),
    {
        let snapshot = self.snapshot();
        for (index, item) in snapshot.iter_indexed() {
            f(item, index);
        }
    }

    /// Item at `index`, if any.
    fn at(&self, index: usize) -> Option<Self::Item>
    where
        Self::Item: Clone,
    {
        self.snapshot().get(index).cloned()
    }

    /// Number of items.
    fn count(&self) -> usize {
        self.snapshot().len()
    }
}
