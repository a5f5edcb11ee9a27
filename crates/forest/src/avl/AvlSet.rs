use std::collections::TryReserveError;
use std::fmt;

use super::avl_map::AvlMap;

/// AVL tree set backed by [`AvlMap<T, ()>`].
pub struct AvlSet<T> {
    inner: AvlMap<T, ()>,
}

impl<T> Default for AvlSet<T> {
    fn default() -> Self {
        Self {
            inner: AvlMap::default(),
        }
    }
}

impl<T: Ord> AvlSet<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` when `value` was not present before.
    pub fn insert(&mut self, value: T) -> Result<bool, TryReserveError> {
        Ok(self.inner.insert(value, ())?.is_none())
    }

    pub fn remove(&mut self, value: &T) -> bool {
        self.inner.remove(value).is_some()
    }

    pub fn contains(&self, value: &T) -> bool {
        self.inner.contains_key(value)
    }

    pub fn first(&self) -> Option<&T> {
        self.inner.first().map(|(k, _)| k)
    }

    pub fn last(&self) -> Option<&T> {
        self.inner.last().map(|(k, _)| k)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn try_reserve(&mut self, additional: usize) -> Result<(), TryReserveError> {
        self.inner.try_reserve(additional)
    }

    pub fn clear(&mut self) {
        self.inner.clear()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.inner.keys()
    }

    pub fn assert_valid(&self) -> Result<(), String> {
        self.inner.assert_valid()
    }
}

impl<T: Ord + fmt::Debug> fmt::Debug for AvlSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
