use std::cmp::Ordering;
use std::collections::TryReserveError;
use std::fmt;
use std::mem;

use crate::util::{find, first, last, next, pair_mut, replace_child, size};

use super::types::AvlNode;
use super::util;

/// Ordered map backed by an AVL tree.
///
/// Nodes live in a dense arena and link to each other by `u32` index. A
/// removed entry's slot is reclaimed immediately with `swap_remove`, so the
/// arena length is always the number of entries.
///
/// Growth is fallible: [`AvlMap::insert`] and [`AvlMap::try_reserve`] report
/// allocation failure instead of aborting, and a successful `try_reserve(n)`
/// guarantees the next `n` inserts cannot fail.
pub struct AvlMap<K, V> {
    arena: Vec<AvlNode<K, V>>,
    root: Option<u32>,
}

impl<K, V> Default for AvlMap<K, V> {
    fn default() -> Self {
        Self {
            arena: Vec::new(),
            root: None,
        }
    }
}

impl<K: Ord, V> AvlMap<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn root_index(&self) -> Option<u32> {
        self.root
    }

    pub fn try_reserve(&mut self, additional: usize) -> Result<(), TryReserveError> {
        self.arena.try_reserve(additional)
    }

    /// Inserts or replaces the value under `key`, returning the old value.
    pub fn insert(&mut self, key: K, value: V) -> Result<Option<V>, TryReserveError> {
        let mut parent: Option<(u32, Ordering)> = None;
        let mut curr = self.root;
        while let Some(i) = curr {
            let node = &mut self.arena[i as usize];
            let ord = key.cmp(&node.k);
            curr = match ord {
                Ordering::Equal => return Ok(Some(mem::replace(&mut node.v, value))),
                Ordering::Less => node.l,
                Ordering::Greater => node.r,
            };
            parent = Some((i, ord));
        }

        self.arena.try_reserve(1)?;
        let idx = self.arena.len() as u32;
        self.arena.push(AvlNode::new(key, value));
        self.root = Some(match parent {
            None => idx,
            Some((p, Ordering::Less)) => util::insert_left(&mut self.arena, idx, p),
            Some((p, _)) => util::insert_right(&mut self.arena, idx, p),
        });
        Ok(None)
    }

    fn find(&self, key: &K) -> Option<u32> {
        find::<K, V, _>(&self.arena, self.root, key)
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.find(key).map(|i| &self.arena[i as usize].v)
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let idx = self.find(key)?;
        Some(&mut self.arena[idx as usize].v)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.find(key).is_some()
    }

    /// Removes `key`, returning its value. A no-op when the key is absent.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let n = self.find(key)?;
        let node = &self.arena[n as usize];
        let target = match (node.l, node.r) {
            (Some(_), Some(r)) => {
                // Successor has no left child, so it can be spliced directly.
                let succ = first(&self.arena, Some(r)).unwrap_or(r);
                let (a, b) = pair_mut(&mut self.arena, n, succ);
                mem::swap(&mut a.k, &mut b.k);
                mem::swap(&mut a.v, &mut b.v);
                succ
            }
            _ => n,
        };
        self.root = util::remove(&mut self.arena, target);
        Some(self.release(target).v)
    }

    /// Drops the detached slot `idx`, moving the arena's last node into it.
    fn release(&mut self, idx: u32) -> AvlNode<K, V> {
        let moved_from = (self.arena.len() - 1) as u32;
        let node = self.arena.swap_remove(idx as usize);
        if idx != moved_from {
            let moved = &self.arena[idx as usize];
            let (p, l, r) = (moved.p, moved.l, moved.r);
            match p {
                Some(p) => replace_child(&mut self.arena, p, moved_from, Some(idx)),
                None => self.root = Some(idx),
            }
            if let Some(l) = l {
                self.arena[l as usize].p = Some(idx);
            }
            if let Some(r) = r {
                self.arena[r as usize].p = Some(idx);
            }
        }
        node
    }

    /// Entry with the smallest key.
    pub fn first(&self) -> Option<(&K, &V)> {
        first(&self.arena, self.root).map(|i| self.entry(i))
    }

    /// Entry with the biggest key.
    pub fn last(&self) -> Option<(&K, &V)> {
        last(&self.arena, self.root).map(|i| self.entry(i))
    }

    fn entry(&self, idx: u32) -> (&K, &V) {
        let n = &self.arena[idx as usize];
        (&n.k, &n.v)
    }

    pub fn clear(&mut self) {
        self.arena.clear();
        self.root = None;
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            arena: &self.arena,
            curr: first(&self.arena, self.root),
            remaining: self.arena.len(),
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.iter().map(|(_, v)| v)
    }

    pub fn assert_valid(&self) -> Result<(), String> {
        util::assert_avl_tree::<K, V, _>(&self.arena, self.root)?;
        let reachable = size(&self.arena, self.root);
        if reachable != self.arena.len() {
            return Err(format!(
                "Arena holds {} nodes but {reachable} are reachable",
                self.arena.len()
            ));
        }
        Ok(())
    }

    pub fn print(&self) -> String
    where
        K: fmt::Debug,
        V: fmt::Debug,
    {
        util::print::<K, V, _>(&self.arena, self.root, "")
    }
}

impl<K: Ord + fmt::Debug, V: fmt::Debug> fmt::Debug for AvlMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// In-order iterator over an [`AvlMap`].
pub struct Iter<'a, K, V> {
    arena: &'a [AvlNode<K, V>],
    curr: Option<u32>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let i = self.curr?;
        self.curr = next(self.arena, i);
        self.remaining -= 1;
        let n = &self.arena[i as usize];
        Some((&n.k, &n.v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<'a, K: Ord, V> IntoIterator for &'a AvlMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
