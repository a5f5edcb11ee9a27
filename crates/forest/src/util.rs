//! Arena navigation helpers shared by every tree in the crate.
//!
//! All functions are generic over [`Node`] and only follow links, so they
//! work for any balancing scheme.

use crate::types::{KvNode, Node};

#[inline]
pub(crate) fn get_p<N: Node>(arena: &[N], idx: u32) -> Option<u32> {
    arena[idx as usize].p()
}

#[inline]
pub(crate) fn get_l<N: Node>(arena: &[N], idx: u32) -> Option<u32> {
    arena[idx as usize].l()
}

#[inline]
pub(crate) fn get_r<N: Node>(arena: &[N], idx: u32) -> Option<u32> {
    arena[idx as usize].r()
}

#[inline]
pub(crate) fn set_p<N: Node>(arena: &mut [N], idx: u32, v: Option<u32>) {
    arena[idx as usize].set_p(v);
}

#[inline]
pub(crate) fn set_l<N: Node>(arena: &mut [N], idx: u32, v: Option<u32>) {
    arena[idx as usize].set_l(v);
}

#[inline]
pub(crate) fn set_r<N: Node>(arena: &mut [N], idx: u32, v: Option<u32>) {
    arena[idx as usize].set_r(v);
}

/// Points whichever child link of `parent` referenced `old` at `new`.
pub(crate) fn replace_child<N: Node>(arena: &mut [N], parent: u32, old: u32, new: Option<u32>) {
    if get_l(arena, parent) == Some(old) {
        set_l(arena, parent, new);
    } else {
        set_r(arena, parent, new);
    }
}

/// Leftmost node under `root`.
pub fn first<N: Node>(arena: &[N], root: Option<u32>) -> Option<u32> {
    let mut curr = root?;
    while let Some(l) = get_l(arena, curr) {
        curr = l;
    }
    Some(curr)
}

/// Rightmost node under `root`.
pub fn last<N: Node>(arena: &[N], root: Option<u32>) -> Option<u32> {
    let mut curr = root?;
    while let Some(r) = get_r(arena, curr) {
        curr = r;
    }
    Some(curr)
}

/// In-order successor.
pub fn next<N: Node>(arena: &[N], node: u32) -> Option<u32> {
    if let Some(r) = get_r(arena, node) {
        return first(arena, Some(r));
    }
    let mut curr = node;
    while let Some(p) = get_p(arena, curr) {
        if get_l(arena, p) == Some(curr) {
            return Some(p);
        }
        curr = p;
    }
    None
}

/// In-order predecessor.
pub fn prev<N: Node>(arena: &[N], node: u32) -> Option<u32> {
    if let Some(l) = get_l(arena, node) {
        return last(arena, Some(l));
    }
    let mut curr = node;
    while let Some(p) = get_p(arena, curr) {
        if get_r(arena, p) == Some(curr) {
            return Some(p);
        }
        curr = p;
    }
    None
}

fn size_inner<N: Node>(arena: &[N], root: u32) -> usize {
    1 + get_l(arena, root).map_or(0, |l| size_inner(arena, l))
        + get_r(arena, root).map_or(0, |r| size_inner(arena, r))
}

/// Number of nodes reachable from `root`.
pub fn size<N: Node>(arena: &[N], root: Option<u32>) -> usize {
    root.map_or(0, |r| size_inner(arena, r))
}

/// Binary search for `key` under `root`.
pub fn find<K, V, N>(arena: &[N], root: Option<u32>, key: &K) -> Option<u32>
where
    K: Ord,
    N: KvNode<K, V>,
{
    let mut curr = root;
    while let Some(i) = curr {
        curr = match key.cmp(arena[i as usize].key()) {
            std::cmp::Ordering::Equal => return Some(i),
            std::cmp::Ordering::Less => get_l(arena, i),
            std::cmp::Ordering::Greater => get_r(arena, i),
        };
    }
    None
}

/// Mutable references to two distinct arena slots.
pub(crate) fn pair_mut<N>(arena: &mut [N], a: u32, b: u32) -> (&mut N, &mut N) {
    let (a, b) = (a as usize, b as usize);
    debug_assert_ne!(a, b);
    if a < b {
        let (lo, hi) = arena.split_at_mut(b);
        (&mut lo[a], &mut hi[0])
    } else {
        let (lo, hi) = arena.split_at_mut(a);
        (&mut hi[0], &mut lo[b])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Bare {
        p: Option<u32>,
        l: Option<u32>,
        r: Option<u32>,
    }

    impl Node for Bare {
        fn p(&self) -> Option<u32> {
            self.p
        }
        fn l(&self) -> Option<u32> {
            self.l
        }
        fn r(&self) -> Option<u32> {
            self.r
        }
        fn set_p(&mut self, v: Option<u32>) {
            self.p = v;
        }
        fn set_l(&mut self, v: Option<u32>) {
            self.l = v;
        }
        fn set_r(&mut self, v: Option<u32>) {
            self.r = v;
        }
    }

    /// Builds the tree 1 <- 0 -> 2 with 3 hanging right of 1.
    fn sample() -> Vec<Bare> {
        let mut arena: Vec<Bare> = (0..4).map(|_| Bare::default()).collect();
        set_l(&mut arena, 0, Some(1));
        set_r(&mut arena, 0, Some(2));
        set_p(&mut arena, 1, Some(0));
        set_p(&mut arena, 2, Some(0));
        set_r(&mut arena, 1, Some(3));
        set_p(&mut arena, 3, Some(1));
        arena
    }

    #[test]
    fn test_first_last() {
        let arena = sample();
        assert_eq!(first(&arena, Some(0)), Some(1));
        assert_eq!(last(&arena, Some(0)), Some(2));
        assert_eq!(first::<Bare>(&arena, None), None);
    }

    #[test]
    fn test_in_order_walk() {
        let arena = sample();
        let mut order = Vec::new();
        let mut curr = first(&arena, Some(0));
        while let Some(i) = curr {
            order.push(i);
            curr = next(&arena, i);
        }
        assert_eq!(order, vec![1, 3, 0, 2]);

        let mut back = Vec::new();
        let mut curr = last(&arena, Some(0));
        while let Some(i) = curr {
            back.push(i);
            curr = prev(&arena, i);
        }
        assert_eq!(back, vec![2, 0, 3, 1]);
    }

    #[test]
    fn test_size() {
        let arena = sample();
        assert_eq!(size(&arena, Some(0)), 4);
        assert_eq!(size(&arena, Some(1)), 2);
        assert_eq!(size::<Bare>(&arena, None), 0);
    }

    #[test]
    fn test_pair_mut_either_order() {
        let mut arena = sample();
        {
            let (a, b) = pair_mut(&mut arena, 3, 1);
            assert_eq!(a.p, Some(1));
            assert_eq!(b.r, Some(3));
        }
        let (a, b) = pair_mut(&mut arena, 0, 2);
        assert_eq!(a.r, Some(2));
        assert_eq!(b.p, Some(0));
    }
}
