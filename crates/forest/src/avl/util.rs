use std::cmp::Ordering;
use std::fmt::Debug;

use crate::types::KvNode;
use crate::util::{first, get_l, get_p, get_r, next, replace_child, set_l, set_p, set_r};

use super::types::AvlNodeLike;

#[inline]
fn height<N: AvlNodeLike>(arena: &[N], node: Option<u32>) -> u32 {
    node.map_or(0, |i| arena[i as usize].height())
}

#[inline]
fn update_height<N: AvlNodeLike>(arena: &mut [N], n: u32) {
    let lh = height(arena, get_l(arena, n));
    let rh = height(arena, get_r(arena, n));
    arena[n as usize].set_height(1 + lh.max(rh));
}

/// `height(left) - height(right)`.
#[inline]
fn balance<N: AvlNodeLike>(arena: &[N], n: u32) -> i64 {
    i64::from(height(arena, get_l(arena, n))) - i64::from(height(arena, get_r(arena, n)))
}

/// Lifts the right child of `n` into its place. Returns the new subtree top.
fn rotate_left<N: AvlNodeLike>(arena: &mut [N], n: u32) -> u32 {
    let Some(nr) = get_r(arena, n) else {
        return n;
    };
    let p = get_p(arena, n);
    let nrl = get_l(arena, nr);

    set_r(arena, n, nrl);
    if let Some(nrl) = nrl {
        set_p(arena, nrl, Some(n));
    }
    set_l(arena, nr, Some(n));
    set_p(arena, n, Some(nr));
    set_p(arena, nr, p);
    if let Some(p) = p {
        replace_child(arena, p, n, Some(nr));
    }

    update_height(arena, n);
    update_height(arena, nr);
    nr
}

/// Lifts the left child of `n` into its place. Returns the new subtree top.
fn rotate_right<N: AvlNodeLike>(arena: &mut [N], n: u32) -> u32 {
    let Some(nl) = get_l(arena, n) else {
        return n;
    };
    let p = get_p(arena, n);
    let nlr = get_r(arena, nl);

    set_l(arena, n, nlr);
    if let Some(nlr) = nlr {
        set_p(arena, nlr, Some(n));
    }
    set_r(arena, nl, Some(n));
    set_p(arena, n, Some(nl));
    set_p(arena, nl, p);
    if let Some(p) = p {
        replace_child(arena, p, n, Some(nl));
    }

    update_height(arena, n);
    update_height(arena, nl);
    nl
}

/// Restores the balance bound at `n`, whose children are already balanced.
///
/// The rotation case is picked from the sign of `n`'s balance and the sign
/// of its heavier child: left-left, left-right, right-right, right-left.
fn rebalance<N: AvlNodeLike>(arena: &mut [N], n: u32) -> u32 {
    update_height(arena, n);
    let bf = balance(arena, n);
    if bf > 1 {
        if let Some(nl) = get_l(arena, n) {
            if balance(arena, nl) < 0 {
                rotate_left(arena, nl);
            }
        }
        rotate_right(arena, n)
    } else if bf < -1 {
        if let Some(nr) = get_r(arena, n) {
            if balance(arena, nr) > 0 {
                rotate_right(arena, nr);
            }
        }
        rotate_left(arena, n)
    } else {
        n
    }
}

/// Walks from `n` up to the root, rebalancing every ancestor.
///
/// Returns the (possibly new) root.
pub fn retrace<N: AvlNodeLike>(arena: &mut [N], mut n: u32) -> u32 {
    loop {
        let top = rebalance(arena, n);
        match get_p(arena, top) {
            Some(p) => n = p,
            None => return top,
        }
    }
}

/// Attaches the detached node `n` as the left child of leaf slot `parent`.
///
/// Returns the new root.
pub fn insert_left<N: AvlNodeLike>(arena: &mut [N], n: u32, parent: u32) -> u32 {
    debug_assert!(get_l(arena, parent).is_none());
    set_l(arena, parent, Some(n));
    set_p(arena, n, Some(parent));
    retrace(arena, parent)
}

/// Attaches the detached node `n` as the right child of leaf slot `parent`.
///
/// Returns the new root.
pub fn insert_right<N: AvlNodeLike>(arena: &mut [N], n: u32, parent: u32) -> u32 {
    debug_assert!(get_r(arena, parent).is_none());
    set_r(arena, parent, Some(n));
    set_p(arena, n, Some(parent));
    retrace(arena, parent)
}

/// Splices `n` out of the tree. `n` must have at most one child; callers
/// with a two-child node first move its in-order successor's entry into it
/// and splice the successor instead.
///
/// Returns the new root, `None` once the tree is empty.
pub fn remove<N: AvlNodeLike>(arena: &mut [N], n: u32) -> Option<u32> {
    let p = get_p(arena, n);
    let l = get_l(arena, n);
    let r = get_r(arena, n);
    debug_assert!(l.is_none() || r.is_none());
    let c = l.or(r);

    set_p(arena, n, None);
    set_l(arena, n, None);
    set_r(arena, n, None);
    arena[n as usize].set_height(1);

    if let Some(c) = c {
        set_p(arena, c, p);
    }
    match p {
        None => c,
        Some(p) => {
            replace_child(arena, p, n, c);
            Some(retrace(arena, p))
        }
    }
}

fn check_subtree<N: AvlNodeLike>(arena: &[N], node: u32) -> Result<u32, String> {
    let mut child_heights = [0u32; 2];
    for (slot, child) in [get_l(arena, node), get_r(arena, node)].into_iter().enumerate() {
        if let Some(c) = child {
            if get_p(arena, c) != Some(node) {
                return Err(format!("Broken parent link under node {node}"));
            }
            child_heights[slot] = check_subtree(arena, c)?;
        }
    }

    let [lh, rh] = child_heights;
    let expected = 1 + lh.max(rh);
    let actual = arena[node as usize].height();
    if actual != expected {
        return Err(format!(
            "Height mismatch at node {node}: expected {expected}, got {actual}"
        ));
    }
    if lh.abs_diff(rh) > 1 {
        return Err(format!("AVL balance violated at node {node}"));
    }
    Ok(expected)
}

/// Checks links, stored heights, the balance bound and strict key order.
pub fn assert_avl_tree<K, V, N>(arena: &[N], root: Option<u32>) -> Result<(), String>
where
    K: Ord,
    N: AvlNodeLike + KvNode<K, V>,
{
    let Some(root) = root else {
        return Ok(());
    };
    if get_p(arena, root).is_some() {
        return Err("Root has parent".to_string());
    }
    check_subtree(arena, root)?;

    let mut prev: Option<u32> = None;
    let mut curr = first(arena, Some(root));
    while let Some(i) = curr {
        if let Some(p) = prev {
            if arena[p as usize].key().cmp(arena[i as usize].key()) != Ordering::Less {
                return Err("Node order violated".to_string());
            }
        }
        prev = Some(i);
        curr = next(arena, i);
    }
    Ok(())
}

/// Debug printer for AVL trees.
pub fn print<K, V, N>(arena: &[N], node: Option<u32>, tab: &str) -> String
where
    K: Debug,
    V: Debug,
    N: AvlNodeLike + KvNode<K, V>,
{
    match node {
        None => "∅".to_string(),
        Some(i) => {
            let n = &arena[i as usize];
            let left = print::<K, V, N>(arena, n.l(), &format!("{tab}  "));
            let right = print::<K, V, N>(arena, n.r(), &format!("{tab}  "));
            format!(
                "Node[{i}] [h={}] {{ {:?} = {:?} }}\n{tab}L={left}\n{tab}R={right}",
                n.height(),
                n.key(),
                n.value()
            )
        }
    }
}
