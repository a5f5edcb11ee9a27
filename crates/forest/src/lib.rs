//! Arena-based balanced search trees.
//!
//! Nodes are stored in a caller-invisible `Vec` arena and refer to each other
//! through `Option<u32>` indices instead of pointers, which keeps a tree a
//! single owned value with no shared or weak references between nodes.
//!
//! # Module layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`types`] | [`Node`] and [`KvNode`] link traits |
//! | [`util`] | `first`, `last`, `next`, `prev`, `size`, `find` over any [`Node`] arena |
//! | [`avl`] | AVL rebalancing plus the [`AvlMap`] and [`AvlSet`] containers |

pub mod avl;
pub mod types;
pub mod util;

pub use avl::{AvlMap, AvlSet};
pub use types::{KvNode, Node};
pub use util::{first, last, next, prev, size};
