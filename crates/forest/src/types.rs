//! Node trait definitions.
//!
//! Every "pointer" in a forest tree is an `Option<u32>` index into a
//! [`Vec`]-backed arena owned by the container. Tree-manipulation functions
//! take the arena as a slice and work purely with indices, so nodes never
//! alias each other and a whole tree can be moved or dropped as one value.

/// Parent/child links (`p`, `l`, `r`) of an arena node.
pub trait Node {
    fn p(&self) -> Option<u32>;
    fn l(&self) -> Option<u32>;
    fn r(&self) -> Option<u32>;
    fn set_p(&mut self, v: Option<u32>);
    fn set_l(&mut self, v: Option<u32>);
    fn set_r(&mut self, v: Option<u32>);
}

/// Key/value node interface used by map-like structures.
pub trait KvNode<K, V>: Node {
    fn key(&self) -> &K;
    fn value(&self) -> &V;
    fn value_mut(&mut self) -> &mut V;
}
