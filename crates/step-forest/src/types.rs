//! Node trait seams shared by the binary-tree family of engines.
//!
//! Every "pointer" in this crate is an `Option<u32>` index into a
//! `Vec`-backed arena owned by the tree instance. The parent link is a
//! non-owning back-reference; ownership runs strictly parent -> child
//! through the arena, so upward walks stay O(1) without reference cycles.

/// Binary links (`p`, `l`, `r`) of an arena node.
pub trait Link {
    fn p(&self) -> Option<u32>;
    fn l(&self) -> Option<u32>;
    fn r(&self) -> Option<u32>;
    fn set_p(&mut self, v: Option<u32>);
    fn set_l(&mut self, v: Option<u32>);
    fn set_r(&mut self, v: Option<u32>);
}

/// A linked node carrying a comparable scalar payload.
pub trait ValueNode: Link {
    fn value(&self) -> i64;
    fn set_value(&mut self, v: i64);
}

/// Cached per-node metrics refreshed by [`crate::traverse::calculate_height`]
/// and [`crate::traverse::update_depths`] after structural changes. They are
/// never maintained incrementally mid-algorithm.
pub trait Metrics: ValueNode {
    fn height(&self) -> i32;
    fn set_height(&mut self, h: i32);
    fn depth(&self) -> u32;
    fn set_depth(&mut self, d: u32);
    fn balance_factor(&self) -> i32;
    fn set_balance_factor(&mut self, bf: i32);
}
