use crate::snapshot::{Color, NodeSnapshot, StructureKind, TreeStats};
use crate::traverse;
use crate::types::{Link, Metrics, ValueNode};

/// One arena slot of the binary-tree family (plain binary, BST, AVL,
/// red-black). Fields unused by a given engine stay at their defaults:
/// a plain BST never reads `red`, a generic binary tree never reads
/// `balance_factor`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TreeNode {
    pub value: i64,
    pub p: Option<u32>,
    pub l: Option<u32>,
    pub r: Option<u32>,
    pub depth: u32,
    pub height: i32,
    pub balance_factor: i32,
    pub red: bool,
}

impl TreeNode {
    pub fn new(value: i64) -> Self {
        TreeNode {
            value,
            p: None,
            l: None,
            r: None,
            depth: 0,
            height: 0,
            balance_factor: 0,
            red: false,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.l.is_none() && self.r.is_none()
    }
}

/// Recursive snapshot of the subtree rooted at `node`, reading the cached
/// height/depth/balance-factor values as they are.
pub(crate) fn snapshot_subtree(arena: &[TreeNode], node: u32) -> NodeSnapshot {
    let n = &arena[node as usize];
    NodeSnapshot {
        id: node,
        value: n.value,
        depth: n.depth,
        height: n.height,
        balance_factor: n.balance_factor,
        color: if n.red { Color::Red } else { Color::Black },
        is_leaf: n.is_leaf(),
        left: n.l.map(|l| Box::new(snapshot_subtree(arena, l))),
        right: n.r.map(|r| Box::new(snapshot_subtree(arena, r))),
    }
}

/// Shared stats computation for the binary-shaped engines. Refreshes the
/// cached heights, balance factors and depths first.
pub(crate) fn binary_stats(
    arena: &mut [TreeNode],
    root: Option<u32>,
    kind: StructureKind,
    size: usize,
) -> TreeStats {
    let height = traverse::calculate_height(arena, root);
    traverse::update_depths(arena, root, 0);
    TreeStats {
        kind,
        size,
        height,
        is_balanced: traverse::is_balanced(arena, root),
        min_value: traverse::find_min(arena, root).map(|i| arena[i as usize].value),
        max_value: traverse::find_max(arena, root).map(|i| arena[i as usize].value),
    }
}

impl Link for TreeNode {
    #[inline]
    fn p(&self) -> Option<u32> {
        self.p
    }
    #[inline]
    fn l(&self) -> Option<u32> {
        self.l
    }
    #[inline]
    fn r(&self) -> Option<u32> {
        self.r
    }
    #[inline]
    fn set_p(&mut self, v: Option<u32>) {
        self.p = v;
    }
    #[inline]
    fn set_l(&mut self, v: Option<u32>) {
        self.l = v;
    }
    #[inline]
    fn set_r(&mut self, v: Option<u32>) {
        self.r = v;
    }
}

impl ValueNode for TreeNode {
    #[inline]
    fn value(&self) -> i64 {
        self.value
    }
    #[inline]
    fn set_value(&mut self, v: i64) {
        self.value = v;
    }
}

impl Metrics for TreeNode {
    #[inline]
    fn height(&self) -> i32 {
        self.height
    }
    #[inline]
    fn set_height(&mut self, h: i32) {
        self.height = h;
    }
    #[inline]
    fn depth(&self) -> u32 {
        self.depth
    }
    #[inline]
    fn set_depth(&mut self, d: u32) {
        self.depth = d;
    }
    #[inline]
    fn balance_factor(&self) -> i32 {
        self.balance_factor
    }
    #[inline]
    fn set_balance_factor(&mut self, bf: i32) {
        self.balance_factor = bf;
    }
}
