//! Traversals and metric refreshes shared by every binary-shaped engine.
//!
//! All functions are free functions over the [`Link`]/[`ValueNode`]/
//! [`Metrics`] seams; an engine passes its arena slice and a root index.
//! None of them touch the operation log.

use std::collections::VecDeque;

use crate::types::{Link, Metrics, ValueNode};

fn at<N>(arena: &[N], i: u32) -> &N {
    &arena[i as usize]
}

/// Root-left-right.
pub fn preorder<N: ValueNode>(arena: &[N], root: Option<u32>) -> Vec<i64> {
    let mut out = Vec::new();
    fn walk<N: ValueNode>(arena: &[N], node: Option<u32>, out: &mut Vec<i64>) {
        if let Some(n) = node {
            out.push(at(arena, n).value());
            walk(arena, at(arena, n).l(), out);
            walk(arena, at(arena, n).r(), out);
        }
    }
    walk(arena, root, &mut out);
    out
}

/// Left-root-right. Sorted ascending for every search tree in this crate.
pub fn inorder<N: ValueNode>(arena: &[N], root: Option<u32>) -> Vec<i64> {
    let mut out = Vec::new();
    fn walk<N: ValueNode>(arena: &[N], node: Option<u32>, out: &mut Vec<i64>) {
        if let Some(n) = node {
            walk(arena, at(arena, n).l(), out);
            out.push(at(arena, n).value());
            walk(arena, at(arena, n).r(), out);
        }
    }
    walk(arena, root, &mut out);
    out
}

/// Left-right-root.
pub fn postorder<N: ValueNode>(arena: &[N], root: Option<u32>) -> Vec<i64> {
    let mut out = Vec::new();
    fn walk<N: ValueNode>(arena: &[N], node: Option<u32>, out: &mut Vec<i64>) {
        if let Some(n) = node {
            walk(arena, at(arena, n).l(), out);
            walk(arena, at(arena, n).r(), out);
            out.push(at(arena, n).value());
        }
    }
    walk(arena, root, &mut out);
    out
}

/// Breadth-first, FIFO queue seeded with the root.
pub fn level_order<N: ValueNode>(arena: &[N], root: Option<u32>) -> Vec<i64> {
    let mut out = Vec::new();
    let mut queue: VecDeque<u32> = VecDeque::new();
    if let Some(r) = root {
        queue.push_back(r);
    }
    while let Some(n) = queue.pop_front() {
        out.push(at(arena, n).value());
        if let Some(l) = at(arena, n).l() {
            queue.push_back(l);
        }
        if let Some(r) = at(arena, n).r() {
            queue.push_back(r);
        }
    }
    out
}

/// First node with the given value: the node itself, then the left
/// subtree, then the right. O(n); search-tree engines use their own
/// ordered descent for logged lookups.
pub fn find_node<N: ValueNode>(arena: &[N], node: Option<u32>, value: i64) -> Option<u32> {
    let n = node?;
    if at(arena, n).value() == value {
        return Some(n);
    }
    find_node(arena, at(arena, n).l(), value).or_else(|| find_node(arena, at(arena, n).r(), value))
}

/// Post-order height refresh: `height = 1 + max(child heights)`, an
/// absent child contributes −1, so a leaf is 0. Refreshes every node's
/// `balance_factor` along the way. Returns the subtree height, or −1 for
/// an empty subtree.
pub fn calculate_height<N: Metrics>(arena: &mut [N], node: Option<u32>) -> i32 {
    let Some(n) = node else {
        return -1;
    };
    let lh = calculate_height(arena, arena[n as usize].l());
    let rh = calculate_height(arena, arena[n as usize].r());
    let slot = &mut arena[n as usize];
    slot.set_height(1 + lh.max(rh));
    slot.set_balance_factor(lh - rh);
    slot.height()
}

/// Pre-order depth refresh: root 0, child = parent + 1.
pub fn update_depths<N: Metrics>(arena: &mut [N], node: Option<u32>, depth: u32) {
    if let Some(n) = node {
        arena[n as usize].set_depth(depth);
        update_depths(arena, arena[n as usize].l(), depth + 1);
        update_depths(arena, arena[n as usize].r(), depth + 1);
    }
}

/// True when every node satisfies `|balance_factor| <= 1`. Assumes
/// [`calculate_height`] ran since the last structural change.
pub fn is_balanced<N: Metrics>(arena: &[N], node: Option<u32>) -> bool {
    let Some(n) = node else {
        return true;
    };
    at(arena, n).balance_factor().abs() <= 1
        && is_balanced(arena, at(arena, n).l())
        && is_balanced(arena, at(arena, n).r())
}

/// Leftmost node of the subtree.
pub fn find_min<N: Link>(arena: &[N], node: Option<u32>) -> Option<u32> {
    let mut n = node?;
    while let Some(l) = at(arena, n).l() {
        n = l;
    }
    Some(n)
}

/// Rightmost node of the subtree.
pub fn find_max<N: Link>(arena: &[N], node: Option<u32>) -> Option<u32> {
    let mut n = node?;
    while let Some(r) = at(arena, n).r() {
        n = r;
    }
    Some(n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::TreeNode;

    // Hand-built tree:      2
    //                      / \
    //                     1   4
    //                        / \
    //                       3   5
    fn fixture() -> (Vec<TreeNode>, Option<u32>) {
        let mut arena: Vec<TreeNode> = [2, 1, 4, 3, 5].iter().map(|&v| TreeNode::new(v)).collect();
        arena[0].l = Some(1);
        arena[0].r = Some(2);
        arena[1].p = Some(0);
        arena[2].p = Some(0);
        arena[2].l = Some(3);
        arena[2].r = Some(4);
        arena[3].p = Some(2);
        arena[4].p = Some(2);
        (arena, Some(0))
    }

    #[test]
    fn traversal_orders() {
        let (arena, root) = fixture();
        assert_eq!(preorder(&arena, root), vec![2, 1, 4, 3, 5]);
        assert_eq!(inorder(&arena, root), vec![1, 2, 3, 4, 5]);
        assert_eq!(postorder(&arena, root), vec![1, 3, 5, 4, 2]);
        assert_eq!(level_order(&arena, root), vec![2, 1, 4, 3, 5]);
    }

    #[test]
    fn height_and_depth_refresh() {
        let (mut arena, root) = fixture();
        assert_eq!(calculate_height(&mut arena, root), 2);
        update_depths(&mut arena, root, 0);
        assert_eq!(arena[0].height, 2);
        assert_eq!(arena[0].balance_factor, -1);
        assert_eq!(arena[1].height, 0);
        assert_eq!(arena[3].depth, 2);
        assert!(is_balanced(&arena, root));
        assert_eq!(calculate_height(&mut arena, None), -1);
    }

    #[test]
    fn find_helpers() {
        let (arena, root) = fixture();
        assert_eq!(find_node(&arena, root, 3), Some(3));
        assert_eq!(find_node(&arena, root, 9), None);
        assert_eq!(find_min(&arena, root), Some(1));
        assert_eq!(find_max(&arena, root), Some(4));
        assert_eq!(find_min::<TreeNode>(&[], None), None);
    }
}
