//! Order-m B-tree.
//!
//! Nodes live in an arena like every other engine; children are arena
//! indices. Inserts go straight to the correct leaf and overflow is
//! repaired by splitting upward (promoting the median), so every node
//! satisfies its key bounds the moment an operation returns. Deletes
//! remove at a leaf (internals substitute a neighbor key first) and
//! repair underflow by borrowing through the parent or merging.

use serde::Serialize;

use crate::contract::Structure;
use crate::error::{TreeError, Violation};
use crate::log::{
    BtreeDeleteStep, BtreeInsertStep, BtreeSearchStep, OpLog, Side, StepRecord, UpdateStep,
};
use crate::snapshot::{BTreeSnapshot, Snapshot, StructureKind, TreeStats};

#[derive(Clone, Debug)]
pub struct BTreeNode {
    pub keys: Vec<i64>,
    pub children: Vec<u32>,
    pub leaf: bool,
    pub p: Option<u32>,
    pub depth: u32,
}

impl BTreeNode {
    fn leaf_node() -> Self {
        BTreeNode {
            keys: Vec::new(),
            children: Vec::new(),
            leaf: true,
            p: None,
            depth: 0,
        }
    }
}

/// Order and occupancy summary, serialized for display.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BTreeInfo {
    pub order: usize,
    pub min_keys: usize,
    pub max_keys: usize,
    pub size: usize,
    pub height: u32,
    pub node_count: usize,
    pub leaf_count: usize,
    pub valid: bool,
}

#[derive(Clone, Debug)]
pub struct BTree {
    arena: Vec<BTreeNode>,
    root: u32,
    order: usize,
    size: usize,
    log: OpLog,
}

impl BTree {
    /// `order` is the maximum child count; it must be at least 3.
    pub fn new(order: usize) -> Result<Self, TreeError> {
        if order < 3 {
            return Err(TreeError::InvalidInput(format!(
                "b-tree order must be at least 3, got {order}"
            )));
        }
        Ok(BTree {
            arena: vec![BTreeNode::leaf_node()],
            root: 0,
            order,
            size: 0,
            log: OpLog::new(),
        })
    }

    pub fn order(&self) -> usize {
        self.order
    }

    /// Lower key bound for non-root nodes: `ceil(order / 2) - 1`.
    pub fn min_keys(&self) -> usize {
        self.order.div_ceil(2) - 1
    }

    /// Upper key bound for every node: `order - 1`.
    pub fn max_keys(&self) -> usize {
        self.order - 1
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    fn alloc(&mut self, node: BTreeNode) -> u32 {
        let id = self.arena.len() as u32;
        self.arena.push(node);
        id
    }

    /// Logged lookup: `(node, key position)` when present.
    pub fn search(&mut self, key: i64) -> Option<(u32, usize)> {
        self.search_from(self.root, key)
    }

    fn search_from(&mut self, n: u32, key: i64) -> Option<(u32, usize)> {
        let mut i = 0;
        while i < self.arena[n as usize].keys.len() && self.arena[n as usize].keys[i] < key {
            i += 1;
        }
        if i < self.arena[n as usize].keys.len() && self.arena[n as usize].keys[i] == key {
            self.log.push(StepRecord::BtreeSearch {
                key,
                step: BtreeSearchStep::Found,
                node: n,
                position: Some(i),
                child_index: None,
            });
            return Some((n, i));
        }
        if self.arena[n as usize].leaf {
            self.log.push(StepRecord::BtreeSearch {
                key,
                step: BtreeSearchStep::NotFoundLeaf,
                node: n,
                position: None,
                child_index: None,
            });
            return None;
        }
        self.log.push(StepRecord::BtreeSearch {
            key,
            step: BtreeSearchStep::TraverseChild,
            node: n,
            position: None,
            child_index: Some(i),
        });
        let child = self.arena[n as usize].children[i];
        self.search_from(child, key)
    }

    /// Unlogged lookup used internally.
    fn find(&self, key: i64) -> Option<(u32, usize)> {
        let mut n = self.root;
        loop {
            let node = &self.arena[n as usize];
            let mut i = 0;
            while i < node.keys.len() && node.keys[i] < key {
                i += 1;
            }
            if i < node.keys.len() && node.keys[i] == key {
                return Some((n, i));
            }
            if node.leaf {
                return None;
            }
            n = node.children[i];
        }
    }

    pub fn contains(&self, key: i64) -> bool {
        self.find(key).is_some()
    }

    /// Insert `key`; duplicates are rejected (logged).
    pub fn insert(&mut self, key: i64) -> bool {
        if self.contains(key) {
            self.log.push(StepRecord::BtreeInsert {
                key,
                step: BtreeInsertStep::Duplicate,
                node: None,
                position: None,
            });
            return false;
        }
        let leaf = self.leaf_for(key);
        let node = &mut self.arena[leaf as usize];
        let position = node.keys.partition_point(|&k| k < key);
        node.keys.insert(position, key);
        self.log.push(StepRecord::BtreeInsert {
            key,
            step: BtreeInsertStep::InsertLeaf,
            node: Some(leaf),
            position: Some(position),
        });
        self.size += 1;
        self.repair_overflow(leaf);
        self.refresh_depths();
        true
    }

    /// Leaf the key belongs in, by ordered descent.
    fn leaf_for(&self, key: i64) -> u32 {
        let mut n = self.root;
        loop {
            let node = &self.arena[n as usize];
            if node.leaf {
                return n;
            }
            let i = node.keys.partition_point(|&k| k < key);
            n = node.children[i];
        }
    }

    /// Split overflowing nodes upward, promoting the median each time.
    /// A splitting root grows the tree by one level.
    fn repair_overflow(&mut self, start: u32) {
        let mut n = start;
        while self.arena[n as usize].keys.len() > self.max_keys() {
            let mid = self.arena[n as usize].keys.len() / 2;
            let middle_key = self.arena[n as usize].keys[mid];
            let right_keys = self.arena[n as usize].keys.split_off(mid + 1);
            self.arena[n as usize].keys.pop();
            let leaf = self.arena[n as usize].leaf;
            let right_children = if leaf {
                Vec::new()
            } else {
                self.arena[n as usize].children.split_off(mid + 1)
            };
            let sibling = self.alloc(BTreeNode {
                keys: right_keys,
                children: right_children,
                leaf,
                p: self.arena[n as usize].p,
                depth: 0,
            });
            for i in 0..self.arena[sibling as usize].children.len() {
                let c = self.arena[sibling as usize].children[i];
                self.arena[c as usize].p = Some(sibling);
            }
            match self.arena[n as usize].p {
                Some(p) => {
                    let Some(idx) = self.child_index(p, n) else {
                        return;
                    };
                    self.arena[p as usize].keys.insert(idx, middle_key);
                    self.arena[p as usize].children.insert(idx + 1, sibling);
                    self.log.push(StepRecord::BtreeSplit {
                        node: n,
                        new_sibling: sibling,
                        parent: p,
                        middle_key,
                    });
                    n = p;
                }
                None => {
                    let new_root = self.alloc(BTreeNode {
                        keys: vec![middle_key],
                        children: vec![n, sibling],
                        leaf: false,
                        p: None,
                        depth: 0,
                    });
                    self.arena[n as usize].p = Some(new_root);
                    self.arena[sibling as usize].p = Some(new_root);
                    self.root = new_root;
                    self.log.push(StepRecord::BtreeInsert {
                        key: middle_key,
                        step: BtreeInsertStep::SplitRoot,
                        node: Some(new_root),
                        position: None,
                    });
                    self.log.push(StepRecord::BtreeSplit {
                        node: n,
                        new_sibling: sibling,
                        parent: new_root,
                        middle_key,
                    });
                    return;
                }
            }
        }
    }

    fn child_index(&self, parent: u32, child: u32) -> Option<usize> {
        self.arena[parent as usize]
            .children
            .iter()
            .position(|&c| c == child)
    }

    /// Delete `key`. Internal keys are substituted with a neighbor key
    /// from the richer adjacent child; removal always happens at a leaf
    /// and underflow is repaired walking back up.
    pub fn delete(&mut self, key: i64) -> bool {
        let Some((n, idx)) = self.find(key) else {
            self.log.push(StepRecord::BtreeDelete {
                key,
                step: BtreeDeleteStep::NotFound,
                node: None,
                separator: None,
            });
            return false;
        };
        let removal_leaf = if self.arena[n as usize].leaf {
            self.arena[n as usize].keys.remove(idx);
            self.log.push(StepRecord::BtreeDelete {
                key,
                step: BtreeDeleteStep::DeleteLeaf,
                node: Some(n),
                separator: None,
            });
            n
        } else {
            let left = self.arena[n as usize].children[idx];
            let right = self.arena[n as usize].children[idx + 1];
            if self.arena[left as usize].keys.len() > self.min_keys() {
                // Predecessor: rightmost key of the left subtree.
                let leaf = self.rightmost_leaf(left);
                let Some(pred) = self.arena[leaf as usize].keys.pop() else {
                    return false;
                };
                self.arena[n as usize].keys[idx] = pred;
                self.log.push(StepRecord::BtreeDelete {
                    key,
                    step: BtreeDeleteStep::ReplacePredecessor,
                    node: Some(n),
                    separator: Some(pred),
                });
                leaf
            } else {
                // Successor: leftmost key of the right subtree.
                let leaf = self.leftmost_leaf(right);
                if self.arena[leaf as usize].keys.is_empty() {
                    return false;
                }
                let succ = self.arena[leaf as usize].keys.remove(0);
                self.arena[n as usize].keys[idx] = succ;
                self.log.push(StepRecord::BtreeDelete {
                    key,
                    step: BtreeDeleteStep::ReplaceSuccessor,
                    node: Some(n),
                    separator: Some(succ),
                });
                leaf
            }
        };
        self.size -= 1;
        self.repair_underflow(removal_leaf, key);
        self.refresh_depths();
        true
    }

    fn leftmost_leaf(&self, mut n: u32) -> u32 {
        while !self.arena[n as usize].leaf {
            n = self.arena[n as usize].children[0];
        }
        n
    }

    fn rightmost_leaf(&self, mut n: u32) -> u32 {
        while !self.arena[n as usize].leaf {
            let node = &self.arena[n as usize];
            n = node.children[node.keys.len()];
        }
        n
    }

    /// Borrow through the parent or merge with a sibling until every node
    /// meets its lower bound; a keyless root hands the tree to its child.
    fn repair_underflow(&mut self, start: u32, key: i64) {
        let mut n = start;
        loop {
            if n == self.root {
                if self.arena[n as usize].keys.is_empty() && !self.arena[n as usize].leaf {
                    let child = self.arena[n as usize].children[0];
                    self.arena[child as usize].p = None;
                    self.root = child;
                    self.log.push(StepRecord::BtreeDelete {
                        key,
                        step: BtreeDeleteStep::ShrinkRoot,
                        node: Some(child),
                        separator: None,
                    });
                }
                return;
            }
            if self.arena[n as usize].keys.len() >= self.min_keys() {
                return;
            }
            let Some(p) = self.arena[n as usize].p else {
                return;
            };
            let Some(idx) = self.child_index(p, n) else {
                return;
            };
            if idx > 0 {
                let left = self.arena[p as usize].children[idx - 1];
                if self.arena[left as usize].keys.len() > self.min_keys() {
                    self.borrow_from_left(n, left, p, idx);
                    return;
                }
            }
            if idx + 1 < self.arena[p as usize].children.len() {
                let right = self.arena[p as usize].children[idx + 1];
                if self.arena[right as usize].keys.len() > self.min_keys() {
                    self.borrow_from_right(n, right, p, idx);
                    return;
                }
            }
            // Both siblings are at the minimum: merge and continue at the
            // parent, which just lost a key.
            if idx > 0 {
                self.merge(p, idx - 1);
            } else {
                self.merge(p, idx);
            }
            n = p;
        }
    }

    /// Left sibling's last key rotates up into the parent; the old
    /// separator drops down to the front of `n`.
    fn borrow_from_left(&mut self, n: u32, left: u32, p: u32, idx: usize) {
        let Some(borrowed) = self.arena[left as usize].keys.pop() else {
            return;
        };
        let separator = std::mem::replace(&mut self.arena[p as usize].keys[idx - 1], borrowed);
        self.arena[n as usize].keys.insert(0, separator);
        if !self.arena[n as usize].leaf {
            if let Some(moved) = self.arena[left as usize].children.pop() {
                self.arena[moved as usize].p = Some(n);
                self.arena[n as usize].children.insert(0, moved);
            }
        }
        self.log.push(StepRecord::BtreeBorrow {
            node: n,
            sibling: left,
            parent: p,
            from: Side::Left,
            key: borrowed,
        });
    }

    /// Mirror of [`BTree::borrow_from_left`].
    fn borrow_from_right(&mut self, n: u32, right: u32, p: u32, idx: usize) {
        if self.arena[right as usize].keys.is_empty() {
            return;
        }
        let borrowed = self.arena[right as usize].keys.remove(0);
        let separator = std::mem::replace(&mut self.arena[p as usize].keys[idx], borrowed);
        self.arena[n as usize].keys.push(separator);
        if !self.arena[n as usize].leaf && !self.arena[right as usize].children.is_empty() {
            let moved = self.arena[right as usize].children.remove(0);
            self.arena[moved as usize].p = Some(n);
            self.arena[n as usize].children.push(moved);
        }
        self.log.push(StepRecord::BtreeBorrow {
            node: n,
            sibling: right,
            parent: p,
            from: Side::Right,
            key: borrowed,
        });
    }

    /// Fold `children[i + 1]` and the separator `keys[i]` into
    /// `children[i]`. The right node's arena slot goes dead.
    fn merge(&mut self, p: u32, i: usize) {
        let left = self.arena[p as usize].children[i];
        let right = self.arena[p as usize].children[i + 1];
        let separator = self.arena[p as usize].keys.remove(i);
        self.arena[p as usize].children.remove(i + 1);
        self.arena[left as usize].keys.push(separator);
        let right_keys = std::mem::take(&mut self.arena[right as usize].keys);
        self.arena[left as usize].keys.extend(right_keys);
        let right_children = std::mem::take(&mut self.arena[right as usize].children);
        for &c in &right_children {
            self.arena[c as usize].p = Some(left);
        }
        self.arena[left as usize].children.extend(right_children);
        self.log.push(StepRecord::BtreeMerge {
            left,
            right,
            parent: p,
            separator,
        });
    }

    /// Replace `old_key` by `new_key` (delete + reinsert, both logged).
    pub fn update_value(&mut self, old_key: i64, new_key: i64) -> bool {
        if !self.contains(old_key) {
            self.log.push(StepRecord::Update {
                old_value: old_key,
                new_value: new_key,
                step: UpdateStep::NotFound,
                node: None,
            });
            return false;
        }
        if new_key != old_key && self.contains(new_key) {
            self.log.push(StepRecord::Update {
                old_value: old_key,
                new_value: new_key,
                step: UpdateStep::Duplicate,
                node: None,
            });
            return false;
        }
        self.delete(old_key);
        self.insert(new_key);
        self.log.push(StepRecord::Update {
            old_value: old_key,
            new_value: new_key,
            step: UpdateStep::Complete,
            node: None,
        });
        true
    }

    /// Keys ascending (in-order over the multi-way tree).
    pub fn sorted_keys(&self) -> Vec<i64> {
        let mut out = Vec::with_capacity(self.size);
        self.collect_keys(self.root, &mut out);
        out
    }

    fn collect_keys(&self, n: u32, out: &mut Vec<i64>) {
        let node = &self.arena[n as usize];
        if node.leaf {
            out.extend_from_slice(&node.keys);
            return;
        }
        for (i, &key) in node.keys.iter().enumerate() {
            self.collect_keys(node.children[i], out);
            out.push(key);
        }
        if let Some(&last) = node.children.last() {
            self.collect_keys(last, out);
        }
    }

    /// Tree height in edges; a lone (possibly empty) root is 0.
    pub fn height(&self) -> u32 {
        let mut h = 0;
        let mut n = self.root;
        while !self.arena[n as usize].leaf {
            n = self.arena[n as usize].children[0];
            h += 1;
        }
        h
    }

    pub fn node_count(&self) -> usize {
        self.count_nodes(self.root).0
    }

    pub fn leaf_count(&self) -> usize {
        self.count_nodes(self.root).1
    }

    fn count_nodes(&self, n: u32) -> (usize, usize) {
        let node = &self.arena[n as usize];
        if node.leaf {
            return (1, 1);
        }
        let mut total = 1;
        let mut leaves = 0;
        for &c in &node.children {
            let (t, l) = self.count_nodes(c);
            total += t;
            leaves += l;
        }
        (total, leaves)
    }

    pub fn info(&self) -> BTreeInfo {
        let (node_count, leaf_count) = self.count_nodes(self.root);
        BTreeInfo {
            order: self.order,
            min_keys: self.min_keys(),
            max_keys: self.max_keys(),
            size: self.size,
            height: self.height(),
            node_count,
            leaf_count,
            valid: self.is_valid_btree(),
        }
    }

    /// Every violated structural property: key bounds (root exempt from
    /// the minimum), strictly increasing keys, child counts, uniform leaf
    /// depth.
    pub fn check_btree_properties(&self) -> Vec<Violation> {
        let mut out = Vec::new();
        let mut leaf_depths = Vec::new();
        self.check_node(self.root, 0, &mut out, &mut leaf_depths);
        leaf_depths.sort_unstable();
        leaf_depths.dedup();
        if leaf_depths.len() > 1 {
            out.push(Violation::new("leaf_depth", Some(self.root)));
        }
        out
    }

    fn check_node(&self, n: u32, depth: u32, out: &mut Vec<Violation>, leaf_depths: &mut Vec<u32>) {
        let node = &self.arena[n as usize];
        if n != self.root && node.keys.len() < self.min_keys() {
            out.push(Violation::new("min_keys", Some(n)));
        }
        if node.keys.len() > self.max_keys() {
            out.push(Violation::new("max_keys", Some(n)));
        }
        if node.keys.windows(2).any(|w| w[0] >= w[1]) {
            out.push(Violation::new("key_order", Some(n)));
        }
        if node.leaf {
            if !node.children.is_empty() {
                out.push(Violation::new("leaf_children", Some(n)));
            }
            leaf_depths.push(depth);
            return;
        }
        if node.children.len() != node.keys.len() + 1 {
            out.push(Violation::new("child_count", Some(n)));
        }
        for &c in &node.children {
            self.check_node(c, depth + 1, out, leaf_depths);
        }
    }

    pub fn is_valid_btree(&self) -> bool {
        self.check_btree_properties().is_empty()
    }

    fn refresh_depths(&mut self) {
        self.set_depth(self.root, 0);
    }

    fn set_depth(&mut self, n: u32, depth: u32) {
        self.arena[n as usize].depth = depth;
        for i in 0..self.arena[n as usize].children.len() {
            let c = self.arena[n as usize].children[i];
            self.set_depth(c, depth + 1);
        }
    }

    fn snapshot_node(&self, n: u32) -> BTreeSnapshot {
        let node = &self.arena[n as usize];
        BTreeSnapshot {
            id: n,
            keys: node.keys.clone(),
            leaf: node.leaf,
            depth: node.depth,
            children: node.children.iter().map(|&c| self.snapshot_node(c)).collect(),
        }
    }
}

impl Structure for BTree {
    fn kind(&self) -> StructureKind {
        StructureKind::Btree
    }

    fn size(&self) -> usize {
        self.size
    }

    fn stats(&mut self) -> TreeStats {
        self.refresh_depths();
        let keys = self.sorted_keys();
        TreeStats {
            kind: StructureKind::Btree,
            size: self.size,
            height: if self.size == 0 {
                -1
            } else {
                self.height() as i32
            },
            is_balanced: true, // all leaves share one depth by construction
            min_value: keys.first().copied(),
            max_value: keys.last().copied(),
        }
    }

    fn snapshot(&self) -> Option<Snapshot> {
        (self.size > 0).then(|| Snapshot::MultiWay {
            root: self.snapshot_node(self.root),
        })
    }

    fn clear(&mut self) {
        self.arena.clear();
        self.arena.push(BTreeNode::leaf_node());
        self.root = 0;
        self.size = 0;
        self.log.clear();
    }

    fn log(&self) -> &OpLog {
        &self.log
    }

    fn log_mut(&mut self) -> &mut OpLog {
        &mut self.log
    }
}
