//! Generic binary tree filled in level order.
//!
//! Insertion takes the first open left-then-right slot found by BFS, so
//! the tree stays complete. Deletion swaps the target's value with the
//! last level-order node and removes that node, preserving the shape.

use std::collections::VecDeque;

use crate::contract::Structure;
use crate::log::{DeleteStep, InsertStep, OpLog, SearchStep, StepRecord, UpdateStep};
use crate::node::{self, TreeNode};
use crate::snapshot::{Snapshot, StructureKind, TreeStats};
use crate::traverse;

#[derive(Clone, Debug, Default)]
pub struct BinaryTree {
    arena: Vec<TreeNode>,
    root: Option<u32>,
    size: usize,
    log: OpLog,
}

impl BinaryTree {
    pub fn new() -> Self {
        BinaryTree::default()
    }

    pub fn root(&self) -> Option<u32> {
        self.root
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn value_of(&self, id: u32) -> Option<i64> {
        self.arena.get(id as usize).map(|n| n.value)
    }

    fn alloc(&mut self, value: i64) -> u32 {
        let id = self.arena.len() as u32;
        self.arena.push(TreeNode::new(value));
        id
    }

    /// Insert into the first open slot in level order. Duplicates are
    /// allowed; every insert adds a node.
    pub fn insert(&mut self, value: i64) -> u32 {
        let Some(root) = self.root else {
            let id = self.alloc(value);
            self.root = Some(id);
            self.size = 1;
            self.log.push(StepRecord::Insert {
                value,
                step: InsertStep::CreateRoot,
                node: Some(id),
                parent: None,
                current: None,
                comparison: None,
            });
            return id;
        };
        let mut queue = VecDeque::from([root]);
        while let Some(n) = queue.pop_front() {
            if self.arena[n as usize].l.is_none() {
                let id = self.alloc(value);
                self.arena[id as usize].p = Some(n);
                self.arena[n as usize].l = Some(id);
                self.size += 1;
                self.refresh();
                self.log.push(StepRecord::Insert {
                    value,
                    step: InsertStep::InsertLeft,
                    node: Some(id),
                    parent: Some(n),
                    current: None,
                    comparison: None,
                });
                return id;
            }
            if self.arena[n as usize].r.is_none() {
                let id = self.alloc(value);
                self.arena[id as usize].p = Some(n);
                self.arena[n as usize].r = Some(id);
                self.size += 1;
                self.refresh();
                self.log.push(StepRecord::Insert {
                    value,
                    step: InsertStep::InsertRight,
                    node: Some(id),
                    parent: Some(n),
                    current: None,
                    comparison: None,
                });
                return id;
            }
            if let Some(l) = self.arena[n as usize].l {
                queue.push_back(l);
            }
            if let Some(r) = self.arena[n as usize].r {
                queue.push_back(r);
            }
        }
        unreachable!("level-order insert always finds an open slot")
    }

    /// Delete the first node holding `value`. The last level-order node's
    /// value replaces it and that node is unlinked, keeping the tree
    /// complete.
    pub fn delete(&mut self, value: i64) -> bool {
        let Some(target) = traverse::find_node(&self.arena, self.root, value) else {
            self.log.push(StepRecord::Delete {
                value,
                step: DeleteStep::NotFound,
                node: None,
                current: None,
                comparison: None,
                successor: None,
                replacement: None,
            });
            return false;
        };
        let Some(last) = self.last_level_order() else {
            return false;
        };
        if target == last {
            let step = if self.arena[target as usize].p.is_none() {
                self.root = None;
                DeleteStep::DeleteRoot
            } else {
                self.unlink(last);
                DeleteStep::DeleteLeaf
            };
            self.log.push(StepRecord::Delete {
                value,
                step,
                node: Some(target),
                current: None,
                comparison: None,
                successor: None,
                replacement: None,
            });
        } else {
            let replacement = self.arena[last as usize].value;
            self.arena[target as usize].value = replacement;
            self.unlink(last);
            self.log.push(StepRecord::Delete {
                value,
                step: DeleteStep::ReplaceAndDelete,
                node: Some(target),
                current: None,
                comparison: None,
                successor: None,
                replacement: Some(replacement),
            });
        }
        self.size -= 1;
        self.refresh();
        true
    }

    fn last_level_order(&self) -> Option<u32> {
        let mut queue = VecDeque::from([self.root?]);
        let mut last = None;
        while let Some(n) = queue.pop_front() {
            last = Some(n);
            if let Some(l) = self.arena[n as usize].l {
                queue.push_back(l);
            }
            if let Some(r) = self.arena[n as usize].r {
                queue.push_back(r);
            }
        }
        last
    }

    fn unlink(&mut self, n: u32) {
        if let Some(p) = self.arena[n as usize].p {
            if self.arena[p as usize].l == Some(n) {
                self.arena[p as usize].l = None;
            } else if self.arena[p as usize].r == Some(n) {
                self.arena[p as usize].r = None;
            }
        }
    }

    fn refresh(&mut self) {
        traverse::calculate_height(&mut self.arena, self.root);
        traverse::update_depths(&mut self.arena, self.root, 0);
    }

    /// Linear DFS lookup; logs a single summary record.
    pub fn search(&mut self, value: i64) -> Option<u32> {
        let found = traverse::find_node(&self.arena, self.root, value);
        self.log.push(StepRecord::Search {
            value,
            step: SearchStep::Complete,
            node: found,
            current: None,
            comparison: None,
            found: Some(found.is_some()),
        });
        found
    }

    /// Overwrite the first node holding `old_value` in place.
    pub fn update_value(&mut self, old_value: i64, new_value: i64) -> bool {
        let Some(n) = traverse::find_node(&self.arena, self.root, old_value) else {
            self.log.push(StepRecord::Update {
                old_value,
                new_value,
                step: UpdateStep::NotFound,
                node: None,
            });
            return false;
        };
        self.arena[n as usize].value = new_value;
        self.log.push(StepRecord::Update {
            old_value,
            new_value,
            step: UpdateStep::Complete,
            node: Some(n),
        });
        true
    }

    /// Every node has zero or two children.
    pub fn is_full(&self) -> bool {
        self.check_full(self.root)
    }

    fn check_full(&self, node: Option<u32>) -> bool {
        let Some(n) = node else {
            return true;
        };
        let (l, r) = (self.arena[n as usize].l, self.arena[n as usize].r);
        if l.is_some() != r.is_some() {
            return false;
        }
        self.check_full(l) && self.check_full(r)
    }

    /// Full with all leaves at the same depth.
    pub fn is_perfect(&self) -> bool {
        let Some(root) = self.root else {
            return true;
        };
        let mut leaf_depths = Vec::new();
        self.leaf_depths(root, 0, &mut leaf_depths);
        leaf_depths.sort_unstable();
        leaf_depths.dedup();
        self.is_full() && leaf_depths.len() <= 1
    }

    fn leaf_depths(&self, n: u32, depth: u32, out: &mut Vec<u32>) {
        let (l, r) = (self.arena[n as usize].l, self.arena[n as usize].r);
        if l.is_none() && r.is_none() {
            out.push(depth);
            return;
        }
        if let Some(l) = l {
            self.leaf_depths(l, depth + 1, out);
        }
        if let Some(r) = r {
            self.leaf_depths(r, depth + 1, out);
        }
    }

    /// Every level full except possibly the last, which is filled left to
    /// right. Always true for trees built only through `insert`/`delete`.
    pub fn is_complete(&self) -> bool {
        let Some(root) = self.root else {
            return true;
        };
        let mut queue = VecDeque::from([root]);
        let mut seen_gap = false;
        while let Some(n) = queue.pop_front() {
            for child in [self.arena[n as usize].l, self.arena[n as usize].r] {
                match child {
                    Some(c) => {
                        if seen_gap {
                            return false;
                        }
                        queue.push_back(c);
                    }
                    None => seen_gap = true,
                }
            }
        }
        true
    }

    pub fn leaf_count(&self) -> usize {
        self.arena_iter_live()
            .filter(|&n| self.arena[n as usize].is_leaf())
            .count()
    }

    pub fn internal_count(&self) -> usize {
        self.size - self.leaf_count()
    }

    fn arena_iter_live(&self) -> impl Iterator<Item = u32> + '_ {
        // Live nodes are exactly those reachable from the root.
        let mut live = Vec::new();
        self.collect_live(self.root, &mut live);
        live.into_iter()
    }

    fn collect_live(&self, node: Option<u32>, out: &mut Vec<u32>) {
        if let Some(n) = node {
            out.push(n);
            self.collect_live(self.arena[n as usize].l, out);
            self.collect_live(self.arena[n as usize].r, out);
        }
    }

    pub fn inorder(&self) -> Vec<i64> {
        traverse::inorder(&self.arena, self.root)
    }

    pub fn preorder(&self) -> Vec<i64> {
        traverse::preorder(&self.arena, self.root)
    }

    pub fn postorder(&self) -> Vec<i64> {
        traverse::postorder(&self.arena, self.root)
    }

    pub fn level_order(&self) -> Vec<i64> {
        traverse::level_order(&self.arena, self.root)
    }
}

impl Structure for BinaryTree {
    fn kind(&self) -> StructureKind {
        StructureKind::BinaryTree
    }

    fn size(&self) -> usize {
        self.size
    }

    fn stats(&mut self) -> TreeStats {
        let mut stats = node::binary_stats(
            &mut self.arena,
            self.root,
            StructureKind::BinaryTree,
            self.size,
        );
        // Values are not ordered here, so min/max come from a full scan
        // rather than the directed descents.
        let values = traverse::level_order(&self.arena, self.root);
        stats.min_value = values.iter().min().copied();
        stats.max_value = values.iter().max().copied();
        stats
    }

    fn snapshot(&self) -> Option<Snapshot> {
        self.root.map(|r| Snapshot::Binary {
            root: node::snapshot_subtree(&self.arena, r),
        })
    }

    fn clear(&mut self) {
        self.arena.clear();
        self.root = None;
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
