//! Binary search tree with per-comparison instrumentation.

use crate::contract::Structure;
use crate::error::Violation;
use crate::log::{OpLog, ScanKind, StepRecord, UpdateStep};
use crate::node::{self, TreeNode};
use crate::ordered;
use crate::snapshot::{Snapshot, StructureKind, TreeStats};
use crate::traverse;

/// Classic unbalanced BST: `<` goes left, `>` goes right, duplicates are
/// rejected. Every descent step logs the literal comparison it took.
#[derive(Clone, Debug, Default)]
pub struct Bst {
    arena: Vec<TreeNode>,
    root: Option<u32>,
    size: usize,
    log: OpLog,
}

impl Bst {
    pub fn new() -> Self {
        Bst::default()
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

    /// Insert `value`, returning the new node's id, or `None` for a
    /// duplicate (logged, tree untouched).
    pub fn insert(&mut self, value: i64) -> Option<u32> {
        let id = ordered::insert(&mut self.arena, &mut self.root, &mut self.log, value)?;
        self.size += 1;
        Some(id)
    }

    /// Delete `value`; refreshes cached heights and depths on success.
    pub fn delete(&mut self, value: i64) -> bool {
        let (removed, _) = ordered::delete(&mut self.arena, &mut self.root, &mut self.log, value);
        if removed {
            self.size -= 1;
            traverse::calculate_height(&mut self.arena, self.root);
            traverse::update_depths(&mut self.arena, self.root, 0);
        }
        removed
    }

    /// Ordered lookup, logging every comparison and a final summary record.
    pub fn search(&mut self, value: i64) -> Option<u32> {
        ordered::search(&self.arena, self.root, &mut self.log, value)
    }

    /// Smallest value, logging the all-left descent.
    pub fn find_min(&mut self) -> Option<i64> {
        ordered::scan(&self.arena, self.root, &mut self.log, ScanKind::FindMin)
    }

    /// Largest value, logging the all-right descent.
    pub fn find_max(&mut self) -> Option<i64> {
        ordered::scan(&self.arena, self.root, &mut self.log, ScanKind::FindMax)
    }

    /// Smallest value strictly greater than `value`, which must be present.
    pub fn find_successor(&self, value: i64) -> Option<i64> {
        let n = traverse::find_node(&self.arena, self.root, value)?;
        if let Some(r) = self.arena[n as usize].r {
            return traverse::find_min(&self.arena, Some(r)).map(|i| self.arena[i as usize].value);
        }
        // Walk up until we come out of a left subtree.
        let mut current = n;
        let mut parent = self.arena[n as usize].p;
        while let Some(p) = parent {
            if self.arena[p as usize].l == Some(current) {
                return Some(self.arena[p as usize].value);
            }
            current = p;
            parent = self.arena[p as usize].p;
        }
        None
    }

    /// Largest value strictly smaller than `value`, which must be present.
    pub fn find_predecessor(&self, value: i64) -> Option<i64> {
        let n = traverse::find_node(&self.arena, self.root, value)?;
        if let Some(l) = self.arena[n as usize].l {
            return traverse::find_max(&self.arena, Some(l)).map(|i| self.arena[i as usize].value);
        }
        let mut current = n;
        let mut parent = self.arena[n as usize].p;
        while let Some(p) = parent {
            if self.arena[p as usize].r == Some(current) {
                return Some(self.arena[p as usize].value);
            }
            current = p;
            parent = self.arena[p as usize].p;
        }
        None
    }

    /// Replace `old_value` by `new_value` (delete + reinsert, both logged).
    pub fn update_value(&mut self, old_value: i64, new_value: i64) -> bool {
        if traverse::find_node(&self.arena, self.root, old_value).is_none() {
            self.log.push(StepRecord::Update {
                old_value,
                new_value,
                step: UpdateStep::NotFound,
                node: None,
            });
            return false;
        }
        if new_value != old_value
            && traverse::find_node(&self.arena, self.root, new_value).is_some()
        {
            self.log.push(StepRecord::Update {
                old_value,
                new_value,
                step: UpdateStep::Duplicate,
                node: None,
            });
            return false;
        }
        self.delete(old_value);
        let node = self.insert(new_value);
        self.log.push(StepRecord::Update {
            old_value,
            new_value,
            step: UpdateStep::Complete,
            node,
        });
        true
    }

    /// All values in `min..=max`, ascending, pruning subtrees that cannot
    /// contain matches.
    pub fn range(&self, min: i64, max: i64) -> Vec<i64> {
        let mut out = Vec::new();
        self.range_walk(self.root, min, max, &mut out);
        out
    }

    fn range_walk(&self, node: Option<u32>, min: i64, max: i64, out: &mut Vec<i64>) {
        let Some(n) = node else { return };
        let v = self.arena[n as usize].value;
        if v > min {
            self.range_walk(self.arena[n as usize].l, min, max, out);
        }
        if v >= min && v <= max {
            out.push(v);
        }
        if v < max {
            self.range_walk(self.arena[n as usize].r, min, max, out);
        }
    }

    /// Ascending value list (the in-order sequence).
    pub fn sorted_values(&self) -> Vec<i64> {
        traverse::inorder(&self.arena, self.root)
    }

    /// Rebuild as a height-balanced tree from the given values (sorted and
    /// deduplicated first). Existing contents and log are dropped.
    pub fn build_balanced(&mut self, values: &[i64]) {
        let mut sorted = values.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        self.clear();
        self.insert_midpoints(&sorted);
        traverse::calculate_height(&mut self.arena, self.root);
        traverse::update_depths(&mut self.arena, self.root, 0);
    }

    fn insert_midpoints(&mut self, values: &[i64]) {
        if values.is_empty() {
            return;
        }
        let mid = values.len() / 2;
        self.insert(values[mid]);
        self.insert_midpoints(&values[..mid]);
        self.insert_midpoints(&values[mid + 1..]);
    }

    /// Ordering violations: empty when every node respects its window.
    pub fn ordering_violations(&self) -> Vec<Violation> {
        let mut out = Vec::new();
        self.check_bounds(self.root, i64::MIN, i64::MAX, &mut out);
        out
    }

    pub fn is_valid_bst(&self) -> bool {
        self.ordering_violations().is_empty()
    }

    fn check_bounds(&self, node: Option<u32>, min: i64, max: i64, out: &mut Vec<Violation>) {
        let Some(n) = node else { return };
        let v = self.arena[n as usize].value;
        if v < min || v > max {
            out.push(Violation::new("bst_ordering", Some(n)));
        }
        if v > i64::MIN {
            self.check_bounds(self.arena[n as usize].l, min, v - 1, out);
        }
        if v < i64::MAX {
            self.check_bounds(self.arena[n as usize].r, v + 1, max, out);
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

impl Structure for Bst {
    fn kind(&self) -> StructureKind {
        StructureKind::Bst
    }

    fn size(&self) -> usize {
        self.size
    }

    fn stats(&mut self) -> TreeStats {
        node::binary_stats(&mut self.arena, self.root, StructureKind::Bst, self.size)
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
