//! Binary min/max heap over a dense array.
//!
//! The `Vec<i64>` is the only storage: parent of `i` is `(i - 1) / 2`,
//! children are `2i + 1` and `2i + 2`. The tree-shaped snapshot is derived
//! on demand for display and never mutated on its own.

use serde::Serialize;

use crate::contract::Structure;
use crate::log::{BuildStep, ExtractStep, OpLog, StepRecord};
use crate::snapshot::{Color, NodeSnapshot, Snapshot, StructureKind, TreeStats};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HeapKind {
    Min,
    Max,
}

#[derive(Clone, Debug)]
pub struct Heap {
    kind: HeapKind,
    data: Vec<i64>,
    log: OpLog,
}

impl Heap {
    pub fn new(kind: HeapKind) -> Self {
        Heap {
            kind,
            data: Vec::new(),
            log: OpLog::new(),
        }
    }

    pub fn min() -> Self {
        Heap::new(HeapKind::Min)
    }

    pub fn max() -> Self {
        Heap::new(HeapKind::Max)
    }

    pub fn heap_kind(&self) -> HeapKind {
        self.kind
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// The backing array, root first. This *is* the level-order traversal.
    pub fn as_slice(&self) -> &[i64] {
        &self.data
    }

    pub fn level_order(&self) -> Vec<i64> {
        self.data.clone()
    }

    /// Root value without removing it.
    pub fn peek(&self) -> Option<i64> {
        self.data.first().copied()
    }

    fn parent(i: usize) -> usize {
        (i - 1) / 2
    }

    fn left(i: usize) -> usize {
        2 * i + 1
    }

    fn right(i: usize) -> usize {
        2 * i + 2
    }

    /// True when `upper` may sit above `lower`.
    fn ordered(&self, upper: i64, lower: i64) -> bool {
        match self.kind {
            HeapKind::Min => upper <= lower,
            HeapKind::Max => upper >= lower,
        }
    }

    /// Append `value` and sift it up to its place.
    pub fn insert(&mut self, value: i64) {
        self.data.push(value);
        let index = self.data.len() - 1;
        self.log.push(StepRecord::HeapInsert { value, index });
        self.sift_up(index, true);
    }

    /// Remove and return the root; the last element replaces it and sifts
    /// down.
    pub fn extract(&mut self) -> Option<i64> {
        if self.data.is_empty() {
            self.log.push(StepRecord::Extract {
                step: ExtractStep::EmptyHeap,
                value: None,
                new_root: None,
            });
            return None;
        }
        if self.data.len() == 1 {
            let value = self.data.pop()?;
            self.log.push(StepRecord::Extract {
                step: ExtractStep::ExtractRoot,
                value: Some(value),
                new_root: None,
            });
            return Some(value);
        }
        let root = self.data[0];
        let last = self.data.pop()?;
        self.data[0] = last;
        self.log.push(StepRecord::Extract {
            step: ExtractStep::ReplaceRoot,
            value: Some(root),
            new_root: Some(last),
        });
        self.sift_down(0, true);
        Some(root)
    }

    fn swap(&mut self, a: usize, b: usize) {
        self.data.swap(a, b);
        self.log.push(StepRecord::Swap {
            a,
            b,
            value_a: self.data[a],
            value_b: self.data[b],
        });
    }

    /// Move `data[i]` up while it outranks its parent. `log_steps` gates
    /// the per-level `heapify_up` records; swaps are always logged.
    fn sift_up(&mut self, mut i: usize, log_steps: bool) {
        while i > 0 {
            let p = Heap::parent(i);
            if self.ordered(self.data[p], self.data[i]) {
                break;
            }
            if log_steps {
                self.log.push(StepRecord::HeapifyUp {
                    index: i,
                    parent_index: p,
                    value: self.data[i],
                    parent_value: self.data[p],
                });
            }
            self.swap(i, p);
            i = p;
        }
    }

    /// Move `data[i]` down toward the ordering-favored child.
    fn sift_down(&mut self, mut i: usize, log_steps: bool) {
        loop {
            let l = Heap::left(i);
            if l >= self.data.len() {
                break;
            }
            let r = Heap::right(i);
            let mut favored = l;
            if r < self.data.len() && !self.ordered(self.data[l], self.data[r]) {
                favored = r;
            }
            if self.ordered(self.data[i], self.data[favored]) {
                break;
            }
            if log_steps {
                self.log.push(StepRecord::HeapifyDown {
                    index: i,
                    child_index: favored,
                    value: self.data[i],
                    child_value: self.data[favored],
                });
            }
            self.swap(i, favored);
            i = favored;
        }
    }

    /// Replace the contents with `values` and heapify bottom-up from the
    /// last internal node (linear-time construction).
    pub fn build(&mut self, values: &[i64]) {
        self.data = values.to_vec();
        self.log.push(StepRecord::BuildHeap {
            step: BuildStep::Start,
            values: Some(values.to_vec()),
        });
        if self.data.len() > 1 {
            for i in (0..self.data.len() / 2).rev() {
                self.sift_down(i, false);
            }
        }
        self.log.push(StepRecord::BuildHeap {
            step: BuildStep::Complete,
            values: None,
        });
    }

    /// Remove the element at `index`: the last element takes its slot and
    /// sifts in whichever direction restores order.
    pub fn delete_at(&mut self, index: usize) -> bool {
        if index >= self.data.len() {
            return false;
        }
        let value = self.data[index];
        self.log.push(StepRecord::HeapDelete { index, value });
        let last = match self.data.pop() {
            Some(v) => v,
            None => return false,
        };
        if index == self.data.len() {
            return true; // removed the tail
        }
        self.data[index] = last;
        self.fix_at(index);
        true
    }

    /// Overwrite the element at `index` and restore order.
    pub fn update_at(&mut self, index: usize, value: i64) -> bool {
        if index >= self.data.len() {
            return false;
        }
        let old_value = self.data[index];
        self.data[index] = value;
        self.log.push(StepRecord::HeapUpdate {
            index,
            old_value,
            new_value: value,
        });
        self.fix_at(index);
        true
    }

    /// Sift up when the slot outranks its parent, down otherwise.
    fn fix_at(&mut self, index: usize) {
        if index > 0 && !self.ordered(self.data[Heap::parent(index)], self.data[index]) {
            self.sift_up(index, false);
        } else {
            self.sift_down(index, false);
        }
    }

    /// Linear scan; logs a summary record with the found index.
    pub fn search(&mut self, value: i64) -> Option<usize> {
        let index = self.data.iter().position(|&v| v == value);
        self.log.push(StepRecord::HeapSearch {
            value,
            index,
            found: index.is_some(),
        });
        index
    }

    /// True when every parent/child pair respects the ordering.
    pub fn is_heap(&self) -> bool {
        (1..self.data.len()).all(|i| self.ordered(self.data[Heap::parent(i)], self.data[i]))
    }

    /// Sort `values` through a scratch heap of the same kind (ascending
    /// for a min heap, descending for a max heap). Does not touch `self`.
    pub fn heap_sort(&self, values: &[i64]) -> Vec<i64> {
        let mut scratch = Heap::new(self.kind);
        scratch.build(values);
        let mut out = Vec::with_capacity(values.len());
        while let Some(v) = scratch.extract() {
            out.push(v);
        }
        out
    }

    /// Number of nodes on the deepest (possibly partial) level.
    pub fn last_level_node_count(&self) -> usize {
        let n = self.data.len();
        if n == 0 {
            return 0;
        }
        let full_levels = usize::BITS - 1 - n.leading_zeros();
        n - ((1usize << full_levels) - 1)
    }

    fn height(&self) -> i32 {
        if self.data.is_empty() {
            -1
        } else {
            (usize::BITS - 1 - self.data.len().leading_zeros()) as i32
        }
    }

    fn snapshot_at(&self, index: usize) -> NodeSnapshot {
        let l = Heap::left(index);
        let r = Heap::right(index);
        let left = (l < self.data.len()).then(|| Box::new(self.snapshot_at(l)));
        let right = (r < self.data.len()).then(|| Box::new(self.snapshot_at(r)));
        let lh = left.as_ref().map(|n| n.height).unwrap_or(-1);
        let rh = right.as_ref().map(|n| n.height).unwrap_or(-1);
        NodeSnapshot {
            id: index as u32,
            value: self.data[index],
            depth: (usize::BITS - 1 - (index + 1).leading_zeros()),
            height: 1 + lh.max(rh),
            balance_factor: lh - rh,
            color: Color::Black,
            is_leaf: left.is_none() && right.is_none(),
            left,
            right,
        }
    }
}

impl Structure for Heap {
    fn kind(&self) -> StructureKind {
        match self.kind {
            HeapKind::Min => StructureKind::MinHeap,
            HeapKind::Max => StructureKind::MaxHeap,
        }
    }

    fn size(&self) -> usize {
        self.data.len()
    }

    fn stats(&mut self) -> TreeStats {
        TreeStats {
            kind: Structure::kind(self),
            size: self.data.len(),
            height: self.height(),
            // A heap is a complete tree, so it is always height-balanced.
            is_balanced: true,
            min_value: self.data.iter().min().copied(),
            max_value: self.data.iter().max().copied(),
        }
    }

    fn snapshot(&self) -> Option<Snapshot> {
        (!self.data.is_empty()).then(|| Snapshot::Binary {
            root: self.snapshot_at(0),
        })
    }

    fn clear(&mut self) {
        self.data.clear();
        self.log.clear();
    }

    fn log(&self) -> &OpLog {
        &self.log
    }

    fn log_mut(&mut self) -> &mut OpLog {
        &mut self.log
    }
}
