//! Self-balancing AVL tree.
//!
//! Mutations are plain BST mutations followed by a rebalance walk from
//! the deepest changed node up to the root. Each visited ancestor gets a
//! fresh height/balance factor (logged), and a factor outside ±1 picks
//! one of the four rotation cases (LL, LR, RR, RL).

use serde::Serialize;

use crate::contract::Structure;
use crate::log::{OpLog, Rotation, ScanKind, StepRecord, UpdateStep};
use crate::node::{self, TreeNode};
use crate::ordered;
use crate::snapshot::{Snapshot, StructureKind, TreeStats};
use crate::traverse;

#[derive(Clone, Debug, Default)]
pub struct AvlTree {
    arena: Vec<TreeNode>,
    root: Option<u32>,
    size: usize,
    log: OpLog,
}

/// One node's balance bookkeeping, as listed by [`AvlTree::balance_factors`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BalanceEntry {
    pub id: u32,
    pub value: i64,
    pub height: i32,
    pub balance_factor: i32,
    pub balanced: bool,
}

impl AvlTree {
    pub fn new() -> Self {
        AvlTree::default()
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

    /// Insert `value` and rebalance; `None` for a duplicate.
    pub fn insert(&mut self, value: i64) -> Option<u32> {
        let id = ordered::insert(&mut self.arena, &mut self.root, &mut self.log, value)?;
        self.size += 1;
        self.rebalance(Some(id));
        Some(id)
    }

    /// Delete `value` and rebalance from the deepest changed ancestor.
    pub fn delete(&mut self, value: i64) -> bool {
        let (removed, rebalance_from) =
            ordered::delete(&mut self.arena, &mut self.root, &mut self.log, value);
        if removed {
            self.size -= 1;
            self.rebalance(rebalance_from);
            traverse::calculate_height(&mut self.arena, self.root);
            traverse::update_depths(&mut self.arena, self.root, 0);
        }
        removed
    }

    pub fn search(&mut self, value: i64) -> Option<u32> {
        ordered::search(&self.arena, self.root, &mut self.log, value)
    }

    pub fn find_min(&mut self) -> Option<i64> {
        ordered::scan(&self.arena, self.root, &mut self.log, ScanKind::FindMin)
    }

    pub fn find_max(&mut self) -> Option<i64> {
        ordered::scan(&self.arena, self.root, &mut self.log, ScanKind::FindMax)
    }

    /// Replace `old_value` by `new_value` (delete + reinsert, rebalanced).
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

    fn height_of(&self, node: Option<u32>) -> i32 {
        node.map(|n| self.arena[n as usize].height).unwrap_or(-1)
    }

    /// Refresh one node's cached height and balance factor from its
    /// children and log the new values.
    fn update_height_and_balance(&mut self, n: u32) {
        let lh = self.height_of(self.arena[n as usize].l);
        let rh = self.height_of(self.arena[n as usize].r);
        let slot = &mut self.arena[n as usize];
        slot.height = 1 + lh.max(rh);
        slot.balance_factor = lh - rh;
        self.log.push(StepRecord::BalanceUpdate {
            node: n,
            value: self.arena[n as usize].value,
            height: self.arena[n as usize].height,
            balance_factor: self.arena[n as usize].balance_factor,
        });
    }

    /// Walk from `start` to the root, refreshing metrics and rotating
    /// wherever a balance factor leaves ±1. After a rotation the walk
    /// continues from the new subtree root's parent.
    fn rebalance(&mut self, start: Option<u32>) {
        let mut node = start;
        while let Some(n) = node {
            self.update_height_and_balance(n);
            let bf = self.arena[n as usize].balance_factor;
            let subtree_root = if bf > 1 {
                let l = match self.arena[n as usize].l {
                    Some(l) => l,
                    None => break,
                };
                if self.arena[l as usize].balance_factor >= 0 {
                    self.log.push(StepRecord::Rotation {
                        rotation: Rotation::Right,
                        node: Some(n),
                        pivot: None,
                        new_root: None,
                        reason: Some("Left-Left case".to_owned()),
                    });
                    self.rotate_right(n)
                } else {
                    self.log.push(StepRecord::Rotation {
                        rotation: Rotation::LeftRight,
                        node: Some(n),
                        pivot: None,
                        new_root: None,
                        reason: Some("Left-Right case".to_owned()),
                    });
                    self.rotate_left(l);
                    self.rotate_right(n)
                }
            } else if bf < -1 {
                let r = match self.arena[n as usize].r {
                    Some(r) => r,
                    None => break,
                };
                if self.arena[r as usize].balance_factor <= 0 {
                    self.log.push(StepRecord::Rotation {
                        rotation: Rotation::Left,
                        node: Some(n),
                        pivot: None,
                        new_root: None,
                        reason: Some("Right-Right case".to_owned()),
                    });
                    self.rotate_left(n)
                } else {
                    self.log.push(StepRecord::Rotation {
                        rotation: Rotation::RightLeft,
                        node: Some(n),
                        pivot: None,
                        new_root: None,
                        reason: Some("Right-Left case".to_owned()),
                    });
                    self.rotate_right(r);
                    self.rotate_left(n)
                }
            } else {
                n
            };
            node = self.arena[subtree_root as usize].p;
        }
    }

    /// Right rotation about `pivot`; the pivot's left child becomes the
    /// subtree root. Heights are refreshed pivot first, then new root.
    fn rotate_right(&mut self, pivot: u32) -> u32 {
        let new_root = match self.arena[pivot as usize].l {
            Some(l) => l,
            None => return pivot,
        };
        let moved = self.arena[new_root as usize].r;
        self.arena[pivot as usize].l = moved;
        if let Some(m) = moved {
            self.arena[m as usize].p = Some(pivot);
        }
        self.relink(pivot, new_root);
        self.arena[new_root as usize].r = Some(pivot);
        self.arena[pivot as usize].p = Some(new_root);
        self.update_height_and_balance(pivot);
        self.update_height_and_balance(new_root);
        self.log.push(StepRecord::RotationComplete {
            rotation: Rotation::Right,
            pivot,
            new_root,
        });
        new_root
    }

    /// Left rotation about `pivot`; mirror of [`AvlTree::rotate_right`].
    fn rotate_left(&mut self, pivot: u32) -> u32 {
        let new_root = match self.arena[pivot as usize].r {
            Some(r) => r,
            None => return pivot,
        };
        let moved = self.arena[new_root as usize].l;
        self.arena[pivot as usize].r = moved;
        if let Some(m) = moved {
            self.arena[m as usize].p = Some(pivot);
        }
        self.relink(pivot, new_root);
        self.arena[new_root as usize].l = Some(pivot);
        self.arena[pivot as usize].p = Some(new_root);
        self.update_height_and_balance(pivot);
        self.update_height_and_balance(new_root);
        self.log.push(StepRecord::RotationComplete {
            rotation: Rotation::Left,
            pivot,
            new_root,
        });
        new_root
    }

    /// Put `new_root` into the parent slot `pivot` used to occupy.
    fn relink(&mut self, pivot: u32, new_root: u32) {
        let parent = self.arena[pivot as usize].p;
        self.arena[new_root as usize].p = parent;
        match parent {
            None => self.root = Some(new_root),
            Some(p) => {
                if self.arena[p as usize].l == Some(pivot) {
                    self.arena[p as usize].l = Some(new_root);
                } else {
                    self.arena[p as usize].r = Some(new_root);
                }
            }
        }
    }

    /// In-order listing of every node's balance bookkeeping.
    pub fn balance_factors(&self) -> Vec<BalanceEntry> {
        let mut out = Vec::new();
        self.collect_balance(self.root, &mut out);
        out
    }

    fn collect_balance(&self, node: Option<u32>, out: &mut Vec<BalanceEntry>) {
        let Some(n) = node else { return };
        self.collect_balance(self.arena[n as usize].l, out);
        let slot = &self.arena[n as usize];
        out.push(BalanceEntry {
            id: n,
            value: slot.value,
            height: slot.height,
            balance_factor: slot.balance_factor,
            balanced: slot.balance_factor.abs() <= 1,
        });
        self.collect_balance(self.arena[n as usize].r, out);
    }

    /// Largest absolute balance factor; 0 for an empty tree.
    pub fn max_balance_factor(&self) -> i32 {
        self.balance_factors()
            .iter()
            .map(|e| e.balance_factor.abs())
            .max()
            .unwrap_or(0)
    }

    /// Nodes currently outside ±1. Empty for a well-formed AVL tree.
    pub fn unbalanced_nodes(&self) -> Vec<BalanceEntry> {
        self.balance_factors()
            .into_iter()
            .filter(|e| !e.balanced)
            .collect()
    }

    /// Every rotation record logged so far, oldest first.
    pub fn rotation_history(&self) -> Vec<StepRecord> {
        self.log
            .records()
            .iter()
            .filter(|r| {
                matches!(
                    r,
                    StepRecord::Rotation { .. } | StepRecord::RotationComplete { .. }
                )
            })
            .cloned()
            .collect()
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

impl Structure for AvlTree {
    fn kind(&self) -> StructureKind {
        StructureKind::Avl
    }

    fn size(&self) -> usize {
        self.size
    }

    fn stats(&mut self) -> TreeStats {
        node::binary_stats(&mut self.arena, self.root, StructureKind::Avl, self.size)
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
