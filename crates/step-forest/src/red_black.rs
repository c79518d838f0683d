//! Red-black tree.
//!
//! Links are plain `Option<u32>`; `None` is the black nil leaf, so there
//! is no sentinel node to mutate. Because the doubly-black position after
//! a delete may be that nil leaf, the fixup carries it as (parent, side)
//! rather than a node index.

use serde::Serialize;

use crate::contract::Structure;
use crate::error::Violation;
use crate::log::{
    DeleteFixupStep, DeleteStep, FixupStep, OpLog, Rotation, ScanKind, Side, StepRecord,
    UpdateStep,
};
use crate::node::{self, TreeNode};
use crate::ordered;
use crate::snapshot::{Snapshot, StructureKind, TreeStats};
use crate::traverse;

#[derive(Clone, Debug, Default)]
pub struct RbTree {
    arena: Vec<TreeNode>,
    root: Option<u32>,
    size: usize,
    log: OpLog,
}

/// One node's color, as listed by [`RbTree::node_colors`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NodeColor {
    pub id: u32,
    pub value: i64,
    pub red: bool,
}

impl RbTree {
    pub fn new() -> Self {
        RbTree::default()
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

    pub fn is_red(&self, id: u32) -> Option<bool> {
        self.arena.get(id as usize).map(|n| n.red)
    }

    /// Insert `value` as a red node, then repair; `None` for a duplicate.
    pub fn insert(&mut self, value: i64) -> Option<u32> {
        let id = ordered::insert(&mut self.arena, &mut self.root, &mut self.log, value)?;
        self.size += 1;
        self.arena[id as usize].red = true;
        self.insert_fixup(id);
        Some(id)
    }

    fn red(&self, node: Option<u32>) -> bool {
        node.map(|n| self.arena[n as usize].red).unwrap_or(false)
    }

    fn insert_fixup(&mut self, mut n: u32) {
        loop {
            let Some(p) = self.arena[n as usize].p else {
                break;
            };
            if !self.arena[p as usize].red {
                break;
            }
            // A red parent is never the root, so the grandparent exists.
            let Some(g) = self.arena[p as usize].p else {
                break;
            };
            let parent_is_left = self.arena[g as usize].l == Some(p);
            let uncle = if parent_is_left {
                self.arena[g as usize].r
            } else {
                self.arena[g as usize].l
            };
            if self.red(uncle) {
                self.log.push(StepRecord::InsertFixup {
                    step: FixupStep::RecolorUncle,
                    node: n,
                    parent: Some(p),
                    uncle,
                    grandparent: Some(g),
                });
                self.arena[p as usize].red = false;
                if let Some(u) = uncle {
                    self.arena[u as usize].red = false;
                }
                self.arena[g as usize].red = true;
                n = g;
                continue;
            }
            let inner = if parent_is_left {
                self.arena[p as usize].r == Some(n)
            } else {
                self.arena[p as usize].l == Some(n)
            };
            if inner {
                self.log.push(StepRecord::InsertFixup {
                    step: FixupStep::RotateInner,
                    node: n,
                    parent: Some(p),
                    uncle: None,
                    grandparent: Some(g),
                });
                n = p;
                if parent_is_left {
                    self.rotate_left(n);
                } else {
                    self.rotate_right(n);
                }
            }
            // Outer case: recolor then rotate the grandparent.
            let p = match self.arena[n as usize].p {
                Some(p) => p,
                None => break,
            };
            let g = match self.arena[p as usize].p {
                Some(g) => g,
                None => break,
            };
            self.log.push(StepRecord::InsertFixup {
                step: FixupStep::RotateOuter,
                node: n,
                parent: Some(p),
                uncle: None,
                grandparent: Some(g),
            });
            self.arena[p as usize].red = false;
            self.arena[g as usize].red = true;
            if parent_is_left {
                self.rotate_right(g);
            } else {
                self.rotate_left(g);
            }
        }
        if let Some(r) = self.root {
            if self.arena[r as usize].red {
                self.arena[r as usize].red = false;
            }
            self.log.push(StepRecord::InsertFixup {
                step: FixupStep::RootBlack,
                node: r,
                parent: None,
                uncle: None,
                grandparent: None,
            });
        }
    }

    /// Delete `value` via structural transplant, repairing black heights
    /// when a black node was removed.
    pub fn delete(&mut self, value: i64) -> bool {
        let Some(z) = traverse::find_node(&self.arena, self.root, value) else {
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
        self.log.push(StepRecord::Delete {
            value,
            step: DeleteStep::Found,
            node: Some(z),
            current: None,
            comparison: None,
            successor: None,
            replacement: None,
        });
        self.remove_node(z, value);
        self.size -= 1;
        traverse::calculate_height(&mut self.arena, self.root);
        traverse::update_depths(&mut self.arena, self.root, 0);
        true
    }

    fn remove_node(&mut self, z: u32, value: i64) {
        let mut removed_red = self.arena[z as usize].red;
        let fix_pos: Option<(u32, Side)>;
        let x: Option<u32>;

        let zl = self.arena[z as usize].l;
        let zr = self.arena[z as usize].r;
        match (zl, zr) {
            (_, None) | (None, _) => {
                // Zero or one child: the child (possibly nil) takes z's slot.
                let child = zl.or(zr);
                fix_pos = self.slot_of(z);
                self.transplant(z, child);
                x = child;
            }
            (Some(_), Some(r)) => {
                // Two children: the in-order successor takes z's place and
                // inherits its color; the repair happens where the
                // successor used to hang.
                let y = traverse::find_min(&self.arena, Some(r)).unwrap_or(r);
                self.log.push(StepRecord::Delete {
                    value,
                    step: DeleteStep::FindSuccessor,
                    node: Some(y),
                    current: None,
                    comparison: None,
                    successor: Some(self.arena[y as usize].value),
                    replacement: None,
                });
                removed_red = self.arena[y as usize].red;
                x = self.arena[y as usize].r;
                if self.arena[y as usize].p == Some(z) {
                    fix_pos = Some((y, Side::Right));
                } else {
                    // y is the leftmost node of a deeper subtree.
                    let yp = match self.arena[y as usize].p {
                        Some(p) => p,
                        None => return,
                    };
                    fix_pos = Some((yp, Side::Left));
                    let yr = self.arena[y as usize].r;
                    self.transplant(y, yr);
                    self.arena[y as usize].r = Some(r);
                    self.arena[r as usize].p = Some(y);
                }
                self.transplant(z, Some(y));
                let zl = self.arena[z as usize].l;
                self.arena[y as usize].l = zl;
                if let Some(l) = zl {
                    self.arena[l as usize].p = Some(y);
                }
                self.arena[y as usize].red = self.arena[z as usize].red;
            }
        }

        if !removed_red {
            self.delete_fixup(x, fix_pos);
        }
    }

    /// (parent, side) of `z`, or `None` when `z` is the root.
    fn slot_of(&self, z: u32) -> Option<(u32, Side)> {
        let p = self.arena[z as usize].p?;
        let side = if self.arena[p as usize].l == Some(z) {
            Side::Left
        } else {
            Side::Right
        };
        Some((p, side))
    }

    /// Replace the subtree rooted at `u` by the subtree rooted at `v`.
    fn transplant(&mut self, u: u32, v: Option<u32>) {
        match self.arena[u as usize].p {
            None => self.root = v,
            Some(p) => {
                if self.arena[p as usize].l == Some(u) {
                    self.arena[p as usize].l = v;
                } else {
                    self.arena[p as usize].r = v;
                }
            }
        }
        if let Some(v) = v {
            self.arena[v as usize].p = self.arena[u as usize].p;
        }
    }

    /// Restore the equal-black-height property after a black removal.
    /// `x` is the doubly-black node, `fix_pos` its (parent, side); `x` is
    /// `None` when the doubly-black position is a nil leaf.
    fn delete_fixup(&mut self, mut x: Option<u32>, mut fix_pos: Option<(u32, Side)>) {
        loop {
            let Some((p, side)) = fix_pos else {
                break; // x is the root
            };
            if self.red(x) {
                break;
            }
            let is_left = side == Side::Left;
            let sibling = if is_left {
                self.arena[p as usize].r
            } else {
                self.arena[p as usize].l
            };
            // A doubly-black node in a valid tree always has a sibling.
            let Some(mut s) = sibling else {
                break;
            };
            if self.arena[s as usize].red {
                self.log.push(StepRecord::DeleteFixup {
                    step: DeleteFixupStep::SiblingRed,
                    node: x,
                    parent: p,
                    sibling: s,
                });
                self.arena[s as usize].red = false;
                self.arena[p as usize].red = true;
                if is_left {
                    self.rotate_left(p);
                } else {
                    self.rotate_right(p);
                }
                s = match if is_left {
                    self.arena[p as usize].r
                } else {
                    self.arena[p as usize].l
                } {
                    Some(s) => s,
                    None => break,
                };
            }
            let near = if is_left {
                self.arena[s as usize].l
            } else {
                self.arena[s as usize].r
            };
            let far = if is_left {
                self.arena[s as usize].r
            } else {
                self.arena[s as usize].l
            };
            if !self.red(near) && !self.red(far) {
                self.log.push(StepRecord::DeleteFixup {
                    step: DeleteFixupStep::SiblingChildrenBlack,
                    node: x,
                    parent: p,
                    sibling: s,
                });
                self.arena[s as usize].red = true;
                x = Some(p);
                fix_pos = self.slot_of(p);
                continue;
            }
            if !self.red(far) {
                // Near child red: rotate at the sibling to expose a red
                // far child.
                self.log.push(StepRecord::DeleteFixup {
                    step: DeleteFixupStep::SiblingNearRed,
                    node: x,
                    parent: p,
                    sibling: s,
                });
                if let Some(nr) = near {
                    self.arena[nr as usize].red = false;
                }
                self.arena[s as usize].red = true;
                if is_left {
                    self.rotate_right(s);
                } else {
                    self.rotate_left(s);
                }
                s = match if is_left {
                    self.arena[p as usize].r
                } else {
                    self.arena[p as usize].l
                } {
                    Some(s) => s,
                    None => break,
                };
            }
            self.log.push(StepRecord::DeleteFixup {
                step: DeleteFixupStep::SiblingFarRed,
                node: x,
                parent: p,
                sibling: s,
            });
            self.arena[s as usize].red = self.arena[p as usize].red;
            self.arena[p as usize].red = false;
            let far = if is_left {
                self.arena[s as usize].r
            } else {
                self.arena[s as usize].l
            };
            if let Some(f) = far {
                self.arena[f as usize].red = false;
            }
            if is_left {
                self.rotate_left(p);
            } else {
                self.rotate_right(p);
            }
            x = self.root;
            break;
        }
        if let Some(x) = x {
            self.arena[x as usize].red = false;
        }
    }

    fn rotate_left(&mut self, pivot: u32) {
        let Some(new_root) = self.arena[pivot as usize].r else {
            return;
        };
        let moved = self.arena[new_root as usize].l;
        self.arena[pivot as usize].r = moved;
        if let Some(m) = moved {
            self.arena[m as usize].p = Some(pivot);
        }
        self.relink(pivot, new_root);
        self.arena[new_root as usize].l = Some(pivot);
        self.arena[pivot as usize].p = Some(new_root);
        self.log.push(StepRecord::Rotation {
            rotation: Rotation::Left,
            node: None,
            pivot: Some(pivot),
            new_root: Some(new_root),
            reason: None,
        });
    }

    fn rotate_right(&mut self, pivot: u32) {
        let Some(new_root) = self.arena[pivot as usize].l else {
            return;
        };
        let moved = self.arena[new_root as usize].r;
        self.arena[pivot as usize].l = moved;
        if let Some(m) = moved {
            self.arena[m as usize].p = Some(pivot);
        }
        self.relink(pivot, new_root);
        self.arena[new_root as usize].r = Some(pivot);
        self.arena[pivot as usize].p = Some(new_root);
        self.log.push(StepRecord::Rotation {
            rotation: Rotation::Right,
            node: None,
            pivot: Some(pivot),
            new_root: Some(new_root),
            reason: None,
        });
    }

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

    pub fn search(&mut self, value: i64) -> Option<u32> {
        ordered::search(&self.arena, self.root, &mut self.log, value)
    }

    pub fn find_min(&mut self) -> Option<i64> {
        ordered::scan(&self.arena, self.root, &mut self.log, ScanKind::FindMin)
    }

    pub fn find_max(&mut self) -> Option<i64> {
        ordered::scan(&self.arena, self.root, &mut self.log, ScanKind::FindMax)
    }

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

    /// Every violated red-black property, empty for a well-formed tree:
    /// root must be black, no red node has a red child, every root-to-nil
    /// path carries the same number of black nodes.
    pub fn check_red_black_properties(&self) -> Vec<Violation> {
        let mut out = Vec::new();
        let Some(root) = self.root else {
            return out;
        };
        if self.arena[root as usize].red {
            out.push(Violation::new("root_black", Some(root)));
        }
        self.check_red_red(root, &mut out);
        let mut heights = Vec::new();
        self.collect_black_heights(Some(root), 0, &mut heights);
        heights.sort_unstable();
        heights.dedup();
        if heights.len() > 1 {
            out.push(Violation::new("black_height", Some(root)));
        }
        out
    }

    fn check_red_red(&self, n: u32, out: &mut Vec<Violation>) {
        if self.arena[n as usize].red {
            for child in [self.arena[n as usize].l, self.arena[n as usize].r]
                .into_iter()
                .flatten()
            {
                if self.arena[child as usize].red {
                    out.push(Violation::new("red_red", Some(child)));
                }
            }
        }
        if let Some(l) = self.arena[n as usize].l {
            self.check_red_red(l, out);
        }
        if let Some(r) = self.arena[n as usize].r {
            self.check_red_red(r, out);
        }
    }

    fn collect_black_heights(&self, node: Option<u32>, blacks: u32, out: &mut Vec<u32>) {
        let Some(n) = node else {
            out.push(blacks + 1); // the nil leaf is black
            return;
        };
        let blacks = if self.arena[n as usize].red {
            blacks
        } else {
            blacks + 1
        };
        self.collect_black_heights(self.arena[n as usize].l, blacks, out);
        self.collect_black_heights(self.arena[n as usize].r, blacks, out);
    }

    pub fn is_valid(&self) -> bool {
        self.check_red_black_properties().is_empty()
    }

    /// In-order listing of node colors.
    pub fn node_colors(&self) -> Vec<NodeColor> {
        let mut out = Vec::new();
        self.collect_colors(self.root, &mut out);
        out
    }

    fn collect_colors(&self, node: Option<u32>, out: &mut Vec<NodeColor>) {
        let Some(n) = node else { return };
        self.collect_colors(self.arena[n as usize].l, out);
        out.push(NodeColor {
            id: n,
            value: self.arena[n as usize].value,
            red: self.arena[n as usize].red,
        });
        self.collect_colors(self.arena[n as usize].r, out);
    }

    /// (red, black) node counts.
    pub fn color_counts(&self) -> (usize, usize) {
        let colors = self.node_colors();
        let red = colors.iter().filter(|c| c.red).count();
        (red, colors.len() - red)
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

impl Structure for RbTree {
    fn kind(&self) -> StructureKind {
        StructureKind::RedBlack
    }

    fn size(&self) -> usize {
        self.size
    }

    fn stats(&mut self) -> TreeStats {
        node::binary_stats(
            &mut self.arena,
            self.root,
            StructureKind::RedBlack,
            self.size,
        )
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
