//! Logged ordered-descent operations shared by the search-tree engines
//! (BST, AVL, red-black). Free functions over the arena + root, in the
//! same shape as [`crate::traverse`], but these do append step records.

use crate::log::{DeleteStep, InsertStep, OpLog, ScanKind, ScanStep, SearchStep, StepRecord};
use crate::node::TreeNode;
use crate::traverse;

/// Standard BST attach: `<` left, `>` right, duplicates rejected. Logs
/// one record per comparison plus the final attach (or duplicate) record.
/// Returns the new node's arena index; the caller owns size accounting
/// and any rebalancing.
pub(crate) fn insert(
    arena: &mut Vec<TreeNode>,
    root: &mut Option<u32>,
    log: &mut OpLog,
    value: i64,
) -> Option<u32> {
    let Some(mut current) = *root else {
        let id = alloc(arena, value);
        *root = Some(id);
        log.push(StepRecord::Insert {
            value,
            step: InsertStep::CreateRoot,
            node: Some(id),
            parent: None,
            current: None,
            comparison: None,
        });
        return Some(id);
    };
    loop {
        let cur_value = arena[current as usize].value;
        if value < cur_value {
            match arena[current as usize].l {
                Some(l) => {
                    log.push(StepRecord::Insert {
                        value,
                        step: InsertStep::TraverseLeft,
                        node: None,
                        parent: None,
                        current: Some(current),
                        comparison: Some(format!("{value} < {cur_value}")),
                    });
                    current = l;
                }
                None => {
                    let id = alloc(arena, value);
                    arena[id as usize].p = Some(current);
                    arena[current as usize].l = Some(id);
                    log.push(StepRecord::Insert {
                        value,
                        step: InsertStep::InsertLeft,
                        node: Some(id),
                        parent: Some(current),
                        current: None,
                        comparison: Some(format!("{value} < {cur_value}")),
                    });
                    return Some(id);
                }
            }
        } else if value > cur_value {
            match arena[current as usize].r {
                Some(r) => {
                    log.push(StepRecord::Insert {
                        value,
                        step: InsertStep::TraverseRight,
                        node: None,
                        parent: None,
                        current: Some(current),
                        comparison: Some(format!("{value} > {cur_value}")),
                    });
                    current = r;
                }
                None => {
                    let id = alloc(arena, value);
                    arena[id as usize].p = Some(current);
                    arena[current as usize].r = Some(id);
                    log.push(StepRecord::Insert {
                        value,
                        step: InsertStep::InsertRight,
                        node: Some(id),
                        parent: Some(current),
                        current: None,
                        comparison: Some(format!("{value} > {cur_value}")),
                    });
                    return Some(id);
                }
            }
        } else {
            log.push(StepRecord::Insert {
                value,
                step: InsertStep::Duplicate,
                node: None,
                parent: None,
                current: Some(current),
                comparison: Some(format!("{value} == {cur_value}")),
            });
            return None;
        }
    }
}

fn alloc(arena: &mut Vec<TreeNode>, value: i64) -> u32 {
    let id = arena.len() as u32;
    arena.push(TreeNode::new(value));
    id
}

/// Value-copy BST delete: leaf and single-child nodes are spliced out,
/// a two-children node takes its in-order successor's value and the
/// successor is deleted from the right subtree in turn.
///
/// Returns `(removed, rebalance_from)`, where `rebalance_from` is the
/// parent of the physically unlinked node (the deepest ancestor whose
/// height may have changed).
pub(crate) fn delete(
    arena: &mut Vec<TreeNode>,
    root: &mut Option<u32>,
    log: &mut OpLog,
    value: i64,
) -> (bool, Option<u32>) {
    if traverse::find_node(arena, *root, value).is_none() {
        log.push(not_found(value));
        return (false, None);
    }
    let mut rebalance_from = None;
    let new_root = delete_rec(arena, *root, value, log, &mut rebalance_from);
    *root = new_root;
    if let Some(r) = new_root {
        arena[r as usize].p = None;
    }
    (true, rebalance_from)
}

fn not_found(value: i64) -> StepRecord {
    StepRecord::Delete {
        value,
        step: DeleteStep::NotFound,
        node: None,
        current: None,
        comparison: None,
        successor: None,
        replacement: None,
    }
}

fn delete_rec(
    arena: &mut Vec<TreeNode>,
    node: Option<u32>,
    value: i64,
    log: &mut OpLog,
    rebalance_from: &mut Option<u32>,
) -> Option<u32> {
    let n = node?;
    let node_value = arena[n as usize].value;
    if value != node_value {
        let (step, comparison, child) = if value < node_value {
            (
                DeleteStep::TraverseLeft,
                format!("{value} < {node_value}"),
                arena[n as usize].l,
            )
        } else {
            (
                DeleteStep::TraverseRight,
                format!("{value} > {node_value}"),
                arena[n as usize].r,
            )
        };
        log.push(StepRecord::Delete {
            value,
            step,
            node: None,
            current: Some(n),
            comparison: Some(comparison),
            successor: None,
            replacement: None,
        });
        let new_child = delete_rec(arena, child, value, log, rebalance_from);
        if value < node_value {
            arena[n as usize].l = new_child;
        } else {
            arena[n as usize].r = new_child;
        }
        if let Some(c) = new_child {
            arena[c as usize].p = Some(n);
        }
        return Some(n);
    }
    log.push(StepRecord::Delete {
        value,
        step: DeleteStep::Found,
        node: Some(n),
        current: None,
        comparison: None,
        successor: None,
        replacement: None,
    });
    match (arena[n as usize].l, arena[n as usize].r) {
        (None, None) => {
            *rebalance_from = arena[n as usize].p;
            log.push(StepRecord::Delete {
                value,
                step: DeleteStep::DeleteLeaf,
                node: Some(n),
                current: None,
                comparison: None,
                successor: None,
                replacement: None,
            });
            None
        }
        (None, Some(r)) => {
            *rebalance_from = arena[n as usize].p.or(Some(r));
            log.push(StepRecord::Delete {
                value,
                step: DeleteStep::ReplaceRight,
                node: Some(n),
                current: None,
                comparison: None,
                successor: None,
                replacement: Some(arena[r as usize].value),
            });
            Some(r)
        }
        (Some(l), None) => {
            *rebalance_from = arena[n as usize].p.or(Some(l));
            log.push(StepRecord::Delete {
                value,
                step: DeleteStep::ReplaceLeft,
                node: Some(n),
                current: None,
                comparison: None,
                successor: None,
                replacement: Some(arena[l as usize].value),
            });
            Some(l)
        }
        (Some(_), Some(r)) => {
            let succ = traverse::find_min(arena, Some(r)).unwrap_or(r);
            let succ_value = arena[succ as usize].value;
            log.push(StepRecord::Delete {
                value,
                step: DeleteStep::FindSuccessor,
                node: Some(succ),
                current: None,
                comparison: None,
                successor: Some(succ_value),
                replacement: None,
            });
            arena[n as usize].value = succ_value;
            let new_r = delete_rec(arena, Some(r), succ_value, log, rebalance_from);
            arena[n as usize].r = new_r;
            if let Some(c) = new_r {
                arena[c as usize].p = Some(n);
            }
            log.push(StepRecord::Delete {
                value,
                step: DeleteStep::DeleteSuccessor,
                node: Some(n),
                current: None,
                comparison: None,
                successor: Some(succ_value),
                replacement: None,
            });
            Some(n)
        }
    }
}

/// Ordered lookup, logging each comparison and a final summary record.
pub(crate) fn search(
    arena: &[TreeNode],
    root: Option<u32>,
    log: &mut OpLog,
    value: i64,
) -> Option<u32> {
    let found = search_rec(arena, root, value, log);
    log.push(StepRecord::Search {
        value,
        step: SearchStep::Complete,
        node: found,
        current: None,
        comparison: None,
        found: Some(found.is_some()),
    });
    found
}

fn search_rec(arena: &[TreeNode], node: Option<u32>, value: i64, log: &mut OpLog) -> Option<u32> {
    let Some(n) = node else {
        log.push(StepRecord::Search {
            value,
            step: SearchStep::NotFound,
            node: None,
            current: None,
            comparison: None,
            found: None,
        });
        return None;
    };
    let node_value = arena[n as usize].value;
    if value == node_value {
        log.push(StepRecord::Search {
            value,
            step: SearchStep::Found,
            node: Some(n),
            current: None,
            comparison: Some(format!("{value} == {node_value}")),
            found: None,
        });
        Some(n)
    } else {
        let (step, next) = if value < node_value {
            (SearchStep::TraverseLeft, arena[n as usize].l)
        } else {
            (SearchStep::TraverseRight, arena[n as usize].r)
        };
        log.push(StepRecord::Search {
            value,
            step,
            node: None,
            current: Some(n),
            comparison: Some(if value < node_value {
                format!("{value} < {node_value}")
            } else {
                format!("{value} > {node_value}")
            }),
            found: None,
        });
        search_rec(arena, next, value, log)
    }
}

/// Logged all-left (min) or all-right (max) descent.
pub(crate) fn scan(
    arena: &[TreeNode],
    root: Option<u32>,
    log: &mut OpLog,
    kind: ScanKind,
) -> Option<i64> {
    let Some(mut n) = root else {
        log.push(StepRecord::Scan {
            op: kind,
            step: ScanStep::Empty,
            current: None,
            node: None,
            value: None,
        });
        return None;
    };
    loop {
        let next = match kind {
            ScanKind::FindMin => arena[n as usize].l,
            ScanKind::FindMax => arena[n as usize].r,
        };
        match next {
            Some(c) => {
                log.push(StepRecord::Scan {
                    op: kind,
                    step: ScanStep::Traverse,
                    current: Some(n),
                    node: None,
                    value: None,
                });
                n = c;
            }
            None => {
                let value = arena[n as usize].value;
                log.push(StepRecord::Scan {
                    op: kind,
                    step: ScanStep::Found,
                    current: None,
                    node: Some(n),
                    value: Some(value),
                });
                return Some(value);
            }
        }
    }
}
