//! Render-command emission.
//!
//! A [`Snapshot`] flattens into draw-node/draw-edge commands; a
//! [`StepRecord`] becomes a highlight plus a status line. What a frontend
//! does with these (layout, animation, timing) is its own business.

use serde::Serialize;
use step_forest::log::{
    BtreeDeleteStep, BtreeInsertStep, BtreeSearchStep, BuildStep, DeleteFixupStep, DeleteStep,
    ExtractStep, FixupStep, InsertStep, Rotation, ScanStep, SearchStep, TrieDeleteStep,
    TrieInsertStep, TrieQueryStep, TrieSearchStep, UpdateStep,
};
use step_forest::snapshot::{BTreeSnapshot, NodeSnapshot, TrieSnapshot};
use step_forest::{Color, Snapshot, StepRecord};

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum RenderCommand {
    DrawNode {
        id: u32,
        label: String,
        depth: u32,
        color: Color,
        emphasized: bool,
    },
    DrawEdge {
        from: u32,
        to: u32,
    },
    Highlight {
        id: u32,
    },
    Status {
        text: String,
    },
}

/// Flatten a snapshot into draw commands, parents before children.
pub fn render(snapshot: &Snapshot) -> Vec<RenderCommand> {
    let mut out = Vec::new();
    match snapshot {
        Snapshot::Binary { root } => render_binary(root, &mut out),
        Snapshot::MultiWay { root } => render_multiway(root, &mut out),
        Snapshot::Trie { root } => render_trie(root, &mut out),
    }
    out
}

fn render_binary(node: &NodeSnapshot, out: &mut Vec<RenderCommand>) {
    out.push(RenderCommand::DrawNode {
        id: node.id,
        label: node.value.to_string(),
        depth: node.depth,
        color: node.color,
        emphasized: false,
    });
    for child in [&node.left, &node.right].into_iter().flatten() {
        out.push(RenderCommand::DrawEdge {
            from: node.id,
            to: child.id,
        });
        render_binary(child, out);
    }
}

fn render_multiway(node: &BTreeSnapshot, out: &mut Vec<RenderCommand>) {
    let label = node
        .keys
        .iter()
        .map(|k| k.to_string())
        .collect::<Vec<_>>()
        .join(" | ");
    out.push(RenderCommand::DrawNode {
        id: node.id,
        label,
        depth: node.depth,
        color: Color::Black,
        emphasized: false,
    });
    for child in &node.children {
        out.push(RenderCommand::DrawEdge {
            from: node.id,
            to: child.id,
        });
        render_multiway(child, out);
    }
}

fn render_trie(node: &TrieSnapshot, out: &mut Vec<RenderCommand>) {
    out.push(RenderCommand::DrawNode {
        id: node.id,
        label: node.ch.map(String::from).unwrap_or_else(|| "·".to_owned()),
        depth: node.depth,
        color: Color::Black,
        emphasized: node.end_of_word,
    });
    for child in &node.children {
        out.push(RenderCommand::DrawEdge {
            from: node.id,
            to: child.id,
        });
        render_trie(child, out);
    }
}

/// Turn one step record into a highlight (when a node is involved) plus a
/// human-readable status line.
pub fn narrate(step: &StepRecord) -> Vec<RenderCommand> {
    let mut out = Vec::new();
    if let Some(id) = highlight_target(step) {
        out.push(RenderCommand::Highlight { id });
    }
    out.push(RenderCommand::Status {
        text: describe(step),
    });
    out
}

fn highlight_target(step: &StepRecord) -> Option<u32> {
    match step {
        StepRecord::Insert { node, current, .. }
        | StepRecord::Delete { node, current, .. }
        | StepRecord::Search { node, current, .. }
        | StepRecord::Scan { node, current, .. } => node.or(*current),
        StepRecord::Update { node, .. } => *node,
        StepRecord::BalanceUpdate { node, .. } => Some(*node),
        StepRecord::Rotation { node, pivot, .. } => node.or(*pivot),
        StepRecord::RotationComplete { new_root, .. } => Some(*new_root),
        StepRecord::InsertFixup { node, .. } => Some(*node),
        StepRecord::DeleteFixup { sibling, .. } => Some(*sibling),
        StepRecord::BtreeSearch { node, .. } => Some(*node),
        StepRecord::BtreeInsert { node, .. } | StepRecord::BtreeDelete { node, .. } => *node,
        StepRecord::BtreeSplit { new_sibling, .. } => Some(*new_sibling),
        StepRecord::BtreeBorrow { node, .. } => Some(*node),
        StepRecord::BtreeMerge { left, .. } => Some(*left),
        StepRecord::TrieInsert { node, .. }
        | StepRecord::TrieSearch { node, .. }
        | StepRecord::TrieDelete { node, .. } => *node,
        StepRecord::HeapInsert { .. }
        | StepRecord::Extract { .. }
        | StepRecord::Swap { .. }
        | StepRecord::HeapifyUp { .. }
        | StepRecord::HeapifyDown { .. }
        | StepRecord::BuildHeap { .. }
        | StepRecord::HeapDelete { .. }
        | StepRecord::HeapUpdate { .. }
        | StepRecord::HeapSearch { .. }
        | StepRecord::TrieQuery { .. } => None,
    }
}

fn describe(step: &StepRecord) -> String {
    match step {
        StepRecord::Insert {
            value,
            step,
            comparison,
            ..
        } => {
            let action = match step {
                InsertStep::CreateRoot => "created root".to_owned(),
                InsertStep::TraverseLeft => "going left".to_owned(),
                InsertStep::TraverseRight => "going right".to_owned(),
                InsertStep::InsertLeft => "inserted as left child".to_owned(),
                InsertStep::InsertRight => "inserted as right child".to_owned(),
                InsertStep::Duplicate => "duplicate, rejected".to_owned(),
            };
            match comparison {
                Some(c) => format!("insert {value}: {action} ({c})"),
                None => format!("insert {value}: {action}"),
            }
        }
        StepRecord::Delete {
            value,
            step,
            successor,
            replacement,
            ..
        } => {
            let action = match step {
                DeleteStep::NotFound => "not found".to_owned(),
                DeleteStep::TraverseLeft => "going left".to_owned(),
                DeleteStep::TraverseRight => "going right".to_owned(),
                DeleteStep::Found => "found target".to_owned(),
                DeleteStep::DeleteLeaf => "removed leaf".to_owned(),
                DeleteStep::ReplaceRight => format!(
                    "replaced by right child {}",
                    replacement.unwrap_or_default()
                ),
                DeleteStep::ReplaceLeft => {
                    format!("replaced by left child {}", replacement.unwrap_or_default())
                }
                DeleteStep::FindSuccessor => {
                    format!("in-order successor is {}", successor.unwrap_or_default())
                }
                DeleteStep::DeleteSuccessor => "removed successor".to_owned(),
                DeleteStep::DeleteRoot => "removed root".to_owned(),
                DeleteStep::ReplaceAndDelete => format!(
                    "swapped with last node {} and removed it",
                    replacement.unwrap_or_default()
                ),
            };
            format!("delete {value}: {action}")
        }
        StepRecord::Search {
            value, step, found, ..
        } => match step {
            SearchStep::TraverseLeft => format!("search {value}: going left"),
            SearchStep::TraverseRight => format!("search {value}: going right"),
            SearchStep::Found => format!("search {value}: found"),
            SearchStep::NotFound => format!("search {value}: not found"),
            SearchStep::Complete => format!(
                "search {value}: {}",
                if found.unwrap_or(false) {
                    "present"
                } else {
                    "absent"
                }
            ),
        },
        StepRecord::Update {
            old_value,
            new_value,
            step,
            ..
        } => match step {
            UpdateStep::NotFound => format!("update {old_value} -> {new_value}: not found"),
            UpdateStep::Duplicate => {
                format!("update {old_value} -> {new_value}: new value already present")
            }
            UpdateStep::Complete => format!("updated {old_value} -> {new_value}"),
        },
        StepRecord::Scan { op, step, value, .. } => {
            let what = match op {
                step_forest::log::ScanKind::FindMin => "min",
                step_forest::log::ScanKind::FindMax => "max",
            };
            match step {
                ScanStep::Traverse => format!("find {what}: descending"),
                ScanStep::Found => format!("{what} is {}", value.unwrap_or_default()),
                ScanStep::Empty => format!("find {what}: tree is empty"),
            }
        }
        StepRecord::BalanceUpdate {
            value,
            height,
            balance_factor,
            ..
        } => format!("node {value}: height {height}, balance factor {balance_factor}"),
        StepRecord::Rotation {
            rotation, reason, ..
        } => {
            let name = rotation_name(*rotation);
            match reason {
                Some(r) => format!("{name} rotation ({r})"),
                None => format!("{name} rotation"),
            }
        }
        StepRecord::RotationComplete {
            rotation,
            pivot,
            new_root,
        } => format!(
            "{} rotation done: node {new_root} now above node {pivot}",
            rotation_name(*rotation)
        ),
        StepRecord::InsertFixup { step, .. } => match step {
            FixupStep::RecolorUncle => "red uncle: recolor and move up".to_owned(),
            FixupStep::RotateInner => "inner child: pre-rotate at parent".to_owned(),
            FixupStep::RotateOuter => "outer child: recolor and rotate grandparent".to_owned(),
            FixupStep::RootBlack => "root colored black".to_owned(),
        },
        StepRecord::DeleteFixup { step, .. } => match step {
            DeleteFixupStep::SiblingRed => "sibling red: rotate toward it".to_owned(),
            DeleteFixupStep::SiblingChildrenBlack => {
                "sibling's children black: recolor, move up".to_owned()
            }
            DeleteFixupStep::SiblingNearRed => "near nephew red: rotate sibling".to_owned(),
            DeleteFixupStep::SiblingFarRed => "far nephew red: final rotation".to_owned(),
        },
        StepRecord::HeapInsert { value, index } => {
            format!("appended {value} at index {index}")
        }
        StepRecord::Extract { step, value, .. } => match step {
            ExtractStep::EmptyHeap => "extract: heap is empty".to_owned(),
            ExtractStep::ExtractRoot => format!("extracted {}", value.unwrap_or_default()),
            ExtractStep::ReplaceRoot => format!(
                "extracted {}, last element moved to root",
                value.unwrap_or_default()
            ),
        },
        StepRecord::Swap {
            a, b, value_a, value_b, ..
        } => format!("swapped indices {a} and {b}: now {value_a} / {value_b}"),
        StepRecord::HeapifyUp {
            value, parent_value, ..
        } => format!("{value} outranks parent {parent_value}: sift up"),
        StepRecord::HeapifyDown {
            value, child_value, ..
        } => format!("{value} below child {child_value}: sift down"),
        StepRecord::BuildHeap { step, values } => match step {
            BuildStep::Start => format!(
                "building heap from {} values",
                values.as_ref().map(Vec::len).unwrap_or_default()
            ),
            BuildStep::Complete => "heap built".to_owned(),
        },
        StepRecord::HeapDelete { index, value } => {
            format!("removed {value} at index {index}")
        }
        StepRecord::HeapUpdate {
            index,
            old_value,
            new_value,
        } => format!("index {index}: {old_value} -> {new_value}"),
        StepRecord::HeapSearch { value, index, .. } => match index {
            Some(i) => format!("{value} found at index {i}"),
            None => format!("{value} not in heap"),
        },
        StepRecord::BtreeSearch {
            key,
            step,
            child_index,
            ..
        } => match step {
            BtreeSearchStep::Found => format!("search {key}: found"),
            BtreeSearchStep::NotFoundLeaf => format!("search {key}: not found at leaf"),
            BtreeSearchStep::TraverseChild => format!(
                "search {key}: descending into child {}",
                child_index.unwrap_or_default()
            ),
        },
        StepRecord::BtreeInsert { key, step, .. } => match step {
            BtreeInsertStep::InsertLeaf => format!("inserted {key} into leaf"),
            BtreeInsertStep::Duplicate => format!("insert {key}: duplicate, rejected"),
            BtreeInsertStep::SplitRoot => "root split: tree grows a level".to_owned(),
            BtreeInsertStep::SplitChild => "node split".to_owned(),
        },
        StepRecord::BtreeSplit { middle_key, .. } => {
            format!("split: {middle_key} promoted to parent")
        }
        StepRecord::BtreeDelete {
            key,
            step,
            separator,
            ..
        } => match step {
            BtreeDeleteStep::NotFound => format!("delete {key}: not found"),
            BtreeDeleteStep::DeleteLeaf => format!("delete {key}: removed from leaf"),
            BtreeDeleteStep::ReplacePredecessor => format!(
                "delete {key}: replaced by predecessor {}",
                separator.unwrap_or_default()
            ),
            BtreeDeleteStep::ReplaceSuccessor => format!(
                "delete {key}: replaced by successor {}",
                separator.unwrap_or_default()
            ),
            BtreeDeleteStep::ShrinkRoot => "empty root removed: tree shrinks a level".to_owned(),
        },
        StepRecord::BtreeBorrow { key, from, .. } => format!(
            "borrowed {key} through the parent from the {} sibling",
            match from {
                step_forest::log::Side::Left => "left",
                step_forest::log::Side::Right => "right",
            }
        ),
        StepRecord::BtreeMerge { separator, .. } => {
            format!("merged siblings around separator {separator}")
        }
        StepRecord::TrieInsert {
            word, step, ch, path, ..
        } => match step {
            TrieInsertStep::EmptyWord => "insert: empty word rejected".to_owned(),
            TrieInsertStep::CreateNode => format!(
                "insert \"{word}\": new node '{}' ({})",
                ch.unwrap_or_default(),
                path.as_deref().unwrap_or_default()
            ),
            TrieInsertStep::TraverseExisting => format!(
                "insert \"{word}\": following '{}'",
                ch.unwrap_or_default()
            ),
            TrieInsertStep::MarkEnd => format!("insert \"{word}\": marked end of word"),
            TrieInsertStep::AlreadyExists => format!("\"{word}\" already stored"),
        },
        StepRecord::TrieSearch { word, step, ch, .. } => match step {
            TrieSearchStep::EmptyWord => "search: empty word".to_owned(),
            TrieSearchStep::Traverse => {
                format!("search \"{word}\": following '{}'", ch.unwrap_or_default())
            }
            TrieSearchStep::CharNotFound => format!(
                "search \"{word}\": no edge for '{}'",
                ch.unwrap_or_default()
            ),
            TrieSearchStep::Found => format!("\"{word}\" found"),
            TrieSearchStep::NotEndOfWord => {
                format!("\"{word}\" is a prefix but not a stored word")
            }
            TrieSearchStep::PrefixFound => format!("prefix \"{word}\" present"),
        },
        StepRecord::TrieDelete { word, step, ch, .. } => match step {
            TrieDeleteStep::EmptyWord => "delete: empty word".to_owned(),
            TrieDeleteStep::WordNotFound => format!("delete \"{word}\": not stored"),
            TrieDeleteStep::UnmarkEnd => format!("delete \"{word}\": unmarked end of word"),
            TrieDeleteStep::PruneNode => format!(
                "delete \"{word}\": pruned node '{}'",
                ch.unwrap_or_default()
            ),
            TrieDeleteStep::Complete => format!("deleted \"{word}\""),
        },
        StepRecord::TrieQuery {
            step,
            prefix,
            pattern,
            count,
        } => match step {
            TrieQueryStep::PrefixNotFound => format!(
                "no words start with \"{}\"",
                prefix.as_deref().unwrap_or_default()
            ),
            TrieQueryStep::FoundWords => format!(
                "{} words start with \"{}\"",
                count.unwrap_or_default(),
                prefix.as_deref().unwrap_or_default()
            ),
            TrieQueryStep::CollectedAll => {
                format!("collected {} words", count.unwrap_or_default())
            }
            TrieQueryStep::FoundMatches => format!(
                "{} words match \"{}\"",
                count.unwrap_or_default(),
                pattern.as_deref().unwrap_or_default()
            ),
            TrieQueryStep::CommonPrefix => format!(
                "longest common prefix is \"{}\"",
                prefix.as_deref().unwrap_or_default()
            ),
        },
    }
}

fn rotation_name(rotation: Rotation) -> &'static str {
    match rotation {
        Rotation::Left => "left",
        Rotation::Right => "right",
        Rotation::LeftRight => "left-right",
        Rotation::RightLeft => "right-left",
    }
}
