//! Serializable tree snapshots and summary statistics.
//!
//! These types are the whole contract a rendering adapter sees: engines
//! produce them on demand and never hand out arena internals.

use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Color {
    Red,
    Black,
}

/// Which engine produced a snapshot or stats record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StructureKind {
    BinaryTree,
    Bst,
    Avl,
    RedBlack,
    MinHeap,
    MaxHeap,
    Btree,
    Trie,
}

/// One node of a binary-shaped snapshot (also used for the heap's derived
/// display tree, where `id` is the array index).
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NodeSnapshot {
    pub id: u32,
    pub value: i64,
    pub depth: u32,
    pub height: i32,
    pub balance_factor: i32,
    pub color: Color,
    pub is_leaf: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left: Option<Box<NodeSnapshot>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub right: Option<Box<NodeSnapshot>>,
}

/// One node of a multi-way (B-tree) snapshot.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BTreeSnapshot {
    pub id: u32,
    pub keys: Vec<i64>,
    pub leaf: bool,
    pub depth: u32,
    pub children: Vec<BTreeSnapshot>,
}

/// One node of a trie snapshot. The root carries no character.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TrieSnapshot {
    pub id: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ch: Option<char>,
    pub end_of_word: bool,
    pub depth: u32,
    pub children: Vec<TrieSnapshot>,
}

/// Umbrella over the three snapshot layouts, tagged so adapters can
/// dispatch without knowing the concrete engine.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "layout", rename_all = "snake_case")]
pub enum Snapshot {
    Binary { root: NodeSnapshot },
    MultiWay { root: BTreeSnapshot },
    Trie { root: TrieSnapshot },
}

/// Kind-independent summary. `height` is −1 for an empty structure.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TreeStats {
    pub kind: StructureKind,
    pub size: usize,
    pub height: i32,
    pub is_balanced: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_value: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_value: Option<i64>,
}
