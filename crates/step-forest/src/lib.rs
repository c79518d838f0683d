//! Instrumented tree and heap engines with a replayable operation log.
//!
//! Seven classic structures — generic binary tree, BST, AVL, red-black
//! tree, binary heap, B-tree and trie — where every mutation appends
//! [`log::StepRecord`]s describing the decisions the algorithm took, in
//! execution order. A consumer replays them one at a time through
//! [`contract::Structure::next_step`] and renders structural state from
//! the serializable [`snapshot`] types.
//!
//! Nodes live in a `Vec` arena per tree; links are `Option<u32>` indices
//! and the arena index doubles as the node's stable public id.

pub mod avl;
pub mod binary;
pub mod bst;
pub mod btree;
pub mod contract;
pub mod error;
pub mod heap;
pub mod log;
pub mod node;
mod ordered;
pub mod red_black;
pub mod snapshot;
pub mod traverse;
pub mod trie;
pub mod types;

pub use avl::AvlTree;
pub use binary::BinaryTree;
pub use bst::Bst;
pub use btree::BTree;
pub use contract::Structure;
pub use error::{TreeError, Violation};
pub use heap::{Heap, HeapKind};
pub use log::{OpLog, StepRecord};
pub use red_black::RbTree;
pub use snapshot::{Color, Snapshot, StructureKind, TreeStats};
pub use trie::Trie;
