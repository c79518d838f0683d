//! Append-only operation log with a replay cursor.
//!
//! Every mutating engine operation appends [`StepRecord`]s describing the
//! decisions the algorithm took, in execution order. Records are immutable
//! once appended; consumers replay them through [`OpLog::next_step`].

use serde::Serialize;

/// Which child of a parent a node occupies, or which sibling is involved.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Left,
    Right,
}

/// Rotation shape. The compound cases announce a double rotation; the
/// mechanics are still logged as two single rotations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Rotation {
    Left,
    Right,
    LeftRight,
    RightLeft,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InsertStep {
    CreateRoot,
    TraverseLeft,
    TraverseRight,
    InsertLeft,
    InsertRight,
    Duplicate,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeleteStep {
    NotFound,
    TraverseLeft,
    TraverseRight,
    Found,
    DeleteLeaf,
    /// Node had only a right child; that child takes its place.
    ReplaceRight,
    /// Node had only a left child; that child takes its place.
    ReplaceLeft,
    FindSuccessor,
    DeleteSuccessor,
    DeleteRoot,
    /// Level-order delete: target value swapped with the last node,
    /// which is then unlinked.
    ReplaceAndDelete,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchStep {
    TraverseLeft,
    TraverseRight,
    Found,
    NotFound,
    Complete,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateStep {
    NotFound,
    /// The replacement value already exists; nothing changed.
    Duplicate,
    Complete,
}

/// Directed min/max descent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanKind {
    FindMin,
    FindMax,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanStep {
    Traverse,
    Found,
    Empty,
}

/// Red-black insert fixup cases.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FixupStep {
    /// Uncle red: recolor parent/uncle black, grandparent red, continue
    /// from the grandparent.
    RecolorUncle,
    /// Inner child: pre-rotate at the parent to reduce to the outer case.
    RotateInner,
    /// Outer child: recolor parent black / grandparent red, rotate the
    /// grandparent.
    RotateOuter,
    /// Root forced black at the end of every insert.
    RootBlack,
}

/// Red-black delete fixup sibling cases.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeleteFixupStep {
    SiblingRed,
    SiblingChildrenBlack,
    /// Sibling black, near child red: rotate at the sibling first.
    SiblingNearRed,
    /// Sibling black, far child red: terminal recolor + rotate.
    SiblingFarRed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractStep {
    EmptyHeap,
    ExtractRoot,
    /// Last element moved to the root before sifting down.
    ReplaceRoot,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildStep {
    Start,
    Complete,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BtreeSearchStep {
    TraverseChild,
    Found,
    NotFoundLeaf,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BtreeInsertStep {
    InsertLeaf,
    Duplicate,
    /// The root itself overflowed; a new root is created above it.
    SplitRoot,
    SplitChild,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BtreeDeleteStep {
    NotFound,
    DeleteLeaf,
    ReplacePredecessor,
    ReplaceSuccessor,
    /// Keyless root replaced by its sole child after a merge.
    ShrinkRoot,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrieInsertStep {
    EmptyWord,
    CreateNode,
    TraverseExisting,
    MarkEnd,
    AlreadyExists,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrieSearchStep {
    EmptyWord,
    Traverse,
    CharNotFound,
    Found,
    NotEndOfWord,
    PrefixFound,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrieDeleteStep {
    EmptyWord,
    WordNotFound,
    UnmarkEnd,
    /// A childless non-terminal node pruned on the way back up.
    PruneNode,
    Complete,
}

/// Summary step for read-only trie queries (prefix listing, full word
/// collection, wildcard matching, longest common prefix).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrieQueryStep {
    PrefixNotFound,
    FoundWords,
    CollectedAll,
    FoundMatches,
    CommonPrefix,
}

/// One logged decision of a mutating (or, for search-style operations,
/// observing) engine operation.
///
/// The serialized form is a tagged object, `{"type": "...", "step": "...",
/// ...fields}`, with absent optional fields omitted. The enum is closed on
/// purpose: renderers match exhaustively and the compiler flags every new
/// record kind they have not handled.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StepRecord {
    Insert {
        value: i64,
        step: InsertStep,
        #[serde(skip_serializing_if = "Option::is_none")]
        node: Option<u32>,
        #[serde(skip_serializing_if = "Option::is_none")]
        parent: Option<u32>,
        #[serde(skip_serializing_if = "Option::is_none")]
        current: Option<u32>,
        #[serde(skip_serializing_if = "Option::is_none")]
        comparison: Option<String>,
    },
    Delete {
        value: i64,
        step: DeleteStep,
        #[serde(skip_serializing_if = "Option::is_none")]
        node: Option<u32>,
        #[serde(skip_serializing_if = "Option::is_none")]
        current: Option<u32>,
        #[serde(skip_serializing_if = "Option::is_none")]
        comparison: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        successor: Option<i64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        replacement: Option<i64>,
    },
    Search {
        value: i64,
        step: SearchStep,
        #[serde(skip_serializing_if = "Option::is_none")]
        node: Option<u32>,
        #[serde(skip_serializing_if = "Option::is_none")]
        current: Option<u32>,
        #[serde(skip_serializing_if = "Option::is_none")]
        comparison: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        found: Option<bool>,
    },
    Update {
        old_value: i64,
        new_value: i64,
        step: UpdateStep,
        #[serde(skip_serializing_if = "Option::is_none")]
        node: Option<u32>,
    },
    Scan {
        op: ScanKind,
        step: ScanStep,
        #[serde(skip_serializing_if = "Option::is_none")]
        current: Option<u32>,
        #[serde(skip_serializing_if = "Option::is_none")]
        node: Option<u32>,
        #[serde(skip_serializing_if = "Option::is_none")]
        value: Option<i64>,
    },
    /// AVL rebalance walk: one ancestor's height/balance factor refreshed.
    BalanceUpdate {
        node: u32,
        value: i64,
        height: i32,
        balance_factor: i32,
    },
    /// Rotation about to happen (AVL announces shape + reason) or a single
    /// red-black rotation (pivot + new subtree root).
    Rotation {
        rotation: Rotation,
        #[serde(skip_serializing_if = "Option::is_none")]
        node: Option<u32>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pivot: Option<u32>,
        #[serde(skip_serializing_if = "Option::is_none")]
        new_root: Option<u32>,
        #[serde(skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
    },
    RotationComplete {
        rotation: Rotation,
        pivot: u32,
        new_root: u32,
    },
    InsertFixup {
        step: FixupStep,
        node: u32,
        #[serde(skip_serializing_if = "Option::is_none")]
        parent: Option<u32>,
        #[serde(skip_serializing_if = "Option::is_none")]
        uncle: Option<u32>,
        #[serde(skip_serializing_if = "Option::is_none")]
        grandparent: Option<u32>,
    },
    DeleteFixup {
        step: DeleteFixupStep,
        /// Doubly-black position; `None` when it is the nil leaf.
        #[serde(skip_serializing_if = "Option::is_none")]
        node: Option<u32>,
        parent: u32,
        sibling: u32,
    },
    HeapInsert {
        value: i64,
        index: usize,
    },
    Extract {
        step: ExtractStep,
        #[serde(skip_serializing_if = "Option::is_none")]
        value: Option<i64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        new_root: Option<i64>,
    },
    /// Values reported post-swap: `value_a` now lives at `a`.
    Swap {
        a: usize,
        b: usize,
        value_a: i64,
        value_b: i64,
    },
    HeapifyUp {
        index: usize,
        parent_index: usize,
        value: i64,
        parent_value: i64,
    },
    HeapifyDown {
        index: usize,
        child_index: usize,
        value: i64,
        child_value: i64,
    },
    BuildHeap {
        step: BuildStep,
        #[serde(skip_serializing_if = "Option::is_none")]
        values: Option<Vec<i64>>,
    },
    HeapDelete {
        index: usize,
        value: i64,
    },
    HeapUpdate {
        index: usize,
        old_value: i64,
        new_value: i64,
    },
    HeapSearch {
        value: i64,
        #[serde(skip_serializing_if = "Option::is_none")]
        index: Option<usize>,
        found: bool,
    },
    BtreeSearch {
        key: i64,
        step: BtreeSearchStep,
        node: u32,
        #[serde(skip_serializing_if = "Option::is_none")]
        position: Option<usize>,
        #[serde(skip_serializing_if = "Option::is_none")]
        child_index: Option<usize>,
    },
    BtreeInsert {
        key: i64,
        step: BtreeInsertStep,
        #[serde(skip_serializing_if = "Option::is_none")]
        node: Option<u32>,
        #[serde(skip_serializing_if = "Option::is_none")]
        position: Option<usize>,
    },
    BtreeSplit {
        node: u32,
        new_sibling: u32,
        parent: u32,
        middle_key: i64,
    },
    BtreeDelete {
        key: i64,
        step: BtreeDeleteStep,
        #[serde(skip_serializing_if = "Option::is_none")]
        node: Option<u32>,
        #[serde(skip_serializing_if = "Option::is_none")]
        separator: Option<i64>,
    },
    /// Underflow repaired by rotating a key through the parent from the
    /// named sibling side.
    BtreeBorrow {
        node: u32,
        sibling: u32,
        parent: u32,
        from: Side,
        key: i64,
    },
    BtreeMerge {
        left: u32,
        right: u32,
        parent: u32,
        separator: i64,
    },
    TrieInsert {
        word: String,
        step: TrieInsertStep,
        #[serde(skip_serializing_if = "Option::is_none")]
        ch: Option<char>,
        #[serde(skip_serializing_if = "Option::is_none")]
        node: Option<u32>,
        #[serde(skip_serializing_if = "Option::is_none")]
        path: Option<String>,
    },
    TrieSearch {
        word: String,
        step: TrieSearchStep,
        #[serde(skip_serializing_if = "Option::is_none")]
        ch: Option<char>,
        #[serde(skip_serializing_if = "Option::is_none")]
        node: Option<u32>,
        #[serde(skip_serializing_if = "Option::is_none")]
        found: Option<bool>,
    },
    TrieDelete {
        word: String,
        step: TrieDeleteStep,
        #[serde(skip_serializing_if = "Option::is_none")]
        ch: Option<char>,
        #[serde(skip_serializing_if = "Option::is_none")]
        node: Option<u32>,
    },
    TrieQuery {
        step: TrieQueryStep,
        #[serde(skip_serializing_if = "Option::is_none")]
        prefix: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pattern: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        count: Option<usize>,
    },
}

/// Append-only step log plus replay cursor, owned by a tree instance.
#[derive(Clone, Debug, Default)]
pub struct OpLog {
    steps: Vec<StepRecord>,
    cursor: usize,
    step_mode: bool,
}

impl OpLog {
    pub fn new() -> Self {
        OpLog::default()
    }

    pub fn push(&mut self, record: StepRecord) {
        self.steps.push(record);
    }

    /// All records appended since the last `clear`, oldest first.
    pub fn records(&self) -> &[StepRecord] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn step_mode(&self) -> bool {
        self.step_mode
    }

    /// Enabling replay rewinds the cursor to the start of the log;
    /// disabling leaves both log and cursor untouched.
    pub fn set_step_mode(&mut self, enabled: bool) {
        if enabled && !self.step_mode {
            self.cursor = 0;
        }
        self.step_mode = enabled;
    }

    /// Next unconsumed record, or `None` at end of log. Each call
    /// advances the cursor by one.
    pub fn next_step(&mut self) -> Option<StepRecord> {
        let record = self.steps.get(self.cursor).cloned()?;
        self.cursor += 1;
        Some(record)
    }

    pub fn reset_cursor(&mut self) {
        self.cursor = 0;
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn clear(&mut self) {
        self.steps.clear();
        self.cursor = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(value: i64) -> StepRecord {
        StepRecord::HeapInsert { value, index: 0 }
    }

    #[test]
    fn cursor_walks_records_in_append_order() {
        let mut log = OpLog::new();
        log.push(rec(1));
        log.push(rec(2));
        assert_eq!(log.next_step(), Some(rec(1)));
        assert_eq!(log.next_step(), Some(rec(2)));
        assert_eq!(log.next_step(), None);
        // Cursor stays parked at the end.
        assert_eq!(log.next_step(), None);
    }

    #[test]
    fn enabling_step_mode_rewinds_cursor() {
        let mut log = OpLog::new();
        log.push(rec(1));
        log.push(rec(2));
        assert!(log.next_step().is_some());
        log.set_step_mode(true);
        assert_eq!(log.cursor(), 0);
        log.set_step_mode(false);
        assert_eq!(log.next_step(), Some(rec(1)));
    }

    #[test]
    fn records_serialize_as_tagged_objects() {
        let v = serde_json::to_value(StepRecord::Insert {
            value: 7,
            step: InsertStep::CreateRoot,
            node: Some(0),
            parent: None,
            current: None,
            comparison: None,
        })
        .unwrap();
        assert_eq!(v["type"], "insert");
        assert_eq!(v["step"], "create_root");
        assert_eq!(v["node"], 0);
        assert!(v.get("parent").is_none());
    }
}
