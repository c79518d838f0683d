//! Replay-cursor behavior across engines, exercised through the
//! kind-independent `Structure` surface.

use step_forest::log::StepRecord;
use step_forest::{AvlTree, BTree, Bst, Heap, Structure, Trie};

fn drain(s: &mut dyn Structure) -> Vec<StepRecord> {
    let mut out = Vec::new();
    while let Some(record) = s.next_step() {
        out.push(record);
    }
    out
}

#[test]
fn replay_returns_records_in_execution_order() {
    let mut tree = Bst::new();
    tree.insert(50);
    tree.insert(30);
    tree.set_step_mode(true);
    let replayed = drain(&mut tree);
    assert_eq!(replayed, tree.log().records());
    assert!(tree.next_step().is_none());
}

#[test]
fn enabling_step_mode_rewinds() {
    let mut tree = AvlTree::new();
    tree.insert(10);
    tree.set_step_mode(true);
    let first = tree.next_step().unwrap();
    tree.set_step_mode(true); // already on: no rewind
    assert_ne!(tree.next_step().unwrap(), first);
    tree.set_step_mode(false);
    tree.set_step_mode(true); // off -> on rewinds
    assert_eq!(tree.next_step().unwrap(), first);
}

#[test]
fn disabling_keeps_log_and_cursor() {
    let mut heap = Heap::min();
    heap.insert(5);
    heap.insert(3);
    heap.set_step_mode(true);
    let first = heap.next_step().unwrap();
    heap.set_step_mode(false);
    // Records stay; the cursor is wherever replay left it.
    assert!(!heap.log().is_empty());
    let second = heap.next_step().unwrap();
    assert_ne!(first, second);
}

#[test]
fn mutations_during_replay_append_to_the_log() {
    let mut tree = Bst::new();
    tree.insert(50);
    tree.set_step_mode(true);
    let before = tree.log().len();
    tree.insert(30);
    assert!(tree.log().len() > before);
    // Replay still starts from the first record.
    assert_eq!(drain(&mut tree).len(), tree.log().len());
}

#[test]
fn reset_steps_rewinds_without_toggling_mode() {
    let mut trie = Trie::new();
    trie.insert("cat");
    trie.set_step_mode(true);
    let first = trie.next_step().unwrap();
    trie.next_step();
    trie.reset_steps();
    assert!(trie.log().step_mode());
    assert_eq!(trie.next_step().unwrap(), first);
}

#[test]
fn clear_empties_log_across_engines() {
    let mut engines: Vec<Box<dyn Structure>> = vec![
        Box::new(Bst::new()),
        Box::new(AvlTree::new()),
        Box::new(Heap::max()),
        Box::new(BTree::new(3).unwrap()),
    ];
    for engine in &mut engines {
        assert!(engine.log().is_empty());
    }

    let mut tree = BTree::new(3).unwrap();
    tree.insert(1);
    tree.insert(2);
    tree.clear();
    assert!(tree.log().is_empty());
    assert!(tree.next_step().is_none());
}

#[test]
fn records_serialize_without_absent_fields() {
    let mut tree = Bst::new();
    tree.insert(50);
    tree.insert(30);
    let json = serde_json::to_value(tree.log().records()).unwrap();
    let array = json.as_array().unwrap();
    assert_eq!(array[0]["type"], "insert");
    assert_eq!(array[0]["step"], "create_root");
    assert!(array[0].get("comparison").is_none());
    // The descent record for 30 carries its comparison.
    assert!(array
        .iter()
        .any(|r| r["comparison"] == serde_json::json!("30 < 50")));
}

#[test]
fn snapshot_serializes_with_layout_tag() {
    let mut tree = Bst::new();
    tree.insert(50);
    tree.insert(30);
    tree.stats();
    let snap = serde_json::to_value(tree.snapshot().unwrap()).unwrap();
    assert_eq!(snap["layout"], "binary");
    assert_eq!(snap["root"]["value"], 50);
    assert_eq!(snap["root"]["left"]["value"], 30);

    let mut trie = Trie::new();
    trie.insert("hi");
    let snap = serde_json::to_value(trie.snapshot().unwrap()).unwrap();
    assert_eq!(snap["layout"], "trie");

    let mut btree = BTree::new(3).unwrap();
    btree.insert(1);
    let snap = serde_json::to_value(btree.snapshot().unwrap()).unwrap();
    assert_eq!(snap["layout"], "multi_way");
    assert_eq!(snap["root"]["keys"], serde_json::json!([1]));
}
