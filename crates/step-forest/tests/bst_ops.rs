use step_forest::log::{DeleteStep, InsertStep, StepRecord};
use step_forest::{Bst, Snapshot, Structure};

#[test]
fn insert_search_delete_roundtrip() {
    let mut tree = Bst::new();
    for v in [50, 30, 70, 20, 40, 60, 80] {
        assert!(tree.insert(v).is_some());
        assert!(tree.is_valid_bst());
    }
    assert_eq!(tree.size(), 7);
    assert_eq!(tree.inorder(), vec![20, 30, 40, 50, 60, 70, 80]);
    assert!(tree.search(40).is_some());
    assert!(tree.search(41).is_none());

    // Two children: the in-order successor's value (40) moves up.
    assert!(tree.delete(30));
    assert_eq!(tree.inorder(), vec![20, 40, 50, 60, 70, 80]);
    assert!(tree.is_valid_bst());
    let root = tree.root().unwrap();
    assert_eq!(tree.value_of(root), Some(50));

    assert!(tree.delete(20)); // leaf
    assert!(tree.delete(80)); // leaf
    assert!(!tree.delete(99));
    assert_eq!(tree.size(), 4);
    assert_eq!(tree.inorder(), vec![40, 50, 60, 70]);
}

#[test]
fn duplicate_insert_is_rejected_and_logged() {
    let mut tree = Bst::new();
    tree.insert(10);
    assert!(tree.insert(10).is_none());
    assert_eq!(tree.size(), 1);
    let last = tree.log().records().last().unwrap();
    assert!(matches!(
        last,
        StepRecord::Insert {
            step: InsertStep::Duplicate,
            ..
        }
    ));
}

#[test]
fn delete_single_child_splices() {
    let mut tree = Bst::new();
    for v in [10, 5, 3] {
        tree.insert(v);
    }
    assert!(tree.delete(5));
    assert_eq!(tree.inorder(), vec![3, 10]);
    assert!(tree
        .log()
        .records()
        .iter()
        .any(|r| matches!(r, StepRecord::Delete { step: DeleteStep::ReplaceLeft, .. })));
}

#[test]
fn insert_records_carry_comparisons() {
    let mut tree = Bst::new();
    tree.insert(50);
    tree.insert(30);
    let records = tree.log().records();
    assert!(matches!(
        records[0],
        StepRecord::Insert {
            value: 50,
            step: InsertStep::CreateRoot,
            ..
        }
    ));
    match &records[1] {
        StepRecord::Insert {
            step: InsertStep::InsertLeft,
            comparison: Some(c),
            ..
        } => assert_eq!(c, "30 < 50"),
        other => panic!("unexpected record: {other:?}"),
    }
}

#[test]
fn successor_predecessor_and_range() {
    let mut tree = Bst::new();
    for v in [50, 30, 70, 20, 40, 60, 80] {
        tree.insert(v);
    }
    assert_eq!(tree.find_successor(40), Some(50));
    assert_eq!(tree.find_successor(50), Some(60));
    assert_eq!(tree.find_successor(80), None);
    assert_eq!(tree.find_predecessor(50), Some(40));
    assert_eq!(tree.find_predecessor(20), None);
    assert_eq!(tree.range(35, 65), vec![40, 50, 60]);
    assert_eq!(tree.range(81, 100), Vec::<i64>::new());
    assert_eq!(tree.sorted_values(), vec![20, 30, 40, 50, 60, 70, 80]);
}

#[test]
fn min_max_and_update() {
    let mut tree = Bst::new();
    for v in [50, 30, 70] {
        tree.insert(v);
    }
    assert_eq!(tree.find_min(), Some(30));
    assert_eq!(tree.find_max(), Some(70));
    assert!(tree.update_value(30, 35));
    assert_eq!(tree.inorder(), vec![35, 50, 70]);
    assert!(!tree.update_value(99, 1));
    // Updating onto an existing value must not lose anything.
    assert!(!tree.update_value(35, 70));
    assert_eq!(tree.inorder(), vec![35, 50, 70]);
}

#[test]
fn build_balanced_produces_minimal_height() {
    let mut tree = Bst::new();
    tree.build_balanced(&[9, 1, 5, 3, 7, 1, 8, 2, 4, 6]);
    assert_eq!(tree.inorder(), vec![1, 2, 3, 4, 5, 6, 7, 8, 9]);
    let stats = tree.stats();
    assert_eq!(stats.size, 9);
    assert!(stats.is_balanced);
    assert!(stats.height <= 3);
}

#[test]
fn stats_and_snapshot() {
    let mut tree = Bst::new();
    let empty = tree.stats();
    assert_eq!(empty.height, -1);
    assert_eq!(empty.size, 0);
    assert!(tree.snapshot().is_none());

    for v in [50, 30, 70] {
        tree.insert(v);
    }
    let stats = tree.stats();
    assert_eq!(stats.height, 1);
    assert_eq!(stats.min_value, Some(30));
    assert_eq!(stats.max_value, Some(70));
    // Idempotent with no intervening mutation.
    assert_eq!(tree.stats(), stats);

    match tree.snapshot().unwrap() {
        Snapshot::Binary { root } => {
            assert_eq!(root.value, 50);
            assert_eq!(root.left.as_ref().unwrap().value, 30);
            assert_eq!(root.right.as_ref().unwrap().value, 70);
            assert_eq!(root.right.as_ref().unwrap().depth, 1);
            assert!(root.left.as_ref().unwrap().is_leaf);
        }
        other => panic!("unexpected snapshot: {other:?}"),
    }
}

#[test]
fn clear_drops_contents_and_log() {
    let mut tree = Bst::new();
    tree.insert(1);
    tree.insert(2);
    tree.clear();
    assert_eq!(tree.size(), 0);
    assert!(tree.log().is_empty());
    assert!(tree.snapshot().is_none());
    // Ids restart after clear.
    assert_eq!(tree.insert(5), Some(0));
}
