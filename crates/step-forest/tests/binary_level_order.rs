use step_forest::log::{DeleteStep, InsertStep, StepRecord};
use step_forest::{BinaryTree, Structure};

#[test]
fn inserts_fill_level_order() {
    let mut tree = BinaryTree::new();
    for v in [1, 2, 3, 4, 5, 6, 7] {
        tree.insert(v);
        assert!(tree.is_complete());
    }
    assert_eq!(tree.level_order(), vec![1, 2, 3, 4, 5, 6, 7]);
    assert_eq!(tree.inorder(), vec![4, 2, 5, 1, 6, 3, 7]);
    assert_eq!(tree.preorder(), vec![1, 2, 4, 5, 3, 6, 7]);
    assert_eq!(tree.postorder(), vec![4, 5, 2, 6, 7, 3, 1]);
    assert!(tree.is_full());
    assert!(tree.is_perfect());
    assert_eq!(tree.leaf_count(), 4);
    assert_eq!(tree.internal_count(), 3);
}

#[test]
fn duplicates_are_allowed() {
    let mut tree = BinaryTree::new();
    tree.insert(5);
    tree.insert(5);
    tree.insert(5);
    assert_eq!(tree.size(), 3);
    assert_eq!(tree.level_order(), vec![5, 5, 5]);
}

#[test]
fn insert_records_have_no_comparisons() {
    let mut tree = BinaryTree::new();
    tree.insert(1);
    tree.insert(2);
    tree.insert(3);
    let records = tree.log().records();
    assert!(matches!(
        records[0],
        StepRecord::Insert {
            step: InsertStep::CreateRoot,
            comparison: None,
            ..
        }
    ));
    assert!(matches!(
        records[1],
        StepRecord::Insert {
            step: InsertStep::InsertLeft,
            ..
        }
    ));
    assert!(matches!(
        records[2],
        StepRecord::Insert {
            step: InsertStep::InsertRight,
            ..
        }
    ));
}

#[test]
fn delete_swaps_with_last_level_order_node() {
    let mut tree = BinaryTree::new();
    for v in [1, 2, 3, 4, 5] {
        tree.insert(v);
    }
    // 2 takes the last node's value (5) and the last node goes.
    assert!(tree.delete(2));
    assert_eq!(tree.level_order(), vec![1, 5, 3, 4]);
    assert!(tree.is_complete());
    assert!(matches!(
        tree.log().records().last().unwrap(),
        StepRecord::Delete {
            step: DeleteStep::ReplaceAndDelete,
            replacement: Some(5),
            ..
        }
    ));
}

#[test]
fn delete_last_node_and_root() {
    let mut tree = BinaryTree::new();
    tree.insert(1);
    tree.insert(2);
    // 2 is the last level-order node: plain leaf removal.
    assert!(tree.delete(2));
    assert_eq!(tree.level_order(), vec![1]);
    assert!(tree.log().records().iter().any(|r| matches!(
        r,
        StepRecord::Delete {
            step: DeleteStep::DeleteLeaf,
            ..
        }
    )));

    assert!(tree.delete(1));
    assert!(tree.is_empty());
    assert!(tree.root().is_none());
    assert!(tree.log().records().iter().any(|r| matches!(
        r,
        StepRecord::Delete {
            step: DeleteStep::DeleteRoot,
            ..
        }
    )));
    assert!(!tree.delete(1));
}

#[test]
fn search_is_a_scan() {
    let mut tree = BinaryTree::new();
    for v in [7, 3, 9] {
        tree.insert(v);
    }
    assert!(tree.search(9).is_some());
    assert!(tree.search(4).is_none());
    assert!(matches!(
        tree.log().records().last().unwrap(),
        StepRecord::Search {
            found: Some(false),
            ..
        }
    ));
}

#[test]
fn update_rewrites_in_place() {
    let mut tree = BinaryTree::new();
    for v in [1, 2, 3] {
        tree.insert(v);
    }
    assert!(tree.update_value(2, 20));
    assert_eq!(tree.level_order(), vec![1, 20, 3]);
    assert_eq!(tree.size(), 3);
    assert!(!tree.update_value(2, 0));
}

#[test]
fn shape_predicates() {
    let mut tree = BinaryTree::new();
    assert!(tree.is_full());
    assert!(tree.is_perfect());
    assert!(tree.is_complete());

    for v in [1, 2, 3, 4, 5, 6] {
        tree.insert(v);
    }
    // Node 3 has only a left child.
    assert!(!tree.is_full());
    assert!(!tree.is_perfect());
    assert!(tree.is_complete());

    tree.insert(7);
    assert!(tree.is_full());
    assert!(tree.is_perfect());
}

#[test]
fn stats_use_a_full_scan_for_min_max() {
    let mut tree = BinaryTree::new();
    let empty = tree.stats();
    assert_eq!(empty.height, -1);

    // Deliberately unordered: directed descents would get these wrong.
    for v in [10, 50, 2, 7, 99] {
        tree.insert(v);
    }
    let stats = tree.stats();
    assert_eq!(stats.size, 5);
    assert_eq!(stats.height, 2);
    assert_eq!(stats.min_value, Some(2));
    assert_eq!(stats.max_value, Some(99));
}
