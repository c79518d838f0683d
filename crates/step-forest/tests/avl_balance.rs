use step_forest::log::{Rotation, StepRecord};
use step_forest::{AvlTree, Structure};

fn assert_avl(tree: &AvlTree) {
    assert!(tree.unbalanced_nodes().is_empty());
    assert!(tree.max_balance_factor() <= 1);
}

#[test]
fn right_right_case_rotates_left() {
    let mut tree = AvlTree::new();
    tree.insert(10);
    tree.insert(20);
    tree.insert(30);
    let root = tree.root().unwrap();
    assert_eq!(tree.value_of(root), Some(20));
    assert_eq!(tree.inorder(), vec![10, 20, 30]);
    assert_avl(&tree);
    assert!(tree.rotation_history().iter().any(|r| matches!(
        r,
        StepRecord::Rotation {
            rotation: Rotation::Left,
            ..
        }
    )));
}

#[test]
fn left_left_case_rotates_right() {
    let mut tree = AvlTree::new();
    tree.insert(30);
    tree.insert(20);
    tree.insert(10);
    assert_eq!(tree.value_of(tree.root().unwrap()), Some(20));
    assert_avl(&tree);
}

#[test]
fn double_rotation_cases() {
    let mut lr = AvlTree::new();
    lr.insert(30);
    lr.insert(10);
    lr.insert(20);
    assert_eq!(lr.value_of(lr.root().unwrap()), Some(20));
    assert!(lr.rotation_history().iter().any(|r| matches!(
        r,
        StepRecord::Rotation {
            rotation: Rotation::LeftRight,
            ..
        }
    )));

    let mut rl = AvlTree::new();
    rl.insert(10);
    rl.insert(30);
    rl.insert(20);
    assert_eq!(rl.value_of(rl.root().unwrap()), Some(20));
    assert!(rl.rotation_history().iter().any(|r| matches!(
        r,
        StepRecord::Rotation {
            rotation: Rotation::RightLeft,
            ..
        }
    )));
}

#[test]
fn sequential_inserts_stay_balanced() {
    let mut tree = AvlTree::new();
    for v in 1..=100 {
        tree.insert(v);
        assert_avl(&tree);
        let sorted: Vec<i64> = (1..=v).collect();
        assert_eq!(tree.inorder(), sorted);
    }
    // A balanced tree over 100 keys is no taller than ~1.44 log2(n).
    assert!(tree.stats().height <= 9);
}

#[test]
fn deletes_rebalance() {
    let mut tree = AvlTree::new();
    for v in 1..=32 {
        tree.insert(v);
    }
    for v in (1..=32).filter(|v| v % 2 == 0) {
        assert!(tree.delete(v));
        assert_avl(&tree);
    }
    let odds: Vec<i64> = (1..=32).filter(|v| v % 2 == 1).collect();
    assert_eq!(tree.inorder(), odds);
    assert!(!tree.delete(2));
}

#[test]
fn balance_listings() {
    let empty = AvlTree::new();
    assert_eq!(empty.max_balance_factor(), 0);
    assert!(empty.balance_factors().is_empty());

    let mut tree = AvlTree::new();
    for v in [20, 10, 30, 5] {
        tree.insert(v);
    }
    let entries = tree.balance_factors();
    assert_eq!(entries.len(), 4);
    assert_eq!(
        entries.iter().map(|e| e.value).collect::<Vec<_>>(),
        vec![5, 10, 20, 30]
    );
    assert!(entries.iter().all(|e| e.balanced));
}

#[test]
fn update_value_keeps_balance() {
    let mut tree = AvlTree::new();
    for v in [20, 10, 30, 40] {
        tree.insert(v);
    }
    assert!(tree.update_value(10, 50));
    assert_eq!(tree.inorder(), vec![20, 30, 40, 50]);
    assert_avl(&tree);
}

#[test]
fn balance_updates_are_logged() {
    let mut tree = AvlTree::new();
    tree.insert(10);
    tree.insert(20);
    assert!(tree
        .log()
        .records()
        .iter()
        .any(|r| matches!(r, StepRecord::BalanceUpdate { .. })));
}
