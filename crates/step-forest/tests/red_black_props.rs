use step_forest::log::{FixupStep, StepRecord};
use step_forest::{RbTree, Structure};

fn assert_valid(tree: &RbTree) {
    let violations = tree.check_red_black_properties();
    assert!(violations.is_empty(), "violations: {violations:?}");
}

#[test]
fn ascending_inserts_keep_properties() {
    let mut tree = RbTree::new();
    for v in 1..=64 {
        assert!(tree.insert(v).is_some());
        assert_valid(&tree);
        let sorted: Vec<i64> = (1..=v).collect();
        assert_eq!(tree.inorder(), sorted);
    }
    let root = tree.root().unwrap();
    assert_eq!(tree.is_red(root), Some(false));
    // Red-black height bound: <= 2 log2(n + 1).
    assert!(tree.stats().height <= 12);
}

#[test]
fn descending_and_mixed_inserts() {
    let mut tree = RbTree::new();
    for v in (1..=32).rev() {
        tree.insert(v);
        assert_valid(&tree);
    }
    for v in [100, 67, 81, 99, 72] {
        tree.insert(v);
        assert_valid(&tree);
    }
    assert_eq!(tree.size(), 37);
}

#[test]
fn duplicate_is_rejected() {
    let mut tree = RbTree::new();
    tree.insert(7);
    assert!(tree.insert(7).is_none());
    assert_eq!(tree.size(), 1);
}

#[test]
fn deletes_keep_properties() {
    let mut tree = RbTree::new();
    for v in 1..=64 {
        tree.insert(v);
    }
    for v in (1..=64).filter(|v| v % 3 == 0) {
        assert!(tree.delete(v), "delete {v}");
        assert_valid(&tree);
    }
    let remaining: Vec<i64> = (1..=64).filter(|v| v % 3 != 0).collect();
    assert_eq!(tree.inorder(), remaining);
    assert!(!tree.delete(3));
}

#[test]
fn delete_down_to_empty() {
    let mut tree = RbTree::new();
    for v in [8, 4, 12, 2, 6, 10, 14] {
        tree.insert(v);
    }
    for v in [8, 4, 12, 2, 6, 10, 14] {
        assert!(tree.delete(v));
        assert_valid(&tree);
    }
    assert!(tree.is_empty());
    assert!(tree.snapshot().is_none());
}

#[test]
fn root_is_always_black() {
    let mut tree = RbTree::new();
    for v in [5, 3, 8, 1, 4, 9] {
        tree.insert(v);
        let root = tree.root().unwrap();
        assert_eq!(tree.is_red(root), Some(false));
    }
    assert!(tree
        .log()
        .records()
        .iter()
        .any(|r| matches!(
            r,
            StepRecord::InsertFixup {
                step: FixupStep::RootBlack,
                ..
            }
        )));
}

#[test]
fn recolor_case_is_logged() {
    let mut tree = RbTree::new();
    // 10, 5, 15 then 3: red uncle 15 forces the recolor case.
    for v in [10, 5, 15, 3] {
        tree.insert(v);
    }
    assert!(tree.log().records().iter().any(|r| matches!(
        r,
        StepRecord::InsertFixup {
            step: FixupStep::RecolorUncle,
            ..
        }
    )));
    assert_valid(&tree);
}

#[test]
fn color_listings() {
    let mut tree = RbTree::new();
    for v in [10, 5, 15] {
        tree.insert(v);
    }
    let colors = tree.node_colors();
    assert_eq!(
        colors.iter().map(|c| c.value).collect::<Vec<_>>(),
        vec![5, 10, 15]
    );
    let (red, black) = tree.color_counts();
    assert_eq!(red + black, 3);
    assert_eq!(red, 2); // both children of the fresh root stay red
}

#[test]
fn update_value_preserves_properties() {
    let mut tree = RbTree::new();
    for v in [10, 5, 15, 3, 8] {
        tree.insert(v);
    }
    assert!(tree.update_value(5, 6));
    assert_eq!(tree.inorder(), vec![3, 6, 8, 10, 15]);
    assert_valid(&tree);
    assert!(!tree.update_value(100, 1));
}
