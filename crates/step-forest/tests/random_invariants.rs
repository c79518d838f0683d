//! Randomized invariant checks: each engine holds its structural
//! properties under arbitrary insert/delete interleavings.

use proptest::prelude::*;

use step_forest::{AvlTree, BTree, Bst, Heap, RbTree, Structure};

fn sorted_dedup(values: &[i64]) -> Vec<i64> {
    let mut v = values.to_vec();
    v.sort_unstable();
    v.dedup();
    v
}

proptest! {
    #[test]
    fn bst_inorder_is_sorted(values in proptest::collection::vec(-1000i64..1000, 0..60)) {
        let mut tree = Bst::new();
        for &v in &values {
            tree.insert(v);
        }
        prop_assert!(tree.is_valid_bst());
        prop_assert_eq!(tree.inorder(), sorted_dedup(&values));
    }

    #[test]
    fn bst_survives_interleaved_deletes(
        values in proptest::collection::vec(-100i64..100, 1..40),
        deletions in proptest::collection::vec(-100i64..100, 0..40),
    ) {
        let mut tree = Bst::new();
        let mut model = std::collections::BTreeSet::new();
        for &v in &values {
            tree.insert(v);
            model.insert(v);
        }
        for &v in &deletions {
            prop_assert_eq!(tree.delete(v), model.remove(&v));
            prop_assert!(tree.is_valid_bst());
        }
        prop_assert_eq!(tree.inorder(), model.into_iter().collect::<Vec<_>>());
    }

    #[test]
    fn avl_stays_balanced(
        values in proptest::collection::vec(-1000i64..1000, 0..60),
        deletions in proptest::collection::vec(-1000i64..1000, 0..30),
    ) {
        let mut tree = AvlTree::new();
        for &v in &values {
            tree.insert(v);
            prop_assert!(tree.unbalanced_nodes().is_empty());
        }
        for &v in &deletions {
            tree.delete(v);
            prop_assert!(tree.unbalanced_nodes().is_empty());
        }
        prop_assert_eq!(tree.inorder(), {
            let mut expected = sorted_dedup(&values);
            expected.retain(|v| !deletions.contains(v));
            expected
        });
    }

    #[test]
    fn red_black_properties_hold(
        values in proptest::collection::vec(-1000i64..1000, 0..60),
        deletions in proptest::collection::vec(-1000i64..1000, 0..30),
    ) {
        let mut tree = RbTree::new();
        for &v in &values {
            tree.insert(v);
            prop_assert!(tree.check_red_black_properties().is_empty());
        }
        for &v in &deletions {
            tree.delete(v);
            prop_assert!(tree.check_red_black_properties().is_empty());
        }
    }

    #[test]
    fn heap_property_holds_and_drains_sorted(
        values in proptest::collection::vec(-1000i64..1000, 0..60),
        max in proptest::bool::ANY,
    ) {
        let mut heap = if max { Heap::max() } else { Heap::min() };
        for &v in &values {
            heap.insert(v);
            prop_assert!(heap.is_heap());
        }
        let mut drained = Vec::new();
        while let Some(v) = heap.extract() {
            prop_assert!(heap.is_heap());
            drained.push(v);
        }
        let mut expected = values.clone();
        expected.sort_unstable();
        if max {
            expected.reverse();
        }
        prop_assert_eq!(drained, expected);
    }

    #[test]
    fn btree_stays_valid(
        order in 3usize..8,
        values in proptest::collection::vec(-500i64..500, 0..60),
        deletions in proptest::collection::vec(-500i64..500, 0..30),
    ) {
        let mut tree = BTree::new(order).unwrap();
        let mut model = std::collections::BTreeSet::new();
        for &v in &values {
            prop_assert_eq!(tree.insert(v), model.insert(v));
            prop_assert!(tree.is_valid_btree());
        }
        for &v in &deletions {
            prop_assert_eq!(tree.delete(v), model.remove(&v));
            prop_assert!(tree.is_valid_btree());
        }
        prop_assert_eq!(tree.sorted_keys(), model.into_iter().collect::<Vec<_>>());
        prop_assert_eq!(tree.size(), tree.sorted_keys().len());
    }
}
