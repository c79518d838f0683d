use step_forest::log::{ExtractStep, StepRecord};
use step_forest::{Heap, Snapshot, Structure, StructureKind};

#[test]
fn min_heap_extracts_ascending() {
    let mut heap = Heap::min();
    for v in [5, 3, 8, 1, 9, 2] {
        heap.insert(v);
        assert!(heap.is_heap());
    }
    assert_eq!(heap.peek(), Some(1));
    let mut drained = Vec::new();
    while let Some(v) = heap.extract() {
        assert!(heap.is_heap());
        drained.push(v);
    }
    assert_eq!(drained, vec![1, 2, 3, 5, 8, 9]);
    assert!(heap.is_empty());
}

#[test]
fn max_heap_extracts_descending() {
    let mut heap = Heap::max();
    for v in [5, 3, 8, 1, 9, 2] {
        heap.insert(v);
        assert!(heap.is_heap());
    }
    assert_eq!(heap.peek(), Some(9));
    assert_eq!(heap.extract(), Some(9));
    assert_eq!(heap.extract(), Some(8));
    assert!(heap.is_heap());
}

#[test]
fn extract_from_empty_logs_and_returns_none() {
    let mut heap = Heap::min();
    assert_eq!(heap.extract(), None);
    assert!(matches!(
        heap.log().records().last().unwrap(),
        StepRecord::Extract {
            step: ExtractStep::EmptyHeap,
            ..
        }
    ));
}

#[test]
fn build_heap_is_bottom_up() {
    let mut heap = Heap::min();
    heap.build(&[9, 4, 7, 1, -2, 6, 5]);
    assert!(heap.is_heap());
    assert_eq!(heap.peek(), Some(-2));
    assert_eq!(heap.len(), 7);
    // Build logs no per-level heapify records, only the swaps.
    assert!(!heap
        .log()
        .records()
        .iter()
        .any(|r| matches!(r, StepRecord::HeapifyDown { .. })));
    assert!(heap
        .log()
        .records()
        .iter()
        .any(|r| matches!(r, StepRecord::Swap { .. })));
}

#[test]
fn delete_and_update_at_index() {
    let mut heap = Heap::min();
    heap.build(&[1, 3, 2, 7, 4, 9]);
    assert!(heap.delete_at(1)); // remove the 3
    assert!(heap.is_heap());
    assert_eq!(heap.len(), 5);
    assert!(!heap.delete_at(50));

    assert!(heap.update_at(0, 100)); // root sinks
    assert!(heap.is_heap());
    assert!(heap.update_at(heap.len() - 1, -5)); // tail rises to root
    assert!(heap.is_heap());
    assert_eq!(heap.peek(), Some(-5));
    assert!(!heap.update_at(50, 0));
}

#[test]
fn search_is_a_linear_scan() {
    let mut heap = Heap::max();
    heap.build(&[4, 1, 3]);
    assert_eq!(heap.search(1), Some(1));
    assert_eq!(heap.search(42), None);
    assert!(matches!(
        heap.log().records().last().unwrap(),
        StepRecord::HeapSearch { found: false, .. }
    ));
}

#[test]
fn heap_sort_orders_by_kind() {
    let min = Heap::min();
    assert_eq!(min.heap_sort(&[5, 1, 4, 2, 3]), vec![1, 2, 3, 4, 5]);
    let max = Heap::max();
    assert_eq!(max.heap_sort(&[5, 1, 4, 2, 3]), vec![5, 4, 3, 2, 1]);
    assert_eq!(min.heap_sort(&[]), Vec::<i64>::new());
}

#[test]
fn level_order_is_the_array() {
    let mut heap = Heap::min();
    for v in [5, 3, 8] {
        heap.insert(v);
    }
    assert_eq!(heap.level_order(), heap.as_slice().to_vec());
    assert_eq!(heap.as_slice(), &[3, 5, 8]);
}

#[test]
fn last_level_node_count() {
    let mut heap = Heap::min();
    assert_eq!(heap.last_level_node_count(), 0);
    heap.build(&[1, 2, 3, 4, 5, 6]);
    assert_eq!(heap.last_level_node_count(), 3);
    heap.build(&[1, 2, 3]);
    assert_eq!(heap.last_level_node_count(), 2);
    heap.build(&[1]);
    assert_eq!(heap.last_level_node_count(), 1);
}

#[test]
fn stats_and_derived_snapshot() {
    let mut heap = Heap::min();
    let empty = heap.stats();
    assert_eq!(empty.height, -1);
    assert_eq!(empty.kind, StructureKind::MinHeap);

    heap.build(&[2, 7, 3, 9, 8]);
    let stats = heap.stats();
    assert_eq!(stats.size, 5);
    assert_eq!(stats.height, 2);
    assert_eq!(stats.min_value, Some(2));
    assert_eq!(stats.max_value, Some(9));

    match heap.snapshot().unwrap() {
        Snapshot::Binary { root } => {
            assert_eq!(root.id, 0);
            assert_eq!(root.value, 2);
            assert_eq!(root.left.as_ref().unwrap().id, 1);
            assert_eq!(root.right.as_ref().unwrap().id, 2);
            assert_eq!(root.left.as_ref().unwrap().left.as_ref().unwrap().depth, 2);
        }
        other => panic!("unexpected snapshot: {other:?}"),
    }
}
