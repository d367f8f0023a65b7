//! Heap collection tests
//!
//! These tests verify how collections decide which soft and weak payloads
//! to reclaim, as seen through references.

use std::sync::Arc;

use tiered_ref::{CollectionKind, DirectRef, Heap, HeapConfig, Weak};

#[test]
fn test_ordinary_collection_clears_weak_only() {
    let heap = Heap::new();
    let soft = heap.soft(1u32);
    let weak = heap.weak(2u32);
    let hard = heap.hard(3u32);

    assert_eq!(heap.collect(), 1);
    assert!(soft.exists());
    assert!(!weak.exists());
    assert!(hard.exists());
}

#[test]
fn test_pressure_collection_clears_soft_and_weak() {
    let heap = Heap::new();
    let soft = heap.soft(1u32);
    let weak = heap.weak(2u32);
    let hard = heap.hard(3u32);

    assert_eq!(heap.run(CollectionKind::Pressure), 2);
    assert!(!soft.exists());
    assert!(!weak.exists());
    assert!(hard.exists());

    let stats = heap.stats();
    assert_eq!(stats.collections, 1);
    assert_eq!(stats.pressure_collections, 1);
    assert_eq!(stats.last_released, 2);
}

#[test]
fn test_payload_held_by_caller_is_not_reclaimed() {
    let heap = Heap::new();
    let weak = heap.weak(String::from("pinned"));
    let pinned: Arc<String> = weak.get().unwrap();

    heap.collect_under_pressure();
    assert!(weak.exists());
    assert_eq!(weak.get().unwrap().as_str(), "pinned");

    drop(pinned);
    assert!(!weak.exists());
}

#[test]
fn test_dropping_reference_releases_root() {
    let heap = Heap::new();
    {
        let _soft = heap.soft(vec![0u8; 16]);
        let _weak = heap.weak_from_eager(|| vec![0u8; 16]);
        assert_eq!(heap.root_count(), 2);
    }
    assert_eq!(heap.root_count(), 0);
}

#[test]
fn test_soft_retention_keeps_youngest() {
    let heap = Heap::with_config(HeapConfig { soft_retention: 2 });
    assert_eq!(heap.config().soft_retention, 2);
    assert_eq!(Heap::new().config().soft_retention, usize::MAX);
    let oldest = heap.soft(1u8);
    let middle = heap.soft(2u8);
    let youngest = heap.soft(3u8);

    assert_eq!(heap.collect(), 1);
    assert!(!oldest.exists());
    assert!(middle.exists());
    assert!(youngest.exists());
    assert_eq!(heap.stats().live_soft, 2);
}

#[test]
fn test_recovered_payload_is_rerooted_as_youngest() {
    let heap = Heap::with_config(HeapConfig { soft_retention: 1 });
    let recovering = heap.soft_from_eager(|| 1u8);
    let other = heap.soft(2u8);

    heap.collect();
    assert!(!recovering.exists());
    assert!(other.exists());

    // Rebuilding registers a new root, which is now the youngest
    assert_eq!(*recovering.get().unwrap(), 1);
    heap.collect();
    assert!(recovering.exists());
    assert!(!other.exists());
}

struct Node {
    child: DirectRef<u64, Weak>,
}

#[test]
fn test_payload_owning_references_can_be_collected() {
    let heap = Heap::new();
    let child_heap = heap.clone();
    let parent = heap.weak_from_eager(move || Node {
        child: DirectRef::new(&child_heap, 7),
    });
    assert_eq!(heap.root_count(), 2);

    // Dropping the parent payload releases the child's root as well
    heap.collect();
    assert_eq!(heap.root_count(), 0);

    let node = parent.get().unwrap();
    assert_eq!(*node.child.get().unwrap(), 7);
}

#[test]
fn test_collection_from_another_thread() {
    let heap = Heap::new();
    let weak = heap.weak(5i32);

    let collector = heap.clone();
    let released = std::thread::spawn(move || collector.collect())
        .join()
        .unwrap();

    assert_eq!(released, 1);
    assert!(!weak.exists());
}
