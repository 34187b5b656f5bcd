//! Resource Cache Tests
//!
//! Tests for:
//! - ResourceCache: insert, lookup by id, predicate search
//! - Id allocation: smallest unused positive id, gap filling, 0 reserved
//! - Lookup order: first match in insertion order wins

use smalt::{CachedResource, ResourceCache};

/// Stand-in for the GPU-backed records, which need a live device.
struct Record {
    id: u32,
    path: String,
}

impl Record {
    fn new(id: u32, path: &str) -> Self {
        Self {
            id,
            path: path.to_string(),
        }
    }
}

impl CachedResource for Record {
    fn id(&self) -> u32 {
        self.id
    }
}

// ============================================================================
// Id Allocation
// ============================================================================

#[test]
fn empty_cache_allocates_id_one() {
    let cache: ResourceCache<Record> = ResourceCache::new();
    assert_eq!(cache.next_id(), 1);
    assert!(cache.is_empty());
}

#[test]
fn allocation_counts_up_under_sequential_inserts() {
    let mut cache = ResourceCache::new();
    for expected in 1..=4 {
        let id = cache.next_id();
        assert_eq!(id, expected);
        cache.insert(Record::new(id, "a"));
    }
    assert_eq!(cache.len(), 4);
}

#[test]
fn allocation_fills_the_smallest_gap_first() {
    let mut cache = ResourceCache::new();
    cache.insert(Record::new(1, "a"));
    cache.insert(Record::new(3, "b"));
    cache.insert(Record::new(5, "c"));

    assert_eq!(cache.next_id(), 2, "2 is the smallest unused id");
    cache.insert(Record::new(2, "d"));
    assert_eq!(cache.next_id(), 4);
    cache.insert(Record::new(4, "e"));
    assert_eq!(cache.next_id(), 6);
}

#[test]
fn zero_is_never_allocated() {
    let cache: ResourceCache<Record> = ResourceCache::new();
    assert_ne!(cache.next_id(), 0);
}

#[test]
fn insert_with_hands_out_allocated_ids() {
    let mut cache = ResourceCache::new();
    cache.insert(Record::new(1, "a"));
    cache.insert(Record::new(3, "b"));

    let id = cache.insert_with(|id| Record::new(id, "c"));
    assert_eq!(id, 2, "insert_with allocates the smallest unused id");
    assert_eq!(cache.get(2).map(|r| r.path.as_str()), Some("c"));
}

#[test]
fn repeated_loads_of_one_path_cache_distinct_entries() {
    // Direct loads never probe for duplicates; only material resolution
    // consults the cache first.
    let mut cache = ResourceCache::new();
    let first = cache.insert_with(|id| Record::new(id, "dup.png"));
    let second = cache.insert_with(|id| Record::new(id, "dup.png"));

    assert_ne!(first, second);
    assert_eq!((first, second), (1, 2));
    assert_eq!(cache.len(), 2, "both loads end up cached");
}

// ============================================================================
// Lookup
// ============================================================================

#[test]
fn get_finds_inserted_records_by_id() {
    let mut cache = ResourceCache::new();
    cache.insert(Record::new(1, "wood.png"));
    cache.insert(Record::new(2, "stone.png"));

    assert_eq!(cache.get(2).map(|r| r.path.as_str()), Some("stone.png"));
    assert!(cache.get(3).is_none());
    assert!(cache.get(0).is_none());
}

#[test]
fn find_id_matches_by_predicate() {
    let mut cache = ResourceCache::new();
    cache.insert(Record::new(1, "wood.png"));
    cache.insert(Record::new(2, "stone.png"));

    assert_eq!(cache.find_id(|r| r.path == "stone.png"), Some(2));
    assert_eq!(cache.find_id(|r| r.path == "missing.png"), None);
}

#[test]
fn find_id_prefers_the_earliest_insertion() {
    let mut cache = ResourceCache::new();
    cache.insert(Record::new(7, "dup.png"));
    cache.insert(Record::new(2, "dup.png"));

    assert_eq!(
        cache.find_id(|r| r.path == "dup.png"),
        Some(7),
        "insertion order decides between duplicate paths"
    );
}

#[test]
fn iteration_preserves_insertion_order() {
    let mut cache = ResourceCache::new();
    cache.insert(Record::new(2, "b"));
    cache.insert(Record::new(1, "a"));

    let ids: Vec<u32> = cache.iter().map(CachedResource::id).collect();
    assert_eq!(ids, vec![2, 1]);
}
