use std::cell::Cell;
use std::thread;
use std::time::{Duration, Instant};

use svd_parbench::cache::DiskCache;

fn slow_identity(i: u64) -> u64 {
    thread::sleep(Duration::from_millis(400));
    i
}

#[test]
fn test_second_call_replays_without_recomputing() {
    let dir = tempfile::tempdir().unwrap();
    let cache = DiskCache::new(dir.path()).unwrap();

    let t0 = Instant::now();
    let first = cache.cached("slow_identity", 5u64, slow_identity).unwrap();
    let first_elapsed = t0.elapsed();

    let t1 = Instant::now();
    let second = cache.cached("slow_identity", 5u64, slow_identity).unwrap();
    let second_elapsed = t1.elapsed();

    assert_eq!(first, 5);
    assert_eq!(second, 5);
    assert!(first_elapsed >= Duration::from_millis(400), "first call did not run the function");
    assert!(second_elapsed < Duration::from_millis(100), "second call recomputed");
}

#[test]
fn test_distinct_arguments_are_distinct_entries() {
    let dir = tempfile::tempdir().unwrap();
    let cache = DiskCache::new(dir.path()).unwrap();
    let calls = Cell::new(0u32);

    let run = |i: u64| {
        calls.set(calls.get() + 1);
        i * 10
    };

    assert_eq!(cache.cached("times_ten", 1u64, run).unwrap(), 10);
    assert_eq!(cache.cached("times_ten", 2u64, run).unwrap(), 20);
    assert_eq!(cache.cached("times_ten", 1u64, run).unwrap(), 10);
    assert_eq!(calls.get(), 2);
}

#[test]
fn test_distinct_names_do_not_share_entries() {
    let dir = tempfile::tempdir().unwrap();
    let cache = DiskCache::new(dir.path()).unwrap();

    assert_eq!(cache.cached("double", 3u64, |i| i * 2).unwrap(), 6);
    assert_eq!(cache.cached("triple", 3u64, |i| i * 3).unwrap(), 9);
}

#[test]
fn test_entries_survive_reopening_the_cache() {
    let dir = tempfile::tempdir().unwrap();

    {
        let cache = DiskCache::new(dir.path()).unwrap();
        assert_eq!(cache.cached("square", 7u64, |i| i * i).unwrap(), 49);
    }

    // A fresh handle on the same root must hit the persisted entry
    let reopened = DiskCache::new(dir.path()).unwrap();
    let replayed: u64 = reopened
        .cached("square", 7u64, |_| panic!("entry should have been persisted"))
        .unwrap();
    assert_eq!(replayed, 49);
}

#[test]
fn test_structured_results_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let cache = DiskCache::new(dir.path()).unwrap();

    let stored: Vec<f64> = cache
        .cached("halves", 4u32, |n| (0..n).map(|i| i as f64 / 2.0).collect())
        .unwrap();
    let replayed: Vec<f64> = cache
        .cached("halves", 4u32, |_| panic!("entry should have been persisted"))
        .unwrap();

    assert_eq!(stored, vec![0.0, 0.5, 1.0, 1.5]);
    assert_eq!(stored, replayed);
}
