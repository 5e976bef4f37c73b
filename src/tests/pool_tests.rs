// src/tests/pool_tests.rs
use crate::scraper::WorkerPool;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::thread;

#[test]
fn results_come_back_in_input_order() {
    let pool = WorkerPool::new(4);
    let results = pool.map((0..50).collect(), || Some(()), |_, n: u32| n * 2);

    let doubled: Vec<u32> = results.into_iter().flatten().collect();
    assert_eq!(doubled, (0..50).map(|n| n * 2).collect::<Vec<_>>());
}

#[test]
fn each_worker_builds_its_own_state() {
    let inits = AtomicUsize::new(0);
    let names = Mutex::new(HashSet::new());

    let pool = WorkerPool::new(3);
    let results = pool.map(
        (0..30).collect::<Vec<u32>>(),
        || {
            inits.fetch_add(1, Ordering::SeqCst);
            Some(thread::current().name().unwrap_or_default().to_string())
        },
        |name, n| {
            names.lock().expect("not poisoned").insert(name.clone());
            n
        },
    );

    assert_eq!(results.len(), 30);
    assert!(inits.load(Ordering::SeqCst) <= 3);
    for name in names.lock().expect("not poisoned").iter() {
        assert!(name.starts_with("worker-"), "{name}");
    }
}

#[test]
fn panicking_job_only_loses_its_own_slot() {
    let pool = WorkerPool::new(2);
    let results = pool.map(
        vec![1, 2, 3, 4],
        || Some(()),
        |_, n: i32| {
            if n == 3 {
                panic!("bad listing");
            }
            n
        },
    );

    assert_eq!(results, vec![Some(1), Some(2), None, Some(4)]);
}

#[test]
fn failed_init_leaves_every_slot_empty() {
    let pool = WorkerPool::new(2);
    let results = pool.map(vec![1, 2, 3], || None::<()>, |_, n: i32| n);
    assert_eq!(results, vec![None, None, None]);
}

#[test]
fn empty_input_spawns_nothing() {
    let pool = WorkerPool::default();
    assert_eq!(pool.size(), 15);
    let results = pool.map(Vec::<u8>::new(), || -> Option<()> { panic!("no init") }, |_, n| n);
    assert!(results.is_empty());
}
