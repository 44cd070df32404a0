#[macro_use]
extern crate criterion;

use criterion::{BenchmarkId, Criterion};
use listset::structures::{CoarseListSet, ConcurrentSet, FineListSet, LockFreeListSet};
use std::collections;

use std::thread;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

const THREADS: [usize; 4] = [2, 4, 8, 16];

fn set_typical<S: ConcurrentSet + Default + 'static>(num_threads: usize) {
    let set = Arc::new(S::default());
    set.seed(0..50);
    let mut wait_vec: Vec<JoinHandle<()>> = Vec::new();

    for t in 0..num_threads {
        let s = set.clone();
        wait_vec.push(thread::spawn(move || {
            let offset = t as i32;
            for i in 0..2000 / num_threads as i32 {
                s.lookup((i + offset) % 100);
            }

            for i in 0..100 / num_threads as i32 {
                s.insert((i * 7 + offset) % 100);
                s.remove((i * 13 + offset) % 100);
            }
        }));
    }

    for handle in wait_vec {
        handle.join().unwrap();
    }
}

fn set_typical_lock(num_threads: usize) {
    let set = Arc::new(Mutex::new(collections::HashSet::new()));
    set.lock().unwrap().extend(0..50);
    let mut wait_vec: Vec<JoinHandle<()>> = Vec::new();

    for t in 0..num_threads {
        let s = set.clone();
        wait_vec.push(thread::spawn(move || {
            let offset = t as i32;
            for i in 0..2000 / num_threads as i32 {
                s.lock().unwrap().contains(&((i + offset) % 100));
            }

            for i in 0..100 / num_threads as i32 {
                s.lock().unwrap().insert((i * 7 + offset) % 100);
                s.lock().unwrap().remove(&((i * 13 + offset) % 100));
            }
        }));
    }

    for handle in wait_vec {
        handle.join().unwrap();
    }
}

fn set_heavy_insert<S: ConcurrentSet + Default + 'static>(num_threads: usize) {
    let set = Arc::new(S::default());
    let mut wait_vec: Vec<JoinHandle<()>> = Vec::new();

    for t in 0..num_threads {
        let s = set.clone();
        wait_vec.push(thread::spawn(move || {
            for i in 0..1000 / num_threads as i32 {
                s.insert(i * num_threads as i32 + t as i32);
            }

            for i in 0..200 / num_threads as i32 {
                s.remove(i * num_threads as i32 + t as i32);
            }
        }));
    }

    for handle in wait_vec {
        handle.join().unwrap();
    }
}

fn set_heavy_insert_lock(num_threads: usize) {
    let set = Arc::new(Mutex::new(collections::HashSet::new()));
    let mut wait_vec: Vec<JoinHandle<()>> = Vec::new();

    for t in 0..num_threads {
        let s = set.clone();
        wait_vec.push(thread::spawn(move || {
            for i in 0..1000 / num_threads as i32 {
                s.lock().unwrap().insert(i * num_threads as i32 + t as i32);
            }

            for i in 0..200 / num_threads as i32 {
                s.lock().unwrap().remove(&(i * num_threads as i32 + t as i32));
            }
        }));
    }

    for handle in wait_vec {
        handle.join().unwrap();
    }
}

fn bench_typical(c: &mut Criterion) {
    let mut group = c.benchmark_group("set_typical");
    for num_threads in THREADS.iter() {
        group.bench_with_input(BenchmarkId::new("coarse", num_threads), num_threads, |b, &n| b.iter(|| set_typical::<CoarseListSet>(n)));
        group.bench_with_input(BenchmarkId::new("fine", num_threads), num_threads, |b, &n| b.iter(|| set_typical::<FineListSet>(n)));
        group.bench_with_input(BenchmarkId::new("lockfree", num_threads), num_threads, |b, &n| b.iter(|| set_typical::<LockFreeListSet>(n)));
        group.bench_with_input(BenchmarkId::new("mutex_hashset", num_threads), num_threads, |b, &n| b.iter(|| set_typical_lock(n)));
    }
    group.finish();
}

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("set_insert");
    for num_threads in THREADS.iter() {
        group.bench_with_input(BenchmarkId::new("coarse", num_threads), num_threads, |b, &n| b.iter(|| set_heavy_insert::<CoarseListSet>(n)));
        group.bench_with_input(BenchmarkId::new("fine", num_threads), num_threads, |b, &n| b.iter(|| set_heavy_insert::<FineListSet>(n)));
        group.bench_with_input(BenchmarkId::new("lockfree", num_threads), num_threads, |b, &n| b.iter(|| set_heavy_insert::<LockFreeListSet>(n)));
        group.bench_with_input(BenchmarkId::new("mutex_hashset", num_threads), num_threads, |b, &n| b.iter(|| set_heavy_insert_lock(n)));
    }
    group.finish();
}

criterion_group!(benches, bench_insert, bench_typical);
criterion_main!(benches);
