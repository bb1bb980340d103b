use std::thread;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use reliquary::{Cache, ShardedCache};

const CAPACITY: usize = 4096;

pub fn set_get(c: &mut Criterion) {
    let mut group = c.benchmark_group("Cache Set/Get");

    for i in (6u32..=14).step_by(2).map(|i| 2u64.pow(i)) {
        let cache = Cache::new(CAPACITY).expect("cache");
        group.bench_with_input(BenchmarkId::new("single", i), &i, |b, i| {
            b.iter(|| {
                for key in 0..*i {
                    cache.set(key, key);
                    assert_eq!(cache.get(&key), Some(key));
                }
            });
        });

        let cache = ShardedCache::new(CAPACITY, 16).expect("sharded cache");
        group.bench_with_input(BenchmarkId::new("sharded", i), &i, |b, i| {
            b.iter(|| {
                for key in 0..*i {
                    cache.set(key, key);
                    assert_eq!(cache.get(&key), Some(key));
                }
            });
        });
    }

    group.finish();
}

pub fn contended(c: &mut Criterion) {
    let mut group = c.benchmark_group("Cache Contended");

    for threads in [2u64, 4, 8] {
        let cache = Cache::new(CAPACITY).expect("cache");
        group.bench_with_input(BenchmarkId::new("single", threads), &threads, |b, t| {
            b.iter(|| {
                thread::scope(|s| {
                    for n in 0..*t {
                        let cache = &cache;
                        s.spawn(move || {
                            for key in (0..1024).map(|k| k * t + n) {
                                cache.set(key, key);
                                cache.get(&key);
                            }
                        });
                    }
                });
            });
        });

        let cache = ShardedCache::new(CAPACITY, 16).expect("sharded cache");
        group.bench_with_input(BenchmarkId::new("sharded", threads), &threads, |b, t| {
            b.iter(|| {
                thread::scope(|s| {
                    for n in 0..*t {
                        let cache = &cache;
                        s.spawn(move || {
                            for key in (0..1024).map(|k| k * t + n) {
                                cache.set(key, key);
                                cache.get(&key);
                            }
                        });
                    }
                });
            });
        });
    }

    group.finish();
}

criterion_group!(cache, set_get, contended);
criterion_main!(cache);
