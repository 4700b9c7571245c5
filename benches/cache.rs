use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use easycache::{Cache, Config, EvictionPolicy};
use std::hint::black_box;
use std::time::Duration;
use tokio::runtime::Runtime;

const MAX_SIZE: usize = 10_000;

const POLICIES: [EvictionPolicy; 4] = [
    EvictionPolicy::Basic,
    EvictionPolicy::Fifo,
    EvictionPolicy::Lru,
    EvictionPolicy::Lfu,
];

fn build(policy: EvictionPolicy) -> Cache<String> {
    Cache::new(Config {
        eviction_policy: policy,
        max_size: MAX_SIZE,
        ttl: Duration::from_secs(60),
        ..Config::default()
    })
    .expect("built inside a runtime")
}

fn bench_policy(c: &mut Criterion, policy: EvictionPolicy) {
    let keys: Vec<String> = (0..2 * MAX_SIZE).map(|i| format!("key-{i}")).collect();
    let mut group = c.benchmark_group(format!("{policy}"));

    // Twice the capacity: bounded policies evict for the second half of the keys.
    group.bench_function("set", |b| {
        b.iter_batched(
            || build(policy),
            |cache| {
                for key in &keys {
                    cache.set(black_box(key), "value".to_string());
                }
                cache
            },
            BatchSize::LargeInput,
        )
    });

    group.bench_function("get", |b| {
        let cache = build(policy);
        cache.set("existing-key", "value".to_string());
        b.iter(|| black_box(cache.get(black_box("existing-key"))));
    });

    group.bench_function("get_miss", |b| {
        let cache = build(policy);
        b.iter(|| black_box(cache.get(black_box("missing-key"))));
    });

    group.bench_function("delete", |b| {
        let cache = build(policy);
        cache.set("delete-key", "value".to_string());
        b.iter(|| {
            cache.delete(black_box("delete-key"));
            cache.set("delete-key", "value".to_string());
        });
    });

    group.finish();
}

fn bench_policies(c: &mut Criterion) {
    let runtime = Runtime::new().expect("tokio runtime");
    let _guard = runtime.enter();

    for policy in POLICIES {
        bench_policy(c, policy);
    }
}

criterion_group!(benches, bench_policies);
criterion_main!(benches);
