use chrono::Utc;
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use impact_core::{PlatformReport, Post};
use impact_server::cache::{CacheConfig, CacheKey, CachedResponse, ResponseCache};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::runtime::Runtime;

/// Body JSON de un reporte con N posts
fn report_body(num_posts: usize) -> CachedResponse {
    let now = Utc::now();
    let posts = (0..num_posts)
        .map(|i| {
            Post::new(format!("post-{}", i), format!("Post number {}", i), "Technology", now)
                .with_counts(i as u64, (i / 10) as u64)
        })
        .collect();
    CachedResponse::json(&[PlatformReport::new("Facebook", posts)]).unwrap()
}

/// Benchmark: get con hit
fn bench_cache_get_hit(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let cache = ResponseCache::new(CacheConfig::default());
    let key = CacheKey::new("/api/social-media-data");

    rt.block_on(cache.set(key.clone(), report_body(30), None));

    c.bench_function("cache_get_hit", |b| {
        b.to_async(&rt).iter(|| async {
            let result = cache.get(&key).await;
            std::hint::black_box(result)
        });
    });
}

/// Benchmark: get con miss
fn bench_cache_get_miss(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let cache = ResponseCache::new(CacheConfig::default());
    let key = CacheKey::new("/api/items?page=404");

    c.bench_function("cache_get_miss", |b| {
        b.to_async(&rt).iter(|| async {
            let result = cache.get(&key).await;
            std::hint::black_box(result)
        });
    });
}

/// Benchmark: set con distintos tamanos de body
fn bench_cache_set_varying_sizes(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let mut group = c.benchmark_group("cache_set_sizes");

    for size in [10, 100, 1000].iter() {
        let cache = Arc::new(ResponseCache::new(CacheConfig::default()));
        let body = Arc::new(report_body(*size));

        group.throughput(Throughput::Bytes(body.body.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _size| {
            let counter = Arc::new(AtomicU64::new(0));
            b.to_async(&rt).iter(|| {
                let cache = Arc::clone(&cache);
                let body = Arc::clone(&body);
                let counter = Arc::clone(&counter);
                async move {
                    let n = counter.fetch_add(1, Ordering::Relaxed);
                    let key = CacheKey::new(format!("/api/items/{}", n));
                    cache.set(key, (*body).clone(), None).await;
                }
            });
        });
    }

    group.finish();
}

/// Benchmark: invalidacion de un recurso con variantes de query string
fn bench_invalidate_resource(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let mut group = c.benchmark_group("invalidate_resource");

    for live_entries in [100, 1000].iter() {
        let cache = ResponseCache::new(CacheConfig::default());
        let body = report_body(5);

        rt.block_on(async {
            for i in 0..*live_entries {
                cache
                    .set(CacheKey::new(format!("/api/items/{}", i)), body.clone(), None)
                    .await;
            }
        });

        group.bench_with_input(
            BenchmarkId::from_parameter(live_entries),
            live_entries,
            |b, _| {
                b.to_async(&rt).iter(|| async {
                    cache
                        .set(CacheKey::new("/api/items?page=1"), body.clone(), None)
                        .await;
                    let result = cache.invalidate_resource("/api/items").await;
                    std::hint::black_box(result)
                });
            },
        );
    }

    group.finish();
}

/// Benchmark: Concurrencia - multiples gets simultaneos
fn bench_cache_concurrent_gets(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let cache = Arc::new(ResponseCache::new(CacheConfig::default()));

    rt.block_on(async {
        for i in 0..1000 {
            cache
                .set(CacheKey::new(format!("/api/items/{}", i)), report_body(5), None)
                .await;
        }
    });

    c.bench_function("cache_concurrent_gets_100", |b| {
        b.to_async(&rt).iter(|| {
            let cache = Arc::clone(&cache);
            async move {
                let handles: Vec<_> = (0..100)
                    .map(|i| {
                        let cache = Arc::clone(&cache);
                        tokio::spawn(async move {
                            cache
                                .get(&CacheKey::new(format!("/api/items/{}", i % 1000)))
                                .await
                        })
                    })
                    .collect();

                for handle in handles {
                    let _ = handle.await;
                }
            }
        });
    });
}

criterion_group!(
    benches,
    bench_cache_get_hit,
    bench_cache_get_miss,
    bench_cache_set_varying_sizes,
    bench_invalidate_resource,
    bench_cache_concurrent_gets,
);

criterion_main!(benches);
