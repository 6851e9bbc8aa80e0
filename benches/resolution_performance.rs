// benches/resolution_performance.rs
//! Benchmarks for palisade_status resolution.
//!
//! Measures each precedence tier, trie depth and the explainer, and tracks
//! allocations per iteration. Every lookup path is expected to report zero
//! allocations; the explainer only allocates when rendered.

use criterion::{BenchmarkId, Bencher, Criterion, black_box, criterion_group, criterion_main};
use palisade_status::{Code, GrpcCode, Mapper, Reason, SegmentTrie, SharedMapper, StatusMapper};
use stats_alloc::{INSTRUMENTED_SYSTEM, Region, StatsAlloc};
use std::alloc::System;

#[global_allocator]
static GLOBAL: &StatsAlloc<System> = &INSTRUMENTED_SYSTEM;

// ============================================================================
// Allocation Tracking
// ============================================================================

thread_local! {
    static ALLOCS: std::cell::RefCell<Vec<(usize, usize)>> = const { std::cell::RefCell::new(Vec::new()) };
}

/// Run `f` under criterion and print the median allocation count and bytes.
fn bench_with_mem<F>(b: &mut Bencher<'_>, label: &str, mut f: F)
where
    F: FnMut(),
{
    ALLOCS.with(|a| a.borrow_mut().clear());

    b.iter(|| {
        let region = Region::new(GLOBAL);
        f();
        let change = region.change();
        ALLOCS.with(|a| {
            a.borrow_mut()
                .push((change.allocations, change.bytes_allocated))
        });
    });

    ALLOCS.with(|a| {
        let mut samples = a.borrow_mut();
        if samples.is_empty() {
            return;
        }
        samples.sort_unstable();
        let (count, bytes) = samples[samples.len() / 2];
        println!("{label:<40} median allocs: {count:>3} ({bytes} bytes)");
    });
}

fn mapper() -> Mapper {
    Mapper::builder()
        .http_prefix(Code::UNAVAILABLE, "storage", 503)
        .http_prefix(Code::UNAVAILABLE, "storage.pg", 503)
        .http_prefix(Code::UNAVAILABLE, "storage.*.connect", 504)
        .grpc_prefix(Code::UNAVAILABLE, "storage.pg.replica", GrpcCode::ResourceExhausted)
        .http_override(Code::CANCELED, 499)
        .build()
        .expect("benchmark rules are valid")
}

// ============================================================================
// TIER BENCHMARKS
// ============================================================================

fn bench_tiers(c: &mut Criterion) {
    let m = mapper();
    let teapot = Code::parse("teapot_brewing").expect("valid code");
    let pg = Reason::parse("storage.pg.connect.retry").expect("valid reason");

    let mut group = c.benchmark_group("tiers");

    group.bench_function("override", |b| {
        bench_with_mem(b, "tier: override", || {
            black_box(m.status(black_box(&Code::CANCELED), black_box(&pg)));
        })
    });
    group.bench_function("prefix", |b| {
        bench_with_mem(b, "tier: prefix", || {
            black_box(m.status(black_box(&Code::UNAVAILABLE), black_box(&pg)));
        })
    });
    group.bench_function("default", |b| {
        bench_with_mem(b, "tier: default", || {
            black_box(m.status(black_box(&Code::NOT_FOUND), black_box(&Reason::EMPTY)));
        })
    });
    group.bench_function("fallback", |b| {
        bench_with_mem(b, "tier: fallback", || {
            black_box(m.status(black_box(&teapot), black_box(&pg)));
        })
    });

    group.finish();
}

// ============================================================================
// TRIE BENCHMARKS
// ============================================================================

fn bench_trie_depth(c: &mut Criterion) {
    let mut group = c.benchmark_group("trie_depth");

    for depth in [1usize, 2, 4, 8] {
        let mut trie = SegmentTrie::new();
        let segments: Vec<String> = (0..depth).map(|i| format!("seg{i}")).collect();
        for n in 1..=depth {
            trie.insert(&segments[..n].join("."), n)
                .expect("valid pattern");
            let mut wild = segments[..n].to_vec();
            wild[n - 1] = "*".to_owned();
            // "*" alone is rejected; the literal rule covers depth 1
            let _ = trie.insert(&wild.join("."), n + 100);
        }
        let path = format!("{}.tail", segments.join("."));

        group.bench_with_input(BenchmarkId::from_parameter(depth), &path, |b, path| {
            bench_with_mem(b, &format!("trie lookup depth {depth}"), || {
                black_box(trie.lookup(black_box(path)));
            })
        });
    }

    group.finish();
}

// ============================================================================
// EXPLAIN & RELOAD BENCHMARKS
// ============================================================================

fn bench_explain(c: &mut Criterion) {
    let m = mapper();
    let pg = Reason::parse("storage.pg.replica").expect("valid reason");

    c.bench_function("explanation_struct", |b| {
        bench_with_mem(b, "explanation (structured)", || {
            black_box(m.explanation(black_box(&Code::UNAVAILABLE), black_box(&pg)));
        })
    });
    c.bench_function("explanation_rendered", |b| {
        bench_with_mem(b, "explanation (rendered)", || {
            black_box(m.explanation(&Code::UNAVAILABLE, &pg).to_string());
        })
    });
}

fn bench_shared(c: &mut Criterion) {
    let shared = SharedMapper::new(mapper());
    let pg = Reason::parse("storage.pg").expect("valid reason");

    c.bench_function("shared_status", |b| {
        bench_with_mem(b, "shared mapper status", || {
            black_box(shared.status(black_box(&Code::UNAVAILABLE), black_box(&pg)));
        })
    });
}

criterion_group!(tier_benches, bench_tiers);
criterion_group!(trie_benches, bench_trie_depth);
criterion_group!(explain_benches, bench_explain, bench_shared);

criterion_main!(tier_benches, trie_benches, explain_benches);
