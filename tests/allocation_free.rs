//! Steady-state lookups must not touch the heap.
//!
//! Kept in its own test binary with a single test so the counting allocator
//! only sees this thread's work.

use palisade_status::{Code, GrpcCode, Mapper, Reason, SharedMapper, StatusMapper};
use stats_alloc::{INSTRUMENTED_SYSTEM, Region, StatsAlloc};
use std::alloc::System;
use std::hint::black_box;

#[global_allocator]
static GLOBAL: &StatsAlloc<System> = &INSTRUMENTED_SYSTEM;

#[test]
fn lookups_do_not_allocate() {
    let mapper = Mapper::builder()
        .http_prefix(Code::UNAVAILABLE, "storage.pg", 503)
        .http_prefix(Code::UNAVAILABLE, "storage.*.connect", 504)
        .grpc_prefix(Code::UNAVAILABLE, "storage", GrpcCode::ResourceExhausted)
        .http_override(Code::CANCELED, 499)
        .build()
        .unwrap();
    let shared = SharedMapper::new(mapper.clone());

    let teapot = Code::parse("teapot_brewing").unwrap();
    let queries = [
        (Code::CANCELED, Reason::parse("storage.pg").unwrap()),
        (Code::UNAVAILABLE, Reason::parse("storage.pg.connect.retry").unwrap()),
        (Code::UNAVAILABLE, Reason::parse("storage.s3.connect").unwrap()),
        (Code::UNAVAILABLE, Reason::parse("STORAGE.bad-segment").unwrap_or_default()),
        (Code::NOT_FOUND, Reason::EMPTY),
        (teapot, Reason::parse("kettle.boil").unwrap()),
    ];

    // first load on a thread may register arc-swap bookkeeping
    for (code, reason) in &queries {
        black_box(shared.status(code, reason));
    }

    let region = Region::new(GLOBAL);
    for _ in 0..100 {
        for (code, reason) in &queries {
            black_box(mapper.status(black_box(code), black_box(reason)));
            black_box(mapper.explanation(code, reason));
            black_box(shared.status(code, reason));
        }
    }
    let change = region.change();

    assert_eq!(change.allocations, 0, "{change:?}");
    assert_eq!(change.reallocations, 0, "{change:?}");
}
