//! # Command-Gate Benchmarks
//!
//! | Stage | Operation |
//! |-------|-----------|
//! | shared-crypto | SHA-256 and HMAC-SHA256 over varying input sizes |
//! | cg-01 | canonicalization, signing-string build, full verify |
//! | cg-02 | dispatch of fresh and duplicate commands |

use cg_01_command_auth::{build_signing_string, canonicalize, verify, CommandAuthService};
use cg_02_command_dispatch::{
    AckSink, CommandDispatchApi, CommandDispatcher, DispatchError, DispatcherConfig,
    HandlerOutcome,
};
use cg_tests::fixtures::*;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use serde_json::json;
use shared_crypto::{hmac_sha256, sha256};
use shared_types::{CommandAck, CommandEnvelope};

// ============================================================================
// shared-crypto: hash and MAC throughput
// ============================================================================

fn bench_hashing(c: &mut Criterion) {
    let mut group = c.benchmark_group("shared-crypto");
    let key = [0x42u8; 32];

    for size in [64usize, 1024, 16 * 1024] {
        let data = vec![0xA5u8; size];
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::new("sha256", size), &data, |b, data| {
            b.iter(|| black_box(sha256(data)))
        });
        group.bench_with_input(BenchmarkId::new("hmac_sha256", size), &data, |b, data| {
            b.iter(|| black_box(hmac_sha256(&key, data)))
        });
    }

    group.finish();
}

// ============================================================================
// cg-01: canonicalization and verification
// ============================================================================

fn bench_authentication(c: &mut Criterion) {
    let mut group = c.benchmark_group("cg-01-command-auth");

    for keys in [4usize, 16, 64] {
        let params = wide_parameters(keys);
        group.bench_with_input(BenchmarkId::new("canonicalize_flat", keys), &params, |b, p| {
            b.iter(|| black_box(canonicalize(p)))
        });
    }

    let deep = nested_parameters(10);
    group.bench_function("canonicalize_depth_10", |b| {
        b.iter(|| black_box(canonicalize(&deep)))
    });

    let secret = device_secret();
    let cmd = signed_command(&fresh_command_id(), &secret);
    group.bench_function("signing_string", |b| {
        b.iter(|| black_box(build_signing_string(&cmd)))
    });
    group.bench_function("verify_valid", |b| {
        b.iter(|| black_box(verify(&cmd, Some(&secret)).is_ok()))
    });

    let forged = signed_command(&fresh_command_id(), &foreign_secret());
    group.bench_function("verify_forged", |b| {
        b.iter(|| black_box(verify(&forged, Some(&secret)).is_err()))
    });

    group.finish();
}

// ============================================================================
// cg-02: dispatch
// ============================================================================

struct NullSink;

impl AckSink for NullSink {
    fn emit(&self, ack: &CommandAck) -> Result<(), DispatchError> {
        black_box(ack);
        Ok(())
    }
}

fn bench_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("cg-02-command-dispatch");
    let topic = format!("room/{ROOM_ID}/device/{DEVICE_ID}/cmd");

    let mut dispatcher = CommandDispatcher::new(
        DispatcherConfig::new(ROOM_ID, DEVICE_ID),
        CommandAuthService::new(device_secret()),
        |_: &CommandEnvelope| HandlerOutcome::Accept,
        NullSink,
    )
    .expect("valid config");

    let duplicate = to_line(&signed_command("bench-dup", &device_secret()));
    dispatcher.process(&topic, duplicate.as_bytes());
    group.bench_function("process_duplicate", |b| {
        b.iter(|| black_box(dispatcher.process(&topic, duplicate.as_bytes())))
    });

    // Pre-signed so the measurement covers dispatch, not signing.
    let fresh: Vec<String> = (0..1024)
        .map(|_| {
            to_line(&signed_action(
                &fresh_command_id(),
                "MOVE",
                json!({"target": 45, "speed": "slow"}),
                &device_secret(),
            ))
        })
        .collect();
    let mut next = 0usize;
    group.throughput(Throughput::Elements(1));
    group.bench_function("process_fresh", |b| {
        b.iter(|| {
            let line = &fresh[next % fresh.len()];
            next += 1;
            black_box(dispatcher.process(&topic, line.as_bytes()))
        })
    });

    group.finish();
}

criterion_group!(benches, bench_hashing, bench_authentication, bench_dispatch);
criterion_main!(benches);
