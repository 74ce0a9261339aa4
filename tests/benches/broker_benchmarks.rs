//! # Secure Download Broker Benchmarks
//!
//! | Operation | Target |
//! |-----------|--------|
//! | Token derivation | < 5μs |
//! | Register (in-memory cache) | < 50μs |
//! | Retrieve (in-memory cache) | < 50μs |

use std::sync::Arc;
use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use sd_token_broker::{BrokerConfig, InMemoryCache, Token, TokenBroker, TokenBrokerApi};

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("tokio runtime")
}

fn broker() -> TokenBroker<Arc<InMemoryCache>> {
    let config = BrokerConfig {
        hash_salt: "bench-salt".into(),
        ..BrokerConfig::default()
    };
    TokenBroker::new(config, Arc::new(InMemoryCache::new())).expect("valid config")
}

// ============================================================================
// Token derivation
// ============================================================================

fn bench_token_derivation(c: &mut Criterion) {
    let mut group = c.benchmark_group("token-derivation");

    for len in [16usize, 256, 4096] {
        let identity = "x".repeat(len);
        group.throughput(Throughput::Bytes(len as u64));
        group.bench_with_input(BenchmarkId::new("hmac_sha256", len), &identity, |b, id| {
            b.iter(|| black_box(Token::derive("bench-salt", id)))
        });
    }

    group.finish();
}

// ============================================================================
// Broker round trips
// ============================================================================

fn bench_register_retrieve(c: &mut Criterion) {
    let rt = runtime();
    let broker = broker();
    let mut group = c.benchmark_group("broker");
    group.measurement_time(Duration::from_secs(5));

    group.bench_function("pre_authorize", |b| {
        let mut i = 0u64;
        b.iter(|| {
            i += 1;
            rt.block_on(broker.pre_authorize(&format!("resource-{i}"), "k1", Some(60)))
                .expect("register")
        })
    });

    let token = rt
        .block_on(broker.pre_authorize("hot-resource", "k1", None))
        .expect("register");

    group.bench_function("retrieve_granted", |b| {
        b.iter(|| black_box(rt.block_on(broker.retrieve(token.as_str(), "k1")).is_ok()))
    });

    group.bench_function("retrieve_wrong_key", |b| {
        b.iter(|| black_box(rt.block_on(broker.retrieve(token.as_str(), "k2")).is_err()))
    });

    group.bench_function("retrieve_malformed", |b| {
        b.iter(|| black_box(rt.block_on(broker.retrieve("garbage", "k1")).is_err()))
    });

    group.finish();
}

criterion_group!(benches, bench_token_derivation, bench_register_retrieve);
criterion_main!(benches);
