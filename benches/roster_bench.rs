//! Roster Benchmarks — Request Hot-Path Costs
//!
//! Benchmarks what every request or listing pays: the request counter
//! bump, key minting, the record codec, and a full listing over the
//! in-memory store.
//!
//! Run with: cargo bench --bench roster_bench

use std::sync::Arc;

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use game_roster::adapters::persistence::MemoryStore;
use game_roster::domain::character::{Character, KeyMinter};
use game_roster::domain::counters::RequestCounters;
use game_roster::usecases::roster::CharacterService;

/// Benchmark the per-request counter increment.
fn bench_record_request(c: &mut Criterion) {
    let counters = RequestCounters::new();

    c.bench_function("record_request", |b| {
        b.iter(|| counters.record_request());
    });
}

/// Benchmark key minting plus formatting.
fn bench_mint_key(c: &mut Criterion) {
    let minter = KeyMinter::new();

    c.bench_function("mint_key", |b| {
        b.iter(|| black_box(minter.mint()).to_string());
    });
}

/// Benchmark record encode + decode.
fn bench_record_codec(c: &mut Criterion) {
    let character = Character {
        name: "Aria".to_string(),
        class: "Mage".to_string(),
        level: 42,
    };

    c.bench_function("record_codec", |b| {
        b.iter(|| {
            let bytes = black_box(&character).encode().unwrap();
            let _decoded = Character::decode(black_box(&bytes)).unwrap();
        });
    });
}

/// Benchmark listing a 1,000-character roster.
fn bench_list_roster(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let service = CharacterService::new(Arc::new(MemoryStore::new()));
    rt.block_on(async {
        for i in 0..1_000 {
            service
                .create(&format!("hero-{i}"), "Rogue", &i.to_string())
                .await
                .unwrap();
        }
    });

    c.bench_function("list_1000", |b| {
        b.to_async(&rt).iter(|| async {
            let listed = service.list().await.unwrap();
            black_box(listed.len())
        });
    });
}

criterion_group!(
    benches,
    bench_record_request,
    bench_mint_key,
    bench_record_codec,
    bench_list_roster,
);
criterion_main!(benches);
