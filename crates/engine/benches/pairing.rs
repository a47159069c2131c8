//! Benchmarks for a full pairing request
//!
//! Run with: cargo bench --package engine

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use engine::{ConsumerPolicy, PairingConfig, PairingOrchestrator, Provider};

const LOCATIONS: [&str; 4] = ["EU", "US", "ASIA", "AFRICA"];
const FEATURES: [&str; 6] = ["grpc", "rest", "rpc", "ws", "archive", "trace"];

fn synthetic_providers(count: usize) -> Vec<Provider> {
    (0..count)
        .map(|i| {
            let features = FEATURES.iter().copied().skip(i % 3).take(2 + i % 4);
            Provider::new(
                format!("provider-{i}"),
                ((i * 7919) % 10_000) as i64,
                LOCATIONS[i % LOCATIONS.len()],
                features,
            )
        })
        .collect()
}

fn bench_get_pairing_list(c: &mut Criterion) {
    let orchestrator =
        PairingOrchestrator::new(PairingConfig::default()).expect("Failed to create orchestrator");
    let policy = ConsumerPolicy::new(Some("EU"), ["rpc"], 1_000);

    let mut group = c.benchmark_group("get_pairing_list");
    for count in [100, 1_000, 10_000] {
        let providers = synthetic_providers(count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &providers, |b, providers| {
            b.iter(|| {
                let top = orchestrator.get_pairing_list(black_box(providers), Some(&policy));
                black_box(top)
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_get_pairing_list);
criterion_main!(benches);
