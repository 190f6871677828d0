// Allow our dollar.cents digit grouping convention (e.g., 100_00 = $100.00)
#![allow(clippy::inconsistent_digit_grouping)]

//! Planner benchmarks: weight resolution and full plan computation.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use notional::{
    AccountSnapshot, DuplicatePolicy, PlanOptions, PositionSnapshot, Symbol, TargetAllocation,
    TargetEntry, plan_rebalance, resolve_weights,
};

/// `n` target rows with deterministic weights and caps.
fn generate_entries(n: usize) -> Vec<TargetEntry> {
    // Simple deterministic PRNG (xorshift32)
    let mut rng_state: u32 = 42;
    (0..n)
        .map(|i| {
            rng_state ^= rng_state << 13;
            rng_state ^= rng_state >> 17;
            rng_state ^= rng_state << 5;
            let tgt = (rng_state % 1_000) as f64 / 100.0; // 0..10%
            let cap = if i % 3 == 0 { Some(5.0) } else { None };
            TargetEntry::new(&format!("S{i:04}"), tgt, cap)
        })
        .collect()
}

/// Held positions overlapping half of the targets plus `n / 2` dropped names.
fn generate_positions(n: usize) -> PositionSnapshot {
    PositionSnapshot::from_pairs(
        (0..n)
            .step_by(2)
            .map(|i| (Symbol::new(&format!("S{i:04}")), 1_000.0 + i as f64))
            .chain((0..n / 2).map(|i| (Symbol::new(&format!("OLD{i:04}")), 250.0))),
    )
}

fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("plan/resolve_weights");

    for n in [10, 100, 1_000] {
        let entries = generate_entries(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &entries, |b, entries| {
            b.iter(|| black_box(resolve_weights(entries, DuplicatePolicy::LastWriteWins)));
        });
    }

    group.finish();
}

fn bench_plan(c: &mut Criterion) {
    let mut group = c.benchmark_group("plan/plan_rebalance");
    let account = AccountSnapshot::new(1_000_000.0);
    let opts = PlanOptions::default();

    for n in [10, 100, 1_000] {
        let target =
            TargetAllocation::from_pct(20.0, &generate_entries(n), DuplicatePolicy::Reject)
                .expect("generated tickers are unique");
        let positions = generate_positions(n);

        group.bench_with_input(
            BenchmarkId::from_parameter(n),
            &(target, positions),
            |b, (target, positions)| {
                b.iter(|| black_box(plan_rebalance(&account, target, positions, &opts)));
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_resolve, bench_plan);
criterion_main!(benches);
