// Allow our dollar.cents digit grouping convention (e.g., 100_00 = $100.00)
#![allow(clippy::inconsistent_digit_grouping)]

//! Property-based tests for the rebalancing invariants.
//!
//! These tests use proptest to verify that the scaling, capping and
//! planning rules hold across randomly generated allocations.

use notional::{
    AccountSnapshot, DuplicatePolicy, InstructionKind, PlanOptions, PlanOutcome,
    PositionSnapshot, Side, Symbol, TargetAllocation, TargetEntry, allocate, plan_rebalance,
};
use proptest::prelude::*;

/// Target rows with distinct tickers T00, T01, ...
fn entries_strategy() -> impl Strategy<Value = Vec<TargetEntry>> {
    prop::collection::vec((0.0f64..=100.0, prop::option::of(0.0f64..=100.0)), 0..20).prop_map(
        |rows| {
            rows.into_iter()
                .enumerate()
                .map(|(i, (tgt, cap))| TargetEntry::new(&format!("T{i:02}"), tgt, cap))
                .collect()
        },
    )
}

/// Held positions with tickers that may or may not overlap the targets
fn positions_strategy() -> impl Strategy<Value = Vec<(String, f64)>> {
    prop::collection::vec((0usize..40, -5_000.0f64..50_000.0), 0..20).prop_map(|rows| {
        rows.into_iter()
            .map(|(i, v)| (format!("T{i:02}"), v))
            .collect()
    })
}

fn equity_strategy() -> impl Strategy<Value = f64> {
    1.0f64..10_000_000.0
}

fn cash_pct_strategy() -> impl Strategy<Value = f64> {
    -20.0f64..=120.0
}

fn snapshot(rows: &[(String, f64)]) -> PositionSnapshot {
    PositionSnapshot::from_pairs(rows.iter().map(|(s, v)| (Symbol::new(s), *v)))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    // ========================================================================
    // SCALING INVARIANTS
    // ========================================================================

    /// Desired values sum to investable equity whenever total weight > 0
    #[test]
    fn desired_sums_to_investable(
        entries in entries_strategy(),
        equity in equity_strategy(),
        cash_pct in cash_pct_strategy(),
    ) {
        let target = TargetAllocation::from_pct(cash_pct, &entries, DuplicatePolicy::Reject).unwrap();
        let alloc = allocate(equity, target.cash_target_fraction, &target.weights);

        let expected = equity * (1.0 - target.cash_target_fraction);
        prop_assert!((alloc.investable - expected).abs() <= 1e-9 * equity.max(1.0));

        if alloc.total_weight > 0.0 {
            let tol = 1e-9 * equity.max(1.0);
            prop_assert!(
                (alloc.desired_total() - alloc.investable).abs() <= tol,
                "sum {} != investable {}", alloc.desired_total(), alloc.investable
            );
        } else {
            prop_assert!(alloc.desired.iter().all(|(_, v)| *v == 0.0));
        }
    }

    /// Effective weight is always min(target, max)
    #[test]
    fn effective_weight_is_capped(
        tgt in -50.0f64..=150.0,
        cap in prop::option::of(0.0f64..=100.0),
    ) {
        let e = TargetEntry::new("X", tgt, cap);
        let expected = tgt.min(cap.unwrap_or(100.0)) / 100.0;
        prop_assert_eq!(e.effective_weight(), expected);
    }

    /// Cash fraction always lands in [0, 1]
    #[test]
    fn cash_fraction_in_unit_interval(cash_pct in cash_pct_strategy()) {
        let t = TargetAllocation::from_pct(cash_pct, &[], DuplicatePolicy::default()).unwrap();
        prop_assert!((0.0..=1.0).contains(&t.cash_target_fraction));
    }

    // ========================================================================
    // PLANNING INVARIANTS
    // ========================================================================

    /// Every held ticker outside the target set gets exactly one sell for its full value
    #[test]
    fn dropped_tickers_liquidated_once(
        entries in entries_strategy(),
        held in positions_strategy(),
        equity in equity_strategy(),
    ) {
        let target = TargetAllocation::from_pct(10.0, &entries, DuplicatePolicy::Reject).unwrap();
        let positions = snapshot(&held);

        let PlanOutcome::Planned(plan) =
            plan_rebalance(&AccountSnapshot::new(equity), &target, &positions, &PlanOptions::default())
        else {
            return Err(TestCaseError::fail("unexpected block"));
        };

        for (sym, value) in positions.iter() {
            let hits: Vec<_> = plan.instructions.iter().filter(|i| i.symbol == *sym).collect();
            if target.weights.contains(sym) {
                prop_assert!(hits.len() <= 1);
                prop_assert!(hits.iter().all(|i| i.kind == InstructionKind::Rebalance));
            } else {
                prop_assert_eq!(hits.len(), 1);
                prop_assert_eq!(hits[0].side, Side::Sell);
                prop_assert_eq!(hits[0].kind, InstructionKind::Liquidate);
                prop_assert_eq!(hits[0].abs_notional(), notional::Notional::from_dollars(value.abs()));
            }
        }
    }

    /// Rebalance instructions only appear at or above the dust threshold
    #[test]
    fn rebalances_respect_threshold(
        entries in entries_strategy(),
        held in positions_strategy(),
        equity in equity_strategy(),
        min_notional in 0.01f64..1_000.0,
    ) {
        let target = TargetAllocation::from_pct(0.0, &entries, DuplicatePolicy::Reject).unwrap();
        let positions = snapshot(&held);
        let opts = PlanOptions { min_notional };

        let PlanOutcome::Planned(plan) =
            plan_rebalance(&AccountSnapshot::new(equity), &target, &positions, &opts)
        else {
            return Err(TestCaseError::fail("unexpected block"));
        };

        for (sym, desired) in &plan.allocation.desired {
            let diff = desired - positions.value_of(sym);
            let emitted = plan.instructions.iter().any(|i| i.symbol == *sym);
            prop_assert_eq!(emitted, diff.abs() >= min_notional);
        }

        for i in &plan.instructions {
            match i.side {
                Side::Buy => prop_assert!(i.notional.0 > 0),
                Side::Sell => prop_assert!(i.notional.0 <= 0),
            }
        }
    }

    /// A blocked account never yields instructions
    #[test]
    fn blocked_yields_nothing(
        entries in entries_strategy(),
        held in positions_strategy(),
        equity in equity_strategy(),
    ) {
        let target = TargetAllocation::from_pct(0.0, &entries, DuplicatePolicy::Reject).unwrap();
        let outcome = plan_rebalance(
            &AccountSnapshot::blocked(equity, "blocked"),
            &target,
            &snapshot(&held),
            &PlanOptions::default(),
        );
        prop_assert!(
            matches!(outcome, PlanOutcome::Blocked { .. }),
            "blocked account must not plan orders"
        );
    }
}
