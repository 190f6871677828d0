// Allow our dollar.cents digit grouping convention (e.g., 100_00 = $100.00)
#![allow(clippy::inconsistent_digit_grouping)]

//! Edge-case tests: degenerate weights, caps, dust and liquidation scenarios.

use notional::{
    AccountSnapshot, DuplicatePolicy, InstructionKind, Notional, PlanOptions, PlanOutcome,
    PositionSnapshot, RebalancePlan, Side, Symbol, TargetAllocation, TargetEntry, WeightError,
    plan_rebalance,
};

fn sym(s: &str) -> Symbol {
    Symbol::new(s)
}

fn plan(
    equity: f64,
    cash_pct: f64,
    entries: &[TargetEntry],
    held: &[(&str, f64)],
) -> RebalancePlan {
    let target = TargetAllocation::from_pct(cash_pct, entries, DuplicatePolicy::LastWriteWins)
        .expect("last-write-wins never fails");
    let positions = PositionSnapshot::from_pairs(held.iter().map(|&(s, v)| (sym(s), v)));
    match plan_rebalance(
        &AccountSnapshot::new(equity),
        &target,
        &positions,
        &PlanOptions::default(),
    ) {
        PlanOutcome::Planned(plan) => plan,
        PlanOutcome::Blocked { reason } => panic!("unexpected block: {reason}"),
    }
}

// ============================================================================
// Degenerate weights
// ============================================================================

#[test]
fn empty_target_liquidates_everything() {
    let p = plan(10_000.0, 20.0, &[], &[("C", 200.0)]);
    assert_eq!(p.allocation.total_weight, 0.0);
    assert_eq!(p.allocation.scale, 0.0);
    assert_eq!(p.instructions.len(), 1);
    assert_eq!(p.instructions[0].symbol, sym("C"));
    assert_eq!(p.instructions[0].side, Side::Sell);
    assert_eq!(p.instructions[0].abs_notional(), Notional(200_00));
}

#[test]
fn all_zero_weights_sell_down_held_targets() {
    // Desired is 0 for every target, so held targets are sold toward zero
    let p = plan(
        10_000.0,
        0.0,
        &[TargetEntry::new("A", 0.0, None), TargetEntry::new("B", 0.0, None)],
        &[("A", 1_000.0), ("B", 3.0)],
    );
    assert_eq!(p.allocation.scale, 0.0);
    assert_eq!(p.instructions.len(), 1);
    assert_eq!(p.instructions[0].symbol, sym("A"));
    assert_eq!(p.instructions[0].kind, InstructionKind::Rebalance);
    assert_eq!(p.instructions[0].notional, Notional(-1_000_00));
}

#[test]
fn nothing_held_nothing_targeted() {
    let p = plan(10_000.0, 0.0, &[], &[]);
    assert!(p.is_empty());
    assert_eq!(p.gross_notional(), Notional::ZERO);
}

#[test]
fn zero_equity_sells_held_targets() {
    let p = plan(0.0, 0.0, &[TargetEntry::new("A", 50.0, None)], &[("A", 100.0)]);
    assert_eq!(p.instructions.len(), 1);
    assert_eq!(p.instructions[0].side, Side::Sell);
}

// ============================================================================
// Caps and normalisation
// ============================================================================

#[test]
fn cap_is_never_exceeded_relative_to_peers() {
    // B wants 90% but is capped at 10%; A is uncapped at 10%
    let p = plan(
        1_000.0,
        0.0,
        &[TargetEntry::new("A", 10.0, None), TargetEntry::new("B", 90.0, Some(10.0))],
        &[],
    );
    let a = p.allocation.desired_value(&sym("A")).unwrap();
    let b = p.allocation.desired_value(&sym("B")).unwrap();
    assert!((a - b).abs() < 1e-9, "capped B should match A, got {a} vs {b}");
    assert!((a + b - 1_000.0).abs() < 1e-9);
}

#[test]
fn over_subscribed_normalises_to_investable() {
    let p = plan(
        10_000.0,
        10.0,
        &[
            TargetEntry::new("A", 80.0, None),
            TargetEntry::new("B", 80.0, None),
            TargetEntry::new("C", 40.0, None),
        ],
        &[],
    );
    assert!((p.allocation.total_weight - 2.0).abs() < 1e-12);
    assert!((p.allocation.desired_total() - 9_000.0).abs() < 1e-6);
    assert_eq!(p.instructions[0].notional, Notional(3_600_00));
    assert_eq!(p.instructions[2].notional, Notional(1_800_00));
}

#[test]
fn negative_weight_targets_a_short() {
    let p = plan(
        1_000.0,
        0.0,
        &[TargetEntry::new("A", 100.0, None), TargetEntry::new("S", -50.0, None)],
        &[],
    );
    // total = 0.5, scale = 2000
    assert!((p.allocation.scale - 2_000.0).abs() < 1e-9);
    let short = p.instructions.iter().find(|i| i.symbol == sym("S")).unwrap();
    assert_eq!(short.side, Side::Sell);
    assert_eq!(short.notional, Notional(-1_000_00));
}

#[test]
fn starter_allocation_caps_every_segment() {
    // Mirrors the static starter table: 8 safe names at 10% capped to 6%,
    // 2 risky at 2.5% capped to 1%, 4 analyst picks at 3.75% under a 5% cap.
    let mut entries = Vec::new();
    for t in ["MSFT", "AAPL", "JNJ", "PG", "V", "PEP", "COST", "WMT"] {
        entries.push(TargetEntry::new(t, 10.0, Some(6.0)));
    }
    for t in ["PLTR", "TSLA"] {
        entries.push(TargetEntry::new(t, 2.5, Some(1.0)));
    }
    for t in ["LMT", "XOM", "NEE", "GOOGL"] {
        entries.push(TargetEntry::new(t, 3.75, Some(5.0)));
    }
    let p = plan(100_000.0, 20.0, &entries, &[]);

    // 8*0.06 + 2*0.01 + 4*0.0375 = 0.65
    assert!((p.allocation.total_weight - 0.65).abs() < 1e-12);
    assert_eq!(p.instructions.len(), 14);
    assert!((p.allocation.desired_total() - 80_000.0).abs() < 1e-6);
    let msft = p.allocation.desired_value(&sym("MSFT")).unwrap();
    let pltr = p.allocation.desired_value(&sym("PLTR")).unwrap();
    assert!((msft / pltr - 6.0).abs() < 1e-9);
}

// ============================================================================
// Duplicates
// ============================================================================

#[test]
fn duplicate_last_write_wins() {
    let p = plan(
        1_000.0,
        0.0,
        &[
            TargetEntry::new("A", 50.0, None),
            TargetEntry::new("B", 50.0, None),
            TargetEntry::new("A", 0.0, None),
        ],
        &[],
    );
    assert_eq!(p.allocation.desired.len(), 2);
    assert_eq!(p.allocation.desired[0].0, sym("A"));
    assert_eq!(p.allocation.desired_value(&sym("A")), Some(0.0));
    assert_eq!(p.instructions.len(), 1);
    assert_eq!(p.instructions[0].symbol, sym("B"));
}

#[test]
fn duplicate_rejected_under_strict_policy() {
    let err = TargetAllocation::from_pct(
        0.0,
        &[TargetEntry::new("A", 50.0, None), TargetEntry::new("A", 10.0, None)],
        DuplicatePolicy::Reject,
    )
    .unwrap_err();
    assert_eq!(err, WeightError::DuplicateSymbol(sym("A")));
}

// ============================================================================
// Dust and rounding
// ============================================================================

#[test]
fn just_below_threshold_is_skipped() {
    let p = plan(1_000.0, 0.0, &[TargetEntry::new("A", 100.0, None)], &[("A", 995.001)]);
    assert!(p.is_empty());
}

#[test]
fn exactly_threshold_is_emitted() {
    let p = plan(1_000.0, 0.0, &[TargetEntry::new("A", 100.0, None)], &[("A", 1_005.0)]);
    assert_eq!(p.instructions.len(), 1);
    assert_eq!(p.instructions[0].notional, Notional(-5_00));
}

#[test]
fn notional_rounded_to_cents() {
    let p = plan(1_000.0, 0.0, &[TargetEntry::new("A", 100.0, None)], &[("A", 333.3333)]);
    assert_eq!(p.instructions[0].notional, Notional(666_67));
    assert_eq!(p.instructions[0].notional.to_decimal_string(), "666.67");
}
