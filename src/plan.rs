//! Diff & order planning: current holdings → signed notional instructions.
//!
//! The planner is a pure function of the account snapshot, the target
//! allocation and the position snapshot. It emits liquidations first (in
//! position-snapshot order), then rebalancing adjustments (in target order).
//! Cancelling stale open orders is a side effect left to the caller.

use crate::scale::{Allocation, allocate};
use crate::{AccountSnapshot, Notional, PositionSnapshot, Side, Symbol, TargetAllocation};

/// Adjustments smaller than this many dollars are skipped as dust.
pub const DEFAULT_MIN_NOTIONAL: f64 = 5.00;

/// Why an instruction was emitted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum InstructionKind {
    /// Held ticker no longer in the target set; sell the full value.
    Liquidate,
    /// Move a target ticker toward its desired value.
    Rebalance,
}

/// A single notional market order to send to the broker.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OrderInstruction {
    pub symbol: Symbol,
    pub side: Side,
    /// Signed amount: positive for buys, negative for sells.
    pub notional: Notional,
    pub kind: InstructionKind,
}

impl OrderInstruction {
    /// Unsigned order size sent alongside `side`.
    pub fn abs_notional(&self) -> Notional {
        self.notional.abs()
    }
}

/// Tunables for [`plan_rebalance`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlanOptions {
    /// Inclusive dust threshold in dollars for rebalance adjustments.
    /// Liquidations ignore it.
    pub min_notional: f64,
}

impl Default for PlanOptions {
    fn default() -> Self {
        Self {
            min_notional: DEFAULT_MIN_NOTIONAL,
        }
    }
}

/// Instructions for one cycle together with the targets they were derived from.
#[derive(Clone, Debug, Default)]
pub struct RebalancePlan {
    pub allocation: Allocation,
    pub instructions: Vec<OrderInstruction>,
}

impl RebalancePlan {
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    pub fn buys(&self) -> impl Iterator<Item = &OrderInstruction> {
        self.instructions.iter().filter(|i| i.side == Side::Buy)
    }

    pub fn sells(&self) -> impl Iterator<Item = &OrderInstruction> {
        self.instructions.iter().filter(|i| i.side == Side::Sell)
    }

    /// Sum of absolute instruction sizes.
    pub fn gross_notional(&self) -> Notional {
        Notional(self.instructions.iter().map(|i| i.notional.0.abs()).sum())
    }
}

/// Result of planning one cycle.
#[derive(Clone, Debug)]
pub enum PlanOutcome {
    /// The account cannot trade; nothing was planned.
    Blocked { reason: String },
    Planned(RebalancePlan),
}

/// Compute the order instructions that move `positions` onto `target`.
pub fn plan_rebalance(
    account: &AccountSnapshot,
    target: &TargetAllocation,
    positions: &PositionSnapshot,
    opts: &PlanOptions,
) -> PlanOutcome {
    if account.trading_blocked {
        let reason = account
            .blocked_reason
            .clone()
            .unwrap_or_else(|| "trading blocked".to_string());
        return PlanOutcome::Blocked { reason };
    }

    let allocation = allocate(account.equity, target.cash_target_fraction, &target.weights);
    let mut instructions = Vec::with_capacity(positions.len() + allocation.desired.len());

    // 1. Liquidate everything held outside the target set, dust included
    for (symbol, held) in positions.iter() {
        if target.weights.contains(symbol) {
            continue;
        }
        instructions.push(OrderInstruction {
            symbol: symbol.clone(),
            side: Side::Sell,
            notional: Notional(-Notional::from_dollars(held).0.abs()),
            kind: InstructionKind::Liquidate,
        });
    }

    // 2. Move each target toward its desired value
    for (symbol, desired) in &allocation.desired {
        let diff = desired - positions.value_of(symbol);
        if diff.abs() < opts.min_notional {
            continue;
        }
        instructions.push(OrderInstruction {
            symbol: symbol.clone(),
            side: Side::from_delta(diff),
            notional: Notional::from_dollars(diff),
            kind: InstructionKind::Rebalance,
        });
    }

    PlanOutcome::Planned(RebalancePlan {
        allocation,
        instructions,
    })
}
