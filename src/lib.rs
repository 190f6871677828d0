// Allow our dollar.cents digit grouping convention (e.g., 100_00 = $100.00)
#![allow(clippy::inconsistent_digit_grouping)]

//! # notional
//!
//! Deterministic rebalancing core: turns a target allocation, live account
//! equity and current holdings into signed notional market orders.
//!
//! ## Pipeline
//!
//! 1. **Resolve weights**: each `(ticker, target %, max %)` row becomes
//!    `min(target, max) / 100`.
//! 2. **Scale capital**: `investable = equity * (1 - cash_fraction)`, and every
//!    weight is multiplied by `investable / total_weight`. The desired values
//!    always sum to `investable`, whether the weights are over- or
//!    under-subscribed.
//! 3. **Plan**: held tickers outside the target set are liquidated in full;
//!    target tickers get a buy or sell for `desired - held` when the gap is at
//!    least the dust threshold ($5.00 by default).
//!
//! ## Quick Start
//!
//! ```
//! use notional::{
//!     AccountSnapshot, DuplicatePolicy, Notional, PlanOptions, PlanOutcome,
//!     PositionSnapshot, Side, Symbol, TargetAllocation, TargetEntry, plan_rebalance,
//! };
//!
//! let target = TargetAllocation::from_pct(
//!     20.0,
//!     &[
//!         TargetEntry::new("A", 50.0, Some(50.0)),
//!         TargetEntry::new("B", 60.0, Some(40.0)), // capped at 40%
//!     ],
//!     DuplicatePolicy::Reject,
//! )
//! .unwrap();
//!
//! let held = PositionSnapshot::from_pairs([
//!     (Symbol::new("A"), 3_000.0),
//!     (Symbol::new("B"), 1_000.0),
//! ]);
//!
//! let PlanOutcome::Planned(plan) =
//!     plan_rebalance(&AccountSnapshot::new(10_000.0), &target, &held, &PlanOptions::default())
//! else {
//!     panic!("account is not blocked");
//! };
//!
//! assert_eq!(plan.instructions.len(), 2);
//! assert_eq!(plan.instructions[0].side, Side::Buy);
//! assert_eq!(plan.instructions[0].notional, Notional(1444_44));
//! assert_eq!(plan.instructions[1].notional, Notional(2555_56));
//! ```
//!
//! ## Amounts
//!
//! Snapshot values and desired targets are `f64` dollars. Order sizes are
//! rounded to whole cents in [`Notional`]:
//!
//! ```
//! use notional::Notional;
//!
//! let n = Notional::from_dollars(-1444.444);
//! assert_eq!(format!("{n}"), "-$1444.44");
//! assert_eq!(n.to_decimal_string(), "1444.44");
//! ```

pub mod allocation;
mod error;
pub mod plan;
pub mod scale;
mod side;
pub mod snapshot;
mod tif;
mod types;
pub mod weights;

// Re-export public API
pub use allocation::TargetAllocation;
pub use error::WeightError;
pub use plan::{
    DEFAULT_MIN_NOTIONAL, InstructionKind, OrderInstruction, PlanOptions, PlanOutcome,
    RebalancePlan, plan_rebalance,
};
pub use scale::{Allocation, allocate, cash_fraction_from_pct, investable_equity};
pub use side::Side;
pub use snapshot::{AccountSnapshot, PositionSnapshot};
pub use tif::TimeInForce;
pub use types::{Notional, Symbol};
pub use weights::{DuplicatePolicy, ResolvedWeights, TargetEntry, UNCAPPED_PCT, resolve_weights};
