//! Target allocation for one rebalancing cycle.

use crate::scale::cash_fraction_from_pct;
use crate::{DuplicatePolicy, ResolvedWeights, TargetEntry, WeightError, resolve_weights};

/// Cash reserve plus effective weights, ready for the planner.
#[derive(Clone, Debug, Default)]
pub struct TargetAllocation {
    /// Fraction of equity held back as cash, in `[0, 1]`.
    pub cash_target_fraction: f64,
    pub weights: ResolvedWeights,
}

impl TargetAllocation {
    pub fn new(cash_target_fraction: f64, weights: ResolvedWeights) -> Self {
        Self {
            cash_target_fraction: cash_target_fraction.clamp(0.0, 1.0),
            weights,
        }
    }

    /// Build from the percent-based signal inputs.
    pub fn from_pct(
        cash_target_pct: f64,
        entries: &[TargetEntry],
        policy: DuplicatePolicy,
    ) -> Result<Self, WeightError> {
        Ok(Self {
            cash_target_fraction: cash_fraction_from_pct(cash_target_pct),
            weights: resolve_weights(entries, policy)?,
        })
    }

    pub fn target_count(&self) -> usize {
        self.weights.len()
    }
}
