//! Capital scaling: equity, cash reserve, and weights → dollar targets.
//!
//! Weights are not normalised to 1.0 first. Instead every weight is
//! multiplied by `investable / total_weight`, so the desired values always
//! add up to the investable equity whether the weights sum to 0.5 or 2.0.

use crate::{ResolvedWeights, Symbol};

/// Convert a cash-reserve percentage into a fraction in `[0, 1]`.
///
/// Values outside `[0, 100]` are clamped; NaN is treated as no reserve.
pub fn cash_fraction_from_pct(pct: f64) -> f64 {
    if pct.is_nan() {
        return 0.0;
    }
    pct.clamp(0.0, 100.0) / 100.0
}

/// Equity available for positions after the cash reserve is set aside.
#[inline]
pub fn investable_equity(equity: f64, cash_fraction: f64) -> f64 {
    equity * (1.0 - cash_fraction)
}

/// Dollar targets for one cycle.
#[derive(Clone, Debug, Default)]
pub struct Allocation {
    pub equity: f64,
    pub cash_fraction: f64,
    pub investable: f64,
    pub total_weight: f64,
    /// `investable / total_weight`, or 0 when `total_weight <= 0`.
    pub scale: f64,
    /// Desired market value per target ticker, in target order.
    pub desired: Vec<(Symbol, f64)>,
}

impl Allocation {
    pub fn desired_value(&self, symbol: &Symbol) -> Option<f64> {
        self.desired
            .iter()
            .find(|(s, _)| s == symbol)
            .map(|(_, v)| *v)
    }

    pub fn desired_total(&self) -> f64 {
        self.desired.iter().map(|(_, v)| v).sum()
    }
}

/// Scale effective weights into desired dollar values.
pub fn allocate(equity: f64, cash_fraction: f64, weights: &ResolvedWeights) -> Allocation {
    let investable = investable_equity(equity, cash_fraction);
    let total_weight = weights.total();
    let scale = if total_weight > 0.0 {
        investable / total_weight
    } else {
        0.0
    };

    let desired = weights
        .iter()
        .map(|(sym, w)| (sym.clone(), w * scale))
        .collect();

    Allocation {
        equity,
        cash_fraction,
        investable,
        total_weight,
        scale,
        desired,
    }
}
