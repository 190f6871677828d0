//! Reconciliation: compare held values against the desired allocation.

use notional::{Allocation, PositionSnapshot, Symbol};
use rustc_hash::FxHashMap;
use serde::Serialize;

/// Reconciliation report comparing held vs desired.
#[derive(Debug, Clone, Serialize)]
pub struct ReconcileReport {
    pub equity: f64,
    pub entries: Vec<ReconcileEntry>,
    pub tracking_error_pct: f64,
}

/// One symbol's reconciliation entry. Weights are fractions of equity.
#[derive(Debug, Clone, Serialize)]
pub struct ReconcileEntry {
    pub symbol: String,
    pub target_weight: f64,
    pub actual_weight: f64,
    pub diff_weight: f64,
    pub desired_value: f64,
    pub held_value: f64,
    pub diff_value: f64,
}

impl ReconcileReport {
    pub fn entry(&self, symbol: &str) -> Option<&ReconcileEntry> {
        self.entries.iter().find(|e| e.symbol == symbol)
    }
}

/// Compare held positions against the desired allocation.
///
/// Symbols held outside the target set appear with a desired value of 0.
pub fn reconcile(allocation: &Allocation, positions: &PositionSnapshot) -> ReconcileReport {
    let equity = allocation.equity;
    let desired_map: FxHashMap<&Symbol, f64> =
        allocation.desired.iter().map(|(s, v)| (s, *v)).collect();

    // Collect all symbols from both target and held
    let mut all_symbols: Vec<&Symbol> = allocation.desired.iter().map(|(s, _)| s).collect();
    for (sym, _) in positions.iter() {
        if !desired_map.contains_key(sym) {
            all_symbols.push(sym);
        }
    }
    all_symbols.sort();
    all_symbols.dedup();

    let weight = |value: f64| if equity > 0.0 { value / equity } else { 0.0 };

    let mut entries = Vec::with_capacity(all_symbols.len());
    let mut sum_sq_diff = 0.0_f64;

    for sym in &all_symbols {
        let desired_value = desired_map.get(sym).copied().unwrap_or(0.0);
        let held_value = positions.value_of(sym);
        let target_weight = weight(desired_value);
        let actual_weight = weight(held_value);
        let diff_weight = actual_weight - target_weight;
        sum_sq_diff += diff_weight * diff_weight;

        entries.push(ReconcileEntry {
            symbol: sym.as_str().to_string(),
            target_weight,
            actual_weight,
            diff_weight,
            desired_value,
            held_value,
            diff_value: held_value - desired_value,
        });
    }

    let tracking_error_pct = (sum_sq_diff / all_symbols.len().max(1) as f64).sqrt() * 100.0;

    ReconcileReport {
        equity,
        entries,
        tracking_error_pct,
    }
}

impl std::fmt::Display for ReconcileReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "RECONCILIATION (equity ${:.2}):", self.equity)?;
        writeln!(
            f,
            "  {:8} {:>10} {:>10} {:>10} {:>12} {:>12}",
            "Symbol", "Target%", "Actual%", "Diff%", "Desired", "Held"
        )?;
        for e in &self.entries {
            writeln!(
                f,
                "  {:8} {:>9.2}% {:>9.2}% {:>+9.2}% ${:>11.2} ${:>11.2}",
                e.symbol,
                e.target_weight * 100.0,
                e.actual_weight * 100.0,
                e.diff_weight * 100.0,
                e.desired_value,
                e.held_value,
            )?;
        }
        writeln!(f, "\n  Tracking error: {:.3}%", self.tracking_error_pct)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notional::{ResolvedWeights, allocate};

    fn aapl() -> Symbol {
        Symbol::new("AAPL")
    }
    fn msft() -> Symbol {
        Symbol::new("MSFT")
    }

    fn half_aapl(equity: f64) -> Allocation {
        let weights: ResolvedWeights = [(aapl(), 0.5)].into_iter().collect();
        // Half the equity in cash so AAPL's desired value is equity / 2
        allocate(equity, 0.5, &weights)
    }

    #[test]
    fn perfect_match() {
        let allocation = half_aapl(10_000.0);
        let positions = PositionSnapshot::from_pairs([(aapl(), 5_000.0)]);

        let report = reconcile(&allocation, &positions);
        assert!(report.tracking_error_pct < 1e-9);
        let e = report.entry("AAPL").unwrap();
        assert!((e.target_weight - 0.5).abs() < 1e-12);
        assert!(e.diff_value.abs() < 1e-9);
    }

    #[test]
    fn missing_position() {
        let allocation = half_aapl(10_000.0);
        let report = reconcile(&allocation, &PositionSnapshot::new());
        assert!(report.tracking_error_pct > 1.0);
        assert_eq!(report.entries[0].held_value, 0.0);
        assert!((report.entries[0].diff_value + 5_000.0).abs() < 1e-9);
    }

    #[test]
    fn extra_position() {
        let allocation = half_aapl(10_000.0);
        let positions = PositionSnapshot::from_pairs([(aapl(), 5_000.0), (msft(), 1_000.0)]);

        let report = reconcile(&allocation, &positions);
        // MSFT shows up with a zero target but a held value
        let m = report.entry("MSFT").unwrap();
        assert_eq!(m.target_weight, 0.0);
        assert!((m.actual_weight - 0.1).abs() < 1e-12);
        assert_eq!(m.desired_value, 0.0);
    }

    #[test]
    fn zero_equity_gives_zero_weights() {
        let allocation = half_aapl(0.0);
        let positions = PositionSnapshot::from_pairs([(aapl(), 100.0)]);
        let report = reconcile(&allocation, &positions);
        assert_eq!(report.entries[0].actual_weight, 0.0);
        assert_eq!(report.entries[0].held_value, 100.0);
    }

    #[test]
    fn display_format() {
        let allocation = half_aapl(10_000.0);
        let positions = PositionSnapshot::from_pairs([(aapl(), 4_900.0)]);
        let s = format!("{}", reconcile(&allocation, &positions));
        assert!(s.contains("AAPL"));
        assert!(s.contains("-1.00%"));
        assert!(s.contains("Tracking error"));
    }
}
