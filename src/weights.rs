//! Weight resolution: target/max percentages → one effective weight per ticker.

use rustc_hash::FxHashMap;

use crate::{Symbol, WeightError};

/// Cap applied when an entry carries no `max_weight_pct`.
pub const UNCAPPED_PCT: f64 = 100.0;

/// One row of the target list, in percent.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TargetEntry {
    pub symbol: Symbol,
    pub target_weight_pct: f64,
    pub max_weight_pct: Option<f64>,
}

impl TargetEntry {
    pub fn new(symbol: &str, target_weight_pct: f64, max_weight_pct: Option<f64>) -> Self {
        Self {
            symbol: Symbol::new(symbol),
            target_weight_pct,
            max_weight_pct,
        }
    }

    /// `min(target, max) / 100`. No other clamping: negative weights stay negative.
    pub fn effective_weight(&self) -> f64 {
        let cap = self.max_weight_pct.unwrap_or(UNCAPPED_PCT);
        self.target_weight_pct.min(cap) / 100.0
    }
}

/// What to do when the same ticker appears twice in a target list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DuplicatePolicy {
    /// The later entry's weight replaces the earlier one. The ticker keeps the
    /// position of its first appearance.
    #[default]
    LastWriteWins,
    /// Fail with [`WeightError::DuplicateSymbol`].
    Reject,
}

/// Effective weights in target-list order, with O(1) lookup.
#[derive(Clone, Debug, Default)]
pub struct ResolvedWeights {
    entries: Vec<(Symbol, f64)>,
    index: FxHashMap<Symbol, usize>,
}

impl ResolvedWeights {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite. Returns `true` if the ticker was already present.
    pub fn insert(&mut self, symbol: Symbol, weight: f64) -> bool {
        if let Some(&i) = self.index.get(&symbol) {
            self.entries[i].1 = weight;
            return true;
        }
        self.index.insert(symbol.clone(), self.entries.len());
        self.entries.push((symbol, weight));
        false
    }

    pub fn get(&self, symbol: &Symbol) -> Option<f64> {
        self.index.get(symbol).map(|&i| self.entries[i].1)
    }

    pub fn contains(&self, symbol: &Symbol) -> bool {
        self.index.contains_key(symbol)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Symbol, f64)> {
        self.entries.iter().map(|(s, w)| (s, *w))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of effective weights. May be above 1.0, below it, or negative.
    pub fn total(&self) -> f64 {
        self.entries.iter().map(|(_, w)| w).sum()
    }
}

impl FromIterator<(Symbol, f64)> for ResolvedWeights {
    fn from_iter<I: IntoIterator<Item = (Symbol, f64)>>(iter: I) -> Self {
        let mut weights = ResolvedWeights::new();
        for (symbol, weight) in iter {
            weights.insert(symbol, weight);
        }
        weights
    }
}

/// Reduce each target entry to its effective weight.
pub fn resolve_weights(
    entries: &[TargetEntry],
    policy: DuplicatePolicy,
) -> Result<ResolvedWeights, WeightError> {
    let mut weights = ResolvedWeights::new();
    for entry in entries {
        let replaced = weights.insert(entry.symbol.clone(), entry.effective_weight());
        if replaced && policy == DuplicatePolicy::Reject {
            return Err(WeightError::DuplicateSymbol(entry.symbol.clone()));
        }
    }
    Ok(weights)
}
