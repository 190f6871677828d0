//! Account and position snapshots consumed by the planner.

use rustc_hash::FxHashMap;

use crate::Symbol;

/// Account state at the start of a cycle.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AccountSnapshot {
    /// Total account equity in dollars.
    pub equity: f64,
    pub trading_blocked: bool,
    /// Broker-supplied detail when blocked.
    pub blocked_reason: Option<String>,
}

impl AccountSnapshot {
    pub fn new(equity: f64) -> Self {
        Self {
            equity,
            trading_blocked: false,
            blocked_reason: None,
        }
    }

    pub fn blocked(equity: f64, reason: &str) -> Self {
        Self {
            equity,
            trading_blocked: true,
            blocked_reason: Some(reason.to_string()),
        }
    }
}

/// Current market value per held ticker, in the order the broker listed them.
///
/// Values may be negative for short positions; they are not special-cased.
#[derive(Clone, Debug, Default)]
pub struct PositionSnapshot {
    positions: Vec<(Symbol, f64)>,
    index: FxHashMap<Symbol, usize>,
}

impl PositionSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(symbol, market_value)` pairs. A repeated symbol overwrites
    /// the earlier value in place.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (Symbol, f64)>,
    {
        let mut snap = Self::new();
        for (symbol, value) in pairs {
            snap.insert(symbol, value);
        }
        snap
    }

    pub fn insert(&mut self, symbol: Symbol, market_value: f64) {
        if let Some(&i) = self.index.get(&symbol) {
            self.positions[i].1 = market_value;
        } else {
            self.index.insert(symbol.clone(), self.positions.len());
            self.positions.push((symbol, market_value));
        }
    }

    /// Held market value, 0 when the ticker is not held.
    pub fn value_of(&self, symbol: &Symbol) -> f64 {
        self.index
            .get(symbol)
            .map(|&i| self.positions[i].1)
            .unwrap_or(0.0)
    }

    pub fn contains(&self, symbol: &Symbol) -> bool {
        self.index.contains_key(symbol)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Symbol, f64)> {
        self.positions.iter().map(|(s, v)| (s, *v))
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Sum of absolute market values.
    pub fn gross_value(&self) -> f64 {
        self.positions.iter().map(|(_, v)| v.abs()).sum()
    }
}
