//! Core types: Symbol, Notional

use std::fmt;

/// Instrument ticker as reported by the broker (e.g. `"AAPL"`, `"BRK.B"`).
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Symbol(String);

impl Symbol {
    pub fn new(s: &str) -> Self {
        Symbol(s.to_string())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // `{:8}` in tables relies on padding
        f.pad(&self.0)
    }
}

impl From<&str> for Symbol {
    fn from(s: &str) -> Self {
        Symbol::new(s)
    }
}

impl From<String> for Symbol {
    fn from(s: String) -> Self {
        Symbol(s)
    }
}

/// Signed dollar amount in cents.
///
/// `Notional(144_444)` is $1444.44. Buys are positive, sells negative.
/// Order sizes are carried as integer cents so the amount sent to the
/// broker is exactly the amount that was planned.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Notional(pub i64);

impl Notional {
    pub const ZERO: Notional = Notional(0);

    /// Round a dollar amount to the nearest cent (half away from zero).
    pub fn from_dollars(dollars: f64) -> Self {
        Notional((dollars * 100.0).round() as i64)
    }

    #[inline]
    pub fn abs(self) -> Self {
        Notional(self.0.abs())
    }

    #[inline]
    pub fn is_negative(self) -> bool {
        self.0 < 0
    }

    #[inline]
    pub fn as_dollars(self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Unsigned two-decimal form used on the wire, e.g. `"1444.44"`.
    pub fn to_decimal_string(self) -> String {
        let cents = self.0.unsigned_abs();
        format!("{}.{:02}", cents / 100, cents % 100)
    }
}

impl fmt::Display for Notional {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dollars = self.0 / 100;
        let cents = (self.0 % 100).abs();
        if self.0 < 0 {
            write!(f, "-${}.{:02}", dollars.abs(), cents)
        } else {
            write!(f, "${}.{:02}", dollars, cents)
        }
    }
}
