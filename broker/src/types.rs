//! Shared broker types: accounts, positions, orders, acknowledgements.

use notional::{Notional, Side, Symbol, TimeInForce};

/// Account summary from the broker, in dollars.
#[derive(Debug, Clone, Default)]
pub struct Account {
    pub equity: f64,
    pub cash: f64,
    pub buying_power: f64,
    pub trading_blocked: bool,
    pub account_blocked: bool,
    /// Broker lifecycle status, e.g. `"ACTIVE"`.
    pub status: String,
}

impl Account {
    /// Whether any block flag prevents trading.
    pub fn is_blocked(&self) -> bool {
        self.trading_blocked || self.account_blocked
    }

    /// Human-readable reason when blocked.
    pub fn blocked_reason(&self) -> Option<String> {
        if !self.is_blocked() {
            return None;
        }
        let what = if self.account_blocked {
            "account blocked"
        } else {
            "trading blocked"
        };
        if self.status.is_empty() {
            Some(what.to_string())
        } else {
            Some(format!("{what} (status {})", self.status))
        }
    }
}

/// Broker-level position.
#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    pub symbol: Symbol,
    /// Positive = long, negative = short. Fractional for notional fills.
    pub qty: f64,
    /// Current market value in dollars; 0 when the broker has no price.
    pub market_value: f64,
}

/// Notional market order to submit.
#[derive(Debug, Clone, PartialEq)]
pub struct NotionalOrder {
    pub symbol: Symbol,
    pub side: Side,
    /// Unsigned order size; direction is carried by `side`.
    pub notional: Notional,
    pub time_in_force: TimeInForce,
}

/// Broker acknowledgement of an accepted order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderAck {
    pub id: String,
    pub status: String,
}
