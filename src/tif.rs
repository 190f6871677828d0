//! Time-in-force for submitted market orders

use std::fmt;

/// How long a submitted order stays working at the broker.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum TimeInForce {
    /// Expires at the end of the current trading session.
    /// Fractional/notional orders are only accepted as DAY by most brokers.
    #[default]
    Day,

    /// Good-til-cancelled.
    Gtc,

    /// Immediate-or-cancel.
    Ioc,

    /// Fill-or-kill.
    Fok,
}

impl TimeInForce {
    /// Lower-case broker code (`"day"`, `"gtc"`, ...).
    pub fn as_code(self) -> &'static str {
        match self {
            TimeInForce::Day => "day",
            TimeInForce::Gtc => "gtc",
            TimeInForce::Ioc => "ioc",
            TimeInForce::Fok => "fok",
        }
    }
}

impl fmt::Display for TimeInForce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeInForce::Day => write!(f, "DAY"),
            TimeInForce::Gtc => write!(f, "GTC"),
            TimeInForce::Ioc => write!(f, "IOC"),
            TimeInForce::Fok => write!(f, "FOK"),
        }
    }
}
