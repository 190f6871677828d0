//! Broker trait and implementations for notional.
//!
//! The rebalancer needs exactly four things from a brokerage: an account
//! snapshot, the current positions, a way to cancel open orders, and a way to
//! submit a notional market order. `Broker` captures that contract.
//! Implementations:
//!
//! - **Alpaca** (feature `alpaca`): Alpaca trading REST API (v2)
//! - **Mock**: in-memory broker with scripted responses for tests

pub mod error;
pub mod mock;
pub mod types;

#[cfg(feature = "alpaca")]
pub mod alpaca;

pub use error::BrokerError;
pub use types::*;

/// Account/position provider and order sink.
///
/// Every call is blocking and bounded by the implementation's request
/// timeout. A timed-out call is reported as an error.
pub trait Broker {
    /// Account equity and trading status.
    fn account(&self) -> Result<Account, BrokerError>;

    /// All open positions. `Ok(vec![])` means the account is flat;
    /// a failed fetch is always an `Err`.
    fn positions(&self) -> Result<Vec<Position>, BrokerError>;

    /// Cancel every open order. Returns how many cancel requests were issued.
    fn cancel_all_orders(&self) -> Result<usize, BrokerError>;

    /// Submit a notional market order.
    fn submit_order(&self, order: &NotionalOrder) -> Result<OrderAck, BrokerError>;
}

impl<B: Broker + ?Sized> Broker for Box<B> {
    fn account(&self) -> Result<Account, BrokerError> {
        (**self).account()
    }

    fn positions(&self) -> Result<Vec<Position>, BrokerError> {
        (**self).positions()
    }

    fn cancel_all_orders(&self) -> Result<usize, BrokerError> {
        (**self).cancel_all_orders()
    }

    fn submit_order(&self, order: &NotionalOrder) -> Result<OrderAck, BrokerError> {
        (**self).submit_order(order)
    }
}
