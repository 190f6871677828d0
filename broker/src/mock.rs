//! Mock broker for testing: implements the `Broker` trait with configurable behavior.
//!
//! Use this in integration tests to simulate broker responses without network calls.
//!
//! ```ignore
//! use notional_broker::mock::MockBroker;
//! use notional::Symbol;
//!
//! let broker = MockBroker::builder()
//!     .with_equity(10_000.0)
//!     .with_position(Symbol::new("AAPL"), 3_000.0)
//!     .reject_symbol(Symbol::new("TSLA"))
//!     .build();
//! ```

use std::sync::Mutex;

use notional::Symbol;

use crate::Broker;
use crate::error::BrokerError;
use crate::types::*;

/// A broker call, recorded in the order it was made.
#[derive(Clone, Debug, PartialEq)]
pub enum MockCall {
    Account,
    Positions,
    CancelAll,
    Submit(NotionalOrder),
}

/// Builder for `MockBroker`.
pub struct MockBrokerBuilder {
    account: Account,
    positions: Vec<Position>,
    open_orders: usize,
    fail_account: bool,
    fail_positions: bool,
    fail_cancel: bool,
    rejected: Vec<Symbol>,
}

impl MockBrokerBuilder {
    pub fn with_equity(mut self, equity: f64) -> Self {
        self.account.equity = equity;
        self.account.cash = equity;
        self.account.buying_power = equity;
        self
    }

    pub fn trading_blocked(mut self) -> Self {
        self.account.trading_blocked = true;
        self
    }

    pub fn account_blocked(mut self) -> Self {
        self.account.account_blocked = true;
        self
    }

    pub fn with_position(mut self, symbol: Symbol, market_value: f64) -> Self {
        self.positions.push(Position {
            symbol,
            qty: 0.0,
            market_value,
        });
        self
    }

    /// Number of open orders the first cancel-all will report.
    pub fn with_open_orders(mut self, n: usize) -> Self {
        self.open_orders = n;
        self
    }

    pub fn fail_account(mut self) -> Self {
        self.fail_account = true;
        self
    }

    pub fn fail_positions(mut self) -> Self {
        self.fail_positions = true;
        self
    }

    pub fn fail_cancel(mut self) -> Self {
        self.fail_cancel = true;
        self
    }

    /// Orders for this symbol are rejected with HTTP 422.
    pub fn reject_symbol(mut self, symbol: Symbol) -> Self {
        self.rejected.push(symbol);
        self
    }

    pub fn build(self) -> MockBroker {
        MockBroker {
            account: self.account,
            positions: self.positions,
            open_orders: Mutex::new(self.open_orders),
            fail_account: self.fail_account,
            fail_positions: self.fail_positions,
            fail_cancel: self.fail_cancel,
            rejected: self.rejected,
            next_order_id: Mutex::new(1),
            calls: Mutex::new(Vec::new()),
        }
    }
}

/// A mock broker that records every call and returns configurable responses.
pub struct MockBroker {
    account: Account,
    positions: Vec<Position>,
    open_orders: Mutex<usize>,
    fail_account: bool,
    fail_positions: bool,
    fail_cancel: bool,
    rejected: Vec<Symbol>,
    next_order_id: Mutex<u64>,
    calls: Mutex<Vec<MockCall>>,
}

impl MockBroker {
    pub fn builder() -> MockBrokerBuilder {
        MockBrokerBuilder {
            account: Account {
                equity: 100_000.0,
                cash: 100_000.0,
                buying_power: 100_000.0,
                trading_blocked: false,
                account_blocked: false,
                status: "ACTIVE".into(),
            },
            positions: Vec::new(),
            open_orders: 0,
            fail_account: false,
            fail_positions: false,
            fail_cancel: false,
            rejected: Vec::new(),
        }
    }

    /// Every call made so far, in order.
    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Orders that reached `submit_order`, accepted or not.
    pub fn submitted_orders(&self) -> Vec<NotionalOrder> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter_map(|c| match c {
                MockCall::Submit(o) => Some(o.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn cancel_calls(&self) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| matches!(c, MockCall::CancelAll))
            .count()
    }

    fn record(&self, call: MockCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl Broker for MockBroker {
    fn account(&self) -> Result<Account, BrokerError> {
        self.record(MockCall::Account);
        if self.fail_account {
            return Err(BrokerError::Connection("mock: account unavailable".into()));
        }
        Ok(self.account.clone())
    }

    fn positions(&self) -> Result<Vec<Position>, BrokerError> {
        self.record(MockCall::Positions);
        if self.fail_positions {
            return Err(BrokerError::Http {
                status: 503,
                body: "mock: positions unavailable".into(),
            });
        }
        Ok(self.positions.clone())
    }

    fn cancel_all_orders(&self) -> Result<usize, BrokerError> {
        self.record(MockCall::CancelAll);
        if self.fail_cancel {
            return Err(BrokerError::Connection("mock: cancel timed out".into()));
        }
        let mut open = self.open_orders.lock().unwrap();
        let cancelled = *open;
        *open = 0;
        Ok(cancelled)
    }

    fn submit_order(&self, order: &NotionalOrder) -> Result<OrderAck, BrokerError> {
        self.record(MockCall::Submit(order.clone()));

        if self.rejected.contains(&order.symbol) {
            return Err(BrokerError::Http {
                status: 422,
                body: format!("mock: order for {} rejected", order.symbol),
            });
        }

        let mut next = self.next_order_id.lock().unwrap();
        let id = *next;
        *next += 1;
        Ok(OrderAck {
            id: format!("mock-{id}"),
            status: "accepted".into(),
        })
    }
}
