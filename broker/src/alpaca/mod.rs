//! Alpaca broker implementation.

pub mod auth;
pub mod client;
pub mod types;

use std::time::Duration;

use log::{info, warn};
use notional::{Side, Symbol};

use crate::Broker;
use crate::error::BrokerError;
use crate::types::*;
use auth::Credentials;
use client::AlpacaClient;
use types::{AccountResponse, OrderRequest, PositionResponse, parse_decimal};

/// Alpaca broker implementing the generic Broker trait.
///
/// Uses the REST API for all operations. Blocking (sync) via reqwest::blocking.
pub struct AlpacaBroker {
    client: AlpacaClient,
}

impl AlpacaBroker {
    /// Build a broker handle. No request is made until the first call.
    pub fn new(
        credentials: Credentials,
        base_url: &str,
        timeout: Duration,
    ) -> Result<Self, BrokerError> {
        info!("Using Alpaca at {base_url} (key {})", credentials.key_id());
        Ok(Self {
            client: AlpacaClient::new(credentials, base_url, timeout)?,
        })
    }
}

/// Convert the wire account into the broker-neutral form.
pub fn to_account(resp: &AccountResponse) -> Result<Account, BrokerError> {
    Ok(Account {
        equity: parse_decimal("equity", &resp.equity)?,
        cash: parse_decimal("cash", &resp.cash)?,
        buying_power: parse_decimal("buying_power", &resp.buying_power)?,
        trading_blocked: resp.trading_blocked,
        account_blocked: resp.account_blocked,
        status: resp.status.clone(),
    })
}

/// Convert a wire position. A missing market value counts as 0.
pub fn to_position(resp: &PositionResponse) -> Result<Position, BrokerError> {
    let market_value = match resp.market_value.as_deref() {
        Some(v) => parse_decimal("market_value", v)?,
        None => 0.0,
    };
    Ok(Position {
        symbol: Symbol::new(&resp.symbol),
        qty: parse_decimal("qty", &resp.qty)?,
        market_value,
    })
}

/// Build the JSON body for a notional market order.
pub fn to_order_request(order: &NotionalOrder) -> OrderRequest {
    OrderRequest {
        symbol: order.symbol.as_str().to_string(),
        notional: order.notional.to_decimal_string(),
        side: match order.side {
            Side::Buy => "buy",
            Side::Sell => "sell",
        }
        .to_string(),
        order_type: "market".to_string(),
        time_in_force: order.time_in_force.as_code().to_string(),
    }
}

impl Broker for AlpacaBroker {
    fn account(&self) -> Result<Account, BrokerError> {
        to_account(&self.client.account()?)
    }

    fn positions(&self) -> Result<Vec<Position>, BrokerError> {
        self.client.positions()?.iter().map(to_position).collect()
    }

    fn cancel_all_orders(&self) -> Result<usize, BrokerError> {
        let statuses = self.client.cancel_all_orders()?;
        for s in statuses.iter().filter(|s| s.status >= 300) {
            warn!("Cancel of order {} returned {}", s.id, s.status);
        }
        Ok(statuses.len())
    }

    fn submit_order(&self, order: &NotionalOrder) -> Result<OrderAck, BrokerError> {
        let resp = self.client.submit_order(&to_order_request(order))?;
        Ok(OrderAck {
            id: resp.id,
            status: resp.status,
        })
    }
}
