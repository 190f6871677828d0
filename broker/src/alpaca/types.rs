//! Alpaca-specific API request and response types.
//!
//! Alpaca encodes money and quantities as decimal strings.

use serde::{Deserialize, Serialize};

use crate::error::BrokerError;

/// `GET /v2/account` response (fields we consume).
#[derive(Debug, Deserialize)]
pub struct AccountResponse {
    pub equity: String,
    #[serde(default)]
    pub cash: String,
    #[serde(default)]
    pub buying_power: String,
    #[serde(default)]
    pub trading_blocked: bool,
    #[serde(default)]
    pub account_blocked: bool,
    #[serde(default)]
    pub status: String,
}

/// One entry of `GET /v2/positions`.
#[derive(Debug, Deserialize)]
pub struct PositionResponse {
    pub symbol: String,
    #[serde(default)]
    pub qty: String,
    /// Null when Alpaca has no current price for the asset.
    #[serde(default)]
    pub market_value: Option<String>,
}

/// `POST /v2/orders` body for a notional market order.
#[derive(Debug, Serialize)]
pub struct OrderRequest {
    pub symbol: String,
    /// Dollar amount with two decimals, e.g. `"1444.44"`.
    pub notional: String,
    pub side: String,
    #[serde(rename = "type")]
    pub order_type: String,
    pub time_in_force: String,
}

/// `POST /v2/orders` response (fields we consume).
#[derive(Debug, Deserialize)]
pub struct OrderResponse {
    pub id: String,
    pub status: String,
}

/// One entry of the `DELETE /v2/orders` multi-status response.
#[derive(Debug, Deserialize)]
pub struct CancelStatus {
    pub id: String,
    pub status: u16,
}

/// Alpaca error body: `{"code": 40310000, "message": "..."}`.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub code: u64,
    #[serde(default)]
    pub message: String,
}

/// Parse a decimal string. Empty means zero.
pub fn parse_decimal(field: &str, value: &str) -> Result<f64, BrokerError> {
    if value.is_empty() {
        return Ok(0.0);
    }
    value
        .parse::<f64>()
        .map_err(|e| BrokerError::Parse(format!("{field}={value:?}: {e}")))
}
