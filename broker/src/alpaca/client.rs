//! Alpaca trading REST client.

use std::time::Duration;

use log::{debug, info};
use reqwest::blocking::{Client, Response};
use serde::de::DeserializeOwned;

use super::auth::Credentials;
use super::types::{
    AccountResponse, CancelStatus, ErrorBody, OrderRequest, OrderResponse, PositionResponse,
};
use crate::error::BrokerError;

/// Paper-trading endpoint.
pub const PAPER_BASE_URL: &str = "https://paper-api.alpaca.markets";

/// Per-request deadline used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Blocking Alpaca REST client.
pub struct AlpacaClient {
    client: Client,
    credentials: Credentials,
    base_url: String,
}

impl AlpacaClient {
    /// Create a client. Every request is bounded by `timeout`.
    pub fn new(
        credentials: Credentials,
        base_url: &str,
        timeout: Duration,
    ) -> Result<Self, BrokerError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BrokerError::Connection(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            credentials,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get account information (GET /v2/account).
    pub fn account(&self) -> Result<AccountResponse, BrokerError> {
        let url = format!("{}/v2/account", self.base_url);
        let resp = self
            .credentials
            .apply(self.client.get(&url))
            .send()
            .map_err(|e| BrokerError::Connection(format!("account request failed: {e}")))?;

        parse_json(check_status(resp)?, "account")
    }

    /// List open positions (GET /v2/positions).
    pub fn positions(&self) -> Result<Vec<PositionResponse>, BrokerError> {
        let url = format!("{}/v2/positions", self.base_url);
        let resp = self
            .credentials
            .apply(self.client.get(&url))
            .send()
            .map_err(|e| BrokerError::Connection(format!("positions request failed: {e}")))?;

        let positions: Vec<PositionResponse> = parse_json(check_status(resp)?, "positions")?;
        info!("Fetched {} positions", positions.len());
        Ok(positions)
    }

    /// Cancel all open orders (DELETE /v2/orders).
    pub fn cancel_all_orders(&self) -> Result<Vec<CancelStatus>, BrokerError> {
        let url = format!("{}/v2/orders", self.base_url);
        let resp = self
            .credentials
            .apply(self.client.delete(&url))
            .send()
            .map_err(|e| BrokerError::Connection(format!("cancel request failed: {e}")))?;

        let body = check_status(resp)?
            .text()
            .map_err(|e| BrokerError::Parse(format!("cancel response: {e}")))?;
        if body.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&body)
            .map_err(|e| BrokerError::Parse(format!("cancel response: {e}")))
    }

    /// Submit a new order (POST /v2/orders).
    pub fn submit_order(&self, order: &OrderRequest) -> Result<OrderResponse, BrokerError> {
        let url = format!("{}/v2/orders", self.base_url);

        debug!(
            "Submitting Alpaca order: {} {} notional={} tif={}",
            order.side, order.symbol, order.notional, order.time_in_force
        );

        let resp = self
            .credentials
            .apply(self.client.post(&url))
            .json(order)
            .send()
            .map_err(|e| BrokerError::Order(format!("order request failed: {e}")))?;

        parse_json(check_status(resp)?, "order")
    }
}

/// Turn any non-2xx response into `BrokerError::Http`, keeping Alpaca's message.
fn check_status(resp: Response) -> Result<Response, BrokerError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let text = resp.text().unwrap_or_default();
    Err(BrokerError::Http {
        status: status.as_u16(),
        body: error_message(&text),
    })
}

/// Extract `message` from an Alpaca error body, falling back to the raw text.
pub fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(e) if !e.message.is_empty() => {
            if e.code == 0 {
                e.message
            } else {
                format!("{} (code {})", e.message, e.code)
            }
        }
        _ => body.to_string(),
    }
}

fn parse_json<T: DeserializeOwned>(resp: Response, what: &str) -> Result<T, BrokerError> {
    resp.json::<T>()
        .map_err(|e| BrokerError::Parse(format!("failed to parse {what}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_message_uses_alpaca_body() {
        let body = r#"{"code": 40310000, "message": "insufficient buying power"}"#;
        assert_eq!(
            error_message(body),
            "insufficient buying power (code 40310000)"
        );
    }

    #[test]
    fn error_message_falls_back_to_raw() {
        assert_eq!(error_message("Bad Gateway"), "Bad Gateway");
        assert_eq!(error_message(r#"{"message": ""}"#), r#"{"message": ""}"#);
    }

    #[test]
    fn base_url_trailing_slash_trimmed() {
        let creds = Credentials::new("k", "s").unwrap();
        let c = AlpacaClient::new(creds, "https://paper-api.alpaca.markets/", DEFAULT_TIMEOUT)
            .unwrap();
        assert_eq!(c.base_url(), PAPER_BASE_URL);
    }
}
