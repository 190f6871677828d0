//! Broker construction from the rebalancer config.

use notional_broker::Broker;
use notional_broker::alpaca::AlpacaBroker;

use crate::config::Config;
use crate::error::{Error, Result};

/// Build the Alpaca broker. Credentials are checked here, before any request.
pub fn connect(config: &Config) -> Result<Box<dyn Broker>> {
    let credentials = config.credentials()?;
    AlpacaBroker::new(
        credentials,
        &config.connection.base_url,
        config.request_timeout(),
    )
    .map(|broker| Box::new(broker) as Box<dyn Broker>)
    .map_err(Error::Connection)
}
