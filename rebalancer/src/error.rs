//! Error types for the rebalancer.

use std::path::PathBuf;

use notional::WeightError;
use notional_broker::BrokerError;

/// All errors that can occur during rebalancer operation.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("failed to read config file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("missing credentials: set {0}")]
    MissingCredentials(&'static str),

    #[error("signals file error: {0}")]
    Signals(#[from] WeightError),

    #[error("failed to read signals file {path}: {source}")]
    SignalsRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse signals JSON: {0}")]
    SignalsParse(#[from] serde_json::Error),

    #[error("broker connection error: {0}")]
    Connection(#[source] BrokerError),

    #[error("position fetch failed, refusing to trade against unknown holdings: {0}")]
    PositionsUnavailable(#[source] BrokerError),

    #[error("confirmation prompt failed: {0}")]
    Prompt(String),

    #[error("notification failed: {0}")]
    Notify(String),

    #[error("audit log error: {0}")]
    Audit(#[from] std::io::Error),
}

impl Error {
    /// Process exit code: 2 for setup problems, 1 for everything else.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Config(_)
            | Error::ConfigRead { .. }
            | Error::ConfigParse(_)
            | Error::MissingCredentials(_) => 2,
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
