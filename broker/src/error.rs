//! Broker error types.

/// Errors that can occur during broker operations.
#[derive(Debug, thiserror::Error)]
pub enum BrokerError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("failed to parse broker response: {0}")]
    Parse(String),

    #[error("order error: {0}")]
    Order(String),

    #[error("authentication error: {0}")]
    Auth(String),
}

impl BrokerError {
    /// HTTP status code, if the broker answered with one.
    pub fn status(&self) -> Option<u16> {
        match self {
            BrokerError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}
