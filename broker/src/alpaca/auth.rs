//! API key pair for Alpaca request headers.

use reqwest::blocking::RequestBuilder;
use zeroize::Zeroizing;

use crate::error::BrokerError;

/// Header carrying the key id.
pub const KEY_ID_HEADER: &str = "APCA-API-KEY-ID";
/// Header carrying the secret key.
pub const SECRET_KEY_HEADER: &str = "APCA-API-SECRET-KEY";

/// Key id and secret, wiped from memory on drop.
#[derive(Clone)]
pub struct Credentials {
    key_id: Zeroizing<String>,
    secret_key: Zeroizing<String>,
}

impl Credentials {
    /// Both parts must be non-empty.
    pub fn new(key_id: &str, secret_key: &str) -> Result<Self, BrokerError> {
        if key_id.trim().is_empty() {
            return Err(BrokerError::Auth("missing API key id".into()));
        }
        if secret_key.trim().is_empty() {
            return Err(BrokerError::Auth("missing API secret key".into()));
        }
        Ok(Self {
            key_id: Zeroizing::new(key_id.to_string()),
            secret_key: Zeroizing::new(secret_key.to_string()),
        })
    }

    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    /// Attach both auth headers to a request.
    pub fn apply(&self, req: RequestBuilder) -> RequestBuilder {
        req.header(KEY_ID_HEADER, self.key_id.as_str())
            .header(SECRET_KEY_HEADER, self.secret_key.as_str())
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("key_id", &self.key_id.as_str())
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_parts() {
        assert!(matches!(Credentials::new("", "s"), Err(BrokerError::Auth(_))));
        assert!(matches!(Credentials::new("k", "  "), Err(BrokerError::Auth(_))));
    }

    #[test]
    fn debug_redacts_secret() {
        let c = Credentials::new("PKTEST", "very-secret").unwrap();
        let s = format!("{c:?}");
        assert!(s.contains("PKTEST"));
        assert!(!s.contains("very-secret"));
    }
}
