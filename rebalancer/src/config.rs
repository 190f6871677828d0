//! Configuration: optional TOML file plus environment overrides.
//!
//! Built once in `main` and passed down. Nothing below the binary reads the
//! environment.

use std::path::{Path, PathBuf};
use std::time::Duration;

use notional::{DuplicatePolicy, PlanOptions, TimeInForce};
use notional_broker::alpaca::auth::Credentials;
use notional_broker::alpaca::client::PAPER_BASE_URL;
use serde::Deserialize;

use crate::error::{Error, Result};

pub const ENV_KEY_ID: &str = "ALPACA_KEY_ID";
pub const ENV_SECRET_KEY: &str = "ALPACA_SECRET_KEY";
pub const ENV_BASE_URL: &str = "ALPACA_PAPER_BASE_URL";
pub const ENV_WEBHOOK_URL: &str = "SLACK_WEBHOOK_URL";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub connection: ConnectionConfig,
    #[serde(default)]
    pub execution: ExecutionConfig,
    #[serde(default)]
    pub notify: NotifyConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Clone, Deserialize)]
pub struct ConnectionConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub key_id: Option<String>,
    #[serde(default)]
    pub secret_key: Option<String>,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            key_id: None,
            secret_key: None,
        }
    }
}

impl std::fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("key_id", &self.key_id)
            .field("secret_key", &self.secret_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

fn default_base_url() -> String {
    PAPER_BASE_URL.into()
}
fn default_timeout() -> u64 {
    10
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExecutionConfig {
    #[serde(default = "default_min_notional")]
    pub min_notional_usd: f64,
    #[serde(default)]
    pub time_in_force: TimeInForce,
    #[serde(default)]
    pub order_interval_ms: u64,
    #[serde(default)]
    pub duplicate_policy: DuplicatePolicy,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            min_notional_usd: default_min_notional(),
            time_in_force: TimeInForce::Day,
            order_interval_ms: 0,
            duplicate_policy: DuplicatePolicy::LastWriteWins,
        }
    }
}

fn default_min_notional() -> f64 {
    notional::DEFAULT_MIN_NOTIONAL
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NotifyConfig {
    #[serde(default)]
    pub webhook_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_dir")]
    pub dir: String,
    #[serde(default = "default_audit_file")]
    pub audit_file: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: default_log_dir(),
            audit_file: default_audit_file(),
        }
    }
}

fn default_log_dir() -> String {
    "./logs".into()
}
fn default_audit_file() -> String {
    "audit.jsonl".into()
}

impl Config {
    /// Load config from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| Error::ConfigRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_toml(&contents)
    }

    /// Parse and validate TOML text.
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Build the process configuration: the file (if any), then the environment.
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(p) => Self::load(p)?,
            None => Self::default(),
        };
        config.apply_env(|k| std::env::var(k).ok());
        config.validate()?;
        Ok(config)
    }

    /// Overlay values from `var` (normally `std::env::var`). Empty values are ignored.
    pub fn apply_env<F>(&mut self, var: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |k: &str| var(k).filter(|v| !v.trim().is_empty());
        if let Some(v) = get(ENV_KEY_ID) {
            self.connection.key_id = Some(v);
        }
        if let Some(v) = get(ENV_SECRET_KEY) {
            self.connection.secret_key = Some(v);
        }
        if let Some(v) = get(ENV_BASE_URL) {
            self.connection.base_url = v;
        }
        if let Some(v) = get(ENV_WEBHOOK_URL) {
            self.notify.webhook_url = Some(v);
        }
    }

    /// Validate config invariants.
    fn validate(&self) -> Result<()> {
        let url = self.connection.base_url.trim();
        if url.is_empty() {
            return Err(Error::Config("base_url must not be empty".into()));
        }
        if !(url.starts_with("https://") || url.starts_with("http://")) {
            return Err(Error::Config(format!(
                "base_url must be an http(s) URL, got {url}"
            )));
        }
        if self.connection.timeout_secs == 0 {
            return Err(Error::Config("timeout_secs must be > 0".into()));
        }
        if !(self.execution.min_notional_usd >= 0.0) {
            return Err(Error::Config("min_notional_usd must be >= 0".into()));
        }
        Ok(())
    }

    /// API credentials. Fails before any broker call when either part is missing.
    pub fn credentials(&self) -> Result<Credentials> {
        let key_id = self
            .connection
            .key_id
            .as_deref()
            .ok_or(Error::MissingCredentials(ENV_KEY_ID))?;
        let secret = self
            .connection
            .secret_key
            .as_deref()
            .ok_or(Error::MissingCredentials(ENV_SECRET_KEY))?;
        Credentials::new(key_id, secret).map_err(|e| Error::Config(e.to_string()))
    }

    /// Deadline applied to every broker and webhook request.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.connection.timeout_secs)
    }

    pub fn plan_options(&self) -> PlanOptions {
        PlanOptions {
            min_notional: self.execution.min_notional_usd,
        }
    }

    /// Full path to the audit log file.
    pub fn audit_path(&self) -> PathBuf {
        Path::new(&self.logging.dir).join(&self.logging.audit_file)
    }
}
