//! Target-allocation document (signals.json) loading.
//!
//! The document is produced upstream. Only the fields the rebalancer needs are
//! read; anything else in the file is ignored.

use std::path::Path;

use chrono::{DateTime, Utc};
use notional::{DuplicatePolicy, TargetAllocation, TargetEntry};
use serde::Deserialize;

use crate::error::{Error, Result};

/// A target allocation as published by the signal source.
#[derive(Debug, Clone, Deserialize)]
pub struct SignalsDocument {
    #[serde(default)]
    pub as_of: Option<DateTime<Utc>>,
    /// Percent of equity kept as cash. Clamped to `[0, 100]` when applied.
    #[serde(default)]
    pub cash_target_pct: f64,
    #[serde(default)]
    pub positions: Vec<SignalPosition>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// One row of the target list.
#[derive(Debug, Clone, Deserialize)]
pub struct SignalPosition {
    pub ticker: String,
    #[serde(default)]
    pub target_weight_pct: f64,
    /// Absent means uncapped.
    #[serde(default)]
    pub max_weight_pct: Option<f64>,
}

impl SignalsDocument {
    /// Load a signals.json file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| Error::SignalsRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_json(&contents)
    }

    /// Parse from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Rows in document order, ready for weight resolution.
    pub fn entries(&self) -> Vec<TargetEntry> {
        self.positions
            .iter()
            .map(|p| TargetEntry::new(p.ticker.trim(), p.target_weight_pct, p.max_weight_pct))
            .collect()
    }

    /// Resolve the document into the planner's input.
    pub fn to_allocation(&self, policy: DuplicatePolicy) -> Result<TargetAllocation> {
        Ok(TargetAllocation::from_pct(
            self.cash_target_pct,
            &self.entries(),
            policy,
        )?)
    }
}
