//! JSONL audit trail logging.
//!
//! Each rebalancer run appends events to an audit.jsonl file,
//! one JSON object per line.

use std::fs::{self, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::{DateTime, Utc};
use notional::{OrderInstruction, PositionSnapshot, RebalancePlan};
use notional_broker::{Account, OrderAck};
use serde::Serialize;

use crate::error::Result;

/// An audit event written to the JSONL trail.
#[derive(Debug, Clone, Serialize)]
pub struct AuditEvent {
    pub event: &'static str,
    pub ts: DateTime<Utc>,
    #[serde(flatten)]
    pub data: serde_json::Value,
}

/// Append-only audit logger.
pub struct AuditLog {
    writer: BufWriter<Box<dyn Write>>,
}

impl AuditLog {
    /// Open (or create) the audit log file for appending.
    pub fn open(path: &Path) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self::from_writer(file))
    }

    /// Audit into any writer, one JSON line per event.
    pub fn from_writer<W: Write + 'static>(writer: W) -> Self {
        Self {
            writer: BufWriter::new(Box::new(writer)),
        }
    }

    /// Log an event with arbitrary JSON data.
    pub fn log(&mut self, event: &'static str, data: serde_json::Value) -> Result<()> {
        let entry = AuditEvent {
            event,
            ts: Utc::now(),
            data,
        };
        let json = serde_json::to_string(&entry)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        writeln!(self.writer, "{json}")?;
        self.writer.flush()?;
        Ok(())
    }
}

pub fn log_run_started(audit: &mut AuditLog, signals_file: &str, dry_run: bool) -> Result<()> {
    audit.log(
        "run_started",
        serde_json::json!({
            "signals_file": signals_file,
            "dry_run": dry_run,
        }),
    )
}

pub fn log_account(audit: &mut AuditLog, account: &Account) -> Result<()> {
    audit.log(
        "account_fetched",
        serde_json::json!({
            "equity": account.equity,
            "cash": account.cash,
            "status": account.status,
            "trading_blocked": account.trading_blocked,
            "account_blocked": account.account_blocked,
        }),
    )
}

pub fn log_trading_blocked(audit: &mut AuditLog, reason: &str) -> Result<()> {
    audit.log("trading_blocked", serde_json::json!({ "reason": reason }))
}

pub fn log_positions(audit: &mut AuditLog, positions: &PositionSnapshot) -> Result<()> {
    let pos_data: Vec<_> = positions
        .iter()
        .map(|(symbol, value)| {
            serde_json::json!({
                "symbol": symbol.as_str(),
                "market_value": value,
            })
        })
        .collect();

    audit.log(
        "positions_fetched",
        serde_json::json!({
            "positions": pos_data,
            "gross_value": positions.gross_value(),
        }),
    )
}

pub fn log_plan(audit: &mut AuditLog, plan: &RebalancePlan) -> Result<()> {
    let a = &plan.allocation;
    audit.log(
        "plan_computed",
        serde_json::json!({
            "equity": a.equity,
            "cash_fraction": a.cash_fraction,
            "investable": a.investable,
            "total_weight": a.total_weight,
            "scale": a.scale,
            "orders": plan.instructions,
        }),
    )
}

pub fn log_orders_cancelled(audit: &mut AuditLog, count: usize) -> Result<()> {
    audit.log("orders_cancelled", serde_json::json!({ "count": count }))
}

pub fn log_cancel_failed(audit: &mut AuditLog, error: &str) -> Result<()> {
    audit.log("cancel_failed", serde_json::json!({ "error": error }))
}

pub fn log_order_submitted(
    audit: &mut AuditLog,
    instruction: &OrderInstruction,
    ack: &OrderAck,
) -> Result<()> {
    audit.log(
        "order_submitted",
        serde_json::json!({
            "symbol": instruction.symbol.as_str(),
            "side": instruction.side,
            "notional": instruction.notional.as_dollars(),
            "order_id": ack.id,
            "status": ack.status,
        }),
    )
}

pub fn log_order_failed(
    audit: &mut AuditLog,
    instruction: &OrderInstruction,
    error: &str,
) -> Result<()> {
    audit.log(
        "order_failed",
        serde_json::json!({
            "symbol": instruction.symbol.as_str(),
            "side": instruction.side,
            "notional": instruction.notional.as_dollars(),
            "error": error,
        }),
    )
}

pub fn log_run_completed(
    audit: &mut AuditLog,
    submitted: usize,
    succeeded: usize,
    failed: usize,
) -> Result<()> {
    audit.log(
        "run_completed",
        serde_json::json!({
            "submitted": submitted,
            "succeeded": succeeded,
            "failed": failed,
        }),
    )
}

pub fn log_notify_failed(audit: &mut AuditLog, error: &str) -> Result<()> {
    audit.log("notify_failed", serde_json::json!({ "error": error }))
}
