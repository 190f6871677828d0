//! Execution orchestrator: account → positions → plan → cancel → submit → notify.
//!
//! This is the main workflow that ties together all components. One call runs
//! one sequential cycle; nothing is retried.

use std::time::Duration;

use log::{error, info, warn};
use notional::{
    AccountSnapshot, OrderInstruction, PlanOutcome, PositionSnapshot, RebalancePlan,
    TargetAllocation, TimeInForce, plan_rebalance,
};
use notional_broker::{Account, Broker, NotionalOrder, OrderAck, Position};

use crate::audit::{self, AuditLog};
use crate::broker;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::notify::{self, Notifier};
use crate::reconcile::{self, ReconcileReport};
use crate::signals::SignalsDocument;

/// Options for a rebalance run.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub dry_run: bool,
    /// Ask for interactive approval before cancelling and submitting.
    pub confirm: bool,
    pub signals_file: String,
}

/// How a cycle ended.
#[derive(Debug)]
pub enum CycleOutcome {
    /// The broker reports the account cannot trade. No orders were sent.
    Blocked { reason: String },
    /// Plan computed and shown; nothing sent.
    DryRun(RebalancePlan),
    /// The operator declined the confirmation prompt.
    Declined(RebalancePlan),
    Completed(CycleReport),
}

/// Result of one submitted order.
#[derive(Debug, Clone)]
pub struct OrderResult {
    pub instruction: OrderInstruction,
    pub outcome: std::result::Result<OrderAck, String>,
}

impl OrderResult {
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Summary of a completed cycle.
#[derive(Debug, Clone)]
pub struct CycleReport {
    pub equity: f64,
    pub target_count: usize,
    pub instructions: Vec<OrderInstruction>,
    /// Open orders cancelled before submission; `None` when the cancel call failed.
    pub cancelled: Option<usize>,
    pub submitted: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub results: Vec<OrderResult>,
}

impl CycleReport {
    /// One-line summary used for the chat notification.
    pub fn summary(&self) -> String {
        format!(
            "Rebalance done • equity=${:.2} • targets={} • orders {} ok/{} failed",
            self.equity, self.target_count, self.succeeded, self.failed
        )
    }
}

/// Account fields the planner needs.
pub fn to_account_snapshot(account: &Account) -> AccountSnapshot {
    AccountSnapshot {
        equity: account.equity,
        trading_blocked: account.is_blocked(),
        blocked_reason: account.blocked_reason(),
    }
}

/// Market value per held symbol, in broker order.
pub fn to_position_snapshot(positions: &[Position]) -> PositionSnapshot {
    PositionSnapshot::from_pairs(
        positions
            .iter()
            .map(|p| (p.symbol.clone(), p.market_value)),
    )
}

/// Broker order for one planned instruction. Direction moves into `side`.
pub fn instruction_to_order(instruction: &OrderInstruction, tif: TimeInForce) -> NotionalOrder {
    NotionalOrder {
        symbol: instruction.symbol.clone(),
        side: instruction.side,
        notional: instruction.abs_notional(),
        time_in_force: tif,
    }
}

/// Execute a full rebalance run against the configured broker.
pub fn run(config: &Config, signals: &SignalsDocument, opts: &RunOptions) -> Result<CycleOutcome> {
    let broker = broker::connect(config)?;
    let notifier = notify::from_config(config)?;
    let mut audit = AuditLog::open(&config.audit_path())?;
    run_cycle(
        broker.as_ref(),
        notifier.as_ref(),
        &mut audit,
        config,
        signals,
        opts,
    )
}

/// Run one cycle with explicit collaborators.
pub fn run_cycle(
    broker: &dyn Broker,
    notifier: &dyn Notifier,
    audit: &mut AuditLog,
    config: &Config,
    signals: &SignalsDocument,
    opts: &RunOptions,
) -> Result<CycleOutcome> {
    // Bad target lists fail before touching the broker
    let target = signals.to_allocation(config.execution.duplicate_policy)?;
    audit::log_run_started(audit, &opts.signals_file, opts.dry_run)?;

    // 1. Account
    let account = broker.account().map_err(Error::Connection)?;
    audit::log_account(audit, &account)?;
    println!(
        "Account ({}): ${:.2} equity, ${:.2} cash",
        account.status, account.equity, account.cash,
    );

    // 2. Blocked accounts stop here
    if let Some(reason) = account.blocked_reason() {
        warn!("Trading blocked: {reason}");
        audit::log_trading_blocked(audit, &reason)?;
        println!("Trading blocked: {reason}. No orders submitted.");
        return Ok(CycleOutcome::Blocked { reason });
    }

    // 3. Positions. A failed fetch is never read as "no holdings".
    let positions = broker.positions().map_err(Error::PositionsUnavailable)?;
    let snapshot = to_position_snapshot(&positions);
    audit::log_positions(audit, &snapshot)?;
    display_current_positions(&snapshot, account.equity);

    // 4. Plan
    let plan = match plan_rebalance(
        &to_account_snapshot(&account),
        &target,
        &snapshot,
        &config.plan_options(),
    ) {
        PlanOutcome::Planned(plan) => plan,
        PlanOutcome::Blocked { reason } => {
            audit::log_trading_blocked(audit, &reason)?;
            return Ok(CycleOutcome::Blocked { reason });
        }
    };
    audit::log_plan(audit, &plan)?;
    display_plan(&plan);

    // 5. Dry run stops here
    if opts.dry_run {
        println!("\n[DRY RUN] No orders submitted.");
        return Ok(CycleOutcome::DryRun(plan));
    }

    if opts.confirm {
        let confirmed = dialoguer::Confirm::new()
            .with_prompt("Execute?")
            .default(false)
            .interact()
            .map_err(|e| Error::Prompt(e.to_string()))?;

        audit.log("user_confirmed", serde_json::json!({ "approved": confirmed }))?;
        if !confirmed {
            println!("Aborted.");
            return Ok(CycleOutcome::Declined(plan));
        }
    }

    // 6. Clear stale open orders; a failure here does not stop the cycle.
    // From here on the broker has been touched, so audit failures only warn.
    let cancelled = match broker.cancel_all_orders() {
        Ok(n) => {
            info!("Cancelled {n} open orders");
            audit_after_send(audit::log_orders_cancelled(audit, n));
            Some(n)
        }
        Err(e) => {
            warn!("Cancel open orders failed: {e}");
            audit_after_send(audit::log_cancel_failed(audit, &e.to_string()));
            None
        }
    };

    // 7. Submit
    let results = submit_all(broker, audit, &plan.instructions, config);
    let succeeded = results.iter().filter(|r| r.is_ok()).count();

    let report = CycleReport {
        equity: account.equity,
        target_count: target.target_count(),
        instructions: plan.instructions,
        cancelled,
        submitted: results.len(),
        succeeded,
        failed: results.len() - succeeded,
        results,
    };

    audit_after_send(audit::log_run_completed(
        audit,
        report.submitted,
        report.succeeded,
        report.failed,
    ));
    println!(
        "\n{} submitted, {} ok, {} failed. Audit logged to {}",
        report.submitted,
        report.succeeded,
        report.failed,
        config.audit_path().display()
    );

    // 8. Best-effort notification
    if let Err(e) = notifier.notify(&report.summary()) {
        warn!("Notification failed: {e}");
        audit_after_send(audit::log_notify_failed(audit, &e.to_string()));
    }

    Ok(CycleOutcome::Completed(report))
}

/// Submit every instruction in order. A rejected order is recorded and the
/// loop moves on.
fn submit_all(
    broker: &dyn Broker,
    audit: &mut AuditLog,
    instructions: &[OrderInstruction],
    config: &Config,
) -> Vec<OrderResult> {
    let tif = config.execution.time_in_force;
    let interval = Duration::from_millis(config.execution.order_interval_ms);
    let mut results = Vec::with_capacity(instructions.len());

    for (i, instruction) in instructions.iter().enumerate() {
        let order = instruction_to_order(instruction, tif);
        print!(
            "[{}/{}] {} {} {} ... ",
            i + 1,
            instructions.len(),
            order.side,
            order.symbol,
            order.notional,
        );

        let outcome = match broker.submit_order(&order) {
            Ok(ack) => {
                println!("OK {} ({})", ack.id, ack.status);
                audit_after_send(audit::log_order_submitted(audit, instruction, &ack));
                Ok(ack)
            }
            Err(e) => {
                println!("ERROR: {e}");
                error!("Order failed for {}: {e}", order.symbol);
                audit_after_send(audit::log_order_failed(audit, instruction, &e.to_string()));
                Err(e.to_string())
            }
        };
        results.push(OrderResult {
            instruction: instruction.clone(),
            outcome,
        });

        // Rate limiting between orders
        if !interval.is_zero() && i + 1 < instructions.len() {
            std::thread::sleep(interval);
        }
    }

    results
}

/// Audit writes after orders have reached the broker must not abort the cycle.
fn audit_after_send(result: Result<()>) {
    if let Err(e) = result {
        warn!("Audit write failed: {e}");
    }
}

/// Show current positions.
pub fn show_positions(config: &Config) -> Result<()> {
    let broker = broker::connect(config)?;
    let account = broker.account().map_err(Error::Connection)?;
    let positions = broker.positions().map_err(Error::PositionsUnavailable)?;

    println!(
        "Account ({}): ${:.2} equity, ${:.2} cash, ${:.2} buying power\n",
        account.status, account.equity, account.cash, account.buying_power,
    );

    display_current_positions(&to_position_snapshot(&positions), account.equity);
    Ok(())
}

/// Check broker connectivity and account status.
pub fn check_status(config: &Config) -> Result<()> {
    print!("Connecting to {}... ", config.connection.base_url);

    let broker = broker::connect(config)?;
    let account = broker.account().map_err(Error::Connection)?;
    println!("OK");

    println!("Account ({}): ${:.2} equity", account.status, account.equity);
    if let Some(reason) = account.blocked_reason() {
        println!("Trading blocked: {reason}");
    }

    Ok(())
}

/// Compare held positions against a signals document without trading.
pub fn run_reconcile(config: &Config, signals: &SignalsDocument) -> Result<()> {
    let broker = broker::connect(config)?;
    let target = signals.to_allocation(config.execution.duplicate_policy)?;
    let report = reconcile_against(broker.as_ref(), &target)?;
    print!("{report}");
    Ok(())
}

/// Fetch account and positions, then reconcile them against `target`.
pub fn reconcile_against(broker: &dyn Broker, target: &TargetAllocation) -> Result<ReconcileReport> {
    let account = broker.account().map_err(Error::Connection)?;
    let positions = broker.positions().map_err(Error::PositionsUnavailable)?;
    let allocation = notional::allocate(account.equity, target.cash_target_fraction, &target.weights);
    Ok(reconcile::reconcile(
        &allocation,
        &to_position_snapshot(&positions),
    ))
}

// === Helpers ===

fn display_current_positions(positions: &PositionSnapshot, equity: f64) {
    if positions.is_empty() {
        println!("No positions.");
        return;
    }

    println!("CURRENT PORTFOLIO:");
    for (symbol, value) in positions.iter() {
        let weight = if equity > 0.0 { value / equity } else { 0.0 };
        println!(
            "  {:8} ${:>12.2}  ({:.1}%)",
            symbol,
            value,
            weight * 100.0,
        );
    }
}

fn display_plan(plan: &RebalancePlan) {
    let a = &plan.allocation;
    println!(
        "\nTARGET: investable ${:.2} ({:.1}% cash), total weight {:.4}, scale {:.2}",
        a.investable,
        a.cash_fraction * 100.0,
        a.total_weight,
        a.scale,
    );

    if plan.is_empty() {
        println!("\nNo rebalancing needed: portfolio matches target.");
        return;
    }

    println!("\nREBALANCE ORDERS:");
    println!(
        "  {:>3}  {:5} {:8} {:>12}  {}",
        "#", "Side", "Symbol", "Notional", "Kind"
    );
    for (i, ins) in plan.instructions.iter().enumerate() {
        println!(
            "  {:>3}  {:5} {:8} {:>12}  {:?}",
            i + 1,
            ins.side.to_string(),
            ins.symbol,
            ins.abs_notional().to_string(),
            ins.kind,
        );
    }
    println!(
        "\n{} buys, {} sells, gross {}",
        plan.buys().count(),
        plan.sells().count(),
        plan.gross_notional(),
    );
}
