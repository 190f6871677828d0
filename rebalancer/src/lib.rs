//! notional-rebalancer: executor that moves a brokerage account onto a target allocation.
//!
//! Reads a signals document (cash reserve plus capped target weights), fetches
//! live equity and positions from Alpaca, plans notional market orders with the
//! `notional` core, and submits them with an audit trail and an optional chat
//! notification.

pub mod audit;
pub mod broker;
pub mod config;
pub mod error;
pub mod execution;
pub mod notify;
pub mod reconcile;
pub mod signals;
