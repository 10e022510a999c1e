//! folio-pilot: risk-averse portfolio advisor and auto-trading bot
//!
//! This library provides the core components for:
//! - Portfolio snapshots with derived weights and sector allocations
//! - Multi-factor risk assessment (diversification, concentration,
//!   sector, market beta, optional realized volatility)
//! - Rule-based trade recommendations under configurable policy limits
//! - Trade validation against live account state
//! - Sequential execution with dry-run support and session caps
//! - REST and simulated (paper) brokerage gateways
//! - Plain-text reporting and a full observability stack

pub mod cli;
pub mod config;
pub mod execution;
pub mod gateway;
pub mod portfolio;
pub mod report;
pub mod risk;
pub mod session;
pub mod strategy;
pub mod telemetry;
