//! signaldesk: momentum signals, alert-email scanning and options flow
//! analysis for equity traders.

pub mod alerts;
pub mod common;
pub mod config;
pub mod core;
pub mod error;
pub mod flows;
pub mod indicators;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod report;
pub mod services;
pub mod signals;
