//! Cron-based scheduler driving periodic scan cycles

use super::runtime::ScanCycle;
use cron::Schedule;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum SchedulerError {
    #[error("Scheduler disabled: interval_seconds is 0")]
    Disabled,

    #[error("Invalid cron expression '{expression}': {message}")]
    InvalidCron { expression: String, message: String },
}

/// Cron expression (`sec min hour day month weekday`) firing every
/// `interval_seconds`
pub fn cron_expression(interval_seconds: u64) -> Result<String, SchedulerError> {
    match interval_seconds {
        0 => Err(SchedulerError::Disabled),
        s if s >= 3600 => Ok(format!("0 0 */{} * * *", s / 3600)),
        s if s >= 60 => Ok(format!("0 */{} * * * *", s / 60)),
        s => Ok(format!("*/{} * * * * *", s)),
    }
}

/// Runs a [`ScanCycle`] on every cron tick until stopped
pub struct ScanScheduler {
    cycle: Arc<ScanCycle>,
    schedule: Schedule,
    handle: Arc<RwLock<Option<tokio::task::JoinHandle<()>>>>,
}

impl ScanScheduler {
    pub fn new(cycle: Arc<ScanCycle>, interval_seconds: u64) -> Result<Self, SchedulerError> {
        let expression = cron_expression(interval_seconds)?;
        let schedule =
            Schedule::from_str(&expression).map_err(|e| SchedulerError::InvalidCron {
                expression: expression.clone(),
                message: e.to_string(),
            })?;

        info!(
            interval = interval_seconds,
            cron = %expression,
            "ScanScheduler: created with interval {}s",
            interval_seconds
        );

        Ok(Self {
            cycle,
            schedule,
            handle: Arc::new(RwLock::new(None)),
        })
    }

    pub async fn start(&self) {
        let cycle = self.cycle.clone();
        let schedule = self.schedule.clone();

        let handle = tokio::spawn(async move {
            info!("ScanScheduler: started, waiting for cron schedule...");

            loop {
                match schedule.upcoming(chrono::Utc).next() {
                    Some(next_tick) => {
                        let now = chrono::Utc::now();
                        if next_tick > now {
                            let duration = (next_tick - now).to_std().unwrap_or_default();
                            tokio::time::sleep(duration).await;
                        }
                    }
                    None => {
                        warn!("ScanScheduler: schedule has no upcoming ticks");
                        tokio::time::sleep(tokio::time::Duration::from_secs(60)).await;
                        continue;
                    }
                }

                let summary = cycle.run_once(chrono::Utc::now()).await;
                info!(
                    ran = summary.ran,
                    symbols = summary.symbols,
                    changes = summary.changes.len(),
                    new_alerts = summary.new_alerts.len(),
                    "ScanScheduler: cycle finished"
                );
            }
        });

        *self.handle.write().await = Some(handle);
        info!("ScanScheduler: started successfully");
    }

    pub async fn stop(&self) {
        if let Some(h) = self.handle.write().await.take() {
            h.abort();
            info!("ScanScheduler: stopped");
        }
    }

    pub async fn is_running(&self) -> bool {
        self.handle.read().await.is_some()
    }
}
