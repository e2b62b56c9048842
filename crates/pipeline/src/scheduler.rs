//! Timed batch and retention runs.

use std::str::FromStr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Local};
use cron::Schedule;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::batch::BatchSummarizer;
use crate::error::{PipelineError, Result};
use crate::retention::RetentionSweeper;

/// Batch digests at 08:00, 13:00 and 19:00 local time.
pub const BATCH_SCHEDULE: &str = "0 0 8,13,19 * * *";

/// Retention sweep at 04:00 local time.
pub const SWEEP_SCHEDULE: &str = "0 0 4 * * *";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Job {
    Batch,
    Sweep,
}

impl Job {
    fn name(self) -> &'static str {
        match self {
            Job::Batch => "batch",
            Job::Sweep => "retention",
        }
    }
}

/// Runs the batch summarizer and retention sweeper on fixed schedules.
///
/// Each firing is spawned and not awaited, so a slow run may overlap the
/// next one.
pub struct Scheduler {
    batch: Arc<BatchSummarizer>,
    sweeper: Arc<RetentionSweeper>,
    batch_schedule: Schedule,
    sweep_schedule: Schedule,
    handles: Mutex<Vec<JoinHandle<()>>>,
}

impl Scheduler {
    /// Create a scheduler with the default schedules.
    pub fn new(batch: Arc<BatchSummarizer>, sweeper: Arc<RetentionSweeper>) -> Result<Self> {
        Self::with_schedules(batch, sweeper, BATCH_SCHEDULE, SWEEP_SCHEDULE)
    }

    /// Create a scheduler with custom six-field cron expressions.
    pub fn with_schedules(
        batch: Arc<BatchSummarizer>,
        sweeper: Arc<RetentionSweeper>,
        batch_expression: &str,
        sweep_expression: &str,
    ) -> Result<Self> {
        Ok(Self {
            batch,
            sweeper,
            batch_schedule: parse_schedule(batch_expression)?,
            sweep_schedule: parse_schedule(sweep_expression)?,
            handles: Mutex::new(Vec::new()),
        })
    }

    /// Start both timers. Calling `start` on a running scheduler is a no-op.
    pub fn start(&self) {
        let Ok(mut handles) = self.handles.lock() else {
            error!("Scheduler state poisoned; not starting");
            return;
        };
        if !handles.is_empty() {
            warn!("Scheduler already running");
            return;
        }

        handles.push(self.spawn_timer(Job::Batch, self.batch_schedule.clone()));
        handles.push(self.spawn_timer(Job::Sweep, self.sweep_schedule.clone()));
        info!(
            "Scheduler started (next batch {:?}, next sweep {:?})",
            next_after(&self.batch_schedule, Local::now()),
            next_after(&self.sweep_schedule, Local::now())
        );
    }

    /// Stop both timers. Runs already in flight finish on their own.
    pub fn stop(&self) {
        if let Ok(mut handles) = self.handles.lock() {
            if handles.is_empty() {
                return;
            }
            for handle in handles.drain(..) {
                handle.abort();
            }
            info!("Scheduler stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.handles
            .lock()
            .map(|handles| !handles.is_empty())
            .unwrap_or(false)
    }

    fn spawn_timer(&self, job: Job, schedule: Schedule) -> JoinHandle<()> {
        let batch = Arc::clone(&self.batch);
        let sweeper = Arc::clone(&self.sweeper);

        tokio::spawn(async move {
            let mut last = Local::now();
            loop {
                let Some(next) = next_after(&schedule, last) else {
                    warn!(job = job.name(), "Schedule has no further runs");
                    return;
                };
                tokio::time::sleep(until(next)).await;
                last = next;

                info!(job = job.name(), "Scheduled run starting");
                tokio::spawn(run_job(job, Arc::clone(&batch), Arc::clone(&sweeper)));
            }
        })
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Run one job, logging instead of propagating failures.
async fn run_job(job: Job, batch: Arc<BatchSummarizer>, sweeper: Arc<RetentionSweeper>) {
    match job {
        Job::Batch => match batch.run_batch().await {
            Ok(report) => info!(
                "Scheduled batch done: {} users summarized",
                report.users_processed
            ),
            Err(e) => error!(error = %e, "Scheduled batch failed"),
        },
        Job::Sweep => match sweeper.sweep().await {
            Ok(deleted) => info!("Scheduled sweep done: {} items deleted", deleted),
            Err(e) => error!(error = %e, "Scheduled sweep failed"),
        },
    }
}

fn parse_schedule(expression: &str) -> Result<Schedule> {
    Schedule::from_str(expression).map_err(|e| PipelineError::Schedule {
        expression: expression.to_string(),
        reason: e.to_string(),
    })
}

/// First firing strictly after `after`.
pub fn next_after(schedule: &Schedule, after: DateTime<Local>) -> Option<DateTime<Local>> {
    schedule.after(&after).next()
}

fn until(next: DateTime<Local>) -> Duration {
    (next - Local::now()).to_std().unwrap_or(Duration::ZERO)
}
