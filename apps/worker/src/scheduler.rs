//! Cron trigger for batch runs, using tokio-cron-scheduler.
//!
//! Each configured cron expression becomes one job; every firing runs a full
//! batch. Schedules are evaluated in the configured timezone, and a failed
//! batch is logged without affecting later firings.

use std::sync::Arc;

use anyhow::Result;
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{error, info};

use crate::config::Config;
use crate::pipeline::Pipeline;

/// Registers one job per configured schedule and starts the scheduler.
/// The returned handle must be kept alive for jobs to keep firing.
pub async fn start(config: &Config, pipeline: Arc<Pipeline>) -> Result<JobScheduler> {
    let scheduler = JobScheduler::new().await?;

    for schedule in &config.schedules {
        let pipeline = pipeline.clone();
        let job = Job::new_async_tz(schedule.as_str(), config.timezone, move |_uuid, _lock| {
            let pipeline = pipeline.clone();
            Box::pin(async move {
                info!("Scheduled batch triggered");
                if let Err(e) = pipeline.run_batch().await {
                    error!("Batch run failed: {e:#}");
                }
            })
        })?;
        scheduler.add(job).await?;
    }

    scheduler.start().await?;
    info!(
        "Batch scheduler started: {} schedule(s) in {}",
        config.schedules.len(),
        config.timezone
    );
    Ok(scheduler)
}
