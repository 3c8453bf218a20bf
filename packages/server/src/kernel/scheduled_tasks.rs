//! Scheduled background tasks using tokio-cron-scheduler.
//!
//! - Periodic matching, when `MATCHING_INTERVAL_MS` is set. The internal
//!   matching endpoint stays available either way.
//! - Purging expired status cache entries, so rides nobody polls any more
//!   do not keep their history in memory.

use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tokio_cron_scheduler::{Job, JobScheduler};

use super::ServerKernel;
use crate::domains::matching::run_dispatch;

/// Start all scheduled tasks
pub async fn start_scheduler(
    kernel: Arc<ServerKernel>,
    matching_interval: Option<Duration>,
) -> Result<JobScheduler> {
    let scheduler = JobScheduler::new().await?;

    if let Some(interval) = matching_interval {
        let match_kernel = kernel.clone();
        let match_job = Job::new_repeated_async(interval, move |_uuid, _lock| {
            let kernel = match_kernel.clone();
            Box::pin(async move {
                // run_dispatch logs the failure at error level.
                if let Err(e) = run_dispatch(&kernel.matching).await {
                    tracing::debug!(error = %e, "scheduled dispatch failed, retrying next tick");
                }
            })
        })?;
        scheduler.add(match_job).await?;
    }

    let purge_interval = kernel.ride_status.cache().ttl().max(Duration::from_secs(1)) * 10;
    let purge_kernel = kernel.clone();
    let purge_job = Job::new_repeated_async(purge_interval, move |_uuid, _lock| {
        let kernel = purge_kernel.clone();
        Box::pin(async move {
            let removed = kernel.ride_status.cache().purge_expired();
            if removed > 0 {
                tracing::debug!(removed, "purged expired status cache entries");
            }
        })
    })?;
    scheduler.add(purge_job).await?;

    scheduler.start().await?;

    tracing::info!(
        matching_interval_ms = matching_interval.map(|d| d.as_millis() as u64),
        purge_interval_ms = purge_interval.as_millis() as u64,
        "Scheduled tasks started"
    );
    Ok(scheduler)
}
