// SPDX-FileCopyrightText: 2026 Nashir Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Aggregation scheduler: the periodic claim-and-process loop.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use nashir_storage::queries::pending;

use crate::pipeline::PublishingPipeline;

/// Runs the scheduler loop until the cancellation token fires.
///
/// Each tick atomically claims every expired submission and processes them
/// sequentially, so sender replies never interleave between submissions.
/// Each submission runs inside the pipeline's own failure boundary; one
/// failure never stops the rest of the tick.
pub async fn run_scheduler(
    pipeline: Arc<PublishingPipeline>,
    poll_interval: Duration,
    cancel: CancellationToken,
) {
    info!(
        poll_interval_secs = poll_interval.as_secs(),
        "aggregation scheduler started"
    );
    let mut ticker = tokio::time::interval(poll_interval);
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let claimed = match pending::claim_expired(pipeline.database()).await {
                    Ok(claimed) => claimed,
                    Err(error) => {
                        error!(%error, "claim scan failed, retrying next tick");
                        continue;
                    }
                };
                if claimed.is_empty() {
                    continue;
                }
                debug!(count = claimed.len(), "claimed expired submissions");
                for submission in claimed {
                    pipeline.run(submission).await;
                }
            }
            _ = cancel.cancelled() => {
                info!("aggregation scheduler stopped");
                return;
            }
        }
    }
}
