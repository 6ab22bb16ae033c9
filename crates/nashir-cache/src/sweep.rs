// SPDX-FileCopyrightText: 2026 Nashir Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Background sweep of expired cache entries.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::store::MemoryCache;

/// Runs the periodic sweep until the cancellation token fires.
///
/// Spawned once at process start; the returned future completes on shutdown.
pub async fn run_sweeper(cache: Arc<MemoryCache>, interval: Duration, cancel: CancellationToken) {
    info!(interval_secs = interval.as_secs(), "cache sweeper started");
    let mut ticker = tokio::time::interval(interval);
    // The first tick fires immediately; skip it so the sweep cadence starts
    // one full interval after boot.
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let swept = cache.sweep_expired();
                if swept > 0 {
                    debug!(swept, "cache sweep reclaimed expired entries");
                }
            }
            _ = cancel.cancelled() => {
                info!("cache sweeper stopped");
                return;
            }
        }
    }
}
