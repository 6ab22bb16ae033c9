// SPDX-FileCopyrightText: 2026 Nashir Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Long-running serve mode: wires storage, cache, adapters, pipeline, and
//! gateway together and runs them until shutdown.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use nashir_analysis::HttpAnalyzer;
use nashir_cache::{run_sweeper, MemoryCache};
use nashir_config::NashirConfig;
use nashir_core::{ContentAnalyzer, MediaStore, NashirError, OutboundNotifier};
use nashir_gateway::{start_server, AppState, AuthConfig, ServerConfig};
use nashir_media::HttpMediaStore;
use nashir_notify::HttpNotifier;
use nashir_pipeline::{run_scheduler, PublishingPipeline};
use nashir_storage::Database;

/// Runs the daemon until the gateway exits or a shutdown signal arrives.
pub async fn run(config: NashirConfig) -> Result<(), NashirError> {
    init_tracing(&config.site.log_level);
    info!(
        site = %config.site.name,
        base_url = %config.site.base_url,
        "starting nashir"
    );

    let db = Database::open(&config.storage.database_path).await?;
    let cache = Arc::new(MemoryCache::new(Duration::from_secs(
        config.cache.default_ttl_secs,
    )));

    let analyzer: Arc<dyn ContentAnalyzer> = Arc::new(HttpAnalyzer::new(
        config.analysis.api_url.clone(),
        config.analysis.api_key.as_deref(),
        Duration::from_secs(config.analysis.timeout_secs),
    )?);
    let media: Arc<dyn MediaStore> = Arc::new(HttpMediaStore::new(
        config.media.api_url.clone(),
        config.media.api_key.as_deref(),
    )?);
    let notifier: Arc<dyn OutboundNotifier> = Arc::new(HttpNotifier::new(
        config.notify.api_url.clone(),
        config.notify.api_key.as_deref(),
        config.notify.sender_id.clone(),
    )?);

    let pipeline = Arc::new(PublishingPipeline::new(
        db.clone(),
        cache.clone(),
        analyzer,
        notifier,
        config.pipeline.clone(),
        &config.site,
    ));

    if config.gateway.bearer_token.is_none() {
        warn!("gateway.bearer_token is unset; webhook routes accept unauthenticated requests");
    }

    let cancel = CancellationToken::new();
    let scheduler = tokio::spawn(run_scheduler(
        pipeline.clone(),
        Duration::from_secs(config.aggregation.poll_interval_secs),
        cancel.clone(),
    ));
    let sweeper = tokio::spawn(run_sweeper(
        cache.clone(),
        Duration::from_secs(config.cache.sweep_interval_secs),
        cancel.clone(),
    ));

    let state = AppState {
        db: db.clone(),
        cache,
        media,
        pipeline,
        aggregation: config.aggregation.clone(),
        auth: AuthConfig {
            bearer_token: config.gateway.bearer_token.clone(),
        },
        started_at: Instant::now(),
    };
    let server_config = ServerConfig {
        host: config.gateway.host.clone(),
        port: config.gateway.port,
    };

    let outcome = tokio::select! {
        result = start_server(&server_config, state) => {
            if let Err(error) = &result {
                error!(%error, "gateway exited with error");
            }
            result
        }
        _ = tokio::signal::ctrl_c() => {
            info!("shutdown signal received");
            Ok(())
        }
    };

    cancel.cancel();
    if let Err(error) = scheduler.await {
        warn!(%error, "scheduler task did not shut down cleanly");
    }
    if let Err(error) = sweeper.await {
        warn!(%error, "cache sweeper task did not shut down cleanly");
    }

    db.close().await?;
    info!("nashir stopped");
    outcome
}

fn init_tracing(log_level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(format!("nashir={log_level},warn")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
