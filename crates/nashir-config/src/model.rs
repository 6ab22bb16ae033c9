// SPDX-FileCopyrightText: 2026 Nashir Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Nashir publishing platform.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup. Every tunable pipeline threshold lives here
//! rather than as a constant in the pipeline code.

use serde::{Deserialize, Serialize};

/// Top-level Nashir configuration.
///
/// Loaded from TOML files following the XDG hierarchy, with environment
/// variable overrides. All sections are optional and default to sensible
/// values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct NashirConfig {
    /// Site identity and public URL settings.
    #[serde(default)]
    pub site: SiteConfig,

    /// Fragment aggregation and scheduler settings.
    #[serde(default)]
    pub aggregation: AggregationConfig,

    /// Publishing pipeline thresholds.
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// In-process cache settings.
    #[serde(default)]
    pub cache: CacheConfig,

    /// Content quality service settings.
    #[serde(default)]
    pub analysis: AnalysisConfig,

    /// Media blob store settings.
    #[serde(default)]
    pub media: MediaConfig,

    /// Outbound messaging provider settings.
    #[serde(default)]
    pub notify: NotifyConfig,

    /// HTTP gateway settings.
    #[serde(default)]
    pub gateway: GatewayConfig,
}

/// Site identity and public URL configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SiteConfig {
    /// Display name of the site.
    #[serde(default = "default_site_name")]
    pub name: String,

    /// Public base URL used when composing article links in sender replies.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            name: default_site_name(),
            base_url: default_base_url(),
            log_level: default_log_level(),
        }
    }
}

fn default_site_name() -> String {
    "nashir".to_string()
}

fn default_base_url() -> String {
    "https://news.example.com".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Fragment aggregation and scheduler configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AggregationConfig {
    /// Debounce window in seconds. Each new fragment slides the submission's
    /// expiry forward by this much. Zero means every fragment is immediately
    /// eligible for claiming (process every message individually).
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,

    /// Scheduler polling interval in seconds.
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    /// Keywords that force immediate processing of a submission. Matching is
    /// case-insensitive against the trimmed message: equal or prefix.
    #[serde(default = "default_trigger_keywords")]
    pub trigger_keywords: Vec<String>,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            window_secs: default_window_secs(),
            poll_interval_secs: default_poll_interval_secs(),
            trigger_keywords: default_trigger_keywords(),
        }
    }
}

fn default_window_secs() -> u64 {
    0
}

fn default_poll_interval_secs() -> u64 {
    1
}

fn default_trigger_keywords() -> Vec<String> {
    ["send", "done", "publish", "نشر", "انشر", "تم", "ارسل"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// Publishing pipeline threshold configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PipelineConfig {
    /// Minimum combined text length (chars) for submissions without media.
    #[serde(default = "default_min_text_length")]
    pub min_text_length: usize,

    /// Minimum AI quality score (0..=100) for a submission to proceed.
    #[serde(default = "default_min_quality_score")]
    pub min_quality_score: u8,

    /// Maximum number of AI-suggested keywords used for tagging.
    #[serde(default = "default_max_keywords")]
    pub max_keywords: usize,

    /// Maximum generated alt-text length in characters.
    #[serde(default = "default_max_alt_text_len")]
    pub max_alt_text_len: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            min_text_length: default_min_text_length(),
            min_quality_score: default_min_quality_score(),
            max_keywords: default_max_keywords(),
            max_alt_text_len: default_max_alt_text_len(),
        }
    }
}

fn default_min_text_length() -> usize {
    50
}

fn default_min_quality_score() -> u8 {
    40
}

fn default_max_keywords() -> usize {
    8
}

fn default_max_alt_text_len() -> usize {
    125
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|d| d.join("nashir/nashir.db"))
        .and_then(|p| p.to_str().map(String::from))
        .unwrap_or_else(|| "nashir.db".to_string())
}

/// In-process cache configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CacheConfig {
    /// Interval between background sweeps of expired entries, in seconds.
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,

    /// Default TTL applied when callers do not specify one, in seconds.
    #[serde(default = "default_cache_ttl_secs")]
    pub default_ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            sweep_interval_secs: default_sweep_interval_secs(),
            default_ttl_secs: default_cache_ttl_secs(),
        }
    }
}

fn default_sweep_interval_secs() -> u64 {
    60
}

fn default_cache_ttl_secs() -> u64 {
    300
}

/// Content quality service configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AnalysisConfig {
    /// Base URL of the quality service API.
    #[serde(default = "default_analysis_url")]
    pub api_url: String,

    /// API key for the quality service.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Request timeout in seconds.
    #[serde(default = "default_analysis_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            api_url: default_analysis_url(),
            api_key: None,
            timeout_secs: default_analysis_timeout_secs(),
        }
    }
}

fn default_analysis_url() -> String {
    "https://analysis.example.com/v1/analyze".to_string()
}

fn default_analysis_timeout_secs() -> u64 {
    60
}

/// Media blob store configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MediaConfig {
    /// Base URL of the blob store API.
    #[serde(default = "default_media_url")]
    pub api_url: String,

    /// API key for the blob store.
    #[serde(default)]
    pub api_key: Option<String>,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            api_url: default_media_url(),
            api_key: None,
        }
    }
}

fn default_media_url() -> String {
    "https://media.example.com".to_string()
}

/// Outbound messaging provider configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct NotifyConfig {
    /// Base URL of the messaging provider API.
    #[serde(default = "default_notify_url")]
    pub api_url: String,

    /// API key for the messaging provider.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Sender identity registered with the provider.
    #[serde(default)]
    pub sender_id: Option<String>,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            api_url: default_notify_url(),
            api_key: None,
            sender_id: None,
        }
    }
}

fn default_notify_url() -> String {
    "https://messaging.example.com/v1/messages".to_string()
}

/// HTTP gateway configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    /// Host address to bind.
    #[serde(default = "default_gateway_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_gateway_port")]
    pub port: u16,

    /// Bearer token required on webhook routes (None disables auth).
    #[serde(default)]
    pub bearer_token: Option<String>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_gateway_host(),
            port: default_gateway_port(),
            bearer_token: None,
        }
    }
}

fn default_gateway_host() -> String {
    "127.0.0.1".to_string()
}

fn default_gateway_port() -> u16 {
    8380
}
