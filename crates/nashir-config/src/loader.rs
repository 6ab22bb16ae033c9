// SPDX-FileCopyrightText: 2026 Nashir Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./nashir.toml` > `~/.config/nashir/nashir.toml` >
//! `/etc/nashir/nashir.toml` with environment variable overrides via the
//! `NASHIR_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::NashirConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/nashir/nashir.toml` (system-wide)
/// 3. `~/.config/nashir/nashir.toml` (user XDG config)
/// 4. `./nashir.toml` (local directory)
/// 5. `NASHIR_*` environment variables
pub fn load_config() -> Result<NashirConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(NashirConfig::default()))
        .merge(Toml::file("/etc/nashir/nashir.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("nashir/nashir.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("nashir.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<NashirConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(NashirConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<NashirConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(NashirConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `NASHIR_PIPELINE_MIN_QUALITY_SCORE` must
/// map to `pipeline.min_quality_score`, not `pipeline.min.quality.score`.
fn env_provider() -> Env {
    Env::prefixed("NASHIR_").map(|key| {
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("site_", "site.", 1)
            .replacen("aggregation_", "aggregation.", 1)
            .replacen("pipeline_", "pipeline.", 1)
            .replacen("storage_", "storage.", 1)
            .replacen("cache_", "cache.", 1)
            .replacen("analysis_", "analysis.", 1)
            .replacen("media_", "media.", 1)
            .replacen("notify_", "notify.", 1)
            .replacen("gateway_", "gateway.", 1);
        mapped.into()
    })
}
