// SPDX-FileCopyrightText: 2026 Nashir Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Startup validation for loaded configuration.
//!
//! Threshold ranges are checked once at boot so the pipeline can trust them
//! without re-validating on every submission.

use nashir_core::NashirError;

use crate::model::NashirConfig;

/// Validate a loaded configuration, returning the first violation found.
pub fn validate(config: &NashirConfig) -> Result<(), NashirError> {
    if config.pipeline.min_quality_score > 100 {
        return Err(NashirError::Config(format!(
            "pipeline.min_quality_score must be 0..=100, got {}",
            config.pipeline.min_quality_score
        )));
    }

    if config.pipeline.max_keywords == 0 {
        return Err(NashirError::Config(
            "pipeline.max_keywords must be at least 1".into(),
        ));
    }

    if config.pipeline.max_alt_text_len == 0 {
        return Err(NashirError::Config(
            "pipeline.max_alt_text_len must be at least 1".into(),
        ));
    }

    if config.aggregation.poll_interval_secs == 0 {
        return Err(NashirError::Config(
            "aggregation.poll_interval_secs must be at least 1".into(),
        ));
    }

    if config.aggregation.trigger_keywords.iter().any(|k| k.trim().is_empty()) {
        return Err(NashirError::Config(
            "aggregation.trigger_keywords must not contain empty entries".into(),
        ));
    }

    if config.site.base_url.is_empty() {
        return Err(NashirError::Config("site.base_url must not be empty".into()));
    }

    Ok(())
}
