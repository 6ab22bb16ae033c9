// SPDX-FileCopyrightText: 2026 Nashir Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Nashir configuration system.

use nashir_config::model::NashirConfig;
use nashir_config::{load_config_from_str, validate};

/// Valid TOML with all known fields deserializes successfully.
#[test]
fn valid_toml_deserializes_into_nashir_config() {
    let toml = r#"
[site]
name = "akhbar"
base_url = "https://akhbar.example.com"
log_level = "debug"

[aggregation]
window_secs = 30
poll_interval_secs = 2
trigger_keywords = ["publish", "نشر"]

[pipeline]
min_text_length = 80
min_quality_score = 55
max_keywords = 6
max_alt_text_len = 100

[storage]
database_path = "/tmp/nashir-test.db"

[cache]
sweep_interval_secs = 30
default_ttl_secs = 120

[analysis]
api_url = "https://analysis.internal/v1/analyze"
api_key = "an-key"
timeout_secs = 30

[notify]
api_url = "https://wa.internal/v1/messages"
api_key = "wa-key"
sender_id = "+96650000000"

[gateway]
host = "0.0.0.0"
port = 9000
bearer_token = "hook-secret"
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.site.name, "akhbar");
    assert_eq!(config.site.base_url, "https://akhbar.example.com");
    assert_eq!(config.aggregation.window_secs, 30);
    assert_eq!(config.aggregation.trigger_keywords, vec!["publish", "نشر"]);
    assert_eq!(config.pipeline.min_text_length, 80);
    assert_eq!(config.pipeline.min_quality_score, 55);
    assert_eq!(config.storage.database_path, "/tmp/nashir-test.db");
    assert_eq!(config.cache.default_ttl_secs, 120);
    assert_eq!(config.analysis.api_key.as_deref(), Some("an-key"));
    assert_eq!(config.notify.sender_id.as_deref(), Some("+96650000000"));
    assert_eq!(config.gateway.port, 9000);
    assert_eq!(config.gateway.bearer_token.as_deref(), Some("hook-secret"));

    validate(&config).expect("config should pass validation");
}

/// Empty TOML falls back to compiled defaults.
#[test]
fn empty_toml_uses_defaults() {
    let config = load_config_from_str("").expect("empty TOML should use defaults");
    assert_eq!(config.aggregation.window_secs, 0);
    assert_eq!(config.aggregation.poll_interval_secs, 1);
    assert_eq!(config.pipeline.max_keywords, 8);
    assert_eq!(config.pipeline.max_alt_text_len, 125);
    assert!(config.gateway.bearer_token.is_none());
    // Arabic and English trigger keywords are both present by default.
    assert!(config.aggregation.trigger_keywords.contains(&"publish".to_string()));
    assert!(config.aggregation.trigger_keywords.contains(&"نشر".to_string()));
}

/// Unknown field in a section is rejected by deny_unknown_fields.
#[test]
fn unknown_field_produces_error() {
    let toml = r#"
[pipeline]
min_quality_scor = 40
"#;
    let err = load_config_from_str(toml).expect_err("should reject unknown field");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("unknown field") || err_str.contains("min_quality_scor"),
        "error should mention the bad key, got: {err_str}"
    );
}

/// Out-of-range threshold is caught by validation, not deserialization.
#[test]
fn validation_rejects_out_of_range_quality_score() {
    let mut config = NashirConfig::default();
    config.pipeline.min_quality_score = 200;
    assert!(validate(&config).is_err());
}
