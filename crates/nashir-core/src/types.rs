// SPDX-FileCopyrightText: 2026 Nashir Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared across the Nashir workspace.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the type of adapter behind a service seam.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Storage,
    Analyzer,
    MediaStore,
    Notifier,
}

/// Lifecycle status of a pending submission.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    /// Still accepting fragments; eligible for claiming once expired.
    Accumulating,
    /// Claimed by exactly one pipeline execution.
    Processing,
}

/// Publish state of a created article.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ArticleStatus {
    Draft,
    Published,
}

/// Terminal and intermediate states of a webhook audit log row.
///
/// Transitions: `received -> rejected` or `received -> processed`. A row never
/// changes status after reaching a terminal state.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum WebhookStatus {
    Received,
    Rejected,
    Processed,
}

/// The fixed taxonomy of rejection reasons recorded on rejected webhook logs.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum RejectionReason {
    InvalidToken,
    TokenInactive,
    TextTooShort,
    LowQuality,
}

/// Channel a submission arrived through.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SourceChannel {
    Whatsapp,
    Email,
}

/// Result of the content quality service for one submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentAnalysis {
    /// Quality score in 0..=100.
    pub quality_score: u8,
    /// Detected language code (e.g. "ar", "en").
    pub language: String,
    /// Detected category name, matched downstream against the platform list.
    pub category: Option<String>,
    /// Whether the service judged the text to have news value.
    pub is_news: bool,
    /// Rewritten headline.
    pub title: String,
    /// Rewritten body.
    pub content: String,
    /// Suggested excerpt.
    pub excerpt: String,
    /// Suggested SEO keywords.
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Issues found with the original text (shown to the sender on rejection).
    #[serde(default)]
    pub issues: Vec<String>,
}

/// Visibility partition for stored media objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum MediaVisibility {
    Public,
    Private,
}

/// A durably stored media object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredObject {
    /// Storage key within the partition.
    pub key: String,
    /// Stable URL for the object.
    pub url: String,
    /// MIME type as reported at upload time.
    pub mime_type: String,
}

/// Receipt returned by the outbound notifier on successful delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryReceipt(pub String);

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn rejection_reason_round_trips_snake_case() {
        for reason in [
            RejectionReason::InvalidToken,
            RejectionReason::TokenInactive,
            RejectionReason::TextTooShort,
            RejectionReason::LowQuality,
        ] {
            let s = reason.to_string();
            assert_eq!(RejectionReason::from_str(&s).unwrap(), reason);
        }
        assert_eq!(RejectionReason::LowQuality.to_string(), "low_quality");
    }

    #[test]
    fn webhook_status_taxonomy_is_stable() {
        assert_eq!(WebhookStatus::Received.to_string(), "received");
        assert_eq!(WebhookStatus::Rejected.to_string(), "rejected");
        assert_eq!(WebhookStatus::Processed.to_string(), "processed");
    }

    #[test]
    fn source_channel_deserializes_snake_case() {
        let channel: SourceChannel = serde_json::from_str("\"whatsapp\"").unwrap();
        assert_eq!(channel, SourceChannel::Whatsapp);
    }

    #[test]
    fn submission_status_serializes_snake_case() {
        let s = serde_json::to_string(&SubmissionStatus::Accumulating).unwrap();
        assert_eq!(s, "\"accumulating\"");
    }
}
