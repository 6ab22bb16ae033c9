// SPDX-FileCopyrightText: 2026 Nashir Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Row types for the Nashir schema.
//!
//! Timestamps are RFC3339 strings with millisecond precision, matching the
//! SQLite `strftime('%Y-%m-%dT%H:%M:%fZ', 'now')` defaults in the schema.
//! List-valued columns (`message_parts`, `media_urls`, `keywords`, `issues`)
//! are stored as JSON arrays; append order is insertion order.

use serde::{Deserialize, Serialize};

/// One in-flight submission accumulating fragments for a (sender, token) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingSubmission {
    pub id: String,
    pub sender_address: String,
    pub token: String,
    pub token_id: Option<String>,
    pub user_id: Option<String>,
    /// Origin channel ("whatsapp" or "email").
    pub channel: String,
    /// Ordered raw text fragments. Order is semantically meaningful: joining
    /// them reconstructs the multi-part message.
    pub message_parts: Vec<String>,
    /// Ordered durable attachment URLs.
    pub media_urls: Vec<String>,
    /// "accumulating" or "processing".
    pub status: String,
    pub expires_at: String,
    pub created_at: String,
    pub updated_at: String,
}

impl PendingSubmission {
    /// Reconstructs the combined message text in fragment insertion order.
    pub fn combined_text(&self) -> String {
        self.message_parts.join("\n\n")
    }
}

/// A pre-registered sender identity with its authorization token and policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrustedToken {
    pub id: String,
    pub sender_address: String,
    pub token: String,
    pub is_active: bool,
    pub auto_publish: bool,
    pub default_category_id: Option<String>,
    pub user_id: String,
    pub usage_count: i64,
    pub created_at: String,
}

/// A platform category articles can be filed under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub slug: String,
}

/// Strongly-typed input for article creation.
///
/// Every field the pipeline writes is explicit here; the insert validates
/// nothing beyond what the type system already guarantees.
#[derive(Debug, Clone)]
pub struct NewArticle {
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub category_id: Option<String>,
    pub author_id: String,
    /// "draft" or "published".
    pub status: String,
    /// Set iff status is "published".
    pub published_at: Option<String>,
    /// JSON provenance blob: channel, token, fragment count, webhook log id.
    pub source_meta: Option<String>,
    pub keywords: Vec<String>,
}

/// A created article row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub category_id: Option<String>,
    pub author_id: String,
    pub status: String,
    pub published_at: Option<String>,
    pub source_meta: Option<String>,
    pub keywords: Vec<String>,
    pub created_at: String,
}

/// One stored media asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaFile {
    pub id: String,
    pub filename: String,
    pub url: String,
    pub mime_type: Option<String>,
    pub alt_text: Option<String>,
    pub created_at: String,
}

/// A tag row; linked to articles through `article_tags`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub id: String,
    pub name: String,
    pub slug: String,
}

/// Append-only audit record for one inbound submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookLog {
    pub id: String,
    pub channel: String,
    pub sender_address: String,
    pub token: String,
    pub raw_text: String,
    pub media_count: i64,
    pub fragment_count: i64,
    /// "received", "rejected", or "processed".
    pub status: String,
    pub reason: Option<String>,
    /// JSON array of sender-visible issues (quality rejections only).
    pub issues: Option<String>,
    /// JSON snapshot of the AI analysis.
    pub analysis: Option<String>,
    pub article_id: Option<String>,
    pub processing_ms: Option<i64>,
    pub created_at: String,
}
