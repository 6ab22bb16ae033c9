// SPDX-FileCopyrightText: 2026 Nashir Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Nashir publishing platform.
//!
//! This crate provides the foundational trait definitions, error types, and
//! common types used throughout the Nashir workspace. The inbound aggregation
//! and publishing pipeline treats the AI quality service, the media blob
//! store, and the outbound messaging provider as adapters implementing the
//! traits defined here.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::NashirError;
pub use types::{
    AdapterType, ArticleStatus, HealthStatus, RejectionReason, SourceChannel, SubmissionStatus,
    WebhookStatus,
};

// Re-export all adapter traits at crate root.
pub use traits::{ContentAnalyzer, MediaStore, OutboundNotifier, PluginAdapter};
