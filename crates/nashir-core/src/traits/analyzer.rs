// SPDX-FileCopyrightText: 2026 Nashir Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Content quality service trait.

use async_trait::async_trait;

use crate::error::NashirError;
use crate::traits::adapter::PluginAdapter;
use crate::types::ContentAnalysis;

/// Adapter for the AI content quality and rewriting service.
///
/// Given raw submission text and the platform's category names, the service
/// returns a quality score, detected language and category, a news-value
/// judgement, and a rewritten title/body/excerpt plus suggested keywords.
#[async_trait]
pub trait ContentAnalyzer: PluginAdapter {
    /// Scores and rewrites the given text.
    async fn analyze(
        &self,
        text: &str,
        categories: &[String],
    ) -> Result<ContentAnalysis, NashirError>;
}
