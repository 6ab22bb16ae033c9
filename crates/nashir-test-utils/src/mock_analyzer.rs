// SPDX-FileCopyrightText: 2026 Nashir Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock content quality service for deterministic testing.
//!
//! `MockAnalyzer` implements `ContentAnalyzer` with pre-configured analyses,
//! enabling pipeline tests without external API calls.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use nashir_core::traits::adapter::PluginAdapter;
use nashir_core::traits::analyzer::ContentAnalyzer;
use nashir_core::types::{AdapterType, ContentAnalysis, HealthStatus};
use nashir_core::NashirError;

/// A mock quality service that returns pre-configured analyses.
///
/// Analyses are popped from a FIFO queue. When the queue is empty, a default
/// passing analysis is returned. Every call's inputs are captured for
/// assertion.
pub struct MockAnalyzer {
    analyses: Arc<Mutex<VecDeque<Result<ContentAnalysis, String>>>>,
    calls: Arc<Mutex<Vec<(String, Vec<String>)>>>,
}

impl MockAnalyzer {
    /// Create a new mock analyzer with an empty queue.
    pub fn new() -> Self {
        Self {
            analyses: Arc::new(Mutex::new(VecDeque::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a mock analyzer pre-loaded with the given analyses.
    pub fn with_analyses(analyses: Vec<ContentAnalysis>) -> Self {
        Self {
            analyses: Arc::new(Mutex::new(analyses.into_iter().map(Ok).collect())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Add an analysis to the end of the queue.
    pub async fn add_analysis(&self, analysis: ContentAnalysis) {
        self.analyses.lock().await.push_back(Ok(analysis));
    }

    /// Add a failure to the end of the queue.
    pub async fn add_failure(&self, message: &str) {
        self.analyses.lock().await.push_back(Err(message.to_string()));
    }

    /// Returns the recorded (text, categories) inputs, in call order.
    pub async fn calls(&self) -> Vec<(String, Vec<String>)> {
        self.calls.lock().await.clone()
    }

    /// A passing analysis usable as a baseline fixture.
    pub fn passing_analysis() -> ContentAnalysis {
        ContentAnalysis {
            quality_score: 85,
            language: "ar".to_string(),
            category: None,
            is_news: true,
            title: "عنوان معاد صياغته".to_string(),
            content: "نص الخبر بعد التحرير".to_string(),
            excerpt: "مقتطف الخبر".to_string(),
            keywords: vec!["اقتصاد".to_string()],
            issues: vec![],
        }
    }

    async fn next_analysis(&self) -> Result<ContentAnalysis, String> {
        self.analyses
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Ok(Self::passing_analysis()))
    }
}

impl Default for MockAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockAnalyzer {
    fn name(&self) -> &str {
        "mock-analyzer"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Analyzer
    }

    async fn health_check(&self) -> Result<HealthStatus, NashirError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), NashirError> {
        Ok(())
    }
}

#[async_trait]
impl ContentAnalyzer for MockAnalyzer {
    async fn analyze(
        &self,
        text: &str,
        categories: &[String],
    ) -> Result<ContentAnalysis, NashirError> {
        self.calls
            .lock()
            .await
            .push((text.to_string(), categories.to_vec()));
        self.next_analysis().await.map_err(|message| NashirError::Analysis {
            message,
            source: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn scripted_analyses_pop_in_order() {
        let mut low = MockAnalyzer::passing_analysis();
        low.quality_score = 20;
        let analyzer = MockAnalyzer::with_analyses(vec![low, MockAnalyzer::passing_analysis()]);

        let first = analyzer.analyze("a", &[]).await.unwrap();
        assert_eq!(first.quality_score, 20);
        let second = analyzer.analyze("b", &[]).await.unwrap();
        assert_eq!(second.quality_score, 85);
    }

    #[tokio::test]
    async fn empty_queue_returns_passing_default() {
        let analyzer = MockAnalyzer::new();
        let analysis = analyzer.analyze("text", &["x".to_string()]).await.unwrap();
        assert!(analysis.is_news);

        let calls = analyzer.calls().await;
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "text");
    }

    #[tokio::test]
    async fn scripted_failure_surfaces_as_analysis_error() {
        let analyzer = MockAnalyzer::new();
        analyzer.add_failure("service down").await;
        let err = analyzer.analyze("text", &[]).await.unwrap_err();
        assert!(err.to_string().contains("service down"));
    }
}
