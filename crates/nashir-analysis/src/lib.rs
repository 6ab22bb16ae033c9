// SPDX-FileCopyrightText: 2026 Nashir Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the content quality service.
//!
//! The service is a black box from the pipeline's perspective: raw text and
//! the platform's category names go in; a quality score, detected language
//! and category, a news-value judgement, and a rewritten title/body/excerpt
//! with keywords come out.

use std::time::Duration;

use async_trait::async_trait;
use nashir_core::types::{AdapterType, ContentAnalysis, HealthStatus};
use nashir_core::{ContentAnalyzer, NashirError, PluginAdapter};
use reqwest::header::{HeaderMap, HeaderValue};
use serde::Serialize;
use tracing::{debug, warn};

/// Request body sent to the analysis endpoint.
#[derive(Debug, Serialize)]
struct AnalyzeRequest<'a> {
    text: &'a str,
    categories: &'a [String],
}

/// HTTP-backed content analyzer.
///
/// Retries once after a 1-second delay on transient errors (429, 500, 503).
#[derive(Debug, Clone)]
pub struct HttpAnalyzer {
    client: reqwest::Client,
    base_url: String,
    max_retries: u32,
}

impl HttpAnalyzer {
    /// Creates a new analysis client.
    pub fn new(
        api_url: String,
        api_key: Option<&str>,
        timeout: Duration,
    ) -> Result<Self, NashirError> {
        let mut headers = HeaderMap::new();
        if let Some(key) = api_key {
            let value = HeaderValue::from_str(&format!("Bearer {key}"))
                .map_err(|e| NashirError::Config(format!("invalid analysis API key: {e}")))?;
            headers.insert("authorization", value);
        }
        headers.insert("content-type", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| NashirError::Analysis {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url: api_url,
            max_retries: 1,
        })
    }

    /// Overrides the base URL (for testing with wiremock).
    #[cfg(test)]
    pub fn with_base_url(mut self, url: String) -> Self {
        self.base_url = url;
        self
    }

    async fn request_analysis(
        &self,
        text: &str,
        categories: &[String],
    ) -> Result<ContentAnalysis, NashirError> {
        let body = AnalyzeRequest { text, categories };
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                warn!(attempt, "retrying analysis request after transient error");
                tokio::time::sleep(Duration::from_secs(1)).await;
            }

            let response = self
                .client
                .post(&self.base_url)
                .json(&body)
                .send()
                .await
                .map_err(|e| NashirError::Analysis {
                    message: format!("HTTP request failed: {e}"),
                    source: Some(Box::new(e)),
                })?;

            let status = response.status();
            debug!(status = %status, attempt, "analysis response received");

            if status.is_success() {
                let text = response.text().await.map_err(|e| NashirError::Analysis {
                    message: format!("failed to read response body: {e}"),
                    source: Some(Box::new(e)),
                })?;
                let analysis: ContentAnalysis =
                    serde_json::from_str(&text).map_err(|e| NashirError::Analysis {
                        message: format!("failed to parse analysis response: {e}"),
                        source: Some(Box::new(e)),
                    })?;
                if analysis.quality_score > 100 {
                    return Err(NashirError::Analysis {
                        message: format!(
                            "quality score {} out of range 0..=100",
                            analysis.quality_score
                        ),
                        source: None,
                    });
                }
                return Ok(analysis);
            }

            let body_text = response.text().await.unwrap_or_default();
            if is_transient_error(status) && attempt < self.max_retries {
                warn!(status = %status, body = %body_text, "transient error, will retry");
                last_error = Some(NashirError::Analysis {
                    message: format!("analysis API returned {status}: {body_text}"),
                    source: None,
                });
                continue;
            }

            return Err(NashirError::Analysis {
                message: format!("analysis API returned {status}: {body_text}"),
                source: None,
            });
        }

        Err(last_error.unwrap_or_else(|| NashirError::Analysis {
            message: "analysis request failed after retries".into(),
            source: None,
        }))
    }
}

/// Returns true for HTTP status codes that indicate transient errors worth retrying.
fn is_transient_error(status: reqwest::StatusCode) -> bool {
    matches!(status.as_u16(), 429 | 500 | 503)
}

#[async_trait]
impl PluginAdapter for HttpAnalyzer {
    fn name(&self) -> &str {
        "http-analyzer"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Analyzer
    }

    async fn health_check(&self) -> Result<HealthStatus, NashirError> {
        // The analysis API has no dedicated health route; reachability of the
        // configured URL is checked at first use instead.
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), NashirError> {
        Ok(())
    }
}

#[async_trait]
impl ContentAnalyzer for HttpAnalyzer {
    async fn analyze(
        &self,
        text: &str,
        categories: &[String],
    ) -> Result<ContentAnalysis, NashirError> {
        self.request_analysis(text, categories).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(base_url: &str) -> HttpAnalyzer {
        HttpAnalyzer::new(
            "https://unused.example.com".into(),
            Some("test-key"),
            Duration::from_secs(5),
        )
        .unwrap()
        .with_base_url(format!("{base_url}/v1/analyze"))
    }

    fn analysis_body() -> serde_json::Value {
        serde_json::json!({
            "quality_score": 85,
            "language": "ar",
            "category": "اقتصاد",
            "is_news": true,
            "title": "الأسواق ترتفع خمسة بالمئة",
            "content": "نص معاد صياغته",
            "excerpt": "مقتطف",
            "keywords": ["اقتصاد", "أسواق"],
            "issues": []
        })
    }

    #[tokio::test]
    async fn analyze_parses_successful_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/analyze"))
            .and(header("authorization", "Bearer test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(analysis_body()))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let analysis = client
            .analyze("عاجل: الأسواق", &["اقتصاد".to_string()])
            .await
            .unwrap();

        assert_eq!(analysis.quality_score, 85);
        assert_eq!(analysis.language, "ar");
        assert!(analysis.is_news);
        assert_eq!(analysis.keywords.len(), 2);
    }

    #[tokio::test]
    async fn analyze_retries_on_503() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/analyze"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v1/analyze"))
            .respond_with(ResponseTemplate::new(200).set_body_json(analysis_body()))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let analysis = client.analyze("نص", &[]).await.unwrap();
        assert_eq!(analysis.quality_score, 85);
    }

    #[tokio::test]
    async fn analyze_fails_on_400_without_retry() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/analyze"))
            .respond_with(ResponseTemplate::new(400).set_body_string("bad request"))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client.analyze("نص", &[]).await.unwrap_err();
        assert!(err.to_string().contains("400"));
    }

    #[tokio::test]
    async fn out_of_range_score_is_rejected() {
        let server = MockServer::start().await;
        let mut body = analysis_body();
        body["quality_score"] = serde_json::json!(250);
        Mock::given(method("POST"))
            .and(path("/v1/analyze"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client.analyze("نص", &[]).await.unwrap_err();
        assert!(err.to_string().contains("out of range"));
    }
}
