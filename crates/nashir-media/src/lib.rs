// SPDX-FileCopyrightText: 2026 Nashir Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the durable blob store backing article media.
//!
//! The webhook layer stores attachments here before they enter the pending
//! submission store, so the pipeline only ever sees stable URLs. Objects go
//! into a public or private partition; public objects get stable URLs
//! suitable for embedding in published articles.

use async_trait::async_trait;
use nashir_core::types::{AdapterType, HealthStatus, MediaVisibility, StoredObject};
use nashir_core::{MediaStore, NashirError, PluginAdapter};
use reqwest::header::{HeaderMap, HeaderValue};
use tracing::debug;

/// HTTP-backed media store client.
#[derive(Debug, Clone)]
pub struct HttpMediaStore {
    client: reqwest::Client,
    base_url: String,
}

impl HttpMediaStore {
    /// Creates a new blob store client.
    pub fn new(api_url: String, api_key: Option<&str>) -> Result<Self, NashirError> {
        let mut headers = HeaderMap::new();
        if let Some(key) = api_key {
            let value = HeaderValue::from_str(&format!("Bearer {key}"))
                .map_err(|e| NashirError::Config(format!("invalid media API key: {e}")))?;
            headers.insert("authorization", value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| NashirError::Media {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url: api_url.trim_end_matches('/').to_string(),
        })
    }

    /// Overrides the base URL (for testing with wiremock).
    #[cfg(test)]
    pub fn with_base_url(mut self, url: String) -> Self {
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl PluginAdapter for HttpMediaStore {
    fn name(&self) -> &str {
        "http-media-store"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::MediaStore
    }

    async fn health_check(&self) -> Result<HealthStatus, NashirError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), NashirError> {
        Ok(())
    }
}

#[async_trait]
impl MediaStore for HttpMediaStore {
    async fn put(
        &self,
        filename: &str,
        bytes: Vec<u8>,
        mime_type: &str,
        visibility: MediaVisibility,
    ) -> Result<StoredObject, NashirError> {
        // Key layout: <partition>/<uuid>-<filename>. The uuid prefix keeps
        // repeated uploads of the same filename from colliding.
        let key = format!("{visibility}/{}-{filename}", uuid::Uuid::new_v4());
        let url = format!("{}/{key}", self.base_url);

        let response = self
            .client
            .put(&url)
            .header("content-type", mime_type)
            .body(bytes)
            .send()
            .await
            .map_err(|e| NashirError::Media {
                message: format!("upload request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NashirError::Media {
                message: format!("blob store returned {status}: {body}"),
                source: None,
            });
        }

        debug!(key = key.as_str(), "media object stored");
        Ok(StoredObject {
            key,
            url,
            mime_type: mime_type.to_string(),
        })
    }

    async fn delete(&self, key: &str) -> Result<(), NashirError> {
        let url = format!("{}/{key}", self.base_url);
        let response = self
            .client
            .delete(&url)
            .send()
            .await
            .map_err(|e| NashirError::Media {
                message: format!("delete request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        // Missing objects are not an error.
        if !status.is_success() && status != reqwest::StatusCode::NOT_FOUND {
            return Err(NashirError::Media {
                message: format!("blob store returned {status} on delete"),
                source: None,
            });
        }
        Ok(())
    }
}
