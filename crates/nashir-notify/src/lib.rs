// SPDX-FileCopyrightText: 2026 Nashir Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Outbound sender replies.
//!
//! [`HttpNotifier`] posts text messages to the messaging provider that
//! delivered the original inbound message, so senders get their reply on the
//! same channel they wrote in on. [`templates`] holds the Arabic reply
//! wording.

pub mod templates;

use async_trait::async_trait;
use nashir_core::types::{AdapterType, DeliveryReceipt, HealthStatus};
use nashir_core::{NashirError, OutboundNotifier, PluginAdapter};
use reqwest::header::{HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Request body sent to the messaging provider.
#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    to: &'a str,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    from: Option<&'a str>,
}

/// Response body returned by the messaging provider.
#[derive(Debug, Deserialize)]
struct SendResponse {
    message_id: String,
}

/// HTTP-backed outbound notifier.
#[derive(Debug, Clone)]
pub struct HttpNotifier {
    client: reqwest::Client,
    base_url: String,
    sender_id: Option<String>,
}

impl HttpNotifier {
    /// Creates a new messaging provider client.
    pub fn new(
        api_url: String,
        api_key: Option<&str>,
        sender_id: Option<String>,
    ) -> Result<Self, NashirError> {
        let mut headers = HeaderMap::new();
        if let Some(key) = api_key {
            let value = HeaderValue::from_str(&format!("Bearer {key}"))
                .map_err(|e| NashirError::Config(format!("invalid messaging API key: {e}")))?;
            headers.insert("authorization", value);
        }
        headers.insert("content-type", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| NashirError::Notify {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url: api_url,
            sender_id,
        })
    }

    /// Overrides the base URL (for testing with wiremock).
    #[cfg(test)]
    pub fn with_base_url(mut self, url: String) -> Self {
        self.base_url = url;
        self
    }
}

#[async_trait]
impl PluginAdapter for HttpNotifier {
    fn name(&self) -> &str {
        "http-notifier"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Notifier
    }

    async fn health_check(&self) -> Result<HealthStatus, NashirError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), NashirError> {
        Ok(())
    }
}

#[async_trait]
impl OutboundNotifier for HttpNotifier {
    async fn send_text(
        &self,
        recipient: &str,
        text: &str,
    ) -> Result<DeliveryReceipt, NashirError> {
        let body = SendRequest {
            to: recipient,
            text,
            from: self.sender_id.as_deref(),
        };

        let response = self
            .client
            .post(&self.base_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| NashirError::Notify {
                message: format!("send request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NashirError::Notify {
                message: format!("messaging provider returned {status}: {body}"),
                source: None,
            });
        }

        let parsed: SendResponse =
            response.json().await.map_err(|e| NashirError::Notify {
                message: format!("failed to parse provider response: {e}"),
                source: Some(Box::new(e)),
            })?;

        debug!(recipient, message_id = parsed.message_id.as_str(), "reply delivered");
        Ok(DeliveryReceipt(parsed.message_id))
    }
}
