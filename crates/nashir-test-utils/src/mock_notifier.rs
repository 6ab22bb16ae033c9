// SPDX-FileCopyrightText: 2026 Nashir Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock outbound notifier that captures sent replies.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use nashir_core::traits::adapter::PluginAdapter;
use nashir_core::traits::notifier::OutboundNotifier;
use nashir_core::types::{AdapterType, DeliveryReceipt, HealthStatus};
use nashir_core::NashirError;

/// A mock notifier that records every sent message.
///
/// Can be switched into a failing mode to exercise the best-effort reply
/// paths (a failed reply must never affect a committed article).
pub struct MockNotifier {
    sent: Arc<Mutex<Vec<(String, String)>>>,
    fail_sends: Arc<Mutex<bool>>,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
            fail_sends: Arc::new(Mutex::new(false)),
        }
    }

    /// Makes every subsequent send fail.
    pub async fn fail_sends(&self, fail: bool) {
        *self.fail_sends.lock().await = fail;
    }

    /// Returns the recorded (recipient, text) pairs, in send order.
    pub async fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().await.clone()
    }
}

impl Default for MockNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockNotifier {
    fn name(&self) -> &str {
        "mock-notifier"
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
impl OutboundNotifier for MockNotifier {
    async fn send_text(
        &self,
        recipient: &str,
        text: &str,
    ) -> Result<DeliveryReceipt, NashirError> {
        if *self.fail_sends.lock().await {
            return Err(NashirError::Notify {
                message: "mock delivery failure".to_string(),
                source: None,
            });
        }
        self.sent
            .lock()
            .await
            .push((recipient.to_string(), text.to_string()));
        Ok(DeliveryReceipt(format!("mock-{}", uuid::Uuid::new_v4())))
    }
}
