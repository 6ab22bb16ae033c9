// SPDX-FileCopyrightText: 2026 Nashir Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Outbound notifier trait for sender replies.

use async_trait::async_trait;

use crate::error::NashirError;
use crate::traits::adapter::PluginAdapter;
use crate::types::DeliveryReceipt;

/// Adapter for delivering a text reply to a sender address.
///
/// Delivery is best-effort: callers in the publishing pipeline log failures
/// and move on. A failed reply must never affect an already-committed article.
#[async_trait]
pub trait OutboundNotifier: PluginAdapter {
    /// Sends a text message to the given recipient address.
    async fn send_text(
        &self,
        recipient: &str,
        text: &str,
    ) -> Result<DeliveryReceipt, NashirError>;
}
