// SPDX-FileCopyrightText: 2026 Nashir Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Base adapter trait implemented by every external-service seam.

use async_trait::async_trait;

use crate::error::NashirError;
use crate::types::{AdapterType, HealthStatus};

/// The base trait for all Nashir service adapters.
///
/// Every seam to an external collaborator (storage, analyzer, media store,
/// notifier) implements this trait, which provides identity, lifecycle, and
/// health check capabilities.
#[async_trait]
pub trait PluginAdapter: Send + Sync + 'static {
    /// Returns the human-readable name of this adapter instance.
    fn name(&self) -> &str;

    /// Returns the semantic version of this adapter.
    fn version(&self) -> semver::Version;

    /// Returns the type of adapter.
    fn adapter_type(&self) -> AdapterType;

    /// Performs a health check and returns the adapter's current status.
    async fn health_check(&self) -> Result<HealthStatus, NashirError>;

    /// Gracefully shuts down the adapter, releasing any held resources.
    async fn shutdown(&self) -> Result<(), NashirError>;
}
