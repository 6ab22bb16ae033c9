// SPDX-FileCopyrightText: 2026 Nashir Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Media store trait for durable blob storage.

use async_trait::async_trait;

use crate::error::NashirError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{MediaVisibility, StoredObject};

/// Adapter for the durable blob store backing article media.
///
/// Objects live in a public or private partition; the public partition yields
/// stable URLs suitable for embedding in published articles.
#[async_trait]
pub trait MediaStore: PluginAdapter {
    /// Stores a blob under the given filename and returns its durable location.
    async fn put(
        &self,
        filename: &str,
        bytes: Vec<u8>,
        mime_type: &str,
        visibility: MediaVisibility,
    ) -> Result<StoredObject, NashirError>;

    /// Deletes an object by key. Missing objects are not an error.
    async fn delete(&self, key: &str) -> Result<(), NashirError>;
}
