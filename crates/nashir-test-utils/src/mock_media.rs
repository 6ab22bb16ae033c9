// SPDX-FileCopyrightText: 2026 Nashir Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock media blob store that records uploads and deletions.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use nashir_core::traits::adapter::PluginAdapter;
use nashir_core::traits::media::MediaStore;
use nashir_core::types::{AdapterType, HealthStatus, MediaVisibility, StoredObject};
use nashir_core::NashirError;

/// A mock blob store that fabricates stable URLs and records every call.
pub struct MockMediaStore {
    puts: Arc<Mutex<Vec<(String, usize, String, MediaVisibility)>>>,
    deletes: Arc<Mutex<Vec<String>>>,
}

impl MockMediaStore {
    pub fn new() -> Self {
        Self {
            puts: Arc::new(Mutex::new(Vec::new())),
            deletes: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Returns the recorded (filename, byte length, mime type, visibility)
    /// tuples, in upload order.
    pub async fn puts(&self) -> Vec<(String, usize, String, MediaVisibility)> {
        self.puts.lock().await.clone()
    }

    /// Returns the recorded deleted keys.
    pub async fn deletes(&self) -> Vec<String> {
        self.deletes.lock().await.clone()
    }
}

impl Default for MockMediaStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockMediaStore {
    fn name(&self) -> &str {
        "mock-media-store"
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
impl MediaStore for MockMediaStore {
    async fn put(
        &self,
        filename: &str,
        bytes: Vec<u8>,
        mime_type: &str,
        visibility: MediaVisibility,
    ) -> Result<StoredObject, NashirError> {
        self.puts.lock().await.push((
            filename.to_string(),
            bytes.len(),
            mime_type.to_string(),
            visibility,
        ));
        let key = format!("{visibility}/{}-{filename}", uuid::Uuid::new_v4());
        Ok(StoredObject {
            url: format!("https://media.test/{key}"),
            key,
            mime_type: mime_type.to_string(),
        })
    }

    async fn delete(&self, key: &str) -> Result<(), NashirError> {
        self.deletes.lock().await.push(key.to_string());
        Ok(())
    }
}
