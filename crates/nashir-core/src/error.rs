// SPDX-FileCopyrightText: 2026 Nashir Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Nashir publishing platform.

use thiserror::Error;

use crate::types::RejectionReason;

/// The primary error type used across all Nashir crates.
#[derive(Debug, Error)]
pub enum NashirError {
    /// Configuration errors (invalid TOML, missing required fields, out-of-range thresholds).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Content quality service errors (API failure, malformed analysis response).
    #[error("analysis error: {message}")]
    Analysis {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Media store errors (upload failure, missing object).
    #[error("media error: {message}")]
    Media {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Outbound notifier errors (delivery failure, provider rejection).
    #[error("notify error: {message}")]
    Notify {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A submission was rejected at one of the pipeline's quality gates.
    #[error("submission rejected: {reason}")]
    Rejected { reason: RejectionReason },

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl NashirError {
    /// Convenience constructor for storage errors from any boxable source.
    pub fn storage<E>(source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        NashirError::Storage {
            source: Box::new(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_variants_construct_and_display() {
        let config = NashirError::Config("bad threshold".into());
        assert!(config.to_string().contains("bad threshold"));

        let storage = NashirError::storage(std::io::Error::other("disk"));
        assert!(storage.to_string().contains("disk"));

        let rejected = NashirError::Rejected {
            reason: RejectionReason::LowQuality,
        };
        assert!(rejected.to_string().contains("low_quality"));
    }
}
