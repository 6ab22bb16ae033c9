// SPDX-FileCopyrightText: 2026 Nashir Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Nashir integration tests.
//!
//! Provides mock adapters for fast, deterministic, CI-runnable tests without
//! external services.
//!
//! # Components
//!
//! - [`MockAnalyzer`] - Mock content quality service with scripted analyses
//! - [`MockMediaStore`] - Mock blob store that records uploads
//! - [`MockNotifier`] - Mock outbound notifier that captures sent replies

pub mod mock_analyzer;
pub mod mock_media;
pub mod mock_notifier;

pub use mock_analyzer::MockAnalyzer;
pub use mock_media::MockMediaStore;
pub use mock_notifier::MockNotifier;
