// SPDX-FileCopyrightText: 2026 Nashir Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions for the seams to external collaborators.

pub mod adapter;
pub mod analyzer;
pub mod media;
pub mod notifier;

pub use adapter::PluginAdapter;
pub use analyzer::ContentAnalyzer;
pub use media::MediaStore;
pub use notifier::OutboundNotifier;
