// SPDX-FileCopyrightText: 2026 Nashir Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Inbound message aggregation and publishing for Nashir.
//!
//! Fragmented inbound messages accumulate per (sender, token) in the pending
//! submission store with a sliding debounce window. The [`scheduler`] loop
//! claims expired submissions and hands each to the [`pipeline`], which
//! validates authorization, runs AI quality scoring and rewrite, creates the
//! article with its tags and media links, invalidates dependent caches, and
//! replies to the sender. Senders can bypass the window with a [`trigger`]
//! keyword.

pub mod pipeline;
pub mod scheduler;
pub mod text;
pub mod trigger;

pub use pipeline::{PipelineOutcome, PublishingPipeline};
pub use scheduler::run_scheduler;
pub use trigger::is_force_trigger;
