// SPDX-FileCopyrightText: 2026 Nashir Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway for Nashir.
//!
//! Channel providers (WhatsApp, email) deliver parsed message fragments to
//! the bearer-protected webhook routes. The gateway makes inline attachments
//! durable, appends the fragment to the pending submission store, and runs
//! the pipeline inline when the fragment carries a force trigger. Live
//! clients follow cache invalidations over the public SSE events route.

pub mod auth;
pub mod handlers;
pub mod server;
pub mod sse;

pub use auth::AuthConfig;
pub use server::{build_router, start_server, AppState, ServerConfig};
