// SPDX-FileCopyrightText: 2026 Nashir Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-process TTL cache with pattern-based invalidation and live broadcast.
//!
//! Downstream readers (homepage listings, category pages) cache expensive
//! aggregate queries here. The publishing pipeline invalidates the key groups
//! that could be stale after a new article appears, and connected stream
//! clients receive one `cache_invalidated` event per invalidation batch so
//! they can refetch instead of polling.
//!
//! The cache is per-process. In a multi-process deployment each process sees
//! only its own invalidations; a shared pub/sub backend would be needed to
//! broadcast across processes. That is a scaling caveat, not a bug.

pub mod broadcast;
pub mod store;
pub mod sweep;

pub use broadcast::{InvalidationEvent, SubscriberRegistry};
pub use store::MemoryCache;
pub use sweep::run_sweeper;
