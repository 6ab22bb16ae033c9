// SPDX-FileCopyrightText: 2026 Nashir Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! TTL cache with regex-pattern invalidation.
//!
//! Entries past their TTL read as absent; the background sweep in
//! [`crate::sweep`] reclaims them independently of reads so memory does not
//! grow unbounded for keys nobody re-reads.

use std::time::{Duration, Instant};

use dashmap::DashMap;
use nashir_core::NashirError;
use regex::Regex;
use serde_json::Value;
use tracing::debug;

use crate::broadcast::{InvalidationEvent, SubscriberRegistry};

struct CacheEntry {
    data: Value,
    stored_at: Instant,
    ttl: Duration,
}

impl CacheEntry {
    fn is_expired(&self, now: Instant) -> bool {
        now.duration_since(self.stored_at) >= self.ttl
    }
}

/// Process-local TTL cache with an attached subscriber registry.
///
/// Constructed explicitly and injected where needed so tests can run
/// isolated instances; there is no module-level singleton.
pub struct MemoryCache {
    entries: DashMap<String, CacheEntry>,
    subscribers: SubscriberRegistry,
    default_ttl: Duration,
}

impl MemoryCache {
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            subscribers: SubscriberRegistry::new(),
            default_ttl,
        }
    }

    /// Returns the subscriber registry for wiring the live event stream.
    pub fn subscribers(&self) -> &SubscriberRegistry {
        &self.subscribers
    }

    /// Reads a key; expired entries are treated as absent (and removed).
    pub fn get(&self, key: &str) -> Option<Value> {
        let now = Instant::now();
        if let Some(entry) = self.entries.get(key) {
            if !entry.is_expired(now) {
                return Some(entry.data.clone());
            }
        }
        // Expired: drop eagerly rather than waiting for the sweep.
        self.entries
            .remove_if(key, |_, entry| entry.is_expired(now));
        None
    }

    /// Stores a value with the given TTL (default TTL when `None`).
    pub fn set(&self, key: &str, value: Value, ttl: Option<Duration>) {
        self.entries.insert(
            key.to_string(),
            CacheEntry {
                data: value,
                stored_at: Instant::now(),
                ttl: ttl.unwrap_or(self.default_ttl),
            },
        );
    }

    /// Removes a single key.
    pub fn delete(&self, key: &str) {
        self.entries.remove(key);
    }

    /// Number of live (possibly expired but unswept) entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Removes every key matching `pattern` (a regular expression).
    ///
    /// Returns the number of keys removed. When `broadcast` is set and at
    /// least one key matched, one event naming the pattern group is pushed to
    /// all subscribers.
    pub fn invalidate_pattern(&self, pattern: &str, broadcast: bool) -> Result<usize, NashirError> {
        let removed = self.remove_matching(pattern)?;
        if broadcast && removed > 0 {
            let event = InvalidationEvent::invalidated(vec![humanize_pattern(pattern)]);
            self.subscribers.broadcast(&event);
        }
        Ok(removed)
    }

    /// Removes keys for every pattern, then emits a single broadcast event
    /// listing only the patterns that matched at least one key.
    ///
    /// Returns the human-readable names of the pattern groups that matched.
    pub fn invalidate_patterns(&self, patterns: &[&str]) -> Result<Vec<String>, NashirError> {
        let mut matched = Vec::new();
        for pattern in patterns {
            let removed = self.remove_matching(pattern)?;
            if removed > 0 {
                matched.push(humanize_pattern(pattern));
            }
        }

        if !matched.is_empty() {
            debug!(patterns = ?matched, "broadcasting cache invalidation");
            self.subscribers
                .broadcast(&InvalidationEvent::invalidated(matched.clone()));
        }
        Ok(matched)
    }

    /// Removes entries whose TTL has elapsed. Called by the background sweep.
    pub fn sweep_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired(now));
        before - self.entries.len()
    }

    fn remove_matching(&self, pattern: &str) -> Result<usize, NashirError> {
        let re = Regex::new(pattern)
            .map_err(|e| NashirError::Internal(format!("invalid cache pattern {pattern:?}: {e}")))?;
        let before = self.entries.len();
        self.entries.retain(|key, _| !re.is_match(key));
        Ok(before - self.entries.len())
    }
}

/// Strips regex anchor and delimiter characters from a pattern for broadcast.
///
/// `"^homepage:"` becomes `"homepage"`: clients see group names, not raw
/// regexes.
fn humanize_pattern(pattern: &str) -> String {
    pattern
        .trim_start_matches('^')
        .trim_end_matches('$')
        .trim_end_matches(".*")
        .trim_matches(':')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn cache() -> MemoryCache {
        MemoryCache::new(Duration::from_secs(300))
    }

    #[test]
    fn set_get_delete_round_trip() {
        let cache = cache();
        cache.set("homepage:latest", json!({"articles": [1, 2]}), None);

        assert_eq!(
            cache.get("homepage:latest"),
            Some(json!({"articles": [1, 2]}))
        );
        cache.delete("homepage:latest");
        assert_eq!(cache.get("homepage:latest"), None);
    }

    #[test]
    fn expired_entry_reads_as_absent() {
        let cache = cache();
        cache.set("short", json!(1), Some(Duration::ZERO));
        assert_eq!(cache.get("short"), None);
        assert!(cache.is_empty(), "expired read also evicts");
    }

    #[test]
    fn sweep_reclaims_expired_entries_without_reads() {
        let cache = cache();
        cache.set("a", json!(1), Some(Duration::ZERO));
        cache.set("b", json!(2), Some(Duration::ZERO));
        cache.set("keep", json!(3), Some(Duration::from_secs(600)));

        let swept = cache.sweep_expired();
        assert_eq!(swept, 2);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("keep"), Some(json!(3)));
    }

    #[test]
    fn invalidate_pattern_removes_matching_keys() {
        let cache = cache();
        cache.set("homepage:latest", json!(1), None);
        cache.set("homepage:blocks", json!(2), None);
        cache.set("trending:day", json!(3), None);

        let removed = cache.invalidate_pattern("^homepage:", false).unwrap();
        assert_eq!(removed, 2);
        assert_eq!(cache.get("trending:day"), Some(json!(3)));
    }

    #[tokio::test]
    async fn batched_invalidation_names_only_matched_groups() {
        let cache = cache();
        cache.set("homepage:latest", json!(1), None);
        let (_id, mut rx) = cache.subscribers().subscribe();

        // Only homepage keys exist: trending must not appear in the event.
        let matched = cache
            .invalidate_patterns(&["^homepage:", "^trending:"])
            .unwrap();
        assert_eq!(matched, vec!["homepage"]);

        let event = rx.recv().await.unwrap();
        assert_eq!(event.kind, "cache_invalidated");
        assert_eq!(event.patterns, vec!["homepage"]);

        // Exactly one event for the whole batch.
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn no_event_when_nothing_matched() {
        let cache = cache();
        let (_id, mut rx) = cache.subscribers().subscribe();

        let matched = cache.invalidate_patterns(&["^homepage:"]).unwrap();
        assert!(matched.is_empty());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn invalid_regex_is_an_error_not_a_panic() {
        let cache = cache();
        assert!(cache.invalidate_pattern("([", false).is_err());
    }

    #[test]
    fn humanize_strips_anchors_and_delimiters() {
        assert_eq!(humanize_pattern("^homepage:"), "homepage");
        assert_eq!(humanize_pattern("^articles:list.*"), "articles:list");
        assert_eq!(humanize_pattern("^trending:$"), "trending");
    }
}
