// SPDX-FileCopyrightText: 2026 Nashir Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Subscriber registry for cache invalidation events.
//!
//! Long-lived stream connections (the gateway's SSE endpoint) register an
//! mpsc sender here. Broadcasting pushes one event to every registered
//! subscriber; subscribers whose channel has closed are silently removed. A
//! full channel means a slow but live client: that event is dropped for the
//! subscriber, the subscription stays.

use std::sync::Arc;

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::debug;

/// Event pushed to live clients when one or more key pattern groups are cleared.
///
/// Wire shape: `{"type": "cache_invalidated", "patterns": ["homepage", ...]}`.
/// Pattern names are human-readable group names, already stripped of regex
/// anchor and delimiter characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvalidationEvent {
    #[serde(rename = "type")]
    pub kind: String,
    pub patterns: Vec<String>,
}

impl InvalidationEvent {
    /// Builds a `cache_invalidated` event for the given pattern group names.
    pub fn invalidated(patterns: Vec<String>) -> Self {
        Self {
            kind: "cache_invalidated".to_string(),
            patterns,
        }
    }
}

/// Registry of live stream subscribers.
#[derive(Clone, Default)]
pub struct SubscriberRegistry {
    senders: Arc<DashMap<String, mpsc::Sender<InvalidationEvent>>>,
}

impl SubscriberRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new subscriber and returns its id plus the receiving end.
    pub fn subscribe(&self) -> (String, mpsc::Receiver<InvalidationEvent>) {
        let id = uuid::Uuid::new_v4().to_string();
        let (tx, rx) = mpsc::channel(16);
        self.senders.insert(id.clone(), tx);
        debug!(subscriber_id = id.as_str(), "stream subscriber registered");
        (id, rx)
    }

    /// Removes a subscriber explicitly (client disconnected cleanly).
    pub fn unsubscribe(&self, id: &str) {
        self.senders.remove(id);
    }

    /// Number of currently registered subscribers.
    pub fn len(&self) -> usize {
        self.senders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.senders.is_empty()
    }

    /// Pushes an event to every subscriber, pruning any whose channel closed.
    pub fn broadcast(&self, event: &InvalidationEvent) {
        let mut dead = Vec::new();
        for entry in self.senders.iter() {
            match entry.value().try_send(event.clone()) {
                Ok(()) => {}
                Err(TrySendError::Full(_)) => {
                    // Slow client: skip this event, keep the subscription.
                    debug!(
                        subscriber_id = entry.key().as_str(),
                        "subscriber channel full, event dropped"
                    );
                }
                Err(TrySendError::Closed(_)) => dead.push(entry.key().clone()),
            }
        }
        for id in dead {
            self.senders.remove(&id);
            debug!(subscriber_id = id.as_str(), "pruned dead stream subscriber");
        }
    }
}
