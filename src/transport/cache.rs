// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Response Cache
//!
//! In-memory, keyed storage of successful responses with an independent TTL
//! per entry. Entries are replaced whole, never mutated in place, so readers
//! never observe a torn value. Expired entries are dropped lazily on read and
//! swept on every write, so the map only holds live entries plus whatever
//! expired since the last write.
//!
//! Concurrent misses on the same key are not coordinated: both dispatch and
//! the last write wins.
//!
//! **Persistence**: none. The cache lives only as long as the process.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;

use super::response::ResponseEnvelope;

#[derive(Debug, Clone)]
struct CacheEntry {
    response: ResponseEnvelope,
    /// `None` never expires
    expires_at: Option<Instant>,
}

impl CacheEntry {
    fn is_fresh(&self, now: Instant) -> bool {
        self.expires_at.map_or(true, |deadline| now < deadline)
    }
}

/// Thread-safe TTL cache for `ResponseEnvelope`s
///
/// Cloning shares the underlying map.
///
/// # Example
///
/// ```ignore
/// let cache = ResponseCache::new();
/// cache.put("https://svc/publickeys", response, Some(Duration::from_secs(86400))).await;
/// let hit = cache.get("https://svc/publickeys").await;
/// ```
#[derive(Clone, Default)]
pub struct ResponseCache {
    entries: Arc<RwLock<HashMap<String, CacheEntry>>>,
}

impl ResponseCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a response, replacing any previous entry under `key`
    ///
    /// The TTL countdown starts now. A TTL too large to represent as a
    /// deadline is stored without expiry.
    pub async fn put(&self, key: &str, response: ResponseEnvelope, ttl: Option<Duration>) {
        let now = Instant::now();
        let entry = CacheEntry {
            response,
            expires_at: ttl.and_then(|ttl| now.checked_add(ttl)),
        };

        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| entry.is_fresh(now));
        let swept = before - entries.len();
        if swept > 0 {
            tracing::debug!("⌛ Swept {} expired cache entries", swept);
        }

        entries.insert(key.to_string(), entry);
        tracing::debug!(
            "💾 Cached response under '{}' (ttl: {:?}, total entries: {})",
            key,
            ttl,
            entries.len()
        );
    }

    /// Fresh entry for `key`, if any
    pub async fn get(&self, key: &str) -> Option<ResponseEnvelope> {
        let now = Instant::now();
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                Some(entry) if entry.is_fresh(now) => return Some(entry.response.clone()),
                Some(_) => {}
                None => return None,
            }
        }

        // Expired: drop it unless a concurrent writer already replaced it
        let mut entries = self.entries.write().await;
        if entries.get(key).map_or(false, |entry| !entry.is_fresh(now)) {
            entries.remove(key);
            tracing::debug!("⌛ Cache entry '{}' expired", key);
        }
        entries
            .get(key)
            .filter(|entry| entry.is_fresh(Instant::now()))
            .map(|entry| entry.response.clone())
    }

    /// Evict an entry; returns whether one was present
    pub async fn remove(&self, key: &str) -> bool {
        let mut entries = self.entries.write().await;
        let removed = entries.remove(key).is_some();
        if removed {
            tracing::debug!(
                "🗑️  Cache entry '{}' evicted (remaining: {})",
                key,
                entries.len()
            );
        }
        removed
    }

    /// Number of stored entries, including expired ones not yet swept
    pub async fn count(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Drop every expired entry
    pub async fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| entry.is_fresh(now));
        before - entries.len()
    }

    pub async fn clear(&self) {
        let mut entries = self.entries.write().await;
        let count = entries.len();
        entries.clear();
        tracing::debug!("🗑️  Cleared response cache (count: {})", count);
    }
}
