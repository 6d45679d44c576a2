//! In-process lock store backed by a moka cache.
//!
//! Entries expire individually after the TTL they were created with.
//! Exclusion only holds between callers sharing the same `MemoryStore`
//! (clones share state); separate processes each see their own cache, so
//! this backend must not be used to coordinate more than one process.

use super::LockStore;
use crate::error::Result;
use async_trait::async_trait;
use moka::future::Cache;
use moka::Expiry;
use std::time::{Duration, Instant};
use tracing::trace;

#[derive(Debug, Clone)]
struct LockEntry {
    value: String,
    ttl: Duration,
}

/// Expires every entry after its own TTL; reads never extend it.
struct PerEntryTtl;

impl Expiry<String, LockEntry> for PerEntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        entry: &LockEntry,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(entry.ttl)
    }
}

#[derive(Clone)]
pub struct MemoryStore {
    // No capacity bound: a held lock must never be evicted for space.
    cache: Cache<String, LockEntry>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        let cache = Cache::builder().expire_after(PerEntryTtl).build();
        Self { cache }
    }
}

#[async_trait]
impl LockStore for MemoryStore {
    async fn create_if_absent(&self, key: &str, value: &str, ttl: Duration) -> Result<bool> {
        // The entry API serializes concurrent initializers for one key, so
        // exactly one caller observes a fresh insert.
        let entry = self
            .cache
            .entry(key.to_string())
            .or_insert_with(async {
                LockEntry {
                    value: value.to_string(),
                    ttl,
                }
            })
            .await;

        let created = entry.is_fresh();
        trace!("memory create_if_absent {}: created={}", key, created);
        Ok(created)
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.cache.get(key).await.map(|entry| entry.value))
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        Ok(self.cache.remove(key).await.is_some())
    }

    async fn probe(&self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore")
            .field("entries", &self.cache.entry_count())
            .finish()
    }
}
