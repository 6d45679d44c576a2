//! Backends holding lock entries.
//!
//! Every write to a lock entry goes through [`LockStore::create_if_absent`]
//! or [`LockStore::delete`]; there is no unconditional overwrite.

mod memory;
mod redis_store;

pub use self::memory::MemoryStore;
pub use self::redis_store::RedisStore;

use crate::error::Result;
use async_trait::async_trait;
use std::time::Duration;

#[async_trait]
pub trait LockStore: Send + Sync {
    /// Atomically store `value` under `key` for `ttl`, only if `key` holds no
    /// live entry. Returns `false` when the key is already held.
    async fn create_if_absent(&self, key: &str, value: &str, ttl: Duration) -> Result<bool>;

    /// Current value of a live entry.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Remove the entry. Returns whether one existed.
    async fn delete(&self, key: &str) -> Result<bool>;

    /// Best-effort connectivity check.
    async fn probe(&self) -> Result<()>;

    fn name(&self) -> &'static str;
}
