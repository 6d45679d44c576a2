//! Redis lock store.
//!
//! Creation is a single `SET key value EX secs NX`, so exclusion is decided
//! by the server and holds across every process sharing it. Every round trip
//! (connect plus command) is bounded by the configured operation timeout.

use super::LockStore;
use crate::error::{KeyLockError, Result};
use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::{Client, Cmd};
use std::time::Duration;
use tokio::time::timeout;
use tracing::trace;
use uuid::Uuid;

#[derive(Clone)]
pub struct RedisStore {
    client: Client,
    operation_timeout: Duration,
}

impl RedisStore {
    pub fn new(client: Client, operation_timeout: Duration) -> Self {
        Self {
            client,
            operation_timeout,
        }
    }

    async fn connection(&self) -> redis::RedisResult<MultiplexedConnection> {
        self.client.get_multiplexed_async_connection().await
    }

    /// Run one command with a fresh multiplexed connection, mapping transport
    /// failures and timeouts into lock errors tagged with the command name.
    async fn run<T>(&self, command: &'static str, key: &str, cmd: Cmd) -> Result<T>
    where
        T: redis::FromRedisValue + Send,
    {
        let round_trip = async {
            let mut conn = self.connection().await?;
            let reply: T = cmd.query_async(&mut conn).await?;
            Ok::<T, redis::RedisError>(reply)
        };

        match timeout(self.operation_timeout, round_trip).await {
            Ok(Ok(reply)) => Ok(reply),
            Ok(Err(e)) => Err(KeyLockError::store(command, key, e)),
            Err(_) => Err(KeyLockError::store_timeout(
                command,
                key,
                self.operation_timeout,
            )),
        }
    }

    pub fn operation_timeout(&self) -> Duration {
        self.operation_timeout
    }
}

/// Largest `EX` the server accepts: it converts to an absolute millisecond
/// deadline held in an i64, so leave headroom for the current time.
const MAX_EX_SECONDS: u64 = i64::MAX as u64 / 1000 / 2;

/// Redis `EX` takes whole seconds; round sub-second TTLs up so a lock is
/// never created without an expiry, and clamp to what the server accepts.
fn ttl_seconds(ttl: Duration) -> u64 {
    let secs = ttl.as_secs();
    let rounded = if ttl.subsec_nanos() > 0 {
        secs.saturating_add(1)
    } else {
        secs.max(1)
    };
    rounded.min(MAX_EX_SECONDS)
}

#[async_trait]
impl LockStore for RedisStore {
    async fn create_if_absent(&self, key: &str, value: &str, ttl: Duration) -> Result<bool> {
        let mut cmd = redis::cmd("SET");
        cmd.arg(key)
            .arg(value)
            .arg("EX")
            .arg(ttl_seconds(ttl))
            .arg("NX");

        // OK when written, nil when the key already exists.
        let reply: Option<String> = self.run("SET", key, cmd).await?;
        let created = reply.is_some();
        trace!("redis SET NX {}: created={}", key, created);
        Ok(created)
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut cmd = redis::cmd("GET");
        cmd.arg(key);
        self.run("GET", key, cmd).await
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        let mut cmd = redis::cmd("DEL");
        cmd.arg(key);
        let removed: i64 = self.run("DEL", key, cmd).await?;
        Ok(removed > 0)
    }

    async fn probe(&self) -> Result<()> {
        let key = Uuid::new_v4().to_string();
        let mut cmd = redis::cmd("SET");
        cmd.arg(&key).arg(1).arg("EX").arg(1);
        let _: Option<String> = self.run("SET", &key, cmd).await?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "redis"
    }
}

impl std::fmt::Debug for RedisStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisStore")
            .field("operation_timeout", &self.operation_timeout)
            .finish()
    }
}
