use super::request::{Acquisition, Lease, LockRequest, ReleaseRequest, Released};
use crate::config::{LockConfig, LogLevel};
use crate::error::{KeyLockError, Operation, Result};
use crate::store::{LockStore, MemoryStore, RedisStore};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, Dispatch};
use uuid::Uuid;

/// Logged when the start-up connectivity probe fails.
pub const PROBE_FAILURE_MESSAGE: &str = "cannotConnectToRedis";

/// Emit an event at a level chosen at runtime.
macro_rules! event_at {
    ($level:expr, $($arg:tt)+) => {
        match $level {
            LogLevel::Trace => tracing::trace!($($arg)+),
            LogLevel::Debug => tracing::debug!($($arg)+),
            LogLevel::Info => tracing::info!($($arg)+),
            LogLevel::Warn => tracing::warn!($($arg)+),
            LogLevel::Error => tracing::error!($($arg)+),
        }
    };
}

/// Keyed, time-bounded mutual exclusion.
///
/// With a Redis store the lock is shared by every process using that server.
/// Without one, entries live in this instance's memory and only exclude
/// callers sharing it (clone the `KeyLock` or wrap it in an `Arc`).
#[derive(Clone)]
pub struct KeyLock {
    store: Arc<dyn LockStore>,
    logger: Option<Dispatch>,
    log_level: LogLevel,
    default_expiry: Duration,
}

impl KeyLock {
    /// Select the backend from `config` and probe it.
    ///
    /// A failed probe is logged and otherwise ignored; later operations
    /// surface the real store error.
    pub async fn initialize(config: LockConfig) -> Self {
        let store: Arc<dyn LockStore> = match &config.store {
            Some(client) => Arc::new(RedisStore::new(client.clone(), config.operation_timeout)),
            None => Arc::new(MemoryStore::new()),
        };
        Self::with_store(store, config).await
    }

    /// Build a manager over an arbitrary store. `config.store` is ignored.
    pub async fn with_store(store: Arc<dyn LockStore>, config: LockConfig) -> Self {
        let manager = Self {
            store,
            logger: config.logger,
            log_level: config.log_level,
            default_expiry: config.default_expiry,
        };
        manager.check_connectivity().await;
        manager
    }

    async fn check_connectivity(&self) {
        if let Err(e) = self.store.probe().await {
            self.emit(|| {
                error!(
                    backend = self.store.name(),
                    error = %e,
                    "{}",
                    PROBE_FAILURE_MESSAGE
                )
            });
        }
    }

    /// Try to take the lock on `request.key`.
    ///
    /// Returns [`Acquisition::Locked`] when the key is already held; faults
    /// only for a missing key or a store failure.
    pub async fn acquire(&self, request: LockRequest) -> Result<Acquisition> {
        let key = request
            .key
            .filter(|k| !k.is_empty())
            .ok_or_else(|| KeyLockError::key_required(Operation::Acquire))?;
        let ttl = request.expiry.unwrap_or(self.default_expiry);
        let value = request
            .value
            .filter(|v| !v.is_empty())
            .unwrap_or_else(generate_token);

        if !self.store.create_if_absent(&key, &value, ttl).await? {
            self.emit(|| event_at!(self.log_level, key = %key, "Lock is held, not acquired"));
            return Ok(Acquisition::Locked);
        }

        self.emit(|| event_at!(self.log_level, key = %key, ttl = ?ttl, "Lock acquired"));

        Ok(Acquisition::Acquired(Lease {
            expires_at: expiry_deadline(Utc::now(), ttl),
            key,
            value,
        }))
    }

    /// Delete the lock on `request.key`.
    ///
    /// With a value, the stored value must match or the entry is left in
    /// place and [`KeyLockError::ValueMismatch`] is returned.
    pub async fn release(&self, request: ReleaseRequest) -> Result<Released> {
        let key = request
            .key
            .filter(|k| !k.is_empty())
            .ok_or_else(|| KeyLockError::key_required(Operation::Release))?;

        if let Some(given) = request.value.filter(|v| !v.is_empty()) {
            let expected = self.store.get(&key).await?;
            if expected.as_deref() != Some(given.as_str()) {
                self.emit(|| {
                    error!(
                        key = %key,
                        expected = ?expected,
                        given = %given,
                        "Lock value mismatch, refusing to release"
                    )
                });
                return Err(KeyLockError::ValueMismatch {
                    key,
                    expected,
                    given,
                });
            }
        }

        let existed = self.store.delete(&key).await?;
        self.emit(|| event_at!(self.log_level, key = %key, existed, "Lock released"));

        Ok(Released { existed })
    }

    /// Name of the active backend ("redis" or "memory" for the built-ins).
    pub fn backend(&self) -> &'static str {
        self.store.name()
    }

    pub fn default_expiry(&self) -> Duration {
        self.default_expiry
    }

    fn emit(&self, event: impl FnOnce()) {
        match &self.logger {
            Some(dispatch) => tracing::dispatcher::with_default(dispatch, event),
            None => event(),
        }
    }
}

impl std::fmt::Debug for KeyLock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyLock")
            .field("backend", &self.store.name())
            .field("log_level", &self.log_level)
            .field("default_expiry", &self.default_expiry)
            .finish()
    }
}

/// Fresh ownership token.
pub fn generate_token() -> String {
    Uuid::new_v4().to_string()
}

fn expiry_deadline(now: DateTime<Utc>, ttl: Duration) -> DateTime<Utc> {
    chrono::Duration::from_std(ttl)
        .ok()
        .and_then(|ttl| now.checked_add_signed(ttl))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}
