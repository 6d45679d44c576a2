use crate::error::{KeyLockError, Result};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Expiry applied when a request carries none (or an unusable one).
pub const DEFAULT_EXPIRY: Duration = Duration::from_secs(10);

/// Upper bound on a single shared-store round trip.
pub const DEFAULT_OPERATION_TIMEOUT: Duration = Duration::from_secs(5);

/// Level used for routine lock events (acquired, contended, released).
///
/// `log` is accepted as an alias of `info` and is the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl FromStr for LogLevel {
    type Err = KeyLockError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "log" | "info" => Ok(LogLevel::Info),
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(KeyLockError::InvalidLogLevel(s.to_string())),
        }
    }
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

/// Configuration bundle handed to [`KeyLock::initialize`](crate::KeyLock::initialize).
///
/// Leaving `store` unset selects the in-process memory store, which only
/// provides mutual exclusion between callers sharing one `KeyLock`.
#[derive(Clone)]
pub struct LockConfig {
    pub store: Option<redis::Client>,
    /// Subscriber receiving this manager's events. When unset, events go to
    /// the process-global `tracing` subscriber; if the host never installs
    /// one (e.g. `tracing_subscriber::fmt().init()`), nothing is printed,
    /// including probe failures and ownership mismatches.
    pub logger: Option<tracing::Dispatch>,
    pub log_level: LogLevel,
    pub default_expiry: Duration,
    pub operation_timeout: Duration,
}

impl Default for LockConfig {
    fn default() -> Self {
        Self {
            store: None,
            logger: None,
            log_level: LogLevel::default(),
            default_expiry: DEFAULT_EXPIRY,
            operation_timeout: DEFAULT_OPERATION_TIMEOUT,
        }
    }
}

impl LockConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_redis(mut self, client: redis::Client) -> Self {
        self.store = Some(client);
        self
    }

    /// Use the Redis server at `url`. Only the URL is validated here;
    /// no connection is made until the manager is initialized.
    pub fn with_redis_url(self, url: &str) -> Result<Self> {
        let client = redis::Client::open(url).map_err(|e| KeyLockError::InvalidStoreUrl {
            url: url.to_string(),
            source: e,
        })?;
        Ok(self.with_redis(client))
    }

    pub fn with_logger(mut self, dispatch: tracing::Dispatch) -> Self {
        self.logger = Some(dispatch);
        self
    }

    pub fn with_log_level(mut self, level: LogLevel) -> Self {
        self.log_level = level;
        self
    }

    /// Ignores a zero expiry, keeping the current default.
    pub fn with_default_expiry(mut self, expiry: Duration) -> Self {
        if !expiry.is_zero() {
            self.default_expiry = expiry;
        }
        self
    }

    pub fn with_operation_timeout(mut self, timeout: Duration) -> Self {
        self.operation_timeout = timeout;
        self
    }
}

impl fmt::Debug for LockConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LockConfig")
            .field("store", &self.store.as_ref().map(|_| "redis"))
            .field("logger", &self.logger.is_some())
            .field("log_level", &self.log_level)
            .field("default_expiry", &self.default_expiry)
            .field("operation_timeout", &self.operation_timeout)
            .finish()
    }
}
