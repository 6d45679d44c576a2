use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Lock manager operation that rejected a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Acquire,
    Release,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Acquire => f.write_str("acquire"),
            Operation::Release => f.write_str("release"),
        }
    }
}

#[derive(Debug, Error)]
pub enum KeyLockError {
    #[error("A lock key is required to {operation}")]
    KeyRequired { operation: Operation },

    #[error("Lock value mismatch for key {key}: caller does not own the lock")]
    ValueMismatch {
        key: String,
        expected: Option<String>,
        given: String,
    },

    #[error("Lock store command {command} failed for key {key}: {source}")]
    Store {
        command: &'static str,
        key: String,
        source: redis::RedisError,
    },

    #[error("Lock store command {command} for key {key} timed out after {timeout:?}")]
    StoreTimeout {
        command: &'static str,
        key: String,
        timeout: Duration,
    },

    #[error("Invalid lock store URL '{url}': {source}")]
    InvalidStoreUrl {
        url: String,
        source: redis::RedisError,
    },

    #[error("Invalid duration format '{input}': {message}")]
    InvalidDuration { input: String, message: String },

    #[error("Invalid log level '{0}': expected one of log, trace, debug, info, warn, error")]
    InvalidLogLevel(String),
}

impl KeyLockError {
    /// HTTP-style status classifying the fault.
    pub fn status(&self) -> u16 {
        match self {
            KeyLockError::KeyRequired { .. } => 400,
            KeyLockError::ValueMismatch { .. } => 409,
            KeyLockError::Store { .. } => 503,
            KeyLockError::StoreTimeout { .. } => 504,
            KeyLockError::InvalidStoreUrl { .. }
            | KeyLockError::InvalidDuration { .. }
            | KeyLockError::InvalidLogLevel(_) => 400,
        }
    }

    /// True when the fault was caused by the caller rather than the backend.
    pub fn is_caller_error(&self) -> bool {
        !matches!(
            self,
            KeyLockError::Store { .. } | KeyLockError::StoreTimeout { .. }
        )
    }

    pub fn key_required(operation: Operation) -> Self {
        KeyLockError::KeyRequired { operation }
    }

    pub fn store(command: &'static str, key: impl Into<String>, source: redis::RedisError) -> Self {
        KeyLockError::Store {
            command,
            key: key.into(),
            source,
        }
    }

    pub fn store_timeout(command: &'static str, key: impl Into<String>, timeout: Duration) -> Self {
        KeyLockError::StoreTimeout {
            command,
            key: key.into(),
            timeout,
        }
    }
}

pub type Result<T> = std::result::Result<T, KeyLockError>;
