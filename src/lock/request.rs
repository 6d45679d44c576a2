use crate::utils::parse_duration;
use chrono::{DateTime, Utc};
use std::time::Duration;

/// Status reported when a lock is granted or released.
pub const STATUS_OK: u16 = 200;

/// Status reported when the key is already held by someone else.
pub const STATUS_LOCKED: u16 = 423;

/// Parameters for [`KeyLock::acquire`](crate::KeyLock::acquire).
///
/// An empty key counts as missing. A missing or unusable expiry falls back
/// to the manager's default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LockRequest {
    pub(crate) key: Option<String>,
    pub(crate) value: Option<String>,
    pub(crate) expiry: Option<Duration>,
}

impl LockRequest {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
            ..Self::default()
        }
    }

    /// Ownership token to store. A fresh UUID is generated when unset.
    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Expiry in seconds; zero or negative keeps the default.
    pub fn expires(mut self, seconds: i64) -> Self {
        self.expiry = u64::try_from(seconds)
            .ok()
            .filter(|s| *s > 0)
            .map(Duration::from_secs);
        self
    }

    /// Expiry such as "30", "30s" or "5m"; anything unparsable keeps the default.
    ///
    /// Unit suffixes are honoured, so "5m" is 300 seconds rather than a
    /// leading-digits read of 5. Use [`expires`](Self::expires) for plain
    /// seconds.
    pub fn expires_str(mut self, expiry: &str) -> Self {
        self.expiry = parse_duration(expiry).ok();
        self
    }

    pub fn expires_in(mut self, expiry: Duration) -> Self {
        self.expiry = Some(expiry).filter(|d| !d.is_zero());
        self
    }

    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }
}

/// Parameters for [`KeyLock::release`](crate::KeyLock::release).
///
/// Without a value the entry is deleted whoever holds it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReleaseRequest {
    pub(crate) key: Option<String>,
    pub(crate) value: Option<String>,
}

impl ReleaseRequest {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
            value: None,
        }
    }

    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }
}

impl From<&Lease> for ReleaseRequest {
    fn from(lease: &Lease) -> Self {
        ReleaseRequest::new(lease.key.clone()).value(lease.value.clone())
    }
}

/// Proof of ownership handed out by a successful acquire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lease {
    pub key: String,
    pub value: String,
    pub expires_at: DateTime<Utc>,
}

impl Lease {
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}

/// Result of an acquire attempt. Contention is an ordinary outcome, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Acquisition {
    Acquired(Lease),
    Locked,
}

impl Acquisition {
    pub fn status(&self) -> u16 {
        match self {
            Acquisition::Acquired(_) => STATUS_OK,
            Acquisition::Locked => STATUS_LOCKED,
        }
    }

    pub fn is_acquired(&self) -> bool {
        matches!(self, Acquisition::Acquired(_))
    }

    pub fn value(&self) -> Option<&str> {
        match self {
            Acquisition::Acquired(lease) => Some(&lease.value),
            Acquisition::Locked => None,
        }
    }

    pub fn into_lease(self) -> Option<Lease> {
        match self {
            Acquisition::Acquired(lease) => Some(lease),
            Acquisition::Locked => None,
        }
    }
}

/// Successful release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Released {
    /// Whether an entry was present when it was deleted.
    pub existed: bool,
}

impl Released {
    pub fn status(&self) -> u16 {
        STATUS_OK
    }
}
