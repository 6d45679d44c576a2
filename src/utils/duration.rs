use crate::error::{KeyLockError, Result};
use std::time::Duration;

/// Parse a lock expiry like "30s", "5m", "2h", "1d".
/// Defaults to seconds if no unit specified. Zero is rejected: a lock
/// that expires immediately never protects anything.
pub fn parse_duration(s: &str) -> Result<Duration> {
    let s = s.trim();

    if s.is_empty() {
        return Err(KeyLockError::InvalidDuration {
            input: s.to_string(),
            message: "empty string".to_string(),
        });
    }

    let (num_str, multiplier) = if let Some(stripped) = s.strip_suffix('s') {
        (stripped, 1)
    } else if let Some(stripped) = s.strip_suffix('m') {
        (stripped, 60)
    } else if let Some(stripped) = s.strip_suffix('h') {
        (stripped, 60 * 60)
    } else if let Some(stripped) = s.strip_suffix('d') {
        (stripped, 60 * 60 * 24)
    } else {
        (s, 1)
    };

    let value: u64 = num_str.trim().parse().map_err(|_| KeyLockError::InvalidDuration {
        input: s.to_string(),
        message: "expected format: NUMBER[s|m|h|d] (e.g., '30s', '5m', '2h', '1d')".to_string(),
    })?;

    if value == 0 {
        return Err(KeyLockError::InvalidDuration {
            input: s.to_string(),
            message: "must be greater than zero".to_string(),
        });
    }

    let seconds = value
        .checked_mul(multiplier)
        .ok_or_else(|| KeyLockError::InvalidDuration {
            input: s.to_string(),
            message: "value is too large".to_string(),
        })?;

    Ok(Duration::from_secs(seconds))
}
