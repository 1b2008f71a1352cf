//! Time-related utilities with clock abstraction for testability.

use chrono::{DateTime, SecondsFormat, TimeZone, Utc};

/// Clock trait for dependency injection and testing
pub trait Clock: Send + Sync {
    /// Current instant in UTC
    fn now(&self) -> DateTime<Utc>;
}

/// System clock implementation (uses actual system time)
#[derive(Debug, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Fixed clock implementation for testing (returns a fixed time)
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    fixed_time: DateTime<Utc>,
}

impl FixedClock {
    /// Create a new fixed clock from a Unix timestamp in milliseconds.
    ///
    /// Out-of-range values fall back to the Unix epoch.
    pub fn new(fixed_time_millis: i64) -> Self {
        Self {
            fixed_time: Utc
                .timestamp_millis_opt(fixed_time_millis)
                .single()
                .unwrap_or_default(),
        }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.fixed_time
    }
}

/// Format an instant as RFC 3339 with second precision (e.g. `2023-01-01T00:00:00Z`).
pub fn to_rfc3339(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Parse an RFC 3339 string back into UTC.
pub fn parse_rfc3339(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Compact sortable prefix used in message ids, millisecond precision
/// (e.g. `20230101000000.123`).
pub fn compact_millis(at: DateTime<Utc>) -> String {
    at.format("%Y%m%d%H%M%S%.3f").to_string()
}

/// Format an RFC 3339 timestamp for terminal display as `HH:MM:SS`.
///
/// Unparseable input is returned unchanged.
pub fn display_time(rfc3339: &str) -> String {
    parse_rfc3339(rfc3339)
        .map(|dt| dt.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| rfc3339.to_string())
}
