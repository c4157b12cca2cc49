//! # Temporal Types — UTC-Only Timestamps and the Injectable Clock
//!
//! Defines `Timestamp`, a UTC-only timestamp truncated to seconds precision,
//! and the `Clock` trait through which every workflow component reads the
//! current time.
//!
//! ## Invariant
//!
//! All statutory deadlines are stored and compared as UTC instants. Local
//! timezone offsets would make "received within the deadline" checks depend
//! on where the comparison runs, so non-UTC inputs are rejected at
//! construction — there is no silent conversion.
//!
//! ## Clock Injection
//!
//! Business methods never read the system clock directly. The component that
//! drives a transition holds a `Clock` and passes the observed instant down,
//! which keeps deadline checks deterministic under test.

use std::sync::Mutex;

use chrono::{DateTime, TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A UTC-only timestamp, truncated to seconds precision.
///
/// # Construction
///
/// - [`Timestamp::now()`] — current UTC time, truncated.
/// - [`Timestamp::from_utc()`] — from a `DateTime<Utc>`, truncating sub-seconds.
/// - [`Timestamp::from_ymd_hms()`] — from calendar components (test fixtures).
/// - [`Timestamp::parse()`] — from an RFC 3339 string, rejecting non-UTC offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Create a timestamp from the current UTC time, truncated to seconds.
    pub fn now() -> Self {
        Self(truncate_to_seconds(Utc::now()))
    }

    /// Create a timestamp from a `chrono::DateTime<Utc>`, truncating sub-seconds.
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(truncate_to_seconds(dt))
    }

    /// Create a timestamp from UTC calendar components.
    ///
    /// # Errors
    ///
    /// Returns an error if the components do not name a valid instant
    /// (e.g. month 13, day 32).
    pub fn from_ymd_hms(
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        min: u32,
        sec: u32,
    ) -> Result<Self, CoreError> {
        Utc.with_ymd_and_hms(year, month, day, hour, min, sec)
            .single()
            .map(Self)
            .ok_or_else(|| {
                CoreError::InvalidTimestamp(format!(
                    "{year:04}-{month:02}-{day:02} {hour:02}:{min:02}:{sec:02} is not a valid UTC instant"
                ))
            })
    }

    /// Parse a timestamp from an RFC 3339 string.
    ///
    /// **Rejects non-UTC inputs.** Only the `Z` suffix is accepted — even
    /// `+00:00`, which is semantically equivalent, is rejected so that every
    /// stored deadline has exactly one textual form.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not valid RFC 3339 or uses a
    /// non-Z offset.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        if !s.ends_with('Z') {
            return Err(CoreError::InvalidTimestamp(format!(
                "timestamp must use Z suffix (UTC only), got: {s:?}"
            )));
        }

        let dt = DateTime::parse_from_rfc3339(s)
            .map_err(|e| CoreError::InvalidTimestamp(format!("invalid RFC 3339 timestamp {s:?}: {e}")))?;

        Ok(Self(truncate_to_seconds(dt.with_timezone(&Utc))))
    }

    /// Access the inner `DateTime<Utc>`.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Returns the Unix epoch timestamp in seconds.
    pub fn epoch_secs(&self) -> i64 {
        self.0.timestamp()
    }

    /// The timestamp shifted by a whole number of days, preserving time of day.
    pub fn plus_days(&self, days: i64) -> Self {
        Self(self.0 + chrono::Duration::days(days))
    }

    /// The weekday of this instant (UTC).
    pub fn weekday(&self) -> chrono::Weekday {
        chrono::Datelike::weekday(&self.0)
    }

    /// Render as ISO 8601 with Z suffix (e.g. `2024-03-01T12:00:00Z`).
    pub fn to_iso8601(&self) -> String {
        self.0.format("%Y-%m-%dT%H:%M:%SZ").to_string()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_iso8601())
    }
}

/// Truncate a `DateTime<Utc>` to seconds precision (discard nanoseconds).
fn truncate_to_seconds(dt: DateTime<Utc>) -> DateTime<Utc> {
    dt.with_nanosecond(0).unwrap_or(dt)
}

// ─── Clock ───────────────────────────────────────────────────────────

/// Source of the current time, injected into every workflow component.
pub trait Clock: Send + Sync {
    /// The current instant.
    fn now(&self) -> Timestamp;
}

/// Production clock reading the system time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

/// A settable clock for tests and replays.
///
/// Starts at the instant it was constructed with; `set()` moves it.
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<Timestamp>,
}

impl FixedClock {
    /// Create a clock frozen at the given instant.
    pub fn new(now: Timestamp) -> Self {
        Self { now: Mutex::new(now) }
    }

    /// Move the clock to a new instant.
    pub fn set(&self, now: Timestamp) {
        *self.now.lock().expect("clock lock poisoned") = now;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        *self.now.lock().expect("clock lock poisoned")
    }
}

// ─── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_now_has_no_subseconds() {
        let ts = Timestamp::now();
        assert_eq!(ts.as_datetime().nanosecond(), 0);
    }

    #[test]
    fn test_from_utc_truncates() {
        let dt = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 45).unwrap();
        let dt_with_nanos = dt.with_nanosecond(123_456_789).unwrap();
        let ts = Timestamp::from_utc(dt_with_nanos);
        assert_eq!(ts.as_datetime().nanosecond(), 0);
        assert_eq!(ts.to_iso8601(), "2024-03-01T12:30:45Z");
    }

    #[test]
    fn test_from_ymd_hms() {
        let ts = Timestamp::from_ymd_hms(2024, 3, 1, 9, 0, 0).unwrap();
        assert_eq!(ts.to_iso8601(), "2024-03-01T09:00:00Z");
    }

    #[test]
    fn test_from_ymd_hms_invalid() {
        assert!(Timestamp::from_ymd_hms(2024, 13, 1, 0, 0, 0).is_err());
        assert!(Timestamp::from_ymd_hms(2024, 2, 30, 0, 0, 0).is_err());
    }

    #[test]
    fn test_parse_z_suffix_accepted() {
        let ts = Timestamp::parse("2024-03-01T12:00:00Z").unwrap();
        assert_eq!(ts.to_iso8601(), "2024-03-01T12:00:00Z");
    }

    #[test]
    fn test_parse_offsets_rejected() {
        assert!(Timestamp::parse("2024-03-01T12:00:00+00:00").is_err());
        assert!(Timestamp::parse("2024-03-01T17:00:00+05:00").is_err());
        assert!(Timestamp::parse("2024-03-01T08:00:00-04:00").is_err());
    }

    #[test]
    fn test_parse_subseconds_truncated() {
        let ts = Timestamp::parse("2024-03-01T12:00:00.123456Z").unwrap();
        assert_eq!(ts.as_datetime().nanosecond(), 0);
    }

    #[test]
    fn test_parse_invalid_format() {
        assert!(Timestamp::parse("not-a-date").is_err());
        assert!(Timestamp::parse("2024-03-01").is_err());
        assert!(Timestamp::parse("").is_err());
    }

    #[test]
    fn test_plus_days_preserves_time_of_day() {
        let ts = Timestamp::parse("2024-03-01T09:30:00Z").unwrap();
        assert_eq!(ts.plus_days(3).to_iso8601(), "2024-03-04T09:30:00Z");
        assert_eq!(ts.plus_days(0), ts);
    }

    #[test]
    fn test_weekday() {
        // 2024-03-01 was a Friday.
        let ts = Timestamp::parse("2024-03-01T00:00:00Z").unwrap();
        assert_eq!(ts.weekday(), chrono::Weekday::Fri);
    }

    #[test]
    fn test_ordering() {
        let earlier = Timestamp::parse("2024-03-01T12:00:00Z").unwrap();
        let later = Timestamp::parse("2024-03-01T12:00:01Z").unwrap();
        assert!(earlier < later);
    }

    #[test]
    fn test_serde_roundtrip() {
        let ts = Timestamp::parse("2024-03-01T12:00:00Z").unwrap();
        let json = serde_json::to_string(&ts).unwrap();
        let parsed: Timestamp = serde_json::from_str(&json).unwrap();
        assert_eq!(ts, parsed);
    }

    // ── Clock ────────────────────────────────────────────────────────

    #[test]
    fn test_system_clock_advances() {
        let clock = SystemClock;
        let a = clock.now();
        let b = clock.now();
        assert!(a <= b);
    }

    #[test]
    fn test_fixed_clock_is_settable() {
        let start = Timestamp::parse("2024-03-01T12:00:00Z").unwrap();
        let clock = FixedClock::new(start);
        assert_eq!(clock.now(), start);

        let later = Timestamp::parse("2024-03-20T12:00:00Z").unwrap();
        clock.set(later);
        assert_eq!(clock.now(), later);
    }
}
