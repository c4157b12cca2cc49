//! # Statutory Deadline Arithmetic
//!
//! Computes the deadlines the electoral regulation attaches to each phase of
//! a case: defense windows in business days, evidence and closing-argument
//! windows in calendar days.
//!
//! ## Rules
//!
//! - **Calendar-day deadline**: `start + N days`, no adjustment.
//! - **Business-day deadline**: advance one day at a time from `start`,
//!   counting only days the calendar accepts, until `N` have been counted;
//!   the landing day is the deadline. A Friday start with `N = 1` lands on
//!   Monday.
//! - **Expiry**: `now > deadline`. Deadlines are business data computed once
//!   when a phase opens and stored on the case — never recomputed at check
//!   time and never backed by a running timer.
//!
//! ## Calendar
//!
//! The regulation as applied today skips Saturdays and Sundays only; public
//! holidays are not observed. [`WeekdayCalendar`] encodes that rule, and the
//! [`BusinessCalendar`] trait is the seam where a holiday-aware calendar can
//! be substituted without touching any workflow code.

use chrono::{Datelike, Weekday};

use crate::temporal::Timestamp;

/// Decides which days count toward a business-day deadline.
pub trait BusinessCalendar: Send + Sync {
    /// Whether deadlines may land on (and business days are counted at)
    /// the given day.
    fn is_business_day(&self, day: Weekday) -> bool;
}

/// The weekend-only calendar: Monday through Friday are business days.
#[derive(Debug, Default, Clone, Copy)]
pub struct WeekdayCalendar;

impl BusinessCalendar for WeekdayCalendar {
    fn is_business_day(&self, day: Weekday) -> bool {
        !matches!(day, Weekday::Sat | Weekday::Sun)
    }
}

/// `start + days` calendar days, preserving time of day.
pub fn add_calendar_days(start: Timestamp, days: u32) -> Timestamp {
    start.plus_days(i64::from(days))
}

/// `start` advanced by `days` business days on the weekend-only calendar.
pub fn add_business_days(start: Timestamp, days: u32) -> Timestamp {
    add_business_days_with(&WeekdayCalendar, start, days)
}

/// `start` advanced by `days` business days on the given calendar.
///
/// Pure function of `(start, days, calendar)` — the day-walk counts only
/// days the calendar accepts, so the landing day is always a business day
/// for `days >= 1`.
pub fn add_business_days_with(
    calendar: &dyn BusinessCalendar,
    start: Timestamp,
    days: u32,
) -> Timestamp {
    let mut cursor = start;
    let mut counted = 0;
    while counted < days {
        cursor = cursor.plus_days(1);
        if calendar.is_business_day(cursor.as_datetime().weekday()) {
            counted += 1;
        }
    }
    cursor
}

/// Whether a stored deadline has lapsed at the given instant.
///
/// The boundary is inclusive: an action taken exactly at the deadline is
/// still in time.
pub fn is_expired(now: Timestamp, deadline: Timestamp) -> bool {
    now > deadline
}

// ─── Tests ───────────────────────────────────────────────────────────
