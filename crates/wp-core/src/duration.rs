//! Duration arithmetic between start, end and total.
//!
//! The three values are tied by `end = start + total` modulo one day. [`diff`]
//! solves for the total; [`reconstruct_end`] and [`reconstruct_start`] solve
//! for a missing endpoint and report how many calendar days it moved.

use crate::clock::{ClockDuration, ClockTime, MINUTES_PER_DAY};

/// An endpoint rebuilt from a total, plus the calendar days crossed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reconstructed {
    /// The rebuilt clock time, always within `[00:00, 23:59]`.
    pub time: ClockTime,
    /// Days to add to the anchor date. Negative when the endpoint falls on an
    /// earlier day.
    pub day_carry: i64,
}

/// Signed same-day difference `end - start`.
///
/// The result is negative whenever `end` is earlier on the clock face than
/// `start`; nothing wraps past midnight. A negative result whose hour numeral
/// is zero still renders with its sign (`10:25` → `09:45` is `-00:40`).
#[must_use]
pub fn diff(start: ClockTime, end: ClockTime) -> ClockDuration {
    ClockDuration::from_minutes(end.minutes_since_midnight() - start.minutes_since_midnight())
}

/// Rebuilds the end of a period from its total and its start.
#[must_use]
pub fn reconstruct_end(total: ClockDuration, start: ClockTime) -> Reconstructed {
    wrap_into_day(
        start
            .minutes_since_midnight()
            .saturating_add(total.as_minutes()),
    )
}

/// Rebuilds the start of a period from its total and its end.
#[must_use]
pub fn reconstruct_start(total: ClockDuration, end: ClockTime) -> Reconstructed {
    wrap_into_day(
        end.minutes_since_midnight()
            .saturating_sub(total.as_minutes()),
    )
}

/// Splits a raw minute offset from midnight into a time of day and whole days.
fn wrap_into_day(raw_minutes: i64) -> Reconstructed {
    let day_carry = raw_minutes.div_euclid(MINUTES_PER_DAY);
    let time = ClockTime::from_minute_of_day(raw_minutes.rem_euclid(MINUTES_PER_DAY));
    tracing::trace!(raw_minutes, %time, day_carry, "wrapped reconstructed endpoint");
    Reconstructed { time, day_carry }
}
