//! Clock times, signed durations and decimal hours.

use std::fmt;
use std::str::FromStr;

use chrono::Timelike;
use serde::{Deserialize, Serialize};

use crate::convert;
use crate::error::MalformedInput;
use crate::format::Format;
use crate::sanitize::sanitize;

pub(crate) const MINUTES_PER_HOUR: i64 = 60;
pub(crate) const MINUTES_PER_DAY: i64 = 24 * MINUTES_PER_HOUR;

/// A wall-clock time of day, `00:00` through `23:59`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClockTime {
    hours: u32,
    minutes: u32,
}

impl ClockTime {
    pub const MIDNIGHT: Self = Self {
        hours: 0,
        minutes: 0,
    };

    /// Returns `None` unless `hours < 24` and `minutes < 60`.
    #[must_use]
    pub const fn new(hours: u32, minutes: u32) -> Option<Self> {
        if hours < 24 && minutes < 60 {
            Some(Self { hours, minutes })
        } else {
            None
        }
    }

    /// Captures the current time of day, truncated to the minute.
    pub fn from_wall_clock<T: Timelike>(now: &T) -> Self {
        Self {
            hours: now.hour(),
            minutes: now.minute(),
        }
    }

    #[must_use]
    pub const fn hours(self) -> u32 {
        self.hours
    }

    #[must_use]
    pub const fn minutes(self) -> u32 {
        self.minutes
    }

    #[must_use]
    pub fn minutes_since_midnight(self) -> i64 {
        i64::from(self.hours) * MINUTES_PER_HOUR + i64::from(self.minutes)
    }

    /// Builds a time from a minute offset that is already within one day.
    pub(crate) fn from_minute_of_day(minute: i64) -> Self {
        debug_assert!((0..MINUTES_PER_DAY).contains(&minute));
        let minute = minute.rem_euclid(MINUTES_PER_DAY);
        Self {
            hours: u32::try_from(minute / MINUTES_PER_HOUR).unwrap_or_default(),
            minutes: u32::try_from(minute % MINUTES_PER_HOUR).unwrap_or_default(),
        }
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hours, self.minutes)
    }
}

impl FromStr for ClockTime {
    type Err = MalformedInput;

    /// Accepts any shorthand the time grammar accepts, e.g. `"112"` or `"9:3"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || MalformedInput::new(s, Format::Time);
        let canonical = sanitize(s, Format::Time, false)?;
        let parts = SignedParts::parse(&canonical, ':').ok_or_else(malformed)?;
        let hours = u32::try_from(parts.hours).map_err(|_| malformed())?;
        let minutes = u32::try_from(parts.fraction).map_err(|_| malformed())?;
        Self::new(hours, minutes).ok_or_else(malformed)
    }
}

impl TryFrom<String> for ClockTime {
    type Error = MalformedInput;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ClockTime> for String {
    fn from(time: ClockTime) -> Self {
        time.to_string()
    }
}

/// A signed span of clock time.
///
/// Hours are unbounded. The sign belongs to the whole value, so a span of
/// minus forty minutes renders as `-00:40` rather than losing its sign on the
/// zero hour numeral.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ClockDuration {
    total_minutes: i64,
}

impl ClockDuration {
    pub const ZERO: Self = Self { total_minutes: 0 };

    #[must_use]
    pub const fn from_minutes(total_minutes: i64) -> Self {
        Self { total_minutes }
    }

    #[must_use]
    pub const fn as_minutes(self) -> i64 {
        self.total_minutes
    }

    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.total_minutes < 0
    }

    /// Hour magnitude.
    #[must_use]
    pub const fn hours(self) -> u64 {
        self.total_minutes.unsigned_abs() / 60
    }

    /// Minute magnitude, always in `[0, 59]`.
    #[must_use]
    pub const fn minutes(self) -> u64 {
        self.total_minutes.unsigned_abs() % 60
    }

    /// Reads the value of a total field in the given format.
    ///
    /// Decimal totals read the digits after `,` as literal minutes, so
    /// `9,75` is nine hours and seventy-five minutes (`10:15`), not
    /// nine and three quarter hours. Totals produced by [`Self::render`]
    /// with [`Format::Decimal`] therefore do not read back to the same span.
    pub fn parse_total(raw: &str, format: Format) -> Result<Self, MalformedInput> {
        match format {
            Format::Time => raw.parse(),
            Format::Decimal => {
                let decimal: DecimalHours = raw.parse()?;
                Ok(Self::from_decimal_literal(decimal))
            }
        }
    }

    fn from_decimal_literal(decimal: DecimalHours) -> Self {
        let magnitude = i64::try_from(decimal.hours)
            .unwrap_or(i64::MAX / MINUTES_PER_HOUR)
            .saturating_mul(MINUTES_PER_HOUR)
            .saturating_add(i64::from(decimal.frac));
        Self::from_minutes(if decimal.negative { -magnitude } else { magnitude })
    }

    /// Canonical spelling of the span in the given format.
    #[must_use]
    pub fn render(self, format: Format) -> String {
        match format {
            Format::Time => self.to_string(),
            Format::Decimal => convert::to_decimal(self).to_string(),
        }
    }
}

impl fmt::Display for ClockDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.is_negative() { "-" } else { "" };
        write!(f, "{sign}{:02}:{:02}", self.hours(), self.minutes())
    }
}

impl FromStr for ClockDuration {
    type Err = MalformedInput;

    /// Accepts the time grammar with overflow, e.g. `"-930"` or `"25:00"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || MalformedInput::new(s, Format::Time);
        let canonical = sanitize(s, Format::Time, true)?;
        let parts = SignedParts::parse(&canonical, ':').ok_or_else(malformed)?;
        let magnitude = i64::try_from(parts.hours)
            .ok()
            .and_then(|h| h.checked_mul(MINUTES_PER_HOUR))
            .and_then(|m| m.checked_add(i64::try_from(parts.fraction).ok()?))
            .ok_or_else(malformed)?;
        Ok(Self::from_minutes(if parts.negative {
            -magnitude
        } else {
            magnitude
        }))
    }
}

impl From<ClockTime> for ClockDuration {
    fn from(time: ClockTime) -> Self {
        Self::from_minutes(time.minutes_since_midnight())
    }
}

/// An hour quantity in hundredths, `[-]H,FF`.
///
/// `frac` holds the two digits after the comma as typed; they are not
/// necessarily a whole number of minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DecimalHours {
    pub negative: bool,
    pub hours: u64,
    pub frac: u32,
}

impl fmt::Display for DecimalHours {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.negative { "-" } else { "" };
        write!(f, "{sign}{},{:02}", self.hours, self.frac)
    }
}

impl FromStr for DecimalHours {
    type Err = MalformedInput;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || MalformedInput::new(s, Format::Decimal);
        let canonical = sanitize(s, Format::Decimal, true)?;
        let parts = SignedParts::parse(&canonical, ',').ok_or_else(malformed)?;
        Ok(Self {
            negative: parts.negative,
            hours: parts.hours,
            frac: u32::try_from(parts.fraction).map_err(|_| malformed())?,
        })
    }
}

/// The pieces of a canonical `[-]H+<delimiter>DD` string.
struct SignedParts {
    negative: bool,
    hours: u64,
    fraction: u64,
}

impl SignedParts {
    fn parse(canonical: &str, delimiter: char) -> Option<Self> {
        let (negative, unsigned) = canonical
            .strip_prefix('-')
            .map_or((false, canonical), |rest| (true, rest));
        let (hours, fraction) = unsigned.split_once(delimiter)?;
        Some(Self {
            negative,
            hours: hours.parse().ok()?,
            fraction: fraction.parse().ok()?,
        })
    }
}
