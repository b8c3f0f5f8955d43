//! Conversion between clock spans and decimal hours.

use crate::clock::{ClockDuration, DecimalHours, MINUTES_PER_HOUR};

/// Converts a span to hundredths of an hour, rounding half up.
///
/// Lossy: 37 minutes becomes `,62`, which does not convert back to exactly 37.
#[must_use]
pub fn to_decimal(span: ClockDuration) -> DecimalHours {
    let minutes = span.minutes();
    // round(minutes * 100 / 60) in integers
    let frac = (minutes * 10 + 3) / 6;
    DecimalHours {
        negative: span.is_negative(),
        hours: span.hours(),
        frac: u32::try_from(frac).unwrap_or(99),
    }
}

/// Converts hundredths of an hour back to clock minutes, rounding half up.
///
/// This is the arithmetic inverse of [`to_decimal`]. Session totals do not
/// use it; see [`ClockDuration::parse_total`].
#[must_use]
pub fn to_clock(decimal: DecimalHours) -> ClockDuration {
    let minutes = (i64::from(decimal.frac) * MINUTES_PER_HOUR + 50) / 100;
    let magnitude = i64::try_from(decimal.hours)
        .unwrap_or(i64::MAX / MINUTES_PER_HOUR)
        .saturating_mul(MINUTES_PER_HOUR)
        .saturating_add(minutes);
    ClockDuration::from_minutes(if decimal.negative {
        -magnitude
    } else {
        magnitude
    })
}
