//! Shorthand grammar for typed times.
//!
//! A raw fragment is checked against an ordered list of shapes; the first
//! shape that matches decides the canonical spelling. Clock values come out
//! as `[-]HH:MM`, decimal values as `[-]H,FF`.
//!
//! | typed    | time      | time + overflow | decimal   |
//! |----------|-----------|-----------------|-----------|
//! | `1:12`   | `01:12`   | `01:12`         | malformed |
//! | `112`    | `01:12`   | `01:12`         | `1,12`    |
//! | `2400`   | malformed | `24:00`         | `24,00`   |
//! | `11:2`   | `11:20`   | `11:20`         | malformed |
//! | `:3`     | `00:30`   | `00:30`         | malformed |
//! | `12`     | `00:12`   | `00:12`         | `00,12`   |
//! | `-59`    | malformed | `-00:59`        | `-00,59`  |

use std::sync::LazyLock;

use regex::Regex;

use crate::error::MalformedInput;
use crate::format::Format;

type Transform = fn(&str) -> Option<String>;

/// One recognized spelling and how to canonicalize it.
struct Shape {
    name: &'static str,
    pattern: Regex,
    transform: Transform,
}

impl Shape {
    fn new(name: &'static str, pattern: &str, transform: Transform) -> Self {
        Self {
            name,
            pattern: Regex::new(pattern).unwrap(),
            transform,
        }
    }
}

/// Wall-clock shapes, hours limited to 00-23.
static TIME_SHAPES: LazyLock<Vec<Shape>> = LazyLock::new(|| {
    vec![
        Shape::new("full", r"^([01]?[0-9]|2[0-3]):[0-5][0-9]$", |v| {
            Some(format!("{v:0>5}"))
        }),
        Shape::new("four digits", r"^([01][0-9]|2[0-3])[0-5][0-9]$", |v| {
            split_four_digits(v, ':')
        }),
        Shape::new("three digits", r"^[0-9][0-5][0-9]$", |v| {
            split_three_digits(v, ':')
        }),
        Shape::new("short", r"^([01]?[0-9]|2[0-3]):[0-5]$", |v| {
            Some(format!("{v:0>4}0"))
        }),
        Shape::new("delimiter first", r"^:[0-5][0-9]?$", |v| {
            Some(pad_delimiter_first(v, "00"))
        }),
    ]
});

/// Duration shapes: unbounded hours and an optional sign.
static OVERFLOW_TIME_SHAPES: LazyLock<Vec<Shape>> = LazyLock::new(|| {
    vec![
        Shape::new("full", r"^-?[0-9]{2,}:[0-5][0-9]$", |v| Some(v.to_string())),
        Shape::new("four digits", r"^-?[0-9]{2}[0-5][0-9]$", |v| {
            split_four_digits(v, ':')
        }),
        Shape::new("three digits", r"^-?[0-9][0-5][0-9]$", |v| {
            split_three_digits(v, ':')
        }),
        Shape::new("short", r"^-?[0-9]+:[0-5]$", |v| {
            let (sign, rest) = split_sign(v);
            let (hours, minute) = rest.split_once(':')?;
            Some(format!("{sign}{hours:0>2}:{minute}0"))
        }),
        Shape::new("delimiter first", r"^-?:[0-5][0-9]?$", |v| {
            Some(pad_delimiter_first(v, "00"))
        }),
    ]
});

/// Decimal-hour shapes. Decimal hours are never capped at 24.
static DECIMAL_SHAPES: LazyLock<Vec<Shape>> = LazyLock::new(|| {
    vec![
        Shape::new("full", r"^-?[0-9]+,[0-9]{2}$", |v| Some(v.to_string())),
        Shape::new("four digits", r"^-?[0-9]{4}$", |v| split_four_digits(v, ',')),
        Shape::new("three digits", r"^-?[0-9]{3}$", |v| split_three_digits(v, ',')),
        Shape::new("short", r"^-?[0-9]+,[0-9]$", |v| Some(format!("{v}0"))),
        Shape::new("delimiter first", r"^-?,[0-9][0-9]?$", |v| {
            Some(pad_delimiter_first(v, "0"))
        }),
    ]
});

static MINUTES_ONLY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]{1,2}$").unwrap());

static NEGATIVE_MINUTES_ONLY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-[0-9]{1,2}$").unwrap());

/// Normalizes a loosely typed time into its canonical spelling.
///
/// `allow_overflow` lifts the 23-hour ceiling and permits a leading `-` for
/// clock values; decimal values always allow both. The empty string is a
/// valid "no value yet" and comes back empty.
pub fn sanitize(raw: &str, format: Format, allow_overflow: bool) -> Result<String, MalformedInput> {
    let value = raw.trim();

    let matched = match format {
        Format::Decimal => first_match(&DECIMAL_SHAPES, value),
        Format::Time => first_match(&TIME_SHAPES, value).or_else(|| {
            if allow_overflow {
                first_match(&OVERFLOW_TIME_SHAPES, value)
            } else {
                None
            }
        }),
    };

    matched
        .or_else(|| fallback(value, format, allow_overflow || format == Format::Decimal))
        .ok_or_else(|| MalformedInput::new(raw, format))
}

fn first_match(shapes: &[Shape], value: &str) -> Option<String> {
    shapes.iter().find_map(|shape| {
        if !shape.pattern.is_match(value) {
            return None;
        }
        let canonical = (shape.transform)(value)?;
        tracing::trace!(shape = shape.name, value, %canonical, "matched shape");
        Some(canonical)
    })
}

/// Degenerate inputs: nothing, a lone delimiter, or minutes alone.
fn fallback(value: &str, format: Format, overflow: bool) -> Option<String> {
    let delimiter = format.delimiter();

    if value.is_empty() {
        return Some(String::new());
    }

    if value == ":" || value == "," {
        return Some(format!("00{delimiter}00"));
    }

    if MINUTES_ONLY.is_match(value) {
        let minutes: u32 = value.parse().ok()?;
        return (minutes <= 59).then(|| format!("00{delimiter}{minutes:02}"));
    }

    if overflow && NEGATIVE_MINUTES_ONLY.is_match(value) {
        let minutes: u32 = value[1..].parse().ok()?;
        return (1..=59)
            .contains(&minutes)
            .then(|| format!("-00{delimiter}{minutes:02}"));
    }

    None
}

/// Splits an optional leading `-` from the rest of the value.
fn split_sign(value: &str) -> (&'static str, &str) {
    value
        .strip_prefix('-')
        .map_or(("", value), |rest| ("-", rest))
}

/// `:3` → `00:30`, `-,12` → `-0,12`.
fn pad_delimiter_first(value: &str, hour_pad: &str) -> String {
    let (sign, rest) = split_sign(value);
    let trailing = if rest.len() == 2 { "0" } else { "" };
    format!("{sign}{hour_pad}{rest}{trailing}")
}

/// Formats a bare three-digit numeral as one hour digit and two sub-hour digits.
///
/// The hour is zero-padded for clock values only: `956` becomes `09:56` with
/// `:` and `9,56` with `,`. A leading `-` stays in front of the hour.
/// Returns `None` unless the value is exactly three ASCII digits after the sign.
pub fn split_three_digits(value: &str, delimiter: char) -> Option<String> {
    let (sign, digits) = split_sign(value);
    if digits.len() != 3 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let pad = if delimiter == ':' { "0" } else { "" };
    let (hour, rest) = digits.split_at(1);
    Some(format!("{sign}{pad}{hour}{delimiter}{rest}"))
}

/// Formats a bare four-digit numeral as two hour digits and two sub-hour digits.
///
/// Returns `None` unless the value is exactly four ASCII digits after the sign.
pub fn split_four_digits(value: &str, delimiter: char) -> Option<String> {
    let (sign, digits) = split_sign(value);
    if digits.len() != 4 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let (hours, rest) = digits.split_at(2);
    Some(format!("{sign}{hours}{delimiter}{rest}"))
}
