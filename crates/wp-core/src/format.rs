//! Representation selector for the total field.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::UnknownFormat;

/// How a quantity of hours is spelled.
///
/// Start and end are always clock times; the format applies to the total only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Format {
    /// `HH:MM`.
    #[default]
    Time,
    /// `H,FF`, hundredths of an hour.
    Decimal,
}

impl Format {
    /// The separator between the hour and the sub-hour part.
    #[must_use]
    pub const fn delimiter(self) -> char {
        match self {
            Self::Time => ':',
            Self::Decimal => ',',
        }
    }

    /// String representation used in config and session files.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Time => "time",
            Self::Decimal => "decimal",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Format {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "time" => Ok(Self::Time),
            "decimal" => Ok(Self::Decimal),
            _ => Err(UnknownFormat(s.to_string())),
        }
    }
}

impl Serialize for Format {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Format {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
