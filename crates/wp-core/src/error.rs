//! Error types for the time grammar and the session model.

use thiserror::Error;

use crate::format::Format;

/// Text that matches none of the recognized shapes for a format.
///
/// Always recoverable: the caller keeps the previous value and marks the
/// field invalid.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("malformed {format} value: {input:?}")]
pub struct MalformedInput {
    /// The text exactly as it was typed.
    pub input: String,
    /// The format the text was checked against.
    pub format: Format,
}

impl MalformedInput {
    pub(crate) fn new(input: impl Into<String>, format: Format) -> Self {
        Self {
            input: input.into(),
            format,
        }
    }
}

/// Unrecognized spelling of a [`Format`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown format: {0} (expected `time` or `decimal`)")]
pub struct UnknownFormat(pub String);

/// Unrecognized spelling of a session field.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown field: {0} (expected `start`, `end` or `total`)")]
pub struct UnknownField(pub String);
