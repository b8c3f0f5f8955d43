//! Core logic for recording a working period.
//!
//! A period has a start time, an end time and a total, any of which may be
//! typed loosely. This crate contains:
//! - Sanitizing: turning shorthand like `112` or `:3` into canonical text
//! - Conversion: clock spans to and from decimal hours
//! - Duration arithmetic: totals from endpoints, endpoints from totals
//! - Reconciliation: which field to recompute after an edit

pub mod clock;
pub mod convert;
mod duration;
mod error;
mod format;
pub mod reconcile;
mod sanitize;

pub use clock::{ClockDuration, ClockTime, DecimalHours};
pub use convert::{to_clock, to_decimal};
pub use duration::{Reconstructed, diff, reconstruct_end, reconstruct_start};
pub use error::{MalformedInput, UnknownField, UnknownFormat};
pub use format::Format;
pub use reconcile::{Field, FieldState, Session, reconcile};
pub use sanitize::{sanitize, split_four_digits, split_three_digits};
