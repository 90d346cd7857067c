//! # floatstamp
//!
//! Sortable UTC float-string timestamps.
//!
//! Converts between native datetimes, the fixed-width
//! `YYYYMMDDHHMMSS.ffffff` "float string" encoding, ISO-8601 strings, and
//! human-readable display formats, with timezone-aware arithmetic layered
//! on top. A float string sorts lexicographically in chronological order
//! and parses as a plain decimal number, so the same value works as a
//! sortable key, a numeric score in an ordered external store, and a
//! timestamp a human can read in raw logs.
//!
//! ## Modules
//!
//! - [`codec`] — float-string encode/decode and ISO-8601 interchange
//! - [`parse`] — flexible absolute parsing (year-only through microseconds) and the `N:unit` relative mini-language
//! - [`ranges`] — labeled score-range derivation for ordered-store range queries
//! - [`clock`] — current-time accessors
//! - [`display`] — human-readable formatting with admin defaults
//! - [`settings`] — admin timezone / display-format configuration
//! - [`tz`] — IANA timezone resolution
//! - [`error`] — error types

pub mod clock;
pub mod codec;
pub mod display;
pub mod error;
pub mod parse;
pub mod ranges;
pub mod settings;
mod strftime;
pub mod tz;

pub use clock::{local_now_float_string, utc_now, utc_now_float_string, utc_now_iso};
pub use codec::{
    from_float_string, from_float_string_with, from_iso_string, to_float_string,
    to_float_string_with, to_iso_string, FLOAT_STRING_FMT,
};
pub use display::{to_display, FormatterArgs, Rendered, TimestampFormatter};
pub use error::{Result, StampError};
pub use parse::{
    date_start_utc, days_ago, parse_absolute, parse_relative_ago, TimeInput, DATETIME_FMT,
    DATE_FMT,
};
pub use ranges::{derive_ranges, BoundPair, RangeMap, RangeOptions, ScoreBound};
pub use settings::{AdminSettings, Settings};
