//! Float-string codec and ISO-8601 interchange.
//!
//! A *float string* is a UTC timestamp rendered through the fixed pattern
//! `%Y%m%d%H%M%S%.6f` — fourteen integer digits, a decimal point, and six
//! fractional digits (`20230722153045.123456`). The field widths and
//! zero-padding make lexicographic order equal chronological order for any
//! two valid float strings, and the same text parses as a plain decimal
//! number, so the encoding doubles as a score in ordered external stores.
//!
//! Decoding is more liberal than encoding: a bare integer-like string with
//! no decimal point is valid and means zero fractional seconds, and shorter
//! fractions (`.0`, `.123`) are accepted so scores written by older tooling
//! round-trip.

use chrono::{DateTime, NaiveDateTime, SecondsFormat, TimeZone, Utc};

use crate::error::{Result, StampError};
use crate::strftime;

/// The fixed encoding pattern. Formatting always emits the decimal point and
/// exactly six fractional digits; sub-microsecond precision is truncated.
pub const FLOAT_STRING_FMT: &str = "%Y%m%d%H%M%S%.6f";

/// Decode-side pattern: accepts one to nine fractional digits.
const FLOAT_STRING_PARSE_FMT: &str = "%Y%m%d%H%M%S%.f";

/// Encode an instant as a float string.
///
/// Never fails for instants in the four-digit-year range (1000–9999), the
/// range for which the lexicographic-order invariant holds.
pub fn to_float_string(dt: &DateTime<Utc>) -> String {
    dt.format(FLOAT_STRING_FMT).to_string()
}

/// Encode an instant with a custom strftime pattern (e.g. `%Y%m%d`).
///
/// # Errors
///
/// Returns [`StampError::InvalidFormat`] when the pattern contains an
/// unknown conversion specifier.
pub fn to_float_string_with(dt: &DateTime<Utc>, fmt: &str) -> Result<String> {
    strftime::render(dt, fmt)
}

/// Decode a float string back to a UTC instant.
///
/// A string without a decimal point has `.0` appended before parsing: bare
/// integer timestamps are valid and mean zero fractional seconds.
///
/// # Errors
///
/// Returns [`StampError::InvalidFloatString`] when the string does not match
/// the field layout or contains out-of-range calendar fields (month 13 and
/// the like).
pub fn from_float_string(s: &str) -> Result<DateTime<Utc>> {
    let trimmed = s.trim();
    let owned;
    let candidate = if trimmed.contains('.') {
        trimmed
    } else {
        owned = format!("{trimmed}.0");
        &owned
    };
    NaiveDateTime::parse_from_str(candidate, FLOAT_STRING_PARSE_FMT)
        .map(|naive| Utc.from_utc_datetime(&naive))
        .map_err(|e| StampError::InvalidFloatString(format!("'{s}': {e}")))
}

/// Decode with a custom pattern. Fields the pattern omits default to their
/// minimum value, so a date-only pattern decodes to midnight.
pub fn from_float_string_with(s: &str, fmt: &str) -> Result<DateTime<Utc>> {
    strftime::parse_with_defaults(s.trim(), fmt)
        .map(|naive| Utc.from_utc_datetime(&naive))
        .ok_or_else(|| StampError::InvalidFloatString(format!("'{s}' does not match '{fmt}'")))
}

/// Render an instant as an RFC 3339 / ISO-8601 string with microsecond
/// fraction and `Z` suffix.
pub fn to_iso_string(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parse an ISO-8601 string. A `Z` suffix or a numeric offset is accepted
/// and normalized to UTC.
///
/// # Errors
///
/// Returns [`StampError::InvalidDatetime`] when the string is not valid
/// RFC 3339.
pub fn from_iso_string(s: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StampError::InvalidDatetime(format!("'{s}': {e}")))
}
