//! Strftime pattern utilities shared by the codec, parser, and formatter.
//!
//! chrono's `parse_from_str` constructors insist on a complete date or
//! datetime; the crate's parsing contract instead fills missing lower-order
//! fields with their minimum value (month/day 1, time fields 0) so that a
//! partial input resolves to the start of the implied period. The helpers
//! here implement that on top of [`chrono::format::Parsed`], plus the
//! prefix enumeration the parser cascade walks and a rendering wrapper that
//! turns an invalid user pattern into an error instead of a `Display` panic.

use std::fmt::Write as _;

use chrono::format::{parse, Parsed, StrftimeItems};
use chrono::{DateTime, NaiveDateTime, TimeZone};

use crate::error::{Result, StampError};

/// Prefixes of `fmt` cut immediately after each conversion specifier,
/// longest first. The full pattern is always the first candidate, even when
/// it ends in literal text.
///
/// `"%Y-%m-%d %H:%M"` yields `["%Y-%m-%d %H:%M", "%Y-%m-%d %H", "%Y-%m-%d",
/// "%Y-%m", "%Y"]`.
pub(crate) fn pattern_prefixes(fmt: &str) -> Vec<&str> {
    let bytes = fmt.as_bytes();
    let mut cuts = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] != b'%' {
            i += 1;
            continue;
        }
        let mut j = i + 1;
        if j < bytes.len() && matches!(bytes[j], b'-' | b'0' | b'_') {
            j += 1;
        }
        if j < bytes.len() && bytes[j] == b'.' {
            j += 1;
        }
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        while j < bytes.len() && bytes[j] == b':' {
            j += 1;
        }
        if j >= bytes.len() {
            break;
        }
        let spec = bytes[j];
        j += 1;
        if spec != b'%' {
            cuts.push(j);
        }
        i = j;
    }

    let mut prefixes = Vec::with_capacity(cuts.len() + 1);
    if cuts.last() != Some(&fmt.len()) {
        prefixes.push(fmt);
    }
    for &cut in cuts.iter().rev() {
        prefixes.push(&fmt[..cut]);
    }
    if prefixes.is_empty() {
        prefixes.push(fmt);
    }
    prefixes
}

/// Parse `input` against exactly `fmt`, requiring the whole input to be
/// consumed, then fill any unset lower-order field with its minimum value.
///
/// Returns `None` when the input does not match, has trailing text, or
/// contains out-of-range calendar fields.
pub(crate) fn parse_with_defaults(input: &str, fmt: &str) -> Option<NaiveDateTime> {
    let mut parsed = Parsed::new();
    parse(&mut parsed, input, StrftimeItems::new(fmt)).ok()?;

    // set_* on an already-populated field is a conflict error we deliberately
    // ignore; the parsed value wins.
    let _ = parsed.set_month(1);
    let _ = parsed.set_day(1);
    let _ = parsed.set_hour(0);
    let _ = parsed.set_minute(0);
    let _ = parsed.set_second(0);
    let _ = parsed.set_nanosecond(0);

    parsed.to_naive_datetime_with_offset(0).ok()
}

/// Format `dt` with a caller-supplied pattern.
///
/// # Errors
///
/// Returns [`StampError::InvalidFormat`] when the pattern contains an
/// unknown conversion specifier.
pub(crate) fn render<T: TimeZone>(dt: &DateTime<T>, fmt: &str) -> Result<String>
where
    T::Offset: std::fmt::Display,
{
    let mut out = String::new();
    write!(out, "{}", dt.format(fmt)).map_err(|_| StampError::InvalidFormat(format!("'{fmt}'")))?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    #[test]
    fn test_prefixes_cut_after_each_specifier() {
        let prefixes = pattern_prefixes("%Y-%m-%d %H:%M:%S%.f");
        assert_eq!(
            prefixes,
            vec![
                "%Y-%m-%d %H:%M:%S%.f",
                "%Y-%m-%d %H:%M:%S",
                "%Y-%m-%d %H:%M",
                "%Y-%m-%d %H",
                "%Y-%m-%d",
                "%Y-%m",
                "%Y",
            ]
        );
    }

    #[test]
    fn test_prefixes_keep_full_pattern_with_trailing_literal() {
        let prefixes = pattern_prefixes("%YT");
        assert_eq!(prefixes, vec!["%YT", "%Y"]);
    }

    #[test]
    fn test_prefixes_skip_escaped_percent() {
        let prefixes = pattern_prefixes("%%%Y");
        assert_eq!(prefixes, vec!["%%%Y"]);
    }

    #[test]
    fn test_parse_with_defaults_fills_minimums() {
        let naive = parse_with_defaults("2023-07", "%Y-%m").unwrap();
        let expected = NaiveDate::from_ymd_opt(2023, 7, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(naive, expected);
    }

    #[test]
    fn test_parse_with_defaults_rejects_trailing_text() {
        assert!(parse_with_defaults("2023-07-22x", "%Y-%m-%d").is_none());
    }

    #[test]
    fn test_parse_with_defaults_rejects_out_of_range_month() {
        assert!(parse_with_defaults("2023-13-01", "%Y-%m-%d").is_none());
    }

    #[test]
    fn test_render_rejects_unknown_specifier() {
        let dt = Utc::now();
        assert!(render(&dt, "%Q-nope").is_err());
    }
}
