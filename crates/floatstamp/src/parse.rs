//! Flexible date parsing.
//!
//! Accepts partial date/time strings of varying granularity — year only
//! through full fractional-second precision — plus a `N:unit` relative
//! duration mini-language for looking into the past. All functions take
//! explicit inputs; the reference "now" for relative parsing is an argument,
//! not a hidden clock read, keeping the parsers pure and testable.
//!
//! # Cascade
//!
//! [`parse_absolute`] tries the fully-specified pattern first, then
//! progressively shorter prefixes of it (cut after each conversion
//! specifier), accepting the first that parses and cleanly consumes the
//! entire input. Fields a matching prefix does not cover default to their
//! minimum value, so partial dates resolve to the *start* of the implied
//! period: `"2023"` is 2023-01-01T00:00:00.

use chrono::{DateTime, Duration, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::clock;
use crate::error::{Result, StampError};
use crate::settings::Settings;
use crate::strftime;
use crate::tz;

/// Default date pattern.
pub const DATE_FMT: &str = "%Y-%m-%d";

/// Full datetime pattern with optional fraction; the cascade over its
/// prefixes accepts anything from a bare year to full microsecond precision.
pub const DATETIME_FMT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// A value that is either text still to be parsed or an instant already in
/// hand. The passthrough arm lets call sites forward datetimes they already
/// hold without re-encoding them as strings.
#[derive(Debug, Clone, PartialEq)]
pub enum TimeInput {
    Text(String),
    Instant(DateTime<Utc>),
}

impl From<&str> for TimeInput {
    fn from(s: &str) -> Self {
        TimeInput::Text(s.to_string())
    }
}

impl From<String> for TimeInput {
    fn from(s: String) -> Self {
        TimeInput::Text(s)
    }
}

impl From<DateTime<Utc>> for TimeInput {
    fn from(dt: DateTime<Utc>) -> Self {
        TimeInput::Instant(dt)
    }
}

/// Parse an absolute date/time of any supported granularity to a UTC instant.
///
/// # Arguments
///
/// * `input` — text to parse, or an instant returned unchanged (it is
///   already offset-aware, so no localization applies)
/// * `fmt` — strftime pattern; prefixes of it are tried in order (see the
///   module docs). [`DATE_FMT`] and [`DATETIME_FMT`] are the usual choices.
/// * `timezone` — IANA name the parsed wall-clock value is local to;
///   `None` means the value is already UTC
///
/// RFC 3339 text (`2023-07-22T15:30:45Z`, offset suffixes included) is
/// accepted ahead of the cascade and normalized to UTC.
///
/// # Errors
///
/// Returns [`StampError::InvalidDatetime`] when no pattern prefix consumes
/// the whole input or a calendar field is out of range, and
/// [`StampError::InvalidTimezone`] for an unknown zone name.
pub fn parse_absolute(
    input: impl Into<TimeInput>,
    fmt: &str,
    timezone: Option<&str>,
) -> Result<DateTime<Utc>> {
    let zone = tz::resolve_opt(timezone)?;
    match input.into() {
        TimeInput::Instant(dt) => Ok(dt),
        TimeInput::Text(text) => parse_text(text.trim(), fmt, zone),
    }
}

fn parse_text(text: &str, fmt: &str, zone: Option<Tz>) -> Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Ok(dt.with_timezone(&Utc));
    }
    let naive = parse_cascade(text, fmt).ok_or_else(|| {
        StampError::InvalidDatetime(format!("'{text}' does not match '{fmt}'"))
    })?;
    localize(naive, zone)
}

fn parse_cascade(text: &str, fmt: &str) -> Option<NaiveDateTime> {
    for prefix in strftime::pattern_prefixes(fmt) {
        if let Some(naive) = strftime::parse_with_defaults(text, prefix) {
            return Some(naive);
        }
    }
    // A fractional-seconds tail the pattern does not cover is dropped once
    // and the cascade retried, so "…15:30:45.123456" still parses against a
    // pattern ending at %S.
    if let Some(dot) = text.rfind('.') {
        let (head, tail) = (&text[..dot], &text[dot + 1..]);
        if !head.is_empty() && !tail.is_empty() && tail.bytes().all(|b| b.is_ascii_digit()) {
            for prefix in strftime::pattern_prefixes(fmt) {
                if let Some(naive) = strftime::parse_with_defaults(head, prefix) {
                    return Some(naive);
                }
            }
        }
    }
    None
}

/// Interpret a naive wall-clock value in `zone` (or UTC) and convert to UTC.
pub(crate) fn localize(naive: NaiveDateTime, zone: Option<Tz>) -> Result<DateTime<Utc>> {
    match zone {
        Some(z) => z
            .from_local_datetime(&naive)
            .single()
            .map(|dt| dt.with_timezone(&Utc))
            .ok_or_else(|| {
                StampError::InvalidDatetime(format!(
                    "ambiguous or nonexistent local time {naive} in {z}"
                ))
            }),
        None => Ok(Utc.from_utc_datetime(&naive)),
    }
}

/// Parse a `<magnitude>:<unit>` duration spec and subtract it from
/// `reference`.
///
/// The magnitude is a non-negative decimal (integer or fractional); the unit
/// matches on its first two letters — `se`cond, `mi`nute, `ho`ur, `da`y,
/// `we`ek — case-insensitive, any trailing letters allowed (`"2:hours"`,
/// `"1.5:da"`, `"90:MINUTES"`).
///
/// Returns `None` on any malformed input instead of an error: callers
/// aggregating many independent fragments treat `None` as "skip this one".
pub fn parse_relative_ago(spec: &str, reference: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let (magnitude, unit) = spec.split_once(':')?;
    let magnitude: f64 = magnitude.trim().parse().ok()?;
    if !magnitude.is_finite() || magnitude < 0.0 {
        return None;
    }
    let unit = unit.trim().to_lowercase();
    if unit.len() < 2 || !unit.bytes().all(|b| b.is_ascii_alphabetic()) {
        return None;
    }
    let unit_seconds = match &unit[..2] {
        "se" => 1.0,
        "mi" => 60.0,
        "ho" => 3_600.0,
        "da" => 86_400.0,
        "we" => 604_800.0,
        _ => return None,
    };
    let micros = (magnitude * unit_seconds * 1e6).round();
    if micros > i64::MAX as f64 {
        return None;
    }
    reference.checked_sub_signed(Duration::microseconds(micros as i64))
}

/// Start of the named calendar day in `timezone`, converted to UTC.
///
/// Any time-of-day in the input is clamped away. `timezone` defaults to the
/// admin timezone; with neither, the day is taken as UTC.
pub fn date_start_utc(
    date_string: &str,
    fmt: &str,
    timezone: Option<&str>,
    settings: &Settings,
) -> Result<DateTime<Utc>> {
    let zone = tz::resolve_opt(timezone.or_else(|| settings.admin_timezone()))?;
    let naive = parse_cascade(date_string.trim(), fmt).ok_or_else(|| {
        StampError::InvalidDatetime(format!("'{date_string}' does not match '{fmt}'"))
    })?;
    localize(naive.date().and_time(NaiveTime::MIN), zone)
}

/// Start of today in `timezone` minus `days` whole days, in UTC.
///
/// Negative `days` clamps to 0 (today). The subtraction happens after the
/// UTC conversion, so consecutive results differ by exact multiples of 24
/// hours even across DST transitions.
pub fn days_ago(days: i64, timezone: Option<&str>, settings: &Settings) -> Result<DateTime<Utc>> {
    days_ago_from(clock::utc_now(), days, timezone, settings)
}

fn days_ago_from(
    now: DateTime<Utc>,
    days: i64,
    timezone: Option<&str>,
    settings: &Settings,
) -> Result<DateTime<Utc>> {
    let days = days.max(0);
    let zone = tz::resolve_opt(timezone.or_else(|| settings.admin_timezone()))?;
    let today_start = match zone {
        Some(z) => {
            let local_date = now.with_timezone(&z).date_naive();
            localize(local_date.and_time(NaiveTime::MIN), Some(z))?
        }
        None => Utc.from_utc_datetime(&now.date_naive().and_time(NaiveTime::MIN)),
    };
    today_start
        .checked_sub_signed(Duration::days(days))
        .ok_or_else(|| StampError::InvalidDatetime(format!("day offset {days} out of range")))
}
