//! Human-readable formatting of float strings and instants.
//!
//! Display is best-effort by contract: when no format pattern is resolvable
//! — neither passed by the caller nor present in the admin configuration —
//! the input comes back unchanged rather than failing. That polymorphic
//! fallback is made explicit with the [`Rendered`] tagged result so callers
//! can tell the two outcomes apart.

use std::fmt;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::codec;
use crate::error::Result;
use crate::parse::TimeInput;
use crate::settings::Settings;
use crate::strftime;
use crate::tz;

/// Outcome of a display attempt: a formatted string, or the original value
/// passed through because no format was resolvable.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Rendered {
    Formatted(String),
    Unformatted(String),
}

impl Rendered {
    pub fn as_str(&self) -> &str {
        match self {
            Rendered::Formatted(s) | Rendered::Unformatted(s) => s,
        }
    }

    pub fn into_string(self) -> String {
        match self {
            Rendered::Formatted(s) | Rendered::Unformatted(s) => s,
        }
    }

    pub fn is_formatted(&self) -> bool {
        matches!(self, Rendered::Formatted(_))
    }
}

impl fmt::Display for Rendered {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Format a float string or instant for human consumption.
///
/// `fmt` defaults to the admin display format and `timezone` to the admin
/// timezone; with no resolvable format at all the original value is
/// returned as [`Rendered::Unformatted`]. With no resolvable timezone the
/// value is formatted in UTC.
///
/// # Errors
///
/// A float string that does not decode, an unknown timezone name, or an
/// invalid format pattern fail loudly — only a *missing* format degrades to
/// the passthrough.
pub fn to_display(
    value: impl Into<TimeInput>,
    fmt: Option<&str>,
    timezone: Option<&str>,
    settings: &Settings,
) -> Result<Rendered> {
    let value = value.into();
    let Some(fmt) = fmt.or_else(|| settings.admin_date_fmt()) else {
        return Ok(Rendered::Unformatted(original_text(&value)));
    };
    let dt = decode_input(&value)?;
    let zone = tz::resolve_opt(timezone.or_else(|| settings.admin_timezone()))?;
    render_in_zone(&dt, zone, fmt)
}

/// Arguments a reusable [`TimestampFormatter`] is built from, mirroring the
/// flags operational tools pass through from their own option parsing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatterArgs {
    /// Use the admin display format and timezone as defaults.
    pub admin_fmt: bool,
    /// Explicit format pattern; wins over `admin_fmt`.
    pub ts_fmt: Option<String>,
    /// Explicit timezone; wins over `admin_fmt`.
    pub ts_tz: Option<String>,
}

/// A format pattern and timezone captured once and applied to many values.
///
/// With no format resolved the formatter is the identity: every value comes
/// back as [`Rendered::Unformatted`]. Note that unlike [`to_display`], a
/// bare `ts_fmt` does *not* pull in the admin timezone — formatting stays in
/// UTC unless `ts_tz` or `admin_fmt` says otherwise.
#[derive(Debug, Clone)]
pub struct TimestampFormatter {
    fmt: Option<String>,
    zone: Option<Tz>,
}

impl TimestampFormatter {
    /// Resolve the format and timezone a formatter will use.
    ///
    /// # Errors
    ///
    /// Returns [`crate::StampError::InvalidTimezone`] for an unknown zone.
    pub fn from_args(args: &FormatterArgs, settings: &Settings) -> Result<Self> {
        let fmt = args
            .ts_fmt
            .clone()
            .or_else(|| admin_default(args.admin_fmt, settings.admin_date_fmt()));
        let zone_name = args
            .ts_tz
            .clone()
            .or_else(|| admin_default(args.admin_fmt, settings.admin_timezone()));
        let zone = tz::resolve_opt(zone_name.as_deref())?;
        Ok(Self { fmt, zone })
    }

    /// Apply the captured format to one value.
    pub fn format(&self, value: impl Into<TimeInput>) -> Result<Rendered> {
        let value = value.into();
        let Some(fmt) = self.fmt.as_deref() else {
            return Ok(Rendered::Unformatted(original_text(&value)));
        };
        let dt = decode_input(&value)?;
        render_in_zone(&dt, self.zone, fmt)
    }
}

fn admin_default(admin_fmt: bool, value: Option<&str>) -> Option<String> {
    if admin_fmt {
        value.map(str::to_owned)
    } else {
        None
    }
}

fn original_text(value: &TimeInput) -> String {
    match value {
        TimeInput::Text(s) => s.clone(),
        TimeInput::Instant(dt) => codec::to_float_string(dt),
    }
}

fn decode_input(value: &TimeInput) -> Result<DateTime<Utc>> {
    match value {
        TimeInput::Text(s) => codec::from_float_string(s),
        TimeInput::Instant(dt) => Ok(*dt),
    }
}

fn render_in_zone(dt: &DateTime<Utc>, zone: Option<Tz>, fmt: &str) -> Result<Rendered> {
    let out = match zone {
        Some(z) => strftime::render(&dt.with_timezone(&z), fmt)?,
        None => strftime::render(dt, fmt)?,
    };
    Ok(Rendered::Formatted(out))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::AdminSettings;

    fn bare_settings() -> Settings {
        Settings {
            admin: AdminSettings {
                timezone: None,
                date_fmt: None,
            },
        }
    }

    // ── to_display ──────────────────────────────────────────────────────

    #[test]
    fn test_display_with_admin_defaults() {
        // 20:30:45 UTC on July 22 is 15:30:45 CDT; 2023-07-22 is a Saturday
        let out = to_display("20230722203045.123456", None, None, &Settings::default()).unwrap();
        assert_eq!(
            out,
            Rendered::Formatted("Sat 07/22/2023 03:30:45 PM".to_string())
        );
    }

    #[test]
    fn test_display_custom_format() {
        let out = to_display(
            "20230722153045.123456",
            Some("%Y-%m-%d"),
            None,
            &Settings::default(),
        )
        .unwrap();
        assert_eq!(out.as_str(), "2023-07-22");
    }

    #[test]
    fn test_display_timezone_conversion() {
        // 15:30 UTC is 11:30 EDT in July
        let out = to_display(
            "20230722153045.123456",
            Some("%H"),
            Some("America/New_York"),
            &Settings::default(),
        )
        .unwrap();
        assert_eq!(out.as_str(), "11");
    }

    #[test]
    fn test_display_various_timezones() {
        let cases = [
            ("America/New_York", "08"),
            ("America/Chicago", "07"),
            ("America/Denver", "06"),
            ("America/Los_Angeles", "05"),
            ("Europe/London", "13"),
            ("Asia/Tokyo", "21"),
        ];
        for (zone, hour) in cases {
            let out = to_display(
                "20230722120000.0",
                Some("%H"),
                Some(zone),
                &Settings::default(),
            )
            .unwrap();
            assert_eq!(out.as_str(), hour, "zone {zone}");
        }
    }

    #[test]
    fn test_display_bare_integer_input() {
        let out = to_display(
            "20230722153045",
            Some("%Y-%m-%d"),
            None,
            &Settings::default(),
        )
        .unwrap();
        assert_eq!(out.as_str(), "2023-07-22");
    }

    #[test]
    fn test_display_instant_input() {
        let dt = codec::from_float_string("20230722153045.0").unwrap();
        let out = to_display(dt, Some("%H:%M:%S"), None, &bare_settings()).unwrap();
        assert_eq!(out.as_str(), "15:30:45");
    }

    #[test]
    fn test_display_unformatted_when_no_format_resolvable() {
        let out = to_display("20230722153045.123456", None, None, &bare_settings()).unwrap();
        assert_eq!(
            out,
            Rendered::Unformatted("20230722153045.123456".to_string())
        );
        assert!(!out.is_formatted());
    }

    #[test]
    fn test_display_bad_float_string_fails_loudly() {
        let err = to_display("garbage", Some("%Y"), None, &bare_settings()).unwrap_err();
        assert!(
            err.to_string().contains("Invalid float string"),
            "got: {err}"
        );
    }

    #[test]
    fn test_display_unknown_timezone_fails_loudly() {
        assert!(to_display(
            "20230722153045.0",
            Some("%Y"),
            Some("Not/AZone"),
            &bare_settings()
        )
        .is_err());
    }

    // ── TimestampFormatter ──────────────────────────────────────────────

    #[test]
    fn test_formatter_no_args_is_identity() {
        let formatter =
            TimestampFormatter::from_args(&FormatterArgs::default(), &Settings::default()).unwrap();
        let out = formatter.format("20230722153045.123456").unwrap();
        assert_eq!(
            out,
            Rendered::Unformatted("20230722153045.123456".to_string())
        );
    }

    #[test]
    fn test_formatter_format_only_stays_utc() {
        let args = FormatterArgs {
            ts_fmt: Some("%H:%M:%S".into()),
            ..Default::default()
        };
        let formatter = TimestampFormatter::from_args(&args, &Settings::default()).unwrap();
        let out = formatter.format("20230722153045.123456").unwrap();
        assert_eq!(out.as_str(), "15:30:45");
    }

    #[test]
    fn test_formatter_format_and_timezone() {
        let args = FormatterArgs {
            ts_fmt: Some("%Y-%m-%d %H:%M".into()),
            ts_tz: Some("America/Chicago".into()),
            ..Default::default()
        };
        let formatter = TimestampFormatter::from_args(&args, &Settings::default()).unwrap();
        let out = formatter.format("20230722203045.123456").unwrap();
        assert_eq!(out.as_str(), "2023-07-22 15:30");
    }

    #[test]
    fn test_formatter_admin_fmt_uses_admin_zone_and_pattern() {
        let args = FormatterArgs {
            admin_fmt: true,
            ..Default::default()
        };
        let formatter = TimestampFormatter::from_args(&args, &Settings::default()).unwrap();
        let out = formatter.format("20230722203045.123456").unwrap();
        assert_eq!(out.as_str(), "Sat 07/22/2023 03:30:45 PM");
    }

    #[test]
    fn test_formatter_various_patterns() {
        let cases = [
            ("%Y", "2023"),
            ("%m/%d/%Y", "07/22/2023"),
            ("%H:%M:%S", "15:30:45"),
            ("%a %b %d", "Sat Jul 22"),
        ];
        for (pattern, expected) in cases {
            let args = FormatterArgs {
                ts_fmt: Some(pattern.into()),
                ..Default::default()
            };
            let formatter = TimestampFormatter::from_args(&args, &Settings::default()).unwrap();
            let out = formatter.format("20230722153045.123456").unwrap();
            assert_eq!(out.as_str(), expected, "pattern {pattern}");
        }
    }

    #[test]
    fn test_formatter_reusable_across_values() {
        let args = FormatterArgs {
            ts_fmt: Some("%Y-%m-%d".into()),
            ..Default::default()
        };
        let formatter = TimestampFormatter::from_args(&args, &Settings::default()).unwrap();
        assert_eq!(
            formatter.format("20230722153045.0").unwrap().as_str(),
            "2023-07-22"
        );
        assert_eq!(
            formatter.format("20240229120000.0").unwrap().as_str(),
            "2024-02-29"
        );
    }
}
