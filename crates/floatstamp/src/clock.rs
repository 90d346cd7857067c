//! Current-time accessors.
//!
//! The parsing and range modules take their "now" anchor as an explicit
//! argument; these thin wrappers are where call sites at the edge actually
//! read the system clock.

use chrono::{DateTime, Local, Utc};

use crate::codec;

/// The current instant in UTC.
pub fn utc_now() -> DateTime<Utc> {
    Utc::now()
}

/// The current UTC instant as a float string.
pub fn utc_now_float_string() -> String {
    codec::to_float_string(&utc_now())
}

/// The current UTC instant as an RFC 3339 string with microsecond fraction.
pub fn utc_now_iso() -> String {
    codec::to_iso_string(&utc_now())
}

/// The current *local* wall-clock time through the float-string pattern.
///
/// For display and debugging only — local wall-clock values are not UTC and
/// must not be stored as sortable scores.
pub fn local_now_float_string() -> String {
    Local::now()
        .naive_local()
        .format(codec::FLOAT_STRING_FMT)
        .to_string()
}
