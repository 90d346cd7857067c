//! Timezone resolution.
//!
//! Thin wrapper over the embedded IANA database in `chrono-tz`. A timezone
//! reference is an IANA name string; `None` means "no conversion" and the
//! surrounding code treats the value as already UTC.

use chrono_tz::Tz;

use crate::error::{Result, StampError};

/// Resolve an IANA timezone name into a [`Tz`].
///
/// # Errors
///
/// Returns [`StampError::InvalidTimezone`] if the name is not in the database.
pub fn resolve(name: &str) -> Result<Tz> {
    name.parse::<Tz>()
        .map_err(|_| StampError::InvalidTimezone(format!("'{name}'")))
}

/// Resolve an optional timezone reference. `None` stays `None`.
pub fn resolve_opt(name: Option<&str>) -> Result<Option<Tz>> {
    name.map(resolve).transpose()
}
