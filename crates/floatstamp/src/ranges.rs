//! Score-range derivation for ordered-store range queries.
//!
//! Given a mixture of pre-encoded bounds, absolute timestamps, and relative
//! durations, [`derive_ranges`] produces labeled `(start, end)` pairs of
//! float-string scores suitable for range queries against an ordered
//! external store. Each recognized key combination present in the input
//! contributes its own entries — callers get every range they asked for,
//! keyed by the literal `key=value` text that produced it.
//!
//! Individual malformed timestamp or duration tokens are skipped (with a
//! debug log) rather than failing the whole call; structured inputs — the
//! timezone and the `now` override — fail loudly.

use std::fmt;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::clock;
use crate::codec;
use crate::error::Result;
use crate::parse;
use crate::tz;

/// Options for [`derive_ranges`]. All keys are optional; construct with
/// struct-update syntax over `Default`.
///
/// `start_ts`, `end_ts`, `since`, and `until` may each carry multiple values
/// separated by `,`, `;`, or `|`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RangeOptions {
    /// Timezone for interpreting `start_ts`/`end_ts` wall-clock values.
    pub tz: Option<String>,
    /// Float-string reference instant for `since`/`until`; defaults to the
    /// current UTC time.
    pub now: Option<String>,
    /// Pre-encoded lower bound, used verbatim.
    pub start: Option<String>,
    /// Pre-encoded upper bound, used verbatim.
    pub end: Option<String>,
    /// Absolute timestamp lower bound(s), parsed against `tz`.
    pub start_ts: Option<String>,
    /// Absolute timestamp upper bound(s), parsed against `tz`.
    pub end_ts: Option<String>,
    /// Relative `N:unit` lower bound(s), counted back from `now`.
    pub since: Option<String>,
    /// Relative `N:unit` upper bound(s), counted back from `now`.
    pub until: Option<String>,
}

/// One end of a score range: a float-string score or an open-ended sentinel.
///
/// The sentinels display as `-inf` / `+inf` (the spellings ordered-store
/// range queries accept) and convert to the matching `f64` infinities, so
/// they compare correctly against decoded float scores.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ScoreBound {
    NegInfinity,
    PosInfinity,
    Value(String),
}

impl ScoreBound {
    /// The bound as a numeric score.
    pub fn as_f64(&self) -> f64 {
        match self {
            ScoreBound::NegInfinity => f64::NEG_INFINITY,
            ScoreBound::PosInfinity => f64::INFINITY,
            ScoreBound::Value(s) => s.parse().unwrap_or(f64::NAN),
        }
    }

    /// True for either open-ended sentinel.
    pub fn is_unbounded(&self) -> bool {
        !matches!(self, ScoreBound::Value(_))
    }
}

impl fmt::Display for ScoreBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreBound::NegInfinity => f.write_str("-inf"),
            ScoreBound::PosInfinity => f.write_str("+inf"),
            ScoreBound::Value(s) => f.write_str(s),
        }
    }
}

/// A `(start, end)` pair of score bounds. start ≤ end is not enforced;
/// interpretation is the consumer's responsibility.
pub type BoundPair = (ScoreBound, ScoreBound);

/// Label → bound-pair mapping in priority order.
///
/// Entries appear in the fixed order of the recognized key-combination
/// table, not input order; serialization preserves it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RangeMap {
    entries: Vec<(String, BoundPair)>,
}

impl RangeMap {
    fn insert(&mut self, label: String, pair: BoundPair) {
        self.entries.push((label, pair));
    }

    /// Look up a pair by its exact label.
    pub fn get(&self, label: &str) -> Option<&BoundPair> {
        self.entries
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, pair)| pair)
    }

    /// Labels in priority order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(l, _)| l.as_str())
    }

    /// Entries in priority order.
    pub fn iter(&self) -> impl Iterator<Item = &(String, BoundPair)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a RangeMap {
    type Item = &'a (String, BoundPair);
    type IntoIter = std::slice::Iter<'a, (String, BoundPair)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl Serialize for RangeMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (label, pair) in &self.entries {
            map.serialize_entry(label, pair)?;
        }
        map.end()
    }
}

/// Split a multi-value option on `,`, `;`, or `|`, trimming whitespace and
/// dropping empty tokens.
fn split_tokens(value: Option<&str>) -> Vec<&str> {
    value
        .map(|v| {
            v.split([',', ';', '|'])
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

/// Derive labeled score ranges from the supplied options.
///
/// The fixed priority table, in emission order:
///
/// 1. `start` & `end` → `"start=S,end=E"` (both verbatim)
/// 2. `start` alone → `"start=S"` with an open upper bound
/// 3. `end` alone → `"end=E"` with an open lower bound
/// 4. each `start_ts` × `end_ts` pair → `"start_ts=s,end_ts=e"`
/// 5. each `start_ts` token → `"start_ts=s"` with an open upper bound
/// 6. each `end_ts` token → `"end_ts=e"` with an open lower bound
/// 7. each `since` × `until` pair → `"since=s,until=u"`
/// 8. each `since` token → `"since=s"` with an open upper bound
/// 9. each `until` token → `"until=u"` with an open lower bound
///
/// With no recognized key at all the result is the single full-range entry
/// `"all"`. Malformed individual tokens are skipped; if every supplied token
/// is malformed the map comes back empty.
///
/// # Errors
///
/// Returns an error for an unknown `tz` name or an undecodable `now` value —
/// these are structured inputs, not per-token fragments.
pub fn derive_ranges(options: &RangeOptions) -> Result<RangeMap> {
    use ScoreBound::{NegInfinity, PosInfinity, Value};

    let zone = options.tz.as_deref();
    tz::resolve_opt(zone)?;
    let now = match options.now.as_deref() {
        Some(s) => codec::from_float_string(s)?,
        None => clock::utc_now(),
    };

    let parse_ts = |token: &str| match parse::parse_absolute(token, parse::DATETIME_FMT, zone) {
        Ok(dt) => Some(codec::to_float_string(&dt)),
        Err(err) => {
            log::debug!("skipping unparseable timestamp token '{token}': {err}");
            None
        }
    };
    let parse_ago = |token: &str| match parse::parse_relative_ago(token, now) {
        Some(dt) => Some(codec::to_float_string(&dt)),
        None => {
            log::debug!("skipping unparseable duration token '{token}'");
            None
        }
    };

    let any_supplied = options.start.is_some()
        || options.end.is_some()
        || options.start_ts.is_some()
        || options.end_ts.is_some()
        || options.since.is_some()
        || options.until.is_some();

    let mut map = RangeMap::default();

    match (&options.start, &options.end) {
        (Some(s), Some(e)) => map.insert(
            format!("start={s},end={e}"),
            (Value(s.clone()), Value(e.clone())),
        ),
        (Some(s), None) => map.insert(format!("start={s}"), (Value(s.clone()), PosInfinity)),
        (None, Some(e)) => map.insert(format!("end={e}"), (NegInfinity, Value(e.clone()))),
        (None, None) => {}
    }

    let start_ts: Vec<(&str, Option<String>)> = split_tokens(options.start_ts.as_deref())
        .into_iter()
        .map(|t| (t, parse_ts(t)))
        .collect();
    let end_ts: Vec<(&str, Option<String>)> = split_tokens(options.end_ts.as_deref())
        .into_iter()
        .map(|t| (t, parse_ts(t)))
        .collect();

    for (s_tok, s_val) in &start_ts {
        for (e_tok, e_val) in &end_ts {
            if let (Some(s), Some(e)) = (s_val, e_val) {
                map.insert(
                    format!("start_ts={s_tok},end_ts={e_tok}"),
                    (Value(s.clone()), Value(e.clone())),
                );
            }
        }
    }
    for (tok, val) in &start_ts {
        if let Some(s) = val {
            map.insert(format!("start_ts={tok}"), (Value(s.clone()), PosInfinity));
        }
    }
    for (tok, val) in &end_ts {
        if let Some(e) = val {
            map.insert(format!("end_ts={tok}"), (NegInfinity, Value(e.clone())));
        }
    }

    let since: Vec<(&str, Option<String>)> = split_tokens(options.since.as_deref())
        .into_iter()
        .map(|t| (t, parse_ago(t)))
        .collect();
    let until: Vec<(&str, Option<String>)> = split_tokens(options.until.as_deref())
        .into_iter()
        .map(|t| (t, parse_ago(t)))
        .collect();

    for (s_tok, s_val) in &since {
        for (u_tok, u_val) in &until {
            if let (Some(s), Some(u)) = (s_val, u_val) {
                map.insert(
                    format!("since={s_tok},until={u_tok}"),
                    (Value(s.clone()), Value(u.clone())),
                );
            }
        }
    }
    for (tok, val) in &since {
        if let Some(s) = val {
            map.insert(format!("since={tok}"), (Value(s.clone()), PosInfinity));
        }
    }
    for (tok, val) in &until {
        if let Some(u) = val {
            map.insert(format!("until={tok}"), (NegInfinity, Value(u.clone())));
        }
    }

    if !any_supplied {
        map.insert("all".to_string(), (NegInfinity, PosInfinity));
    }

    Ok(map)
}
