//! Recency extraction from `updatedAt` values.
//!
//! Records arrive with whatever the writer put in their timestamp field: an
//! ISO-8601 string, epoch milliseconds, or nothing at all. This module turns
//! that raw value into a [`Recency`] that can be compared deterministically.
//!
//! Rules:
//! 1. A missing value, or any falsy one (`null`, `false`, `0`, `""`), is the
//!    Unix epoch
//! 2. Numbers are milliseconds since the epoch
//! 3. Strings are parsed as RFC 3339, RFC 2822, then offset-less ISO forms
//!    (read as UTC)
//! 4. Everything else is [`Recency::Unknown`], never an error

use crate::ConflictResolution;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;


const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// How recently a record was written, as far as its timestamp tells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Recency {
    /// A usable instant
    Known(DateTime<Utc>),
    /// The timestamp was present but could not be parsed
    Unknown,
}

impl Recency {
    /// The recency of a record that carries no timestamp.
    pub const EPOCH: Recency = Recency::Known(DateTime::<Utc>::UNIX_EPOCH);

    /// Interpret a raw timestamp field.
    pub fn from_value(value: Option<&Value>) -> Self {
        match value {
            None | Some(Value::Null) | Some(Value::Bool(false)) => Self::EPOCH,
            Some(Value::Number(n)) => match n.as_i64() {
                Some(millis) => Self::from_millis(millis),
                None => n.as_f64().map_or(Recency::Unknown, Self::from_millis_f64),
            },
            Some(Value::String(s)) if s.is_empty() => Self::EPOCH,
            Some(Value::String(s)) => parse_str(s).map_or(Recency::Unknown, Recency::Known),
            Some(Value::Bool(true)) | Some(Value::Array(_)) | Some(Value::Object(_)) => {
                Recency::Unknown
            }
        }
    }

    /// Milliseconds since the Unix epoch.
    ///
    /// Instants outside `DateTime::<Utc>::MIN_UTC..=MAX_UTC` are unknown.
    pub fn from_millis(millis: i64) -> Self {
        DateTime::from_timestamp_millis(millis).map_or(Recency::Unknown, Recency::Known)
    }

    fn from_millis_f64(millis: f64) -> Self {
        if !millis.is_finite() || millis.abs() >= i64::MAX as f64 {
            return Recency::Unknown;
        }
        Self::from_millis(millis.trunc() as i64)
    }

    pub fn is_known(&self) -> bool {
        matches!(self, Recency::Known(_))
    }

    pub fn instant(&self) -> Option<DateTime<Utc>> {
        match self {
            Recency::Known(instant) => Some(*instant),
            Recency::Unknown => None,
        }
    }

    /// Decide which side wins under last-write-wins.
    ///
    /// Ties, and the case where neither side is known, go to the remote.
    /// A known recency always beats an unknown one.
    pub fn decide(local: Recency, remote: Recency) -> ConflictResolution {
        match (local, remote) {
            (Recency::Unknown, _) => ConflictResolution::RemoteWins,
            (Recency::Known(_), Recency::Unknown) => ConflictResolution::LocalWins,
            (Recency::Known(l), Recency::Known(r)) => {
                if r >= l {
                    ConflictResolution::RemoteWins
                } else {
                    ConflictResolution::LocalWins
                }
            }
        }
    }
}

impl From<DateTime<Utc>> for Recency {
    fn from(instant: DateTime<Utc>) -> Self {
        Recency::Known(instant)
    }
}

impl From<Option<DateTime<Utc>>> for Recency {
    fn from(instant: Option<DateTime<Utc>>) -> Self {
        instant.map_or(Self::EPOCH, Recency::Known)
    }
}

fn parse_str(raw: &str) -> Option<DateTime<Utc>> {
    let s = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
