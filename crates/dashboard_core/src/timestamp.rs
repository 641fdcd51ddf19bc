//! Coercion of the several `created_at` encodings into one comparable instant.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Deserialize;

/// Epoch numbers at or above this magnitude are milliseconds, below it seconds.
pub const EPOCH_MILLIS_THRESHOLD: f64 = 1e11;

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
];

/// A timestamp as the backend delivered it.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawTimestamp {
    Text(String),
    Epoch(f64),
    Parts {
        #[serde(alias = "_seconds")]
        seconds: i64,
        #[serde(default, alias = "_nanoseconds")]
        nanoseconds: u32,
    },
    Unrecognized(serde::de::IgnoredAny),
}

impl RawTimestamp {
    pub fn to_instant(&self) -> Option<DateTime<Utc>> {
        match self {
            RawTimestamp::Text(text) => parse_text(text.trim()),
            RawTimestamp::Epoch(value) => from_epoch(*value),
            RawTimestamp::Parts {
                seconds,
                nanoseconds,
            } => DateTime::from_timestamp(*seconds, *nanoseconds),
            RawTimestamp::Unrecognized(_) => None,
        }
    }
}

/// Normalizes a raw timestamp; absent or unparsable values become `now`.
pub fn coerce_instant(raw: Option<&RawTimestamp>, now: DateTime<Utc>) -> DateTime<Utc> {
    raw.and_then(RawTimestamp::to_instant).unwrap_or(now)
}

fn parse_text(text: &str) -> Option<DateTime<Utc>> {
    if text.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Some(parsed.with_timezone(&Utc));
    }
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn from_epoch(value: f64) -> Option<DateTime<Utc>> {
    if !value.is_finite() {
        return None;
    }
    let millis = if value.abs() >= EPOCH_MILLIS_THRESHOLD {
        value
    } else {
        value * 1000.0
    };
    if millis.abs() > i64::MAX as f64 {
        return None;
    }
    DateTime::from_timestamp_millis(millis.round() as i64)
}
