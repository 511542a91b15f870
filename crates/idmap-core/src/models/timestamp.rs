//! Serde adapter for record timestamps.
//!
//! Written as RFC 3339 UTC with a `Z` suffix. Older maps carry an explicit
//! offset followed by a redundant `Z` (`...+00:00Z`), which is accepted on read.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serializer};

pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::AutoSi, true))
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse(&raw).map_err(serde::de::Error::custom)
}

pub(crate) fn parse(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(parsed) => Ok(parsed.with_timezone(&Utc)),
        Err(e) => match raw.strip_suffix('Z') {
            Some(stripped) => DateTime::parse_from_rfc3339(stripped)
                .map(|parsed| parsed.with_timezone(&Utc))
                .map_err(|_| e),
            None => Err(e),
        },
    }
}
