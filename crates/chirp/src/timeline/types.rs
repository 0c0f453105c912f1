//! Timeline item types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Layout of the platform's `created_at` timestamps,
/// e.g. `Wed Oct 10 20:19:24 +0000 2018`.
pub const CREATED_AT_FORMAT: &str = "%a %b %d %H:%M:%S %z %Y";

/// A single status from a user timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tweet {
    pub id: u64,
    pub text: String,
    #[serde(with = "created_at")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub entities: Entities,
}

/// Entities extracted from the status text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entities {
    #[serde(default)]
    pub urls: Vec<UrlEntity>,
}

/// A shortened URL and its expansion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlEntity {
    pub url: String,
    pub expanded_url: String,
}

/// Parse a platform `created_at` timestamp into UTC.
pub fn parse_created_at(s: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_str(s, CREATED_AT_FORMAT).map(|t| t.with_timezone(&Utc))
}

mod created_at {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    use super::{CREATED_AT_FORMAT, parse_created_at};

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&value.format(CREATED_AT_FORMAT))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse_created_at(&s).map_err(|e| {
            serde::de::Error::custom(format!("invalid created_at '{}': {}", s, e))
        })
    }
}
