//! Wire types exchanged with the board's list endpoints.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Stable record identifier, used as the keyset cursor.
pub type RecordId = i64;

/// A single row of the list.
///
/// Only `id` matters to the pager; everything else is carried through for
/// display. Fields the client does not know about land in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,

    #[serde(default)]
    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    /// Display-only; unparseable values become `None` instead of failing the page
    #[serde(
        default,
        rename = "createdAt",
        deserialize_with = "deserialize_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Record {
    pub fn new(id: RecordId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            content: None,
            author: None,
            created_at: None,
            extra: serde_json::Map::new(),
        }
    }
}

/// Parse a board timestamp: RFC 3339, or a local date-time without offset
/// (taken as UTC).
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| naive.and_utc())
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(raw)) => parse_timestamp(&raw),
        // Epoch milliseconds
        Some(serde_json::Value::Number(n)) => n
            .as_i64()
            .and_then(|millis| Utc.timestamp_millis_opt(millis).single()),
        _ => None,
    })
}

/// Query for the lightweight count request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CountQuery {
    pub page: usize,
    pub size: usize,
}

impl Default for CountQuery {
    fn default() -> Self {
        Self { page: 1, size: 1 }
    }
}

/// Query for page 1, which needs no cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FirstPageQuery {
    pub size: usize,
}

/// Query for the page following `last_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NextPageQuery {
    #[serde(rename = "lastId")]
    pub last_id: RecordId,
    pub size: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct CountResponse {
    #[serde(rename = "totalItems")]
    pub total_items: u64,
}
