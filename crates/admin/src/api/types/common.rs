//! Response envelopes and lenient field decoders shared by every endpoint.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};

// =============================================================================
// Envelopes
// =============================================================================

/// A list endpoint's body: either a bare array or a paginated object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ListResponse<T> {
    Plain(Vec<T>),
    Paginated { results: Vec<T> },
}

impl<T> From<ListResponse<T>> for Vec<T> {
    fn from(list: ListResponse<T>) -> Self {
        match list {
            ListResponse::Plain(items) | ListResponse::Paginated { results: items } => items,
        }
    }
}

/// A search endpoint's body: a single record or an array of them.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> From<OneOrMany<T>> for Vec<T> {
    fn from(found: OneOrMany<T>) -> Self {
        match found {
            OneOrMany::Many(items) => items,
            OneOrMany::One(item) => vec![item],
        }
    }
}

// =============================================================================
// Field decoders
// =============================================================================

/// Decode `null` as the type's default.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawText {
    Text(String),
    Int(i64),
    Float(f64),
}

/// Decode an optional text field that the API sometimes sends as a number
/// (document numbers, phone numbers). Blank strings become `None`.
pub(crate) fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawText>::deserialize(deserializer)?;
    Ok(raw
        .map(|r| match r {
            RawText::Text(s) => s.trim().to_string(),
            RawText::Int(i) => i.to_string(),
            RawText::Float(f) => f.to_string(),
        })
        .filter(|s| !s.is_empty()))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawRef {
    Id(i64),
    Object { id: i64 },
}

/// Decode a foreign key sent either as a bare id or as a nested object.
pub(crate) fn id_or_object<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: From<i64>,
{
    let raw = Option::<RawRef>::deserialize(deserializer)?;
    Ok(raw.map(|r| match r {
        RawRef::Id(id) | RawRef::Object { id } => T::from(id),
    }))
}

/// Decode a date sent as `YYYY-MM-DD` or as a full ISO timestamp.
///
/// Anything unparseable decodes as `None` rather than failing the whole list.
pub(crate) fn lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_date_prefix))
}

/// Parse the leading `YYYY-MM-DD` of a date or timestamp string.
#[must_use]
pub fn parse_date_prefix(value: &str) -> Option<NaiveDate> {
    let prefix = value.trim().get(..10)?;
    NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Row {
        id: i64,
    }

    #[test]
    fn test_list_response_plain_and_paginated() {
        let plain: ListResponse<Row> = serde_json::from_str(r#"[{"id":1},{"id":2}]"#).unwrap();
        let paged: ListResponse<Row> =
            serde_json::from_str(r#"{"count":1,"next":null,"results":[{"id":3}]}"#).unwrap();
        assert_eq!(Vec::from(plain).len(), 2);
        assert_eq!(Vec::from(paged), vec![Row { id: 3 }]);
    }

    #[test]
    fn test_one_or_many() {
        let one: OneOrMany<Row> = serde_json::from_str(r#"{"id":7}"#).unwrap();
        let many: OneOrMany<Row> = serde_json::from_str(r#"[{"id":7},{"id":8}]"#).unwrap();
        assert_eq!(Vec::from(one), vec![Row { id: 7 }]);
        assert_eq!(Vec::from(many).len(), 2);
    }

    #[test]
    fn test_parse_date_prefix() {
        assert_eq!(
            parse_date_prefix("2025-03-09T14:22:00Z"),
            NaiveDate::from_ymd_opt(2025, 3, 9)
        );
        assert_eq!(
            parse_date_prefix("2025-03-09"),
            NaiveDate::from_ymd_opt(2025, 3, 9)
        );
        assert_eq!(parse_date_prefix("mañana"), None);
        assert_eq!(parse_date_prefix(""), None);
    }
}
