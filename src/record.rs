//! Dynamic records built from API payloads.
//!
//! The Golf Genius API returns loosely-shaped JSON whose attribute sets differ
//! per endpoint and per account. Instead of a struct per shape, each payload
//! item becomes a [`Record`]: an ordered, immutable attribute map whose nested
//! maps and arrays are converted once, at construction.
//!
//! Attribute lookup goes through [`Record::get`], which first checks the exact
//! name and then, for a name ending in `?`, derives a boolean from the
//! attribute without the suffix:
//!
//! ```
//! use golfgenius::{Record, Value};
//! use serde_json::json;
//!
//! let record = Record::from_json(json!({"id": "1", "archived": "TRUE"}), None).unwrap();
//! assert_eq!(record.get("archived?").as_deref(), Some(&Value::Bool(true)));
//! assert_eq!(record.get("waitlist?").as_deref(), Some(&Value::Bool(false)));
//! assert!(record.get("waitlist").is_none());
//! ```

use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use serde_json::{Map, Number, Value as JsonValue};

use crate::error::{GolfGeniusError, Result};

/// Suffix that turns an attribute name into a boolean predicate.
const PREDICATE_SUFFIX: char = '?';

const ZONED_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S %z", "%Y-%m-%d %H:%M:%S%z"];
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y"];

/// A point in time parsed from a date-like attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timestamp {
    /// Date and time with an explicit offset.
    Zoned(DateTime<FixedOffset>),
    /// Date and time without an offset.
    Naive(NaiveDateTime),
    /// Calendar date only.
    Date(NaiveDate),
}

impl Timestamp {
    /// Parse a date or date-time string, returning `None` when the text is
    /// not recognisably a date.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(Self::Zoned(dt));
        }
        for format in ZONED_FORMATS {
            if let Ok(dt) = DateTime::parse_from_str(raw, format) {
                return Some(Self::Zoned(dt));
            }
        }
        for format in NAIVE_FORMATS {
            if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
                return Some(Self::Naive(dt));
            }
        }
        for format in DATE_FORMATS {
            if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
                return Some(Self::Date(date));
            }
        }
        None
    }

    /// Canonical textual form (RFC 3339 / ISO 8601).
    pub fn to_canonical_string(&self) -> String {
        match self {
            Self::Zoned(dt) => dt.to_rfc3339(),
            Self::Naive(dt) => dt.format("%Y-%m-%dT%H:%M:%S%.f").to_string(),
            Self::Date(date) => date.format("%Y-%m-%d").to_string(),
        }
    }

    /// Position on a single timeline, used for ordering.
    pub fn naive_utc(&self) -> NaiveDateTime {
        match self {
            Self::Zoned(dt) => dt.naive_utc(),
            Self::Naive(dt) => *dt,
            Self::Date(date) => date.and_hms_opt(0, 0, 0).unwrap_or_default(),
        }
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_canonical_string())
    }
}

/// An attribute value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Timestamp(Timestamp),
    Record(Record),
    List(Vec<Value>),
}

impl Value {
    fn from_json(name: &str, json: JsonValue, credential: Option<&str>) -> Self {
        match json {
            JsonValue::Null => Value::Null,
            JsonValue::Bool(b) => Value::Bool(b),
            JsonValue::Number(n) => Value::Number(n),
            JsonValue::String(s) => {
                if is_date_attribute(name) {
                    if let Some(ts) = Timestamp::parse(&s) {
                        return Value::Timestamp(ts);
                    }
                }
                Value::String(s)
            }
            JsonValue::Array(items) => Value::List(
                items
                    .into_iter()
                    .map(|item| Value::from_json(name, item, credential))
                    .collect(),
            ),
            JsonValue::Object(map) => Value::Record(Record::from_map(map, credential)),
        }
    }

    /// Recursively unwrap into a plain JSON value.
    pub fn to_plain_value(&self) -> JsonValue {
        match self {
            Value::Null => JsonValue::Null,
            Value::Bool(b) => JsonValue::Bool(*b),
            Value::Number(n) => JsonValue::Number(n.clone()),
            Value::String(s) => JsonValue::String(s.clone()),
            Value::Timestamp(ts) => JsonValue::String(ts.to_canonical_string()),
            Value::Record(r) => r.to_plain_value(),
            Value::List(items) => JsonValue::Array(items.iter().map(Value::to_plain_value).collect()),
        }
    }

    /// Boolean coercion used by predicate lookups: only `true` and the
    /// string `"true"` (any case) are truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Bool(b) => *b,
            Value::String(s) => s.eq_ignore_ascii_case("true"),
            _ => false,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<&Timestamp> {
        match self {
            Value::Timestamp(ts) => Some(ts),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Value::Record(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Textual form of a scalar, used when comparing identifiers.
    ///
    /// `None` for null, records and lists.
    pub fn to_id_string(&self) -> Option<String> {
        match self {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            Value::Timestamp(ts) => Some(ts.to_canonical_string()),
            Value::Null | Value::Record(_) | Value::List(_) => None,
        }
    }

    fn type_rank(&self) -> u8 {
        match self {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Number(_) => 2,
            Value::Timestamp(_) => 3,
            Value::String(_) => 4,
            Value::List(_) => 5,
            Value::Record(_) => 6,
        }
    }

    /// Numbers, and strings that read as numbers, compare numerically.
    fn sort_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            _ => None,
        }
    }

    /// Ascending order with missing and null values first.
    pub fn sort_cmp(a: Option<&Value>, b: Option<&Value>) -> Ordering {
        let a = a.unwrap_or(&Value::Null);
        let b = b.unwrap_or(&Value::Null);
        if let (Some(x), Some(y)) = (a.sort_number(), b.sort_number()) {
            return x.partial_cmp(&y).unwrap_or(Ordering::Equal);
        }
        match (a, b) {
            (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
            (Value::Timestamp(x), Value::Timestamp(y)) => x.naive_utc().cmp(&y.naive_utc()),
            (Value::String(x), Value::String(y)) => x.cmp(y),
            _ => a.type_rank().cmp(&b.type_rank()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) => write!(f, "{n}"),
            Value::String(s) => f.write_str(s),
            Value::Timestamp(ts) => write!(f, "{ts}"),
            Value::Record(_) | Value::List(_) => write!(f, "{}", self.to_plain_value()),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(n) => n.serialize(serializer),
            Value::String(s) => serializer.serialize_str(s),
            Value::Timestamp(ts) => serializer.serialize_str(&ts.to_canonical_string()),
            Value::Record(r) => r.serialize(serializer),
            Value::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
        }
    }
}

/// Whether an attribute name marks a date or time value.
pub fn is_date_attribute(name: &str) -> bool {
    name == "date" || name.ends_with("_at") || name.ends_with("_date")
}

/// Canonical attribute name: identifier characters (and `?`) are kept as-is,
/// names stay case-sensitive, anything else becomes `_`.
pub fn canonical_key(key: &str) -> Cow<'_, str> {
    let key = key.trim();
    if key.chars().all(is_key_char) {
        Cow::Borrowed(key)
    } else {
        Cow::Owned(
            key.chars()
                .map(|c| if is_key_char(c) { c } else { '_' })
                .collect(),
        )
    }
}

fn is_key_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == PREDICATE_SUFFIX
}

/// An immutable, introspectable API record.
#[derive(Debug, Clone, Default)]
pub struct Record {
    attributes: Vec<(String, Value)>,
    credential: Option<String>,
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.attributes == other.attributes
    }
}

impl Record {
    /// Build a record from a decoded JSON payload.
    ///
    /// # Errors
    ///
    /// Returns `MalformedResponse` if the payload is not a JSON object.
    pub fn from_json(payload: JsonValue, credential: Option<&str>) -> Result<Self> {
        match payload {
            JsonValue::Object(map) => Ok(Self::from_map(map, credential)),
            other => Err(GolfGeniusError::MalformedResponse(format!(
                "expected an object, got {}",
                json_type_name(&other)
            ))),
        }
    }

    /// Build a record from a JSON object.
    pub fn from_map(map: Map<String, JsonValue>, credential: Option<&str>) -> Self {
        let mut attributes: Vec<(String, Value)> = Vec::with_capacity(map.len());
        for (raw_key, raw_value) in map {
            let key = canonical_key(&raw_key).into_owned();
            let value = Value::from_json(&key, raw_value, credential);
            match attributes.iter_mut().find(|(k, _)| *k == key) {
                Some(slot) => slot.1 = value,
                None => attributes.push((key, value)),
            }
        }
        Self {
            attributes,
            credential: credential.map(str::to_string),
        }
    }

    /// Whether an attribute with exactly this name is stored.
    pub fn has(&self, name: &str) -> bool {
        self.attribute(name).is_some()
    }

    /// Stored attribute with exactly this name.
    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v)
    }

    /// Get-or-derive lookup.
    ///
    /// Returns the stored attribute when one matches `name` exactly. Otherwise,
    /// a name ending in `?` yields the boolean coercion of the attribute with
    /// the suffix stripped (`false` when absent). Any other name yields `None`.
    pub fn get(&self, name: &str) -> Option<Cow<'_, Value>> {
        if let Some(value) = self.attribute(name) {
            return Some(Cow::Borrowed(value));
        }
        name.strip_suffix(PREDICATE_SUFFIX)
            .map(|base| Cow::Owned(Value::Bool(self.predicate(base))))
    }

    /// Boolean coercion of an attribute; `false` when absent.
    pub fn predicate(&self, name: &str) -> bool {
        self.attribute(name).map_or(false, Value::is_truthy)
    }

    /// Attribute names, in payload order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.attributes.iter().map(|(k, _)| k.as_str())
    }

    /// Attributes, in payload order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// The `id` attribute as text.
    pub fn id(&self) -> Option<String> {
        self.attribute("id").and_then(Value::to_id_string)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.attribute(name).and_then(Value::as_str)
    }

    pub fn get_i64(&self, name: &str) -> Option<i64> {
        self.attribute(name).and_then(Value::as_i64)
    }

    pub fn get_f64(&self, name: &str) -> Option<f64> {
        self.attribute(name).and_then(Value::as_f64)
    }

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.attribute(name).and_then(Value::as_bool)
    }

    pub fn get_timestamp(&self, name: &str) -> Option<&Timestamp> {
        self.attribute(name).and_then(Value::as_timestamp)
    }

    pub fn get_record(&self, name: &str) -> Option<&Record> {
        self.attribute(name).and_then(Value::as_record)
    }

    pub fn get_list(&self, name: &str) -> Option<&[Value]> {
        self.attribute(name).and_then(Value::as_list)
    }

    /// A new record with `extra` attributes added, replacing same-named ones.
    #[must_use]
    pub fn with_attributes<I>(&self, extra: I) -> Record
    where
        I: IntoIterator<Item = (String, JsonValue)>,
    {
        let mut map = self.to_map();
        map.extend(extra);
        Record::from_map(map, self.credential())
    }

    /// Credential this record was fetched with.
    pub fn credential(&self) -> Option<&str> {
        self.credential.as_deref()
    }

    /// Recursively unwrap into a plain JSON object.
    pub fn to_plain_value(&self) -> JsonValue {
        JsonValue::Object(self.to_map())
    }

    /// Recursively unwrap into a JSON map.
    pub fn to_map(&self) -> Map<String, JsonValue> {
        self.attributes
            .iter()
            .map(|(k, v)| (k.clone(), v.to_plain_value()))
            .collect()
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.attributes.len()))?;
        for (k, v) in &self.attributes {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

pub(crate) fn json_type_name(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(payload: JsonValue) -> Record {
        Record::from_json(payload, None).unwrap()
    }

    #[test]
    fn test_round_trip_without_dates() {
        let payload = json!({
            "id": "event_001",
            "name": "Member-Guest",
            "ggid": 12345,
            "archived": false,
            "handicap": 4.2,
            "notes": null,
            "season": {"id": "s1", "name": "2024", "current": true},
            "tags": ["a", 1, {"nested": [true, false]}],
            "rounds": [{"id": "r1"}, {"id": "r2"}]
        });
        let r = record(payload.clone());
        assert_eq!(r.to_plain_value(), payload);

        // Plain value of a rebuilt record is stable.
        let again = record(r.to_plain_value());
        assert_eq!(again.to_plain_value(), r.to_plain_value());
    }

    #[test]
    fn test_nested_values_are_converted_at_construction() {
        let r = record(json!({
            "season": {"id": "s1"},
            "rounds": [{"id": "r1"}, 7]
        }));
        let season = r.get_record("season").unwrap();
        assert_eq!(season.id().as_deref(), Some("s1"));

        let rounds = r.get_list("rounds").unwrap();
        assert!(matches!(rounds[0], Value::Record(_)));
        assert_eq!(rounds[1].as_i64(), Some(7));
    }

    #[test]
    fn test_predicate_lookup() {
        let r = record(json!({
            "a": true,
            "b": "True",
            "c": "yes",
            "d": 1,
            "e": false,
            "f": null
        }));
        let pred = |name: &str| r.get(name).unwrap().into_owned();
        assert_eq!(pred("a?"), Value::Bool(true));
        assert_eq!(pred("b?"), Value::Bool(true));
        assert_eq!(pred("c?"), Value::Bool(false));
        assert_eq!(pred("d?"), Value::Bool(false));
        assert_eq!(pred("e?"), Value::Bool(false));
        assert_eq!(pred("f?"), Value::Bool(false));
        assert_eq!(pred("missing?"), Value::Bool(false));
        assert!(!r.has("missing?"));
    }

    #[test]
    fn test_predicate_matches_coercion_for_every_attribute() {
        let r = record(json!({"x": "TRUE", "y": 0, "z": [true]}));
        for name in ["x", "y", "z", "absent"] {
            let derived = r.get(&format!("{name}?")).unwrap().into_owned();
            let expected = r.attribute(name).map_or(false, Value::is_truthy);
            assert_eq!(derived, Value::Bool(expected), "attribute {name}");
        }
    }

    #[test]
    fn test_stored_predicate_name_wins() {
        let r = record(json!({"paid?": "maybe", "paid": true}));
        assert_eq!(
            r.get("paid?").as_deref(),
            Some(&Value::String("maybe".to_string()))
        );
    }

    #[test]
    fn test_unknown_plain_name_is_none() {
        let r = record(json!({"id": 1}));
        assert!(r.get("name").is_none());
        assert!(!r.has("name"));
    }

    #[test]
    fn test_date_attributes_are_parsed() {
        let r = record(json!({
            "date": "2024-05-01",
            "created_at": "2024-05-01T08:30:00Z",
            "start_date": "05/02/2024",
            "updated_at": "2024-05-01 08:30:00 -0500",
            "tee_time": "2024-05-01",
        }));
        assert!(matches!(r.get_timestamp("date"), Some(Timestamp::Date(_))));
        assert!(matches!(r.get_timestamp("created_at"), Some(Timestamp::Zoned(_))));
        assert!(matches!(r.get_timestamp("start_date"), Some(Timestamp::Date(_))));
        assert!(matches!(r.get_timestamp("updated_at"), Some(Timestamp::Zoned(_))));
        // Not a date-like name.
        assert_eq!(r.get_str("tee_time"), Some("2024-05-01"));

        let plain = r.to_plain_value();
        assert_eq!(plain["date"], json!("2024-05-01"));
        assert_eq!(plain["created_at"], json!("2024-05-01T08:30:00+00:00"));
        assert_eq!(plain["start_date"], json!("2024-05-02"));
    }

    #[test]
    fn test_unparsable_dates_are_kept_verbatim() {
        let r = record(json!({
            "end_date": "TBD",
            "played_at": "",
            "date": 20240501
        }));
        assert_eq!(r.get_str("end_date"), Some("TBD"));
        assert_eq!(r.get_str("played_at"), Some(""));
        assert_eq!(r.get_i64("date"), Some(20240501));
    }

    #[test]
    fn test_dates_inside_nested_records() {
        let r = record(json!({"round": {"date": "2024-06-01"}}));
        let round = r.get_record("round").unwrap();
        assert!(round.get_timestamp("date").is_some());
    }

    #[test]
    fn test_keys_are_canonicalised() {
        let r = record(json!({"Last Name": "Smith", "hcp-index": 3, "ggid": "x"}));
        assert_eq!(r.get_str("Last_Name"), Some("Smith"));
        assert_eq!(r.get_i64("hcp_index"), Some(3));
        assert_eq!(r.keys().collect::<Vec<_>>(), vec!["Last_Name", "hcp_index", "ggid"]);
    }

    #[test]
    fn test_non_object_payload_is_malformed() {
        let err = Record::from_json(json!([1, 2]), None).unwrap_err();
        assert!(matches!(err, GolfGeniusError::MalformedResponse(_)));
    }

    #[test]
    fn test_credential_is_inherited_but_not_serialized() {
        let r = Record::from_json(json!({"id": 1, "season": {"id": 2}}), Some("key-1")).unwrap();
        assert_eq!(r.credential(), Some("key-1"));
        assert_eq!(r.get_record("season").unwrap().credential(), Some("key-1"));
        let text = serde_json::to_string(&r).unwrap();
        assert!(!text.contains("key-1"));
    }

    #[test]
    fn test_id_is_stringified() {
        assert_eq!(record(json!({"id": 42})).id().as_deref(), Some("42"));
        assert_eq!(record(json!({"id": "abc"})).id().as_deref(), Some("abc"));
        assert_eq!(record(json!({"id": null})).id(), None);
    }

    #[test]
    fn test_sort_cmp_puts_missing_first() {
        let one = Value::Number(1.into());
        let two = Value::Number(2.into());
        assert_eq!(Value::sort_cmp(None, Some(&one)), Ordering::Less);
        assert_eq!(Value::sort_cmp(Some(&Value::Null), Some(&one)), Ordering::Less);
        assert_eq!(Value::sort_cmp(Some(&two), Some(&one)), Ordering::Greater);
        assert_eq!(Value::sort_cmp(None, None), Ordering::Equal);
    }

    #[test]
    fn test_sort_cmp_numeric_strings() {
        let ten = Value::String("10".into());
        let two = Value::String("2".into());
        assert_eq!(Value::sort_cmp(Some(&ten), Some(&two)), Ordering::Greater);
        assert_eq!(Value::sort_cmp(Some(&two), Some(&Value::Number(3.into()))), Ordering::Less);

        let apple = Value::String("apple".into());
        assert_eq!(Value::sort_cmp(Some(&apple), Some(&ten)), Ordering::Greater);
    }

    #[test]
    fn test_serialize_matches_plain_value() {
        let r = record(json!({"id": 1, "created_at": "2024-01-01", "list": [{"a": 1}]}));
        assert_eq!(serde_json::to_value(&r).unwrap(), r.to_plain_value());
    }

    #[test]
    fn test_with_attributes_leaves_original_untouched() {
        let original = Record::from_json(json!({"id": "r1", "index": 1}), Some("k")).unwrap();
        let derived = original.with_attributes([("event_id".to_string(), json!("e1"))]);
        assert_eq!(derived.get_str("event_id"), Some("e1"));
        assert_eq!(derived.credential(), Some("k"));
        assert!(!original.has("event_id"));
    }
}
