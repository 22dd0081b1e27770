// File: src/value.rs
// Purpose: Submitted field values and the user record they belong to

use chrono::NaiveDateTime;
use serde_json::Value as JsonValue;
use std::borrow::Cow;
use std::collections::BTreeMap;

/// A value submitted for one form field
#[derive(Debug, Clone, Default, PartialEq)]
pub enum FieldValue {
    #[default]
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    List(Vec<FieldValue>),
    DateTime(NaiveDateTime),
}

impl FieldValue {
    /// Whether the value satisfies the `required` rule.
    ///
    /// Numbers (zero included), non-empty strings (`"0"` and `" "` included),
    /// non-empty lists and date/time values count as present.
    pub fn is_present(&self) -> bool {
        match self {
            FieldValue::Null => false,
            FieldValue::Bool(b) => *b,
            FieldValue::Integer(_) | FieldValue::Float(_) => true,
            FieldValue::String(s) => !s.is_empty(),
            FieldValue::List(items) => !items.is_empty(),
            FieldValue::DateTime(_) => true,
        }
    }

    /// Whether optional rules should skip this value
    pub fn is_blank(&self) -> bool {
        match self {
            FieldValue::Null => true,
            FieldValue::Bool(b) => !*b,
            FieldValue::String(s) => s.is_empty(),
            FieldValue::List(items) => items.is_empty(),
            FieldValue::Integer(_) | FieldValue::Float(_) | FieldValue::DateTime(_) => false,
        }
    }

    /// Text form used by the string based rules
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            FieldValue::Null => Cow::Borrowed(""),
            FieldValue::Bool(true) => Cow::Borrowed("1"),
            FieldValue::Bool(false) => Cow::Borrowed(""),
            FieldValue::Integer(n) => Cow::Owned(n.to_string()),
            // Display drops a zero fraction and never switches to exponent form
            FieldValue::Float(n) => Cow::Owned(n.to_string()),
            FieldValue::String(s) => Cow::Borrowed(s),
            FieldValue::List(items) => Cow::Owned(
                items
                    .iter()
                    .map(|item| item.as_text().into_owned())
                    .collect::<Vec<_>>()
                    .join(","),
            ),
            FieldValue::DateTime(dt) => Cow::Owned(dt.format("%Y-%m-%d %H:%M:%S").to_string()),
        }
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        FieldValue::Integer(n)
    }
}

impl From<i32> for FieldValue {
    fn from(n: i32) -> Self {
        FieldValue::Integer(n as i64)
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        FieldValue::Float(n)
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::String(s)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::String(s.to_string())
    }
}

impl From<NaiveDateTime> for FieldValue {
    fn from(dt: NaiveDateTime) -> Self {
        FieldValue::DateTime(dt)
    }
}

impl<T: Into<FieldValue>> From<Vec<T>> for FieldValue {
    fn from(items: Vec<T>) -> Self {
        FieldValue::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(FieldValue::Null, Into::into)
    }
}

impl From<JsonValue> for FieldValue {
    fn from(json: JsonValue) -> Self {
        match json {
            JsonValue::Null => FieldValue::Null,
            JsonValue::Bool(b) => FieldValue::Bool(b),
            JsonValue::Number(n) => match n.as_i64() {
                Some(i) => FieldValue::Integer(i),
                None => FieldValue::Float(n.as_f64().unwrap_or_default()),
            },
            JsonValue::String(s) => FieldValue::String(s),
            JsonValue::Array(items) => FieldValue::List(items.into_iter().map(Into::into).collect()),
            JsonValue::Object(map) => FieldValue::List(map.into_iter().map(|(_, v)| v.into()).collect()),
        }
    }
}

/// A user record as submitted by a registration or edit form.
///
/// `uid` is set for records that already exist in the user store; uniqueness
/// lookups exclude that record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserRecord {
    uid: Option<u64>,
    fields: BTreeMap<String, FieldValue>,
}

impl UserRecord {
    /// A record that is not stored yet
    pub fn new() -> Self {
        Self::default()
    }

    /// A stored record
    pub fn existing(uid: u64) -> Self {
        Self {
            uid: Some(uid),
            fields: BTreeMap::new(),
        }
    }

    pub fn with(mut self, field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.set(field, value);
        self
    }

    pub fn set(&mut self, field: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(field.into(), value.into());
    }

    pub fn uid(&self) -> Option<u64> {
        self.uid
    }

    /// Get a field value
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    /// Get all field names
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Build a record from a JSON object, e.g. the `user` block of a form post
    pub fn from_json(uid: Option<u64>, json: &JsonValue) -> Self {
        let fields = json
            .as_object()
            .map(|map| {
                map.iter()
                    .map(|(key, value)| (key.clone(), FieldValue::from(value.clone())))
                    .collect()
            })
            .unwrap_or_default();
        Self { uid, fields }
    }
}
