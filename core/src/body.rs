//! Request body model.
//!
//! # Design
//! A body is either a structured JSON object or a multipart form. Structured
//! bodies keep date/time fields typed as `DateTime<Utc>` until the request is
//! built, so the transformer can render them in one place. Multipart bodies
//! keep text parts separate from file parts because only text part names are
//! subject to key conversion.

use bytes::Bytes;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::ApiError;

/// Render a timestamp the way the API expects: UTC, millisecond precision,
/// `Z` suffix.
pub fn iso8601(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// A top-level field value of a structured body.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Json(Value),
    DateTime(DateTime<Utc>),
}

impl FieldValue {
    /// The field as plain JSON, with dates rendered as ISO-8601 strings.
    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::Json(v) => v.clone(),
            FieldValue::DateTime(at) => Value::String(iso8601(at)),
        }
    }
}

macro_rules! json_field_from {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for FieldValue {
                fn from(value: $ty) -> Self {
                    FieldValue::Json(value.into())
                }
            }
        )*
    };
}

json_field_from!(Value, String, &str, bool, i32, i64, u32, u64, f64);

impl From<DateTime<Utc>> for FieldValue {
    fn from(at: DateTime<Utc>) -> Self {
        FieldValue::DateTime(at)
    }
}

/// A structured (JSON object) request body with ordered top-level fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JsonBody {
    fields: Vec<(String, FieldValue)>,
}

impl JsonBody {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field, replacing an earlier field of the same name.
    pub fn field(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(name.into(), value.into());
        self
    }

    /// Add a date/time field.
    pub fn date(self, name: impl Into<String>, at: DateTime<Utc>) -> Self {
        self.field(name, FieldValue::DateTime(at))
    }

    pub fn insert(&mut self, name: String, value: FieldValue) {
        match self.fields.iter_mut().find(|(k, _)| *k == name) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((name, value)),
        }
    }

    pub fn fields(&self) -> &[(String, FieldValue)] {
        &self.fields
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Build a body from any serializable value that serializes to a JSON
    /// object.
    pub fn from_serialize<T: Serialize>(value: &T) -> Result<Self, ApiError> {
        match serde_json::to_value(value)? {
            Value::Object(map) => Ok(map.into()),
            other => Err(ApiError::InvalidBody(format!(
                "expected a JSON object, got {}",
                json_kind(&other)
            ))),
        }
    }

    /// The body as a JSON object with dates rendered and keys untouched.
    pub fn to_json(&self) -> Value {
        let map: Map<String, Value> = self
            .fields
            .iter()
            .map(|(k, v)| (k.clone(), v.to_json()))
            .collect();
        Value::Object(map)
    }
}

impl From<Map<String, Value>> for JsonBody {
    fn from(map: Map<String, Value>) -> Self {
        Self {
            fields: map.into_iter().map(|(k, v)| (k, FieldValue::Json(v))).collect(),
        }
    }
}

impl TryFrom<Value> for JsonBody {
    type Error = ApiError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(map.into()),
            other => Err(ApiError::InvalidBody(format!(
                "expected a JSON object, got {}",
                json_kind(&other)
            ))),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// One value of a multipart form.
#[derive(Debug, Clone, PartialEq)]
pub enum Part {
    Text(String),
    File {
        bytes: Bytes,
        file_name: Option<String>,
        mime_type: Option<String>,
    },
}

/// A multipart form body with ordered, possibly repeated, field names.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MultipartBody {
    parts: Vec<(String, Part)>,
}

impl MultipartBody {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parts.push((name.into(), Part::Text(value.into())));
        self
    }

    pub fn file(
        mut self,
        name: impl Into<String>,
        bytes: impl Into<Bytes>,
        file_name: Option<&str>,
        mime_type: Option<&str>,
    ) -> Self {
        self.parts.push((
            name.into(),
            Part::File {
                bytes: bytes.into(),
                file_name: file_name.map(str::to_string),
                mime_type: mime_type.map(str::to_string),
            },
        ));
        self
    }

    pub fn push(&mut self, name: String, part: Part) {
        self.parts.push((name, part));
    }

    pub fn parts(&self) -> &[(String, Part)] {
        &self.parts
    }

    /// Look up the first part with the given name.
    pub fn get(&self, name: &str) -> Option<&Part> {
        self.parts.iter().find(|(k, _)| k == name).map(|(_, p)| p)
    }
}

/// The body of an outgoing call, before transformation.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Json(JsonBody),
    Multipart(MultipartBody),
}

impl From<JsonBody> for RequestBody {
    fn from(body: JsonBody) -> Self {
        RequestBody::Json(body)
    }
}

impl From<MultipartBody> for RequestBody {
    fn from(body: MultipartBody) -> Self {
        RequestBody::Multipart(body)
    }
}
