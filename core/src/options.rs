//! Per-call options and payload.

use serde::{Deserialize, Serialize};

use crate::body::RequestBody;

/// Switches that bypass parts of the transformation pipeline for one call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CallOptions {
    /// Return the transport's response untouched, success or failure.
    pub raw: bool,
    /// Send body keys as given.
    pub skip_transform_request: bool,
    /// Return the response body as received.
    pub skip_transform_response: bool,
}

impl CallOptions {
    pub fn raw() -> Self {
        Self {
            raw: true,
            ..Self::default()
        }
    }

    pub fn skip_transform_request(mut self) -> Self {
        self.skip_transform_request = true;
        self
    }

    pub fn skip_transform_response(mut self) -> Self {
        self.skip_transform_response = true;
        self
    }
}

/// A scalar query parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl Scalar {
    fn render(&self) -> Option<String> {
        match self {
            Scalar::Null => None,
            Scalar::Bool(b) => Some(b.to_string()),
            Scalar::Int(n) => Some(n.to_string()),
            Scalar::Float(n) => Some(n.to_string()),
            Scalar::Str(s) => Some(s.clone()),
        }
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::Str(s.to_string())
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::Str(s)
    }
}

impl From<i64> for Scalar {
    fn from(n: i64) -> Self {
        Scalar::Int(n)
    }
}

impl From<u32> for Scalar {
    fn from(n: u32) -> Self {
        Scalar::Int(n.into())
    }
}

impl From<f64> for Scalar {
    fn from(n: f64) -> Self {
        Scalar::Float(n)
    }
}

impl From<bool> for Scalar {
    fn from(b: bool) -> Self {
        Scalar::Bool(b)
    }
}

/// A query parameter value: one scalar or a list of them.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryValue {
    Scalar(Scalar),
    Array(Vec<Scalar>),
}

macro_rules! query_value_from {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for QueryValue {
                fn from(value: $ty) -> Self {
                    QueryValue::Scalar(value.into())
                }
            }

            impl From<Vec<$ty>> for QueryValue {
                fn from(values: Vec<$ty>) -> Self {
                    QueryValue::Array(values.into_iter().map(Into::into).collect())
                }
            }
        )*
    };
}

query_value_from!(&str, String, i64, u32, f64, bool);

impl From<Scalar> for QueryValue {
    fn from(value: Scalar) -> Self {
        QueryValue::Scalar(value)
    }
}

/// Encode query parameters into ordered pairs. Arrays become repeated
/// `key[]` pairs and null scalars are dropped.
pub fn encode_query(params: &[(String, QueryValue)]) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    for (key, value) in params {
        match value {
            QueryValue::Scalar(s) => {
                if let Some(v) = s.render() {
                    pairs.push((key.clone(), v));
                }
            }
            QueryValue::Array(items) => {
                let array_key = format!("{key}[]");
                pairs.extend(items.iter().filter_map(Scalar::render).map(|v| (array_key.clone(), v)));
            }
        }
    }
    pairs
}

/// Everything a call sends besides method and path.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Payload {
    pub data: Option<RequestBody>,
    pub params: Vec<(String, QueryValue)>,
    pub headers: Vec<(String, String)>,
    pub max_content_length: Option<u64>,
}

impl Payload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn data(mut self, body: impl Into<RequestBody>) -> Self {
        self.data = Some(body.into());
        self
    }

    pub fn param(mut self, key: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn max_content_length(mut self, limit: u64) -> Self {
        self.max_content_length = Some(limit);
        self
    }
}
