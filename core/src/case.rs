//! Key-case conversion between the server's `snake_case` keys and the
//! client's `camelCase` keys.
//!
//! # Design
//! Conversion only ever touches object keys. It walks nested objects and
//! arrays so objects inside arrays are rewritten too, but every scalar value
//! (strings, numbers, booleans, null) is returned exactly as it came in.
//! Both directions are idempotent: a key that is already in the target
//! convention comes back unchanged.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A key-naming convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Case {
    /// `firstName`
    Camel,
    /// `first_name`
    Snake,
}

impl Case {
    /// Rewrite a single key into this convention.
    pub fn convert_key(self, key: &str) -> String {
        match self {
            Case::Camel => camel_key(key),
            Case::Snake => snake_key(key),
        }
    }

    /// Rewrite every object key in `value` into this convention.
    ///
    /// Key order is preserved. Two keys that map to the same name (say
    /// `user_name` and `userName`) collapse into one entry: it stays at the
    /// position of the first key and takes the value of the last one.
    pub fn convert(self, value: &Value) -> Value {
        match value {
            Value::Object(map) => {
                let mut converted = Map::with_capacity(map.len());
                for (key, v) in map {
                    let new_key = self.convert_key(key);
                    if converted.insert(new_key, self.convert(v)).is_some() {
                        tracing::debug!(
                            key = %key,
                            case = ?self,
                            "key collides after case conversion; last value wins"
                        );
                    }
                }
                Value::Object(converted)
            }
            Value::Array(items) => Value::Array(items.iter().map(|v| self.convert(v)).collect()),
            scalar => scalar.clone(),
        }
    }
}

impl std::str::FromStr for Case {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "camel" | "camelcase" => Ok(Case::Camel),
            "snake" | "snake_case" => Ok(Case::Snake),
            other => Err(format!("unknown key case: {other}")),
        }
    }
}

/// Convert all object keys in `value` to `camelCase`.
pub fn to_camel_case(value: &Value) -> Value {
    Case::Camel.convert(value)
}

/// Convert all object keys in `value` to `snake_case`.
pub fn to_snake_case(value: &Value) -> Value {
    Case::Snake.convert(value)
}

fn is_delimiter(c: char) -> bool {
    matches!(c, '_' | '-' | ' ')
}

fn camel_key(key: &str) -> String {
    let body = key.trim_start_matches('_');
    let prefix = &key[..key.len() - body.len()];
    if !body.contains(is_delimiter) {
        return key.to_string();
    }

    let mut out = String::with_capacity(key.len());
    out.push_str(prefix);
    let mut first = true;
    for word in body.split(is_delimiter) {
        if word.is_empty() {
            continue;
        }
        if first {
            out.push_str(word);
            first = false;
            continue;
        }
        let mut chars = word.chars();
        match chars.next() {
            Some(c) if c.is_alphabetic() => {
                out.extend(c.to_uppercase());
                out.push_str(chars.as_str());
            }
            // Digits cannot carry case, so the separator stays.
            Some(_) => {
                out.push('_');
                out.push_str(word);
            }
            None => {}
        }
    }
    out
}

fn snake_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for (i, c) in key.chars().enumerate() {
        if c == '-' || c == ' ' {
            out.push('_');
            continue;
        }
        if c.is_uppercase() {
            // Every capital starts a word, so `aBC` maps back to `a_b_c`.
            if i > 0 && !out.ends_with('_') {
                out.push('_');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}
