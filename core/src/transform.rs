//! Request and response transformation.
//!
//! # Design
//! Outgoing bodies are reshaped once, right before they hit the wire:
//! top-level dates become ISO-8601 strings and object keys are rewritten into
//! the server's convention. Multipart forms only have the names of their text
//! parts rewritten; file parts are never touched.
//!
//! Incoming responses are shaped by the call options in a fixed order:
//! `raw` (or any HEAD request) returns the response as-is, then
//! `skip_transform_response` returns the decoded body as-is, and otherwise
//! the decoded body has its keys rewritten into the client's convention.
//! Successes and failures go through the same shaping.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::body::{MultipartBody, Part, RequestBody};
use crate::case::Case;
use crate::error::ApiError;
use crate::http::{HttpBody, HttpMethod, HttpResponse};
use crate::options::CallOptions;

/// A shaped result, for either a success or a rejected response.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// The transport's response, untouched.
    Response(HttpResponse),
    /// The decoded response body, key-converted unless skipped.
    Body(Value),
}

impl Reply {
    pub fn body(&self) -> Option<&Value> {
        match self {
            Reply::Body(v) => Some(v),
            Reply::Response(_) => None,
        }
    }

    pub fn response(&self) -> Option<&HttpResponse> {
        match self {
            Reply::Response(r) => Some(r),
            Reply::Body(_) => None,
        }
    }

    pub fn into_body(self) -> Option<Value> {
        match self {
            Reply::Body(v) => Some(v),
            Reply::Response(_) => None,
        }
    }

    /// Deserialize the body into `T`. A raw response is decoded first.
    pub fn json<T: DeserializeOwned>(self) -> Result<T, ApiError> {
        let value = match self {
            Reply::Body(v) => v,
            Reply::Response(r) => decode_body(&r.body),
        };
        serde_json::from_value(value).map_err(ApiError::Deserialization)
    }
}

/// Shape an outgoing body for the wire.
///
/// Returns `Ok(None)` when there is nothing to send.
pub fn transform_request_body(
    body: Option<&RequestBody>,
    options: &CallOptions,
    case: Case,
) -> Result<Option<HttpBody>, ApiError> {
    let Some(body) = body else {
        return Ok(None);
    };

    let shaped = match body {
        RequestBody::Multipart(form) if options.skip_transform_request => {
            HttpBody::Multipart(form.clone())
        }
        RequestBody::Multipart(form) => HttpBody::Multipart(rename_text_parts(form, case)),
        RequestBody::Json(json) if options.skip_transform_request => {
            HttpBody::Json(serde_json::to_vec(&json.to_json())?)
        }
        RequestBody::Json(json) => {
            // `to_json` renders top-level dates before keys are rewritten.
            let converted = case.convert(&json.to_json());
            HttpBody::Json(serde_json::to_vec(&converted)?)
        }
    };
    Ok(Some(shaped))
}

fn rename_text_parts(form: &MultipartBody, case: Case) -> MultipartBody {
    let mut renamed = MultipartBody::new();
    for (name, part) in form.parts() {
        let name = match part {
            Part::Text(_) => case.convert_key(name),
            Part::File { .. } => name.clone(),
        };
        renamed.push(name, part.clone());
    }
    renamed
}

/// Decode a response body leniently: empty becomes `null`, non-JSON text
/// becomes a JSON string.
pub fn decode_body(body: &str) -> Value {
    if body.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(body).unwrap_or_else(|_| Value::String(body.to_string()))
}

/// Shape a response according to the call options.
pub fn shape_reply(
    method: HttpMethod,
    response: HttpResponse,
    options: &CallOptions,
    case: Case,
) -> Reply {
    if options.raw || method == HttpMethod::Head {
        return Reply::Response(response);
    }
    let body = decode_body(&response.body);
    if options.skip_transform_response {
        return Reply::Body(body);
    }
    Reply::Body(case.convert(&body))
}
