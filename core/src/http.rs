//! HTTP transport types.
//!
//! # Design
//! Requests and responses are plain data. `ApiClient::build_request` produces
//! an `HttpRequest` and `ApiClient::parse_response` consumes an
//! `HttpResponse`; executing the round trip in between is the job of a
//! `Transport`. Keeping both halves free of I/O makes the transformation
//! rules deterministic and testable without a server.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::body::MultipartBody;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Head => "HEAD",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request body after transformation, ready to be put on the wire.
#[derive(Debug, Clone, PartialEq)]
pub enum HttpBody {
    /// Serialized JSON.
    Json(Vec<u8>),
    /// Multipart form; the transport picks the boundary.
    Multipart(MultipartBody),
}

/// An HTTP request described as plain data.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    /// Already-encoded query pairs, in order.
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Option<HttpBody>,
    /// Upper bound on the response body size, in bytes.
    pub max_content_length: Option<u64>,
}

impl HttpRequest {
    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    /// The JSON body, if any, parsed back into a value.
    pub fn json_body(&self) -> Option<serde_json::Value> {
        match &self.body {
            Some(HttpBody::Json(bytes)) => serde_json::from_slice(bytes).ok(),
            _ => None,
        }
    }
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}
