//! API client core for the storefront admin service.
//!
//! # Overview
//! Every call passes through one transformation pipeline: outgoing JSON keys
//! and multipart field names are rewritten into the server's convention,
//! top-level dates are rendered as ISO-8601, and responses (successful or not)
//! are shaped by per-call options before they reach the caller.
//!
//! # Design
//! - `case` is a pure key converter; `transform` builds on it.
//! - `ApiClient` splits each call into `build_request` and `parse_response`
//!   around a `Transport`, so the I/O boundary is explicit and the pipeline
//!   can be tested without a network.
//! - `ReqwestTransport` is the default transport; tests and embedders can
//!   supply their own.

pub mod body;
pub mod case;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod options;
pub mod resource;
pub mod transform;
pub mod transport;

pub use body::{FieldValue, JsonBody, MultipartBody, Part, RequestBody};
pub use case::{to_camel_case, to_snake_case, Case};
pub use client::ApiClient;
pub use config::ClientConfig;
pub use error::{ApiError, TransportError};
pub use http::{HttpBody, HttpMethod, HttpRequest, HttpResponse};
pub use options::{CallOptions, Payload, QueryValue, Scalar};
pub use resource::Resource;
pub use transform::Reply;
pub use transport::{ReqwestTransport, Transport};
