//! HTTP method dispatcher for the storefront admin API.
//!
//! # Design
//! `ApiClient` holds its configuration and a `Transport`, and nothing else:
//! calls share no mutable state and may run concurrently. Every verb goes
//! through `request`, which is split into a pure `build_request` (URL, headers,
//! query and transformed body) and a pure `parse_response` (status check and
//! reply shaping), with the transport round trip in between. Callers that
//! run their own I/O can use the two halves directly.

use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpBody, HttpMethod, HttpRequest, HttpResponse};
use crate::options::{encode_query, CallOptions, Payload};
use crate::resource::Resource;
use crate::transform::{shape_reply, transform_request_body, Reply};
use crate::transport::{ReqwestTransport, Transport};

/// Client for the storefront admin REST API.
#[derive(Debug, Clone)]
pub struct ApiClient<T = ReqwestTransport> {
    config: ClientConfig,
    transport: T,
}

impl ApiClient<ReqwestTransport> {
    /// Build a client backed by reqwest.
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        let transport = ReqwestTransport::new(&config)?;
        Ok(Self::with_transport(config, transport))
    }
}

impl<T> ApiClient<T> {
    pub fn with_transport(mut config: ClientConfig, transport: T) -> Self {
        config.base_url = config.base_url.trim_end_matches('/').to_string();
        Self { config, transport }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Join `path` onto the base URL. One leading `/` is dropped; nothing
    /// else about the path is checked.
    pub fn url_for(&self, path: &str) -> String {
        let path = path.strip_prefix('/').unwrap_or(path);
        format!("{}/{}", self.config.base_url, path)
    }

    /// Describe a call as an `HttpRequest` without sending it.
    pub fn build_request(
        &self,
        method: HttpMethod,
        path: &str,
        payload: &Payload,
        options: &CallOptions,
    ) -> Result<HttpRequest, ApiError> {
        let body = transform_request_body(payload.data.as_ref(), options, self.config.request_case)?;
        let headers = merge_headers(
            &self.config.default_headers,
            &payload.headers,
            matches!(body, Some(HttpBody::Multipart(_))),
        );
        Ok(HttpRequest {
            method,
            url: self.url_for(path),
            query: encode_query(&payload.params),
            headers,
            body,
            max_content_length: payload.max_content_length,
        })
    }

    /// Shape a response; non-2xx statuses become `ApiError::Status`.
    pub fn parse_response(
        &self,
        method: HttpMethod,
        response: HttpResponse,
        options: &CallOptions,
    ) -> Result<Reply, ApiError> {
        let status = response.status;
        let success = response.is_success();
        let reply = shape_reply(method, response, options, self.config.response_case);
        if success {
            Ok(reply)
        } else {
            Err(ApiError::Status { status, reply })
        }
    }

    /// A helper for one REST resource, e.g. `client.resource("products")`.
    pub fn resource(&self, name: &str) -> Resource<'_, T> {
        Resource::new(self, name)
    }
}

impl<T: Transport> ApiClient<T> {
    /// Send one call and shape its outcome.
    pub async fn request(
        &self,
        method: HttpMethod,
        path: &str,
        payload: Payload,
        options: CallOptions,
    ) -> Result<Reply, ApiError> {
        let request = self.build_request(method, path, &payload, &options)?;
        debug!(%method, url = %request.url, ?options, "dispatching request");
        let response = match self.transport.execute(request).await {
            Ok(response) => response,
            Err(e) => {
                warn!(%method, path, error = %e, "request failed without a response");
                return Err(e.into());
            }
        };
        debug!(%method, path, status = response.status, "received response");
        self.parse_response(method, response, &options)
    }

    pub async fn get(&self, path: &str, payload: Payload, options: CallOptions) -> Result<Reply, ApiError> {
        self.request(HttpMethod::Get, path, payload, options).await
    }

    pub async fn post(&self, path: &str, payload: Payload, options: CallOptions) -> Result<Reply, ApiError> {
        self.request(HttpMethod::Post, path, payload, options).await
    }

    pub async fn put(&self, path: &str, payload: Payload, options: CallOptions) -> Result<Reply, ApiError> {
        self.request(HttpMethod::Put, path, payload, options).await
    }

    pub async fn patch(&self, path: &str, payload: Payload, options: CallOptions) -> Result<Reply, ApiError> {
        self.request(HttpMethod::Patch, path, payload, options).await
    }

    pub async fn delete(&self, path: &str, payload: Payload, options: CallOptions) -> Result<Reply, ApiError> {
        self.request(HttpMethod::Delete, path, payload, options).await
    }

    pub async fn head(&self, path: &str, payload: Payload, options: CallOptions) -> Result<Reply, ApiError> {
        self.request(HttpMethod::Head, path, payload, options).await
    }
}

/// Per-call headers replace defaults of the same name. Multipart bodies drop
/// any configured `Content-Type` so the transport can set the boundary.
fn merge_headers(
    defaults: &[(String, String)],
    overrides: &[(String, String)],
    multipart: bool,
) -> Vec<(String, String)> {
    let mut merged: Vec<(String, String)> = defaults
        .iter()
        .filter(|(k, _)| !overrides.iter().any(|(o, _)| o.eq_ignore_ascii_case(k)))
        .cloned()
        .collect();
    merged.extend(overrides.iter().cloned());
    if multipart {
        merged.retain(|(k, _)| !k.eq_ignore_ascii_case("content-type"));
    }
    merged
}
