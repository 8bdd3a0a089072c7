//! The I/O boundary.
//!
//! # Design
//! `Transport` executes one `HttpRequest` and hands back the `HttpResponse`
//! whatever its status; interpreting the status is the client's job. Only
//! failures without a response (timeouts, refused connections, oversized
//! bodies) come back as `TransportError`.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::multipart::{Form, Part as FormPart};
use reqwest::Method;

use crate::body::{MultipartBody, Part};
use crate::config::ClientConfig;
use crate::error::{ApiError, TransportError};
use crate::http::{HttpBody, HttpMethod, HttpRequest, HttpResponse};

/// Executes HTTP round trips.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// `Transport` backed by a pooled `reqwest::Client`.
///
/// The timeout and cookie store are fixed when the client is built; default
/// headers are not set here because `ApiClient` already merges them into
/// every request.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .cookie_store(config.include_credentials)
            .build()
            .map_err(|e| ApiError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }

    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

fn method(m: HttpMethod) -> Method {
    match m {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Patch => Method::PATCH,
        HttpMethod::Delete => Method::DELETE,
        HttpMethod::Head => Method::HEAD,
    }
}

fn header_map(headers: &[(String, String)]) -> Result<HeaderMap, TransportError> {
    let mut map = HeaderMap::new();
    for (name, value) in headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| TransportError::Other(format!("invalid header name {name:?}: {e}")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| TransportError::Other(format!("invalid header value for {name}: {e}")))?;
        map.append(name, value);
    }
    Ok(map)
}

fn multipart_form(body: MultipartBody) -> Result<Form, TransportError> {
    let mut form = Form::new();
    for (name, part) in body.parts() {
        form = match part {
            Part::Text(text) => form.text(name.clone(), text.clone()),
            Part::File {
                bytes,
                file_name,
                mime_type,
            } => {
                let mut file = FormPart::bytes(bytes.to_vec());
                if let Some(file_name) = file_name {
                    file = file.file_name(file_name.clone());
                }
                if let Some(mime) = mime_type {
                    file = file
                        .mime_str(mime)
                        .map_err(|e| TransportError::Other(format!("invalid MIME type {mime:?}: {e}")))?;
                }
                form.part(name.clone(), file)
            }
        };
    }
    Ok(form)
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut builder = self
            .client
            .request(method(request.method), &request.url)
            .headers(header_map(&request.headers)?);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        builder = match request.body {
            Some(HttpBody::Json(bytes)) => builder.body(bytes),
            Some(HttpBody::Multipart(form)) => builder.multipart(multipart_form(form)?),
            None => builder,
        };

        let mut response = builder.send().await?;
        let status = response.status().as_u16();
        if let (Some(limit), Some(actual)) = (request.max_content_length, response.content_length()) {
            if actual > limit {
                return Err(TransportError::ContentTooLarge { limit, actual });
            }
        }
        let headers = response
            .headers()
            .iter()
            .map(|(k, v)| (k.to_string(), String::from_utf8_lossy(v.as_bytes()).into_owned()))
            .collect();

        // Chunked bodies carry no length, so the limit is checked per chunk.
        let mut bytes = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            bytes.extend_from_slice(&chunk);
            if let Some(limit) = request.max_content_length {
                let actual = bytes.len() as u64;
                if actual > limit {
                    return Err(TransportError::ContentTooLarge { limit, actual });
                }
            }
        }

        Ok(HttpResponse {
            status,
            headers,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        })
    }
}
