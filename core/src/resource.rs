//! Thin per-resource helper over `ApiClient`.
//!
//! Paths follow `v1/<resource>[/<id>][/<subresource>]`. Every method uses
//! default call options; use the client's verb methods directly when a call
//! needs `raw` or skipped transformations.

use std::fmt::Display;

use crate::body::RequestBody;
use crate::client::ApiClient;
use crate::error::ApiError;
use crate::options::{CallOptions, Payload, QueryValue};
use crate::transform::Reply;
use crate::transport::Transport;

pub const API_VERSION: &str = "v1";

/// One REST collection, e.g. `products` or `orders`.
#[derive(Debug)]
pub struct Resource<'a, T> {
    client: &'a ApiClient<T>,
    name: String,
}

impl<'a, T> Resource<'a, T> {
    pub(crate) fn new(client: &'a ApiClient<T>, name: &str) -> Self {
        Self {
            client,
            name: name.trim_matches('/').to_string(),
        }
    }

    /// `v1/<resource>`
    pub fn collection_path(&self) -> String {
        format!("{API_VERSION}/{}", self.name)
    }

    /// `v1/<resource>/<id>`
    pub fn item_path(&self, id: impl Display) -> String {
        format!("{API_VERSION}/{}/{id}", self.name)
    }

    /// `v1/<resource>/<id>/<subresource>`
    pub fn nested(&self, id: impl Display, subresource: &str) -> String {
        format!("{API_VERSION}/{}/{id}/{}", self.name, subresource.trim_matches('/'))
    }
}

impl<T: Transport> Resource<'_, T> {
    pub async fn list(&self, params: Vec<(String, QueryValue)>) -> Result<Reply, ApiError> {
        let payload = Payload {
            params,
            ..Payload::default()
        };
        self.client
            .get(&self.collection_path(), payload, CallOptions::default())
            .await
    }

    pub async fn get(&self, id: impl Display) -> Result<Reply, ApiError> {
        self.client
            .get(&self.item_path(id), Payload::new(), CallOptions::default())
            .await
    }

    pub async fn create(&self, body: impl Into<RequestBody>) -> Result<Reply, ApiError> {
        self.client
            .post(&self.collection_path(), Payload::new().data(body), CallOptions::default())
            .await
    }

    pub async fn update(&self, id: impl Display, body: impl Into<RequestBody>) -> Result<Reply, ApiError> {
        self.client
            .put(&self.item_path(id), Payload::new().data(body), CallOptions::default())
            .await
    }

    pub async fn patch(&self, id: impl Display, body: impl Into<RequestBody>) -> Result<Reply, ApiError> {
        self.client
            .patch(&self.item_path(id), Payload::new().data(body), CallOptions::default())
            .await
    }

    pub async fn remove(&self, id: impl Display) -> Result<Reply, ApiError> {
        self.client
            .delete(&self.item_path(id), Payload::new(), CallOptions::default())
            .await
    }

    /// POST to a sub-resource, e.g. `v1/users/7/avatar`.
    pub async fn post_nested(
        &self,
        id: impl Display,
        subresource: &str,
        body: impl Into<RequestBody>,
    ) -> Result<Reply, ApiError> {
        self.client
            .post(
                &self.nested(id, subresource),
                Payload::new().data(body),
                CallOptions::default(),
            )
            .await
    }
}
