//! Transport seam between the controllers and the REST backend.
//!
//! Controllers only ever see [`ApiTransport`]; the production implementation
//! is [`http::ReqwestTransport`], tests use the doubles in `mock` and
//! `testing`.

use std::fmt::{Display, Formatter};

use async_trait::async_trait;
use serde_json::Value;

use crate::api::errors::{ApiError, ApiResult};
use crate::domain::types::EntityId;

pub mod errors;
pub mod http;
#[cfg(any(test, feature = "test-mocks"))]
pub mod mock;
#[cfg(test)]
pub mod testing;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Display for Method {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        })
    }
}

/// A request relative to the API base URL.
#[derive(Clone, Debug, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::Put, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    #[must_use]
    pub fn query_param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    #[must_use]
    pub fn query_pairs(mut self, pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        self.query.extend(pairs);
        self
    }

    #[must_use]
    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Value of the first query parameter named `key`.
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// URL-encoded query string, `None` when there are no parameters.
    pub fn encoded_query(&self) -> ApiResult<Option<String>> {
        if self.query.is_empty() {
            return Ok(None);
        }
        serde_html_form::to_string(&self.query)
            .map(Some)
            .map_err(|err| ApiError::Encoding(err.to_string()))
    }
}

/// Status and decoded JSON body of a completed exchange.
#[derive(Clone, Debug, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    pub fn ok(body: Value) -> Self {
        Self::new(200, body)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Authentication failures route to the session-expiry path.
    pub fn is_unauthorized(&self) -> bool {
        self.status == 401 || self.status == 403
    }

    /// `message` field of the body, if the server sent one.
    pub fn message(&self) -> Option<&str> {
        self.body
            .get("message")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|m| !m.is_empty())
    }
}

/// Sends requests to the backend.
#[async_trait]
pub trait ApiTransport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> ApiResult<ApiResponse>;
}

/// Endpoint paths of one collection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Endpoint {
    base: String,
}

impl Endpoint {
    pub fn new(base: impl Into<String>) -> Self {
        let base = base.into();
        let base = base.trim_matches('/');
        Self {
            base: format!("/{base}"),
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn list(&self) -> String {
        format!("{}/all", self.base)
    }

    pub fn create(&self) -> String {
        format!("{}/create", self.base)
    }

    pub fn update(&self) -> String {
        format!("{}/update", self.base)
    }

    pub fn delete(&self, id: &EntityId) -> String {
        format!("{}/delete/{}", self.base, id)
    }
}

impl From<crate::domain::resource::Resource> for Endpoint {
    fn from(resource: crate::domain::resource::Resource) -> Self {
        Endpoint::new(resource.path())
    }
}
