//! reqwest-backed transport.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use url::Url;

use crate::api::errors::{ApiError, ApiResult};
use crate::api::{ApiRequest, ApiResponse, ApiTransport, Method};
use crate::models::config::DashboardConfig;
use crate::session::SessionStore;

/// Production transport. Attaches the session's bearer token to every
/// request and relies on the client timeout for hung connections.
pub struct ReqwestTransport {
    client: reqwest::Client,
    base_url: Url,
    session: Arc<dyn SessionStore>,
}

impl ReqwestTransport {
    pub fn new(
        base_url: &str,
        timeout: Duration,
        session: Arc<dyn SessionStore>,
    ) -> ApiResult<Self> {
        // A trailing slash keeps `Url::join` from dropping the last segment
        // of a base such as `https://host/api`.
        let base_url = if base_url.ends_with('/') {
            Url::parse(base_url)?
        } else {
            Url::parse(&format!("{base_url}/"))?
        };

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| ApiError::ClientBuild(err.to_string()))?;

        Ok(Self {
            client,
            base_url,
            session,
        })
    }

    pub fn from_config(config: &DashboardConfig, session: Arc<dyn SessionStore>) -> ApiResult<Self> {
        Self::new(
            &config.api_base_url,
            Duration::from_secs(config.request_timeout_secs),
            session,
        )
    }

    /// Absolute URL for a request, query string included.
    pub fn url_for(&self, request: &ApiRequest) -> ApiResult<Url> {
        let mut url = self.base_url.join(request.path.trim_start_matches('/'))?;
        url.set_query(request.encoded_query()?.as_deref());
        Ok(url)
    }

    fn builder(&self, method: Method, url: Url) -> reqwest::RequestBuilder {
        match method {
            Method::Get => self.client.get(url),
            Method::Post => self.client.post(url),
            Method::Put => self.client.put(url),
            Method::Delete => self.client.delete(url),
        }
    }
}

#[async_trait]
impl ApiTransport for ReqwestTransport {
    async fn send(&self, request: ApiRequest) -> ApiResult<ApiResponse> {
        let url = self.url_for(&request)?;
        log::debug!("{} {}", request.method, url);

        let mut builder = self.builder(request.method, url);
        if let Some(token) = self.session.token() {
            builder = builder.bearer_auth(token.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let bytes = response.bytes().await?;

        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|err| {
                log::debug!("Response body for status {status} is not JSON: {err}");
                Value::Null
            })
        };

        Ok(ApiResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::memory::MemorySessionStore;

    fn transport(base: &str) -> ReqwestTransport {
        ReqwestTransport::new(
            base,
            Duration::from_secs(5),
            Arc::new(MemorySessionStore::new()),
        )
        .unwrap()
    }

    #[test]
    fn joins_paths_under_base_prefix() {
        let transport = transport("https://inventory.example.com/api");
        let request = ApiRequest::get("/products/all")
            .query_param("page", 2)
            .query_param("page_size", 20);

        let url = transport.url_for(&request).unwrap();
        assert_eq!(
            url.as_str(),
            "https://inventory.example.com/api/products/all?page=2&page_size=20"
        );
    }

    #[test]
    fn omits_empty_query() {
        let transport = transport("https://inventory.example.com/");
        let url = transport
            .url_for(&ApiRequest::delete("/branches/delete/4"))
            .unwrap();
        assert_eq!(url.as_str(), "https://inventory.example.com/branches/delete/4");
    }

    #[test]
    fn rejects_invalid_base() {
        let result = ReqwestTransport::new(
            "not a url",
            Duration::from_secs(1),
            Arc::new(MemorySessionStore::new()),
        );
        assert!(matches!(result, Err(ApiError::InvalidUrl(_))));
    }
}
