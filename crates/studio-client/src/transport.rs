//! Studio HTTP transport.
//!
//! Builds authenticated requests against `/api/public/v{version}/`, sends
//! them, and turns non-success responses into [`StudioError::Server`].

use std::fmt;
use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::backoff::{Backoff, FixedDelay};
use crate::config::StudioConfig;
use crate::error::{StudioError, StudioResult};

/// API key header.
pub const API_HEADER_KEY: &str = "X-SLT-API-KEY";

/// Client identifier header.
pub const API_HEADER_CLIENT: &str = "X-SLT-API-CLIENT";

/// HTTP method of an API request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    /// Whether a request with this method carries its body.
    ///
    /// GET, PUT, POST and PATCH send the body whenever there is one;
    /// DELETE never does.
    pub fn sends_body(&self) -> bool {
        !matches!(self, HttpMethod::Delete)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }

    fn as_reqwest(&self) -> Method {
        match self {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Patch => Method::PATCH,
            HttpMethod::Delete => Method::DELETE,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single API call, built per request.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub endpoint: String,
    pub method: HttpMethod,
    /// JSON body, serialized before sending
    pub payload: Option<Value>,
    /// Raw body used when no payload is set
    pub data: Option<String>,
    pub query: Vec<(String, String)>,
}

impl ApiRequest {
    pub fn new(method: HttpMethod, endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            method,
            payload: None,
            data: None,
            query: Vec::new(),
        }
    }

    pub fn get(endpoint: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, endpoint)
    }

    pub fn post(endpoint: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, endpoint)
    }

    pub fn put(endpoint: impl Into<String>) -> Self {
        Self::new(HttpMethod::Put, endpoint)
    }

    pub fn patch(endpoint: impl Into<String>) -> Self {
        Self::new(HttpMethod::Patch, endpoint)
    }

    pub fn delete(endpoint: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, endpoint)
    }

    /// Attach a JSON payload.
    pub fn payload<P: Serialize + ?Sized>(mut self, payload: &P) -> StudioResult<Self> {
        self.payload = Some(serde_json::to_value(payload)?);
        Ok(self)
    }

    /// Attach a raw body, used only when there is no JSON payload.
    pub fn data(mut self, data: impl Into<String>) -> Self {
        self.data = Some(data.into());
        self
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Serialized body. Empty payloads (`null`, `{}`, `[]`) fall back to `data`.
    pub fn body(&self) -> StudioResult<Option<String>> {
        let payload = match &self.payload {
            None | Some(Value::Null) => None,
            Some(Value::Object(map)) if map.is_empty() => None,
            Some(Value::Array(items)) if items.is_empty() => None,
            Some(value) => Some(serde_json::to_string(value)?),
        };
        Ok(payload.or_else(|| self.data.clone()))
    }
}

/// Studio API client.
///
/// Holds immutable configuration and a pooled HTTP client; clones share
/// the pool.
#[derive(Clone)]
pub struct StudioClient {
    pub(crate) http: Client,
    pub(crate) config: Arc<StudioConfig>,
    pub(crate) backoff: Arc<dyn Backoff>,
}

impl fmt::Debug for StudioClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StudioClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl StudioClient {
    /// Create a new Studio client.
    pub fn new(config: StudioConfig) -> StudioResult<Self> {
        config.validate()?;

        let http = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(concat!("studio-client/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(StudioError::Transport)?;

        if config.debug {
            debug!(base_url = %config.base_url, "Studio client debug enabled");
        }

        Ok(Self {
            http,
            config: Arc::new(config),
            backoff: Arc::new(FixedDelay),
        })
    }

    /// Create from environment variables.
    pub fn from_env() -> StudioResult<Self> {
        Self::new(StudioConfig::from_env()?)
    }

    /// Replace the strategy used to wait between upload attempts.
    pub fn with_backoff(mut self, backoff: Arc<dyn Backoff>) -> Self {
        self.backoff = backoff;
        self
    }

    pub fn config(&self) -> &StudioConfig {
        &self.config
    }

    fn build_request_headers(&self) -> StudioResult<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static("x-slt-api-key"),
            HeaderValue::from_str(&self.config.api_key)
                .map_err(|_| StudioError::config("api key contains invalid header characters"))?,
        );
        headers.insert(
            HeaderName::from_static("x-slt-api-client"),
            HeaderValue::from_str(&self.config.client_header())
                .map_err(|_| StudioError::config("client name contains invalid header characters"))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("text/plain"));
        Ok(headers)
    }

    /// Send an API request and parse the JSON response.
    ///
    /// An empty success body parses as `null`.
    pub async fn request<T: DeserializeOwned>(&self, req: ApiRequest) -> StudioResult<T> {
        let value = self.send(req).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Send an API request and return the raw JSON response.
    pub async fn send(&self, req: ApiRequest) -> StudioResult<Value> {
        let debug_enabled = self.config.debug;
        if debug_enabled {
            debug!(endpoint = %req.endpoint, method = %req.method, "Sending API request");
        }

        let headers = self.build_request_headers()?;
        if debug_enabled {
            debug!(
                api_key = "[redacted]",
                client = %self.config.client_header(),
                content_type = "application/json",
                accept = "text/plain",
                "headers"
            );
        }

        let path = self.config.endpoint_url(&req.endpoint);
        if debug_enabled {
            debug!(path = %path, query = ?req.query, "path");
        }

        let body = req.body()?;
        if debug_enabled {
            debug!(data = ?body, "data");
        }

        let mut builder = self
            .http
            .request(req.method.as_reqwest(), &path)
            .headers(headers);
        if !req.query.is_empty() {
            builder = builder.query(&req.query);
        }
        if let Some(body) = body {
            if req.method.sends_body() {
                builder = builder.body(body);
            }
        }

        let response = builder.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if debug_enabled {
            debug!(status = status.as_u16(), response = %text, "response");
        }

        if !status.is_success() {
            return Err(StudioError::from_http_status(status.as_u16(), &text));
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&text).map_err(|e| {
            StudioError::InvalidResponse(format!("{} {} returned non-JSON body: {}", req.method, path, e))
        })
    }
}
