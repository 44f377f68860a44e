//! Client configuration.

use std::time::Duration;

use crate::backoff::UploadRetryConfig;
use crate::error::{StudioError, StudioResult};

/// Default Studio API host.
pub const DEFAULT_BASE_URL: &str = "https://studio.skylabtech.ai";

/// Default API version used in request paths.
pub const DEFAULT_API_VERSION: &str = "1";

/// Client name sent in the `X-SLT-API-CLIENT` header.
pub const DEFAULT_CLIENT_NAME: &str = "rust";

/// Studio client configuration.
///
/// Owned by a single [`StudioClient`](crate::StudioClient) and never
/// modified after the client is built.
#[derive(Clone)]
pub struct StudioConfig {
    /// Scheme, host and optional port, without a trailing slash
    pub base_url: String,
    /// API version number placed in `/api/public/v{version}/`
    pub api_version: String,
    /// Account API key
    pub api_key: String,
    /// Client identifier prefix for the client header
    pub client_name: String,
    /// Emit request/response debug logs
    pub debug: bool,
    /// Request timeout
    pub timeout: Duration,
    /// Connect timeout
    pub connect_timeout: Duration,
    /// Upload retry policy
    pub upload_retry: UploadRetryConfig,
}

impl std::fmt::Debug for StudioConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StudioConfig")
            .field("base_url", &self.base_url)
            .field("api_version", &self.api_version)
            .field("api_key", &"[redacted]")
            .field("client_name", &self.client_name)
            .field("debug", &self.debug)
            .field("timeout", &self.timeout)
            .field("connect_timeout", &self.connect_timeout)
            .field("upload_retry", &self.upload_retry)
            .finish()
    }
}

impl StudioConfig {
    /// Create a config with default settings for the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            api_key: api_key.into(),
            client_name: DEFAULT_CLIENT_NAME.to_string(),
            debug: false,
            timeout: Duration::from_secs(60),
            connect_timeout: Duration::from_secs(10),
            upload_retry: UploadRetryConfig::default(),
        }
    }

    /// Create config from environment variables.
    pub fn from_env() -> StudioResult<Self> {
        let api_key = std::env::var("STUDIO_API_KEY")
            .map_err(|_| StudioError::config("STUDIO_API_KEY must be set"))?;

        let mut config = Self::new(api_key);

        if let Ok(url) = std::env::var("STUDIO_API_URL") {
            config = config.with_base_url(url);
        }
        if let Ok(version) = std::env::var("STUDIO_API_VERSION") {
            config.api_version = version;
        }
        config.debug = std::env::var("STUDIO_DEBUG")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);
        config.timeout = Duration::from_secs(
            std::env::var("STUDIO_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(60),
        );
        config.connect_timeout = Duration::from_secs(
            std::env::var("STUDIO_CONNECT_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10),
        );
        config.upload_retry = UploadRetryConfig::from_env();

        config.validate()?;
        Ok(config)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_upload_retry(mut self, upload_retry: UploadRetryConfig) -> Self {
        self.upload_retry = upload_retry;
        self
    }

    /// Reject configurations the client cannot work with.
    pub fn validate(&self) -> StudioResult<()> {
        if self.api_key.trim().is_empty() {
            return Err(StudioError::config("You must specify an api key"));
        }
        if self.base_url.is_empty() {
            return Err(StudioError::config("base url cannot be empty"));
        }
        url::Url::parse(&self.base_url)
            .map_err(|e| StudioError::config(format!("invalid base url {}: {}", self.base_url, e)))?;
        if self.upload_retry.max_attempts == 0 {
            return Err(StudioError::config("upload attempts must be at least 1"));
        }
        Ok(())
    }

    /// Value of the `X-SLT-API-CLIENT` header.
    pub fn client_header(&self) -> String {
        format!("{}-{}", self.client_name, env!("CARGO_PKG_VERSION"))
    }

    /// Resolve an endpoint to its full URL.
    pub fn endpoint_url(&self, endpoint: &str) -> String {
        format!(
            "{}/api/public/v{}/{}",
            self.base_url,
            self.api_version,
            endpoint.trim_start_matches('/')
        )
    }
}
