//! Client configuration
//!
//! ```rust,ignore
//! let config = ClientConfig::new("https://api.shop.test")
//!     .with_media_base_url("https://cdn.shop.test")
//!     .with_shared_secret(secret_b64)
//!     .with_logging();
//! ```
//!
//! Secret resolution is explicit value, then `VITRINE_SHARED_SECRET`, then
//! a configuration error.

use crate::codec::XChaChaCodec;
use crate::defaults;
use crate::error::ClientError;
use crate::execution::http::{HttpHeaderBuilder, HttpInterceptor, LoggingInterceptor};
use reqwest::header::HeaderMap;
use secrecy::{ExposeSecret, SecretString};
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Clone)]
pub struct ClientConfig {
    /// Backend origin, e.g. `https://api.shop.test`
    pub base_url: String,
    /// Origin of stored media; falls back to `base_url`
    pub media_base_url: Option<String>,
    /// Base64 of the 32-byte envelope key
    pub shared_secret: Option<SecretString>,
    /// Storage key the bearer token lives under
    pub token_key: String,
    pub user_agent: String,
    /// Extra headers sent with every request
    pub headers: HashMap<String, String>,
    /// Custom HTTP client (timeouts, proxies, TLS)
    pub http_client: Option<reqwest::Client>,
    pub interceptors: Vec<Arc<dyn HttpInterceptor>>,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            media_base_url: None,
            shared_secret: None,
            token_key: defaults::session::TOKEN_KEY.to_string(),
            user_agent: defaults::http::USER_AGENT.to_string(),
            headers: HashMap::new(),
            http_client: None,
            interceptors: Vec::new(),
        }
    }

    /// Build from `VITRINE_*` environment variables.
    pub fn from_env() -> Result<Self, ClientError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub(crate) fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ClientError> {
        let read = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let base_url = read(defaults::env::BASE_URL).ok_or_else(|| {
            ClientError::Configuration(format!(
                "Base URL is required (missing {})",
                defaults::env::BASE_URL
            ))
        })?;
        let mut config = Self::new(base_url);
        if let Some(media) = read(defaults::env::MEDIA_BASE_URL) {
            config = config.with_media_base_url(media);
        }
        if let Some(secret) = read(defaults::env::SHARED_SECRET) {
            config = config.with_shared_secret(secret);
        }
        if let Some(key) = read(defaults::env::TOKEN_KEY) {
            config = config.with_token_key(key);
        }
        Ok(config)
    }

    pub fn with_media_base_url(mut self, media_base_url: impl Into<String>) -> Self {
        self.media_base_url = Some(media_base_url.into());
        self
    }

    pub fn with_shared_secret(mut self, secret: impl Into<String>) -> Self {
        self.shared_secret = Some(SecretString::from(secret.into()));
        self
    }

    pub fn with_token_key(mut self, token_key: impl Into<String>) -> Self {
        self.token_key = token_key.into();
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }

    pub fn with_http_interceptor(mut self, interceptor: Arc<dyn HttpInterceptor>) -> Self {
        self.interceptors.push(interceptor);
        self
    }

    /// Shorthand for adding a [`LoggingInterceptor`].
    pub fn with_logging(self) -> Self {
        self.with_http_interceptor(Arc::new(LoggingInterceptor))
    }

    /// Media origin used to recognize fully-qualified existing media URLs.
    pub fn resolved_media_base_url(&self) -> &str {
        self.media_base_url.as_deref().unwrap_or(&self.base_url)
    }

    pub fn validate(&self) -> Result<(), ClientError> {
        let base = self.base_url.trim();
        if base.is_empty() {
            return Err(ClientError::Configuration("Base URL cannot be empty".to_string()));
        }
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(ClientError::Configuration(format!(
                "Base URL must start with http:// or https://, got '{base}'"
            )));
        }
        if self.token_key.trim().is_empty() {
            return Err(ClientError::Configuration("Token key cannot be empty".to_string()));
        }
        Ok(())
    }

    /// Build the envelope codec from the shared secret.
    pub fn build_codec(&self) -> Result<XChaChaCodec, ClientError> {
        self.build_codec_with(|name| std::env::var(name).ok())
    }

    pub(crate) fn build_codec_with(
        &self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<XChaChaCodec, ClientError> {
        if let Some(secret) = &self.shared_secret {
            return XChaChaCodec::from_base64_key(secret.expose_secret());
        }
        match lookup(defaults::env::SHARED_SECRET).filter(|v| !v.trim().is_empty()) {
            Some(secret) => XChaChaCodec::from_base64_key(&secret),
            None => Err(ClientError::Configuration(format!(
                "Shared secret is required (missing {} or explicit .with_shared_secret())",
                defaults::env::SHARED_SECRET
            ))),
        }
    }

    /// Headers sent with every request, before the bearer token.
    pub fn default_headers(&self) -> Result<HeaderMap, ClientError> {
        Ok(HttpHeaderBuilder::new()
            .with_user_agent(&self.user_agent)?
            .with_custom_headers(&self.headers)?
            .build())
    }

    pub fn build_http_client(&self) -> Result<reqwest::Client, ClientError> {
        match &self.http_client {
            Some(client) => Ok(client.clone()),
            None => reqwest::Client::builder().build().map_err(|e| {
                ClientError::Configuration(format!("Failed to build HTTP client: {e}"))
            }),
        }
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("media_base_url", &self.media_base_url)
            .field("shared_secret", &self.shared_secret.as_ref().map(|_| "[REDACTED]"))
            .field("token_key", &self.token_key)
            .field("user_agent", &self.user_agent)
            .field("headers", &self.headers.keys().collect::<Vec<_>>())
            .field("interceptors", &self.interceptors.len())
            .finish_non_exhaustive()
    }
}
