//! HTTP transport
//!
//! Sends a built [`WireRequest`] with the bearer header attached and hands
//! back either the parsed JSON envelope or, for binary operations, the raw
//! bytes. Non-2xx replies become [`ClientError::Api`] with status and body
//! preserved. No retries and no timeout of its own: whatever the injected
//! `reqwest::Client` does is what happens.

use super::headers::HttpHeaderBuilder;
use super::interceptor::{HttpInterceptor, HttpRequestContext, generate_request_id};
use crate::descriptor::{HttpVerb, ResponseKind};
use crate::error::ClientError;
use crate::session::AuthToken;
use crate::types::{NamedPart, PartContent, WireBody, WireRequest};
use crate::utils::join_url;
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::HeaderMap;
use std::sync::Arc;

/// Body of a successful response.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Json(serde_json::Value),
    Binary(Bytes),
}

/// Transport-level response data.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: ResponseBody,
}

/// Performs the network call for one wire request.
#[async_trait]
pub trait Transport: Send + Sync {
    /// `token` is attached as `Authorization: Bearer <token>` when present.
    async fn send(
        &self,
        request: &WireRequest,
        token: Option<&AuthToken>,
    ) -> Result<TransportResponse, ClientError>;
}

/// `reqwest`-backed transport.
#[derive(Clone)]
pub struct HttpTransport {
    http_client: reqwest::Client,
    base_url: String,
    default_headers: HeaderMap,
    interceptors: Vec<Arc<dyn HttpInterceptor>>,
}

impl HttpTransport {
    pub fn new(http_client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http_client,
            base_url: base_url.into(),
            default_headers: HeaderMap::new(),
            interceptors: Vec::new(),
        }
    }

    pub fn with_default_headers(mut self, headers: HeaderMap) -> Self {
        self.default_headers = headers;
        self
    }

    pub fn with_interceptors(mut self, interceptors: Vec<Arc<dyn HttpInterceptor>>) -> Self {
        self.interceptors = interceptors;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn build_headers(&self, token: Option<&AuthToken>) -> Result<HeaderMap, ClientError> {
        let builder = HttpHeaderBuilder::from_headers(self.default_headers.clone());
        let builder = match token {
            Some(token) => builder.with_bearer_auth(token.expose())?,
            None => builder,
        };
        Ok(builder.build())
    }

    fn notify_error(&self, ctx: &HttpRequestContext, error: &ClientError) {
        for interceptor in &self.interceptors {
            interceptor.on_error(ctx, error);
        }
    }
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("base_url", &self.base_url)
            .field("interceptors", &self.interceptors.len())
            .finish_non_exhaustive()
    }
}

/// Multipart forms are not cloneable; build a fresh one per send.
fn build_form(
    data: &str,
    parts: &[NamedPart],
) -> Result<reqwest::multipart::Form, ClientError> {
    let mut form = reqwest::multipart::Form::new().text(
        crate::defaults::wire::DATA_PART,
        data.to_string(),
    );
    for part in parts {
        form = match &part.content {
            PartContent::Text(value) => form.text(part.name.clone(), value.clone()),
            PartContent::File(file) => {
                let mime = file.resolved_mime();
                let file_part = reqwest::multipart::Part::bytes(file.content.to_vec())
                    .file_name(file.name.clone())
                    .mime_str(&mime)
                    .map_err(|e| {
                        ClientError::Configuration(format!("Invalid MIME type '{mime}': {e}"))
                    })?;
                form.part(part.name.clone(), file_part)
            }
        };
    }
    Ok(form)
}

/// Pull a human-readable message out of an error body, if it has one.
fn error_message(status: reqwest::StatusCode, body: &str) -> String {
    let from_json = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("message")
                .or_else(|| v.get("error").and_then(|e| e.get("message")))
                .or_else(|| v.get("error"))
                .and_then(|m| m.as_str().map(str::to_string))
        });
    from_json
        .filter(|m| !m.is_empty())
        .or_else(|| status.canonical_reason().map(str::to_string))
        .unwrap_or_else(|| format!("HTTP {}", status.as_u16()))
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(
        &self,
        request: &WireRequest,
        token: Option<&AuthToken>,
    ) -> Result<TransportResponse, ClientError> {
        let descriptor = &request.descriptor;
        let url = join_url(&self.base_url, &request.path_and_query());
        let ctx = HttpRequestContext {
            request_id: generate_request_id(),
            operation: descriptor.name(),
            url: url.clone(),
        };

        // 1. Headers
        let headers = self.build_headers(token)?;

        // 2. Request
        let method = match descriptor.verb() {
            HttpVerb::Get => reqwest::Method::GET,
            HttpVerb::Post => reqwest::Method::POST,
        };
        let mut rb = self
            .http_client
            .request(method, &url)
            .headers(headers.clone());
        rb = match &request.body {
            WireBody::Empty | WireBody::Query(_) => rb,
            WireBody::Json { .. } => match request.body.json_document() {
                Some(doc) => rb.json(&doc),
                None => rb,
            },
            WireBody::Multipart { data, parts } => rb.multipart(build_form(data.as_str(), parts)?),
        };

        // 3. Interceptors
        for interceptor in &self.interceptors {
            rb = interceptor.on_before_send(&ctx, rb, request, &headers)?;
        }

        // 4. Send
        let resp = match rb.send().await {
            Ok(resp) => resp,
            Err(e) => {
                let error = ClientError::Http(e.to_string());
                self.notify_error(&ctx, &error);
                return Err(error);
            }
        };

        // 5. Classify failures
        let status = resp.status();
        if !status.is_success() {
            let body = resp
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error response".to_string());
            let error = ClientError::api_error(status.as_u16(), error_message(status, &body), body);
            self.notify_error(&ctx, &error);
            return Err(error);
        }

        for interceptor in &self.interceptors {
            interceptor.on_response(&ctx, &resp)?;
        }
        let response_headers = resp.headers().clone();

        // 6. Body
        let bytes = match resp.bytes().await {
            Ok(bytes) => bytes,
            Err(e) => {
                let error = ClientError::Http(format!("Failed to read response body: {e}"));
                self.notify_error(&ctx, &error);
                return Err(error);
            }
        };
        let body = match descriptor.response() {
            ResponseKind::Binary => ResponseBody::Binary(bytes),
            ResponseKind::Envelope => match serde_json::from_slice(&bytes) {
                Ok(json) => ResponseBody::Json(json),
                Err(e) => {
                    let error = ClientError::Decode(format!("Response body is not JSON: {e}"));
                    self.notify_error(&ctx, &error);
                    return Err(error);
                }
            },
        };

        Ok(TransportResponse {
            status: status.as_u16(),
            headers: response_headers,
            body,
        })
    }
}
