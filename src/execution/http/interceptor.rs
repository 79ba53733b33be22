//! HTTP Interceptor interfaces
//!
//! Interceptors can observe and tweak request builders before send, observe
//! responses, and be notified of errors. The hooks are best-effort and
//! should avoid expensive work.

use crate::error::ClientError;
use crate::types::WireRequest;
use reqwest::header::HeaderMap;

/// Context passed to interceptors describing the request.
#[derive(Clone, Debug)]
pub struct HttpRequestContext {
    pub request_id: String,
    pub operation: &'static str,
    pub url: String,
}

/// Generate a per-request id.
pub fn generate_request_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// HTTP interceptor trait
pub trait HttpInterceptor: Send + Sync {
    /// Called before sending a request. Interceptors may add headers or modify
    /// attributes on the request builder. Return the (possibly modified)
    /// builder or an error to short-circuit the request.
    fn on_before_send(
        &self,
        _ctx: &HttpRequestContext,
        builder: reqwest::RequestBuilder,
        _request: &WireRequest,
        _headers: &HeaderMap,
    ) -> Result<reqwest::RequestBuilder, ClientError> {
        Ok(builder)
    }

    /// Called after a response is received (only for successful responses).
    fn on_response(
        &self,
        _ctx: &HttpRequestContext,
        _response: &reqwest::Response,
    ) -> Result<(), ClientError> {
        Ok(())
    }

    /// Called when an error occurs during sending or classification.
    fn on_error(&self, _ctx: &HttpRequestContext, _error: &ClientError) {}
}

/// A simple logging interceptor backed by `tracing` (no sensitive data).
#[derive(Clone, Debug, Default)]
pub struct LoggingInterceptor;

impl HttpInterceptor for LoggingInterceptor {
    fn on_before_send(
        &self,
        ctx: &HttpRequestContext,
        builder: reqwest::RequestBuilder,
        request: &WireRequest,
        _headers: &HeaderMap,
    ) -> Result<reqwest::RequestBuilder, ClientError> {
        tracing::debug!(target: "vitrine::http", request_id=%ctx.request_id, operation=%ctx.operation, method=%request.descriptor.verb().as_str(), url=%ctx.url, "sending request");
        Ok(builder)
    }

    fn on_response(
        &self,
        ctx: &HttpRequestContext,
        response: &reqwest::Response,
    ) -> Result<(), ClientError> {
        tracing::debug!(target: "vitrine::http", request_id=%ctx.request_id, operation=%ctx.operation, status=%response.status().as_u16(), "response received");
        Ok(())
    }

    fn on_error(&self, ctx: &HttpRequestContext, error: &ClientError) {
        tracing::debug!(target: "vitrine::http", request_id=%ctx.request_id, operation=%ctx.operation, url=%ctx.url, err=%error, "request error");
    }
}
