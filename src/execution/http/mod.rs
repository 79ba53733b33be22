//! HTTP Utilities
//!
//! This module contains the transport and its helpers:
//! - Header building
//! - HTTP interceptors
//! - The `Transport` seam and its `reqwest` implementation

pub mod headers;
pub mod interceptor;
pub mod transport;

pub use headers::HttpHeaderBuilder;
pub use interceptor::{HttpInterceptor, HttpRequestContext, LoggingInterceptor};
pub use transport::{HttpTransport, ResponseBody, Transport, TransportResponse};
