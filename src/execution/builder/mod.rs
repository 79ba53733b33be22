//! Request builder
//!
//! Turns a descriptor and caller input into a [`WireRequest`]. Building is
//! pure: no I/O, and the only failures are descriptor/input mismatches
//! (programmer errors) or a codec that refuses its key.

mod json;
mod multipart;
mod query;

pub use json::build_json;
pub use multipart::build_multipart;
pub use query::{build_query, is_truthy, query_value};

use crate::codec::PayloadCodec;
use crate::descriptor::{BodyKind, OperationDescriptor};
use crate::error::ClientError;
use crate::types::{RequestInput, WireBody, WireRequest};
use std::sync::Arc;

/// Builds wire requests with a shared codec and media base URL.
#[derive(Clone)]
pub struct RequestBuilder {
    codec: Arc<dyn PayloadCodec>,
    media_base_url: Option<String>,
}

impl RequestBuilder {
    pub fn new(codec: Arc<dyn PayloadCodec>) -> Self {
        Self {
            codec,
            media_base_url: None,
        }
    }

    /// Base URL used to recognize fully-qualified existing media URLs.
    pub fn with_media_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.media_base_url = Some(base_url.into());
        self
    }

    pub fn codec(&self) -> &Arc<dyn PayloadCodec> {
        &self.codec
    }

    pub fn build(
        &self,
        descriptor: &OperationDescriptor,
        input: &RequestInput,
    ) -> Result<WireRequest, ClientError> {
        descriptor.validate()?;
        let body = match descriptor.body() {
            BodyKind::None => {
                reject_media(descriptor, input)?;
                WireBody::Empty
            }
            BodyKind::Json => build_json(self.codec.as_ref(), descriptor, input)?,
            BodyKind::Query => {
                reject_media(descriptor, input)?;
                WireBody::Query(build_query(descriptor, input))
            }
            BodyKind::Multipart => build_multipart(
                self.codec.as_ref(),
                descriptor,
                input,
                self.media_base_url.as_deref(),
            )?,
        };
        Ok(WireRequest {
            descriptor: *descriptor,
            body,
        })
    }
}

impl std::fmt::Debug for RequestBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestBuilder")
            .field("media_base_url", &self.media_base_url)
            .finish_non_exhaustive()
    }
}

/// Binary media only fits in a multipart body.
pub(crate) fn reject_media(
    descriptor: &OperationDescriptor,
    input: &RequestInput,
) -> Result<(), ClientError> {
    if let Some(field) = input.media().keys().next() {
        return Err(ClientError::InvalidDescriptor(format!(
            "{}: media field '{field}' supplied to a {:?} operation",
            descriptor.name(),
            descriptor.body()
        )));
    }
    Ok(())
}
