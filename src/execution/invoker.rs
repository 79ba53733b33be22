//! Invoker
//!
//! The single pipeline behind every operation:
//! `Building -> Sending -> Unwrapping -> Done | Failed`.
//!
//! Each invocation is one linear pass. The token is read when the call
//! starts; authenticated operations without one fail in `Building` and never
//! touch the network. Failures are logged with the operation name and stage,
//! then returned exactly as produced. There is no retry, no queue and no
//! coordination between concurrent invocations.

use crate::codec::PayloadCodec;
use crate::defaults;
use crate::descriptor::{OperationDescriptor, ResponseKind};
use crate::error::ClientError;
use crate::execution::builder::RequestBuilder;
use crate::execution::http::{ResponseBody, Transport};
use crate::session::{SessionContext, SessionStore};
use crate::types::{RequestInput, WireRequest, json_type_name};
use bytes::Bytes;
use serde_json::Value;
use std::sync::Arc;

/// Where an invocation was when it ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvokeStage {
    Building,
    Sending,
    Unwrapping,
}

impl InvokeStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvokeStage::Building => "building",
            InvokeStage::Sending => "sending",
            InvokeStage::Unwrapping => "unwrapping",
        }
    }
}

impl std::fmt::Display for InvokeStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Successful result of an invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum InvokeOutput {
    /// Decrypted `response.data.data`
    Json(Value),
    /// Untouched body of a binary operation
    Binary(Bytes),
}

impl InvokeOutput {
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            InvokeOutput::Json(v) => Some(v),
            InvokeOutput::Binary(_) => None,
        }
    }

    pub fn into_json(self) -> Result<Value, ClientError> {
        match self {
            InvokeOutput::Json(v) => Ok(v),
            InvokeOutput::Binary(_) => Err(ClientError::Decode(
                "Expected a JSON payload, got a binary body".to_string(),
            )),
        }
    }

    pub fn into_bytes(self) -> Result<Bytes, ClientError> {
        match self {
            InvokeOutput::Binary(b) => Ok(b),
            InvokeOutput::Json(_) => Err(ClientError::Decode(
                "Expected a binary body, got a JSON payload".to_string(),
            )),
        }
    }
}

/// Composes builder, transport and codec into one call.
#[derive(Clone)]
pub struct Invoker {
    builder: RequestBuilder,
    transport: Arc<dyn Transport>,
    session: SessionStore,
}

impl Invoker {
    pub fn new(builder: RequestBuilder, transport: Arc<dyn Transport>, session: SessionStore) -> Self {
        Self {
            builder,
            transport,
            session,
        }
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn builder(&self) -> &RequestBuilder {
        &self.builder
    }

    /// Run an operation with the token currently in the session store.
    pub async fn invoke(
        &self,
        descriptor: &OperationDescriptor,
        input: &RequestInput,
    ) -> Result<InvokeOutput, ClientError> {
        let session = match self.session.context().await {
            Ok(session) => session,
            Err(e) => return Err(fail(descriptor, InvokeStage::Building, e)),
        };
        self.run(&session, descriptor, input).await
    }

    /// Run an operation with an explicit session snapshot.
    pub async fn run(
        &self,
        session: &SessionContext,
        descriptor: &OperationDescriptor,
        input: &RequestInput,
    ) -> Result<InvokeOutput, ClientError> {
        let wire = self
            .prepare(session, descriptor, input)
            .map_err(|e| fail(descriptor, InvokeStage::Building, e))?;

        let response = self
            .transport
            .send(&wire, session.token())
            .await
            .map_err(|e| fail(descriptor, InvokeStage::Sending, e))?;

        let output = unwrap_response(self.builder.codec().as_ref(), descriptor, response.body)
            .map_err(|e| fail(descriptor, InvokeStage::Unwrapping, e))?;

        tracing::debug!(target: "vitrine::invoke", operation = %descriptor.name(), status = response.status, "operation completed");
        Ok(output)
    }

    fn prepare(
        &self,
        session: &SessionContext,
        descriptor: &OperationDescriptor,
        input: &RequestInput,
    ) -> Result<WireRequest, ClientError> {
        if descriptor.requires_auth() {
            session.require()?;
        }
        self.builder.build(descriptor, input)
    }
}

impl std::fmt::Debug for Invoker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Invoker")
            .field("builder", &self.builder)
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

/// Log a terminal failure and hand the error back untouched.
fn fail(descriptor: &OperationDescriptor, stage: InvokeStage, error: ClientError) -> ClientError {
    tracing::warn!(
        target: "vitrine::invoke",
        operation = %descriptor.name(),
        stage = %stage,
        kind = %error.kind(),
        error = %error,
        "operation failed"
    );
    error
}

fn unwrap_response(
    codec: &dyn PayloadCodec,
    descriptor: &OperationDescriptor,
    body: ResponseBody,
) -> Result<InvokeOutput, ClientError> {
    match (descriptor.response(), body) {
        (ResponseKind::Binary, ResponseBody::Binary(bytes)) => Ok(InvokeOutput::Binary(bytes)),
        (ResponseKind::Envelope, ResponseBody::Json(json)) => {
            unwrap_envelope(codec, &json).map(InvokeOutput::Json)
        }
        (expected, _) => Err(ClientError::Decode(format!(
            "Transport returned the wrong body shape for a {expected:?} response"
        ))),
    }
}

/// Decrypt `response.data.data`.
pub fn unwrap_envelope(codec: &dyn PayloadCodec, response: &Value) -> Result<Value, ClientError> {
    let field = defaults::wire::ENVELOPE_FIELD;
    let envelope = response
        .get(field)
        .and_then(|outer| outer.get(field))
        .ok_or_else(|| ClientError::Decode("Response has no data.data envelope".to_string()))?;
    match envelope {
        Value::String(text) => codec.decrypt(text),
        other => Err(ClientError::Decode(format!(
            "Envelope must be a string, got {}",
            json_type_name(other)
        ))),
    }
}
