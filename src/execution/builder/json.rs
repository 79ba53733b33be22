//! Encrypted JSON bodies: `{ "data": <envelope> }`.

use super::reject_media;
use crate::codec::PayloadCodec;
use crate::descriptor::OperationDescriptor;
use crate::error::ClientError;
use crate::types::{RequestInput, WireBody};
use serde_json::Value;

/// Encrypt the whole input as the sole body.
pub fn build_json(
    codec: &dyn PayloadCodec,
    descriptor: &OperationDescriptor,
    input: &RequestInput,
) -> Result<WireBody, ClientError> {
    reject_media(descriptor, input)?;
    let data = codec.encrypt(&Value::Object(input.fields().clone()))?;
    Ok(WireBody::Json { data })
}
