//! Multipart bodies: one encrypted `data` part plus reconciled media parts.
//!
//! For each declared media field, existing keys go out as repeated text
//! parts under the field's urls name and new files as repeated binary parts
//! under the field name. Fields that resolve to nothing add no parts, and
//! media fields never leak into the encrypted `data` blob.

use crate::codec::PayloadCodec;
use crate::descriptor::OperationDescriptor;
use crate::error::ClientError;
use crate::media::{reconcile, reconcile_json};
use crate::types::{NamedPart, RequestInput, WireBody};
use serde_json::Value;

pub fn build_multipart(
    codec: &dyn PayloadCodec,
    descriptor: &OperationDescriptor,
    input: &RequestInput,
    media_base_url: Option<&str>,
) -> Result<WireBody, ClientError> {
    if let Some(undeclared) = input
        .media()
        .keys()
        .find(|name| descriptor.media_field(name).is_none())
    {
        return Err(ClientError::InvalidDescriptor(format!(
            "{}: media field '{undeclared}' is not declared",
            descriptor.name()
        )));
    }

    let mut fields = input.fields().clone();
    let mut parts = Vec::new();

    for spec in descriptor.media_fields() {
        let as_json = fields.remove(spec.name());
        let reconciled = match input.media().get(spec.name()) {
            Some(value) => reconcile(Some(value), media_base_url),
            None => as_json
                .map(|v| reconcile_json(&v, media_base_url))
                .unwrap_or_default(),
        };

        let urls_name = spec.urls_field_name();
        parts.extend(
            reconciled
                .existing_keys
                .into_iter()
                .map(|key| NamedPart::text(urls_name.as_ref(), key)),
        );
        parts.extend(
            reconciled
                .new_files
                .into_iter()
                .map(|file| NamedPart::file(spec.name(), file)),
        );
    }

    let data = codec.encrypt(&Value::Object(fields))?;
    Ok(WireBody::Multipart { data, parts })
}
