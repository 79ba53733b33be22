//! Request and wire data types.

use crate::codec::EncryptedEnvelope;
use crate::defaults;
use crate::descriptor::OperationDescriptor;
use crate::error::ClientError;
use bytes::Bytes;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::Path;

/// A new file to upload.
#[derive(Debug, Clone, PartialEq)]
pub struct FileHandle {
    pub name: String,
    pub mime_type: Option<String>,
    pub content: Bytes,
    /// Local or remote location the file came from. Never used to classify
    /// the item: binary content always makes it a new file.
    pub uri: Option<String>,
}

impl FileHandle {
    pub fn new(name: impl Into<String>, content: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            mime_type: None,
            content: content.into(),
            uri: None,
        }
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    pub fn with_uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = Some(uri.into());
        self
    }

    /// Read a file from disk; the name is the path's file name.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, ClientError> {
        let path = path.as_ref();
        let content = tokio::fs::read(path).await.map_err(|e| {
            ClientError::Storage(format!("Cannot read {}: {e}", path.display()))
        })?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        Ok(Self::new(name, content).with_uri(path.to_string_lossy().into_owned()))
    }

    /// Declared MIME type, else one sniffed from content or name.
    pub fn resolved_mime(&self) -> String {
        match &self.mime_type {
            Some(m) if !m.trim().is_empty() => m.clone(),
            _ => crate::utils::mime::guess_mime(Some(&self.content), Some(&self.name)),
        }
    }
}

/// One entry of a media field.
#[derive(Debug, Clone, PartialEq)]
pub enum MediaItem {
    /// URL or storage key of an already-uploaded asset
    Existing(String),
    /// Binary content to upload
    NewFile(FileHandle),
}

impl From<&str> for MediaItem {
    fn from(value: &str) -> Self {
        MediaItem::Existing(value.to_string())
    }
}

impl From<String> for MediaItem {
    fn from(value: String) -> Self {
        MediaItem::Existing(value)
    }
}

impl From<FileHandle> for MediaItem {
    fn from(value: FileHandle) -> Self {
        MediaItem::NewFile(value)
    }
}

/// Raw value of a media field: one item or a list of them.
#[derive(Debug, Clone, PartialEq)]
pub enum MediaValue {
    Single(MediaItem),
    List(Vec<MediaItem>),
}

impl MediaValue {
    pub fn items(&self) -> &[MediaItem] {
        match self {
            MediaValue::Single(item) => std::slice::from_ref(item),
            MediaValue::List(items) => items,
        }
    }
}

impl From<MediaItem> for MediaValue {
    fn from(value: MediaItem) -> Self {
        MediaValue::Single(value)
    }
}

impl From<&str> for MediaValue {
    fn from(value: &str) -> Self {
        MediaValue::Single(value.into())
    }
}

impl From<String> for MediaValue {
    fn from(value: String) -> Self {
        MediaValue::Single(value.into())
    }
}

impl From<FileHandle> for MediaValue {
    fn from(value: FileHandle) -> Self {
        MediaValue::Single(value.into())
    }
}

impl From<Vec<MediaItem>> for MediaValue {
    fn from(value: Vec<MediaItem>) -> Self {
        MediaValue::List(value)
    }
}

impl<T: Into<MediaItem>> FromIterator<T> for MediaValue {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        MediaValue::List(iter.into_iter().map(Into::into).collect())
    }
}

/// Caller-supplied data for one invocation.
///
/// Plain fields are JSON; media fields may carry binary files and live in a
/// separate map. String-only media may also be passed as plain fields under
/// the media field's name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestInput {
    fields: Map<String, Value>,
    media: BTreeMap<String, MediaValue>,
}

impl RequestInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(fields: Map<String, Value>) -> Self {
        Self {
            fields,
            media: BTreeMap::new(),
        }
    }

    /// Build from any value that serializes to a JSON object (or null).
    pub fn from_value<T: Serialize + ?Sized>(value: &T) -> Result<Self, ClientError> {
        match serde_json::to_value(value).map_err(|e| {
            ClientError::Configuration(format!("Request input is not serializable: {e}"))
        })? {
            Value::Object(map) => Ok(Self::from_map(map)),
            Value::Null => Ok(Self::new()),
            other => Err(ClientError::Configuration(format!(
                "Request input must be a JSON object, got {}",
                json_type_name(&other)
            ))),
        }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn with_media(mut self, field: impl Into<String>, value: impl Into<MediaValue>) -> Self {
        self.media.insert(field.into(), value.into());
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn media(&self) -> &BTreeMap<String, MediaValue> {
        &self.media
    }

    pub fn into_parts(self) -> (Map<String, Value>, BTreeMap<String, MediaValue>) {
        (self.fields, self.media)
    }
}

impl From<Map<String, Value>> for RequestInput {
    fn from(fields: Map<String, Value>) -> Self {
        Self::from_map(fields)
    }
}

/// Content of one multipart part.
#[derive(Debug, Clone, PartialEq)]
pub enum PartContent {
    Text(String),
    File(FileHandle),
}

/// A multipart part with its form field name.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedPart {
    pub name: String,
    pub content: PartContent,
}

impl NamedPart {
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: PartContent::Text(value.into()),
        }
    }

    pub fn file(name: impl Into<String>, file: FileHandle) -> Self {
        Self {
            name: name.into(),
            content: PartContent::File(file),
        }
    }
}

/// Body of a fully built request.
#[derive(Debug, Clone, PartialEq)]
pub enum WireBody {
    Empty,
    Json {
        data: EncryptedEnvelope,
    },
    /// Query string without the leading `?`
    Query(String),
    Multipart {
        data: EncryptedEnvelope,
        parts: Vec<NamedPart>,
    },
}

impl WireBody {
    /// The JSON document sent for `Json` bodies: `{ "data": <envelope> }`.
    pub fn json_document(&self) -> Option<Value> {
        match self {
            WireBody::Json { data } => {
                let mut doc = Map::new();
                doc.insert(
                    defaults::wire::ENVELOPE_FIELD.to_string(),
                    Value::String(data.as_str().to_string()),
                );
                Some(Value::Object(doc))
            }
            _ => None,
        }
    }

    /// Media parts with the given name, in order. Empty for non-multipart.
    pub fn parts_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a NamedPart> + 'a {
        let parts: &[NamedPart] = match self {
            WireBody::Multipart { parts, .. } => parts,
            _ => &[],
        };
        parts.iter().filter(move |p| p.name == name)
    }
}

/// A request ready for transport.
#[derive(Debug, Clone, PartialEq)]
pub struct WireRequest {
    pub descriptor: OperationDescriptor,
    pub body: WireBody,
}

impl WireRequest {
    /// Path plus query string, relative to the base URL.
    pub fn path_and_query(&self) -> String {
        match &self.body {
            WireBody::Query(q) if !q.is_empty() => format!("{}?{q}", self.descriptor.path()),
            _ => self.descriptor.path().to_string(),
        }
    }
}

pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
