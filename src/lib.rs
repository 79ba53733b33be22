//! vitrine
//!
//! Encrypted transport for storefront-management backends.
//!
//! Every call goes through one pipeline: an [`OperationDescriptor`] says
//! where and how to send, the request builder encrypts the payload into an
//! envelope (or a query string, or a multipart form with reconciled media),
//! the transport sends it with the bearer token read fresh from the
//! [`SessionStore`], and the invoker decrypts `response.data.data`.
//!
//! ```rust,ignore
//! use vitrine::{ClientConfig, MemoryStore, RequestInput, StorefrontClient, catalog};
//!
//! let client = StorefrontClient::new(ClientConfig::from_env()?, MemoryStore::shared())?;
//! client
//!     .sign_in(RequestInput::from_value(&json!({"email": email, "password": password}))?)
//!     .await?;
//! let page = client
//!     .invoke(&catalog::products::LIST, RequestInput::new().with_field("status", "active"))
//!     .await?;
//! ```
#![deny(unsafe_code)]

pub mod catalog;
pub mod client;
pub mod codec;
pub mod config;
pub mod defaults;
pub mod descriptor;
pub mod error;
pub mod execution;
pub mod media;
pub mod observability;
pub mod session;
pub mod types;
pub mod utils;

pub use client::StorefrontClient;
pub use codec::{EncryptedEnvelope, PayloadCodec, XChaChaCodec};
pub use config::ClientConfig;
pub use descriptor::{
    AuthRequirement, BodyKind, HttpVerb, MediaFieldSpec, OperationDescriptor, ResponseKind,
};
pub use error::{ClientError, ErrorKind};
pub use execution::http::{HttpInterceptor, HttpTransport, LoggingInterceptor, Transport};
pub use execution::invoker::{InvokeOutput, InvokeStage, Invoker};
pub use media::{Reconciled, reconcile};
pub use session::{AuthToken, FileStore, KeyValueStore, MemoryStore, SessionContext, SessionStore};
pub use types::{
    FileHandle, MediaItem, MediaValue, NamedPart, PartContent, RequestInput, WireBody, WireRequest,
};
