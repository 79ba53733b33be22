//! Storefront client facade
//!
//! Wires config, session store, codec, builder and transport into one
//! [`Invoker`] and adds the typed conveniences callers actually use.

use crate::catalog;
use crate::config::ClientConfig;
use crate::descriptor::{OperationDescriptor, ResponseKind};
use crate::error::ClientError;
use crate::execution::builder::RequestBuilder;
use crate::execution::http::{HttpTransport, Transport};
use crate::execution::invoker::{InvokeOutput, Invoker};
use crate::session::{AuthToken, KeyValueStore, SessionContext, SessionStore};
use crate::types::RequestInput;
use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

/// Field names a sign-in payload may carry the token under.
const TOKEN_FIELDS: &[&str] = &["token", "access_token", "accessToken"];

#[derive(Clone, Debug)]
pub struct StorefrontClient {
    invoker: Invoker,
}

impl StorefrontClient {
    /// Build a client that talks HTTP to `config.base_url`.
    pub fn new(config: ClientConfig, store: Arc<dyn KeyValueStore>) -> Result<Self, ClientError> {
        config.validate()?;
        let transport = HttpTransport::new(config.build_http_client()?, config.base_url.clone())
            .with_default_headers(config.default_headers()?)
            .with_interceptors(config.interceptors.clone());
        Self::with_transport(config, store, Arc::new(transport))
    }

    /// Build a client over a custom transport.
    pub fn with_transport(
        config: ClientConfig,
        store: Arc<dyn KeyValueStore>,
        transport: Arc<dyn Transport>,
    ) -> Result<Self, ClientError> {
        config.validate()?;
        let builder = RequestBuilder::new(Arc::new(config.build_codec()?))
            .with_media_base_url(config.resolved_media_base_url());
        let session = SessionStore::with_key(store, config.token_key.clone());
        Ok(Self::from_invoker(Invoker::new(builder, transport, session)))
    }

    pub fn from_invoker(invoker: Invoker) -> Self {
        Self { invoker }
    }

    pub fn invoker(&self) -> &Invoker {
        &self.invoker
    }

    pub fn session(&self) -> &SessionStore {
        self.invoker.session()
    }

    /// Run an envelope operation and return the decrypted JSON.
    pub async fn invoke(
        &self,
        descriptor: &OperationDescriptor,
        input: RequestInput,
    ) -> Result<Value, ClientError> {
        expect_response(descriptor, ResponseKind::Envelope)?;
        self.invoker.invoke(descriptor, &input).await?.into_json()
    }

    /// Run an envelope operation and deserialize the decrypted JSON.
    pub async fn call<T: DeserializeOwned>(
        &self,
        descriptor: &OperationDescriptor,
        input: RequestInput,
    ) -> Result<T, ClientError> {
        let value = self.invoke(descriptor, input).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Run a binary operation (export, download) and return the raw body.
    pub async fn download(
        &self,
        descriptor: &OperationDescriptor,
        input: RequestInput,
    ) -> Result<Bytes, ClientError> {
        expect_response(descriptor, ResponseKind::Binary)?;
        self.invoker.invoke(descriptor, &input).await?.into_bytes()
    }

    /// Run any operation and return whatever it produced.
    pub async fn execute(
        &self,
        descriptor: &OperationDescriptor,
        input: RequestInput,
    ) -> Result<InvokeOutput, ClientError> {
        self.invoker.invoke(descriptor, &input).await
    }

    /// Log in and persist the returned token. Returns the full payload.
    pub async fn sign_in(&self, credentials: RequestInput) -> Result<Value, ClientError> {
        let payload = self
            .invoker
            .run(&SessionContext::anonymous(), &catalog::auth::LOGIN, &credentials)
            .await?
            .into_json()?;
        let token = extract_token(&payload).ok_or_else(|| {
            ClientError::Decode("Sign-in response carries no token".to_string())
        })?;
        self.session().set(&token).await?;
        tracing::info!(target: "vitrine::session", "signed in");
        Ok(payload)
    }

    /// Forget the stored token.
    pub async fn sign_out(&self) -> Result<(), ClientError> {
        self.session().clear().await?;
        tracing::info!(target: "vitrine::session", "signed out");
        Ok(())
    }

    pub async fn is_signed_in(&self) -> Result<bool, ClientError> {
        Ok(self.session().get().await?.is_some())
    }
}

fn expect_response(descriptor: &OperationDescriptor, kind: ResponseKind) -> Result<(), ClientError> {
    if descriptor.response() == kind {
        return Ok(());
    }
    let hint = match kind {
        ResponseKind::Envelope => "download()",
        ResponseKind::Binary => "invoke()",
    };
    Err(ClientError::InvalidDescriptor(format!(
        "{} returns a {:?} response; use {hint}",
        descriptor.name(),
        descriptor.response()
    )))
}

/// Pull the bearer token out of a decrypted sign-in payload.
fn extract_token(payload: &Value) -> Option<AuthToken> {
    TOKEN_FIELDS
        .iter()
        .find_map(|field| payload.get(*field).and_then(Value::as_str))
        .filter(|token| !token.trim().is_empty())
        .map(AuthToken::new)
}
