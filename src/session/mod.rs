//! Session token storage
//!
//! The bearer token lives in a persistent key-value store and is read fresh
//! for every call; nothing here caches it. An absent token is a normal
//! state until an authenticated operation asks for one.

pub mod storage;

pub use storage::{FileStore, KeyValueStore, MemoryStore};

use crate::error::ClientError;
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;

/// Opaque bearer credential. `Debug` never prints the value.
#[derive(Clone)]
pub struct AuthToken(Arc<SecretString>);

impl AuthToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(Arc::new(SecretString::from(token.into())))
    }

    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl std::fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AuthToken([REDACTED])")
    }
}

impl PartialEq for AuthToken {
    fn eq(&self, other: &Self) -> bool {
        self.expose() == other.expose()
    }
}

/// Token snapshot handed to one invocation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionContext {
    token: Option<AuthToken>,
}

impl SessionContext {
    /// Context with no credential.
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn with_token(token: AuthToken) -> Self {
        Self { token: Some(token) }
    }

    pub fn token(&self) -> Option<&AuthToken> {
        self.token.as_ref()
    }

    /// The token, or `AuthMissing` when there is none.
    pub fn require(&self) -> Result<&AuthToken, ClientError> {
        self.token.as_ref().ok_or(ClientError::AuthMissing)
    }
}

/// Reads and writes the bearer token under a fixed storage key.
#[derive(Clone)]
pub struct SessionStore {
    store: Arc<dyn KeyValueStore>,
    key: String,
}

impl SessionStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_key(store, crate::defaults::session::TOKEN_KEY)
    }

    pub fn with_key(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Current token, if any. Empty strings count as absent.
    pub async fn get(&self) -> Result<Option<AuthToken>, ClientError> {
        let raw = self.store.get(&self.key).await?;
        Ok(raw.filter(|t| !t.trim().is_empty()).map(AuthToken::new))
    }

    /// Current token, or `AuthMissing`.
    ///
    /// This is a precondition check only: the token may still be cleared
    /// by a concurrent sign-out before the request reaches the server.
    pub async fn require(&self) -> Result<AuthToken, ClientError> {
        self.get().await?.ok_or(ClientError::AuthMissing)
    }

    /// Snapshot the store into a per-call context.
    pub async fn context(&self) -> Result<SessionContext, ClientError> {
        Ok(SessionContext {
            token: self.get().await?,
        })
    }

    pub async fn set(&self, token: &AuthToken) -> Result<(), ClientError> {
        self.store.set(&self.key, token.expose()).await?;
        tracing::debug!(target: "vitrine::session", key = %self.key, "session token stored");
        Ok(())
    }

    pub async fn clear(&self) -> Result<(), ClientError> {
        self.store.delete(&self.key).await?;
        tracing::debug!(target: "vitrine::session", key = %self.key, "session token cleared");
        Ok(())
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}
