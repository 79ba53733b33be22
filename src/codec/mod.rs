//! Payload codec
//!
//! Every payload crosses the wire as an envelope: the value's JSON text run
//! through a symmetric cipher keyed with a pre-shared secret. The cipher is
//! a replaceable dependency behind [`PayloadCodec`]; [`XChaChaCodec`] is the
//! default implementation.

mod xchacha;

pub use xchacha::XChaChaCodec;

use crate::error::ClientError;
use serde::{Deserialize, Serialize};

/// Encrypted, transport-safe string. Opaque to everything but the codec.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EncryptedEnvelope(String);

impl EncryptedEnvelope {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<String> for EncryptedEnvelope {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for EncryptedEnvelope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Encrypt/decrypt pair treated as one unit.
///
/// Implementations must satisfy `decrypt(encrypt(v)) == v` for every JSON
/// value. Ciphertext may differ between calls; the envelope framing may not.
pub trait PayloadCodec: Send + Sync {
    /// Serialize `value` to JSON text and encrypt it.
    fn encrypt(&self, value: &serde_json::Value) -> Result<EncryptedEnvelope, ClientError>;

    /// Decrypt an envelope and parse the plaintext as JSON.
    ///
    /// Fails with [`ClientError::Decode`] when either step fails; never
    /// yields `Value::Null` in place of an error.
    fn decrypt(&self, envelope: &str) -> Result<serde_json::Value, ClientError>;
}
