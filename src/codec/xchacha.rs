//! XChaCha20-Poly1305 envelope codec.
//!
//! Envelope layout: `base64(nonce[24] || ciphertext || tag[16])`, standard
//! alphabet with padding. A fresh random nonce is drawn per encryption.

use super::{EncryptedEnvelope, PayloadCodec};
use crate::error::ClientError;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chacha20poly1305::aead::{Aead, AeadCore, KeyInit, OsRng};
use chacha20poly1305::{XChaCha20Poly1305, XNonce};

const NONCE_LEN: usize = 24;
const TAG_LEN: usize = 16;

/// Default codec keyed with a 32-byte shared secret.
#[derive(Clone)]
pub struct XChaChaCodec {
    cipher: XChaCha20Poly1305,
}

impl XChaChaCodec {
    /// Build from raw key bytes. The key must be exactly 32 bytes.
    pub fn new(key: &[u8]) -> Result<Self, ClientError> {
        let cipher = XChaCha20Poly1305::new_from_slice(key).map_err(|_| {
            ClientError::Configuration(format!(
                "Shared secret must be 32 bytes, got {}",
                key.len()
            ))
        })?;
        Ok(Self { cipher })
    }

    /// Build from a base64-encoded 32-byte key.
    pub fn from_base64_key(encoded: &str) -> Result<Self, ClientError> {
        let key = STANDARD.decode(encoded.trim()).map_err(|e| {
            ClientError::Configuration(format!("Shared secret is not valid base64: {e}"))
        })?;
        Self::new(&key)
    }

    /// Fresh random key, base64-encoded, for provisioning a shared secret.
    pub fn generate_key() -> String {
        STANDARD.encode(XChaCha20Poly1305::generate_key(&mut OsRng))
    }
}

impl PayloadCodec for XChaChaCodec {
    fn encrypt(&self, value: &serde_json::Value) -> Result<EncryptedEnvelope, ClientError> {
        let plaintext = serde_json::to_vec(value)
            .map_err(|e| ClientError::Configuration(format!("Unserializable payload: {e}")))?;
        let nonce = XChaCha20Poly1305::generate_nonce(&mut OsRng);
        let ciphertext = self
            .cipher
            .encrypt(&nonce, plaintext.as_slice())
            .map_err(|_| ClientError::Configuration("Cipher rejected payload".to_string()))?;

        let mut framed = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        framed.extend_from_slice(&nonce);
        framed.extend_from_slice(&ciphertext);
        Ok(EncryptedEnvelope::from(STANDARD.encode(framed)))
    }

    fn decrypt(&self, envelope: &str) -> Result<serde_json::Value, ClientError> {
        let framed = STANDARD
            .decode(envelope.trim())
            .map_err(|e| ClientError::Decode(format!("Envelope is not valid base64: {e}")))?;
        if framed.len() < NONCE_LEN + TAG_LEN {
            return Err(ClientError::Decode(format!(
                "Envelope too short: {} bytes",
                framed.len()
            )));
        }
        let (nonce, ciphertext) = framed.split_at(NONCE_LEN);
        let plaintext = self
            .cipher
            .decrypt(XNonce::from_slice(nonce), ciphertext)
            .map_err(|_| ClientError::Decode("Envelope failed authentication".to_string()))?;
        serde_json::from_slice(&plaintext)
            .map_err(|e| ClientError::Decode(format!("Decrypted payload is not JSON: {e}")))
    }
}

impl std::fmt::Debug for XChaChaCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("XChaChaCodec").finish_non_exhaustive()
    }
}
