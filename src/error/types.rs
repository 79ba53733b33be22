//! Core error types.

use thiserror::Error;

/// Normalized classification of a [`ClientError`].
///
/// `AuthMissing`, `Transport` and `Decode` are the runtime failures an
/// invocation can end in. `Storage` and `Configuration` cover the
/// collaborators around it (the token store and the caller's setup).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// No stored token for an authenticated operation
    AuthMissing,
    /// Non-2xx status, connection failure, or timeout
    Transport,
    /// Envelope could not be decrypted, or the plaintext is not JSON
    Decode,
    /// The persistent key-value store failed
    Storage,
    /// Invalid setup: base URL, header values, key material, descriptors
    Configuration,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::AuthMissing => "auth_missing",
            ErrorKind::Transport => "transport",
            ErrorKind::Decode => "decode",
            ErrorKind::Storage => "storage",
            ErrorKind::Configuration => "configuration",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error type for every fallible operation in this crate.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClientError {
    /// Authenticated operation invoked without a stored session token
    #[error("Authentication required: no session token is stored")]
    AuthMissing,

    /// The server answered with a non-2xx status
    #[error("API error {status}: {message}")]
    Api {
        status: u16,
        message: String,
        /// Raw response body, untouched
        body: String,
    },

    /// Connection, send, or body read failure
    #[error("HTTP error: {0}")]
    Http(String),

    /// Envelope missing, undecryptable, or not JSON
    #[error("Decode error: {0}")]
    Decode(String),

    /// Token storage failure
    #[error("Storage error: {0}")]
    Storage(String),

    /// Invalid client setup
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Descriptor and input do not fit together (programmer error)
    #[error("Invalid descriptor: {0}")]
    InvalidDescriptor(String),
}

impl ClientError {
    /// Build an API error from a status, a human message and the raw body.
    pub fn api_error(status: u16, message: impl Into<String>, body: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
            body: body.into(),
        }
    }

    /// Project this error onto the normalized taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ClientError::AuthMissing => ErrorKind::AuthMissing,
            ClientError::Api { .. } | ClientError::Http(_) => ErrorKind::Transport,
            ClientError::Decode(_) => ErrorKind::Decode,
            ClientError::Storage(_) => ErrorKind::Storage,
            ClientError::Configuration(_) | ClientError::InvalidDescriptor(_) => {
                ErrorKind::Configuration
            }
        }
    }

    /// HTTP status carried by the error, if the server answered at all.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True for a missing local token and for server-side 401/403 replies.
    ///
    /// A logout racing an in-flight call shows up as the latter.
    pub fn is_auth_error(&self) -> bool {
        match self {
            ClientError::AuthMissing => true,
            ClientError::Api { status, .. } => *status == 401 || *status == 403,
            _ => false,
        }
    }
}
