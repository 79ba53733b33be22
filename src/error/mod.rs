//! Error Handling Module
//!
//! This module provides the error type shared by every layer of the transport:
//! - Core error types (`ClientError`, `ErrorKind`)
//! - Type conversions from common error types
//!
//! # Example
//!
//! ```rust,ignore
//! use vitrine::error::{ClientError, ErrorKind};
//!
//! let error = ClientError::api_error(404, "Not found", "");
//! assert_eq!(error.kind(), ErrorKind::Transport);
//! ```

mod conversions;
pub mod types;

pub use types::*;
