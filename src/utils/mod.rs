//! Utility modules for vitrine
//!
//! Small helpers shared by the builder and the transport.

pub mod mime;
pub mod url;

pub use mime::guess_mime;
pub use url::join_url;
