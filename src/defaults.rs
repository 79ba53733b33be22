//! Default Configuration Values
//!
//! This module centralizes the default values used by the transport so the
//! request builder, session store and config agree on them.

/// Pagination defaults for listing endpoints
pub mod pagination {
    /// First page when the caller does not ask for one
    pub const PAGE: u64 = 1;

    /// Page size for ordinary listing endpoints
    pub const LIMIT: u64 = 10;

    /// Page size for file/media listing endpoints
    pub const FILE_LISTING_LIMIT: u64 = 50;
}

/// Session storage defaults
pub mod session {
    /// Storage key under which the bearer token is persisted
    pub const TOKEN_KEY: &str = "token";
}

/// Wire format constants
pub mod wire {
    /// Field carrying the encrypted envelope in request and response bodies
    pub const ENVELOPE_FIELD: &str = "data";

    /// Multipart part name carrying the encrypted non-media fields
    pub const DATA_PART: &str = "data";

    /// Suffix appended to a media field name for its existing-key parts
    pub const URLS_SUFFIX: &str = "_urls";

    /// Leading storage segment stripped from existing media references
    pub const MEDIA_SEGMENT: &str = "media/";
}

/// HTTP client defaults
pub mod http {
    /// Default User-Agent string for HTTP requests
    pub const USER_AGENT: &str = concat!("vitrine/", env!("CARGO_PKG_VERSION"));
}

/// Environment variables consulted by `ClientConfig::from_env`
pub mod env {
    pub const BASE_URL: &str = "VITRINE_BASE_URL";
    pub const MEDIA_BASE_URL: &str = "VITRINE_MEDIA_BASE_URL";
    pub const SHARED_SECRET: &str = "VITRINE_SHARED_SECRET";
    pub const TOKEN_KEY: &str = "VITRINE_TOKEN_KEY";
}
