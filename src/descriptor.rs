//! Operation descriptors
//!
//! One immutable descriptor per backend capability. Descriptors are `const`
//! values built with the `const fn` builders below, so registering a new
//! endpoint is a single line in [`crate::catalog`].

use crate::defaults;
use crate::error::ClientError;
use std::borrow::Cow;

/// HTTP method used by an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpVerb {
    Get,
    Post,
}

impl HttpVerb {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpVerb::Get => "GET",
            HttpVerb::Post => "POST",
        }
    }
}

/// How the request input is put on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyKind {
    /// Nothing is sent besides the path
    None,
    /// `{ "data": <envelope> }`
    Json,
    /// `?page=..&limit=..` plus truthy filters
    Query,
    /// One encrypted `data` part plus media parts
    Multipart,
}

/// Whether the bearer token is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthRequirement {
    Bearer,
    Anonymous,
}

/// Shape of a successful response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResponseKind {
    /// `{ "data": { "data": <envelope> } }`
    Envelope,
    /// Raw byte stream (exports, downloads)
    Binary,
}

/// Declares one media-bearing field of a multipart operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MediaFieldSpec {
    name: &'static str,
    urls_name: Option<&'static str>,
}

impl MediaFieldSpec {
    /// New files go out as `name` parts, existing keys as `name_urls` parts.
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            urls_name: None,
        }
    }

    /// Override the part name used for existing keys.
    pub const fn with_urls_field(mut self, urls_name: &'static str) -> Self {
        self.urls_name = Some(urls_name);
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn urls_field_name(&self) -> Cow<'static, str> {
        match self.urls_name {
            Some(name) => Cow::Borrowed(name),
            None => Cow::Owned(format!("{}{}", self.name, defaults::wire::URLS_SUFFIX)),
        }
    }
}

/// Immutable definition of one API capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OperationDescriptor {
    name: &'static str,
    path: &'static str,
    verb: HttpVerb,
    body: BodyKind,
    auth: AuthRequirement,
    response: ResponseKind,
    media_fields: &'static [MediaFieldSpec],
    default_limit: u64,
    paginated: bool,
}

impl OperationDescriptor {
    /// GET listing endpoint with query-string input.
    pub const fn get(name: &'static str, path: &'static str) -> Self {
        Self::base(name, path, HttpVerb::Get, BodyKind::Query)
    }

    /// POST endpoint with an encrypted JSON body.
    pub const fn post(name: &'static str, path: &'static str) -> Self {
        Self::base(name, path, HttpVerb::Post, BodyKind::Json)
    }

    const fn base(name: &'static str, path: &'static str, verb: HttpVerb, body: BodyKind) -> Self {
        Self {
            name,
            path,
            verb,
            body,
            auth: AuthRequirement::Bearer,
            response: ResponseKind::Envelope,
            media_fields: &[],
            default_limit: defaults::pagination::LIMIT,
            paginated: true,
        }
    }

    /// Send nothing but the path.
    pub const fn no_body(mut self) -> Self {
        self.body = BodyKind::None;
        self
    }

    /// Send input as a query string.
    pub const fn query(mut self) -> Self {
        self.body = BodyKind::Query;
        self
    }

    /// Send input as a multipart form with the given media fields.
    pub const fn multipart(mut self, media_fields: &'static [MediaFieldSpec]) -> Self {
        self.body = BodyKind::Multipart;
        self.media_fields = media_fields;
        self
    }

    /// Do not attach the bearer token.
    pub const fn anonymous(mut self) -> Self {
        self.auth = AuthRequirement::Anonymous;
        self
    }

    /// Return the response body untouched.
    pub const fn binary(mut self) -> Self {
        self.response = ResponseKind::Binary;
        self
    }

    /// Query carries only the caller's filters, no `page`/`limit` defaults.
    pub const fn unpaginated(mut self) -> Self {
        self.paginated = false;
        self
    }

    /// File listings page by 50 instead of 10.
    pub const fn file_listing(mut self) -> Self {
        self.default_limit = defaults::pagination::FILE_LISTING_LIMIT;
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn path(&self) -> &'static str {
        self.path
    }

    pub fn verb(&self) -> HttpVerb {
        self.verb
    }

    pub fn body(&self) -> BodyKind {
        self.body
    }

    pub fn auth(&self) -> AuthRequirement {
        self.auth
    }

    pub fn requires_auth(&self) -> bool {
        self.auth == AuthRequirement::Bearer
    }

    pub fn response(&self) -> ResponseKind {
        self.response
    }

    pub fn media_fields(&self) -> &'static [MediaFieldSpec] {
        self.media_fields
    }

    pub fn media_field(&self, name: &str) -> Option<&'static MediaFieldSpec> {
        self.media_fields.iter().find(|spec| spec.name == name)
    }

    pub fn default_limit(&self) -> u64 {
        self.default_limit
    }

    pub fn is_paginated(&self) -> bool {
        self.paginated
    }

    /// Reject descriptors that cannot be put on the wire.
    pub fn validate(&self) -> Result<(), ClientError> {
        let invalid = |why: String| -> Result<(), ClientError> {
            Err(ClientError::InvalidDescriptor(format!("{}: {why}", self.name)))
        };

        if self.name.is_empty() {
            return Err(ClientError::InvalidDescriptor(format!(
                "descriptor for {} has no name",
                self.path
            )));
        }
        if !self.path.starts_with('/') {
            return invalid(format!("path '{}' must start with '/'", self.path));
        }
        if self.verb == HttpVerb::Get && matches!(self.body, BodyKind::Json | BodyKind::Multipart)
        {
            return invalid(format!("GET cannot carry a {:?} body", self.body));
        }
        if self.body == BodyKind::Multipart {
            if self.media_fields.is_empty() {
                return invalid("multipart operation declares no media fields".to_string());
            }
            let mut seen: Vec<Cow<'static, str>> = vec![Cow::Borrowed(defaults::wire::DATA_PART)];
            for spec in self.media_fields {
                for part in [Cow::Borrowed(spec.name), spec.urls_field_name()] {
                    if seen.contains(&part) {
                        return invalid(format!("part name '{part}' is used twice"));
                    }
                    seen.push(part);
                }
            }
        } else if !self.media_fields.is_empty() {
            return invalid("media fields require a multipart body".to_string());
        }
        Ok(())
    }
}
