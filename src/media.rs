//! Media field reconciliation
//!
//! Splits a media field's raw value into keys of assets the server already
//! stores and new files to upload. Existing URLs are reduced to
//! storage-relative keys (`https://cdn.shop.test/media/a.jpg` -> `a.jpg`).
//!
//! The server treats the surviving key list as authoritative: a key that was
//! stored before and is not sent again gets removed. There is no explicit
//! delete list.

use crate::defaults;
use crate::types::{FileHandle, MediaItem, MediaValue};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

static SCHEME_HOST: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*://[^/]*/?").expect("static regex is valid")
});

/// Result of reconciling one media field. Both lists may be empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reconciled {
    pub existing_keys: Vec<String>,
    pub new_files: Vec<FileHandle>,
}

impl Reconciled {
    pub fn is_empty(&self) -> bool {
        self.existing_keys.is_empty() && self.new_files.is_empty()
    }

    fn push_key(&mut self, raw: &str, base_url: Option<&str>) {
        if let Some(key) = normalize_existing_key(raw, base_url)
            && !self.existing_keys.contains(&key)
        {
            self.existing_keys.push(key);
        }
    }
}

/// Reconcile a typed media value. `None` yields two empty lists.
pub fn reconcile(value: Option<&MediaValue>, base_url: Option<&str>) -> Reconciled {
    let mut out = Reconciled::default();
    for item in value.map(MediaValue::items).unwrap_or_default() {
        match item {
            MediaItem::Existing(raw) => out.push_key(raw, base_url),
            MediaItem::NewFile(file) => out.new_files.push(file.clone()),
        }
    }
    out
}

/// Reconcile a media field that arrived as plain JSON.
///
/// JSON cannot carry binary content, so every usable entry is an existing
/// reference: a string, or an object with a `uri`/`url` string.
pub fn reconcile_json(value: &Value, base_url: Option<&str>) -> Reconciled {
    let mut out = Reconciled::default();
    let single = std::slice::from_ref(value);
    let items = match value {
        Value::Array(items) => items.as_slice(),
        _ => single,
    };
    for item in items {
        match item {
            Value::String(raw) => out.push_key(raw, base_url),
            Value::Object(obj) => {
                if let Some(raw) = obj
                    .get("uri")
                    .or_else(|| obj.get("url"))
                    .and_then(Value::as_str)
                {
                    out.push_key(raw, base_url);
                }
            }
            _ => {}
        }
    }
    out
}

/// Reduce an existing reference to its storage-relative key.
///
/// Strips the base URL (or any `scheme://host/` prefix), any leading `/`,
/// then a leading `media/` segment. Returns `None` for blank references.
pub fn normalize_existing_key(raw: &str, base_url: Option<&str>) -> Option<String> {
    let raw = raw.trim();
    let mut rest = raw;

    let base = base_url
        .map(|b| b.trim().trim_end_matches('/'))
        .filter(|b| !b.is_empty());
    if let Some(base) = base
        && let Some(stripped) = raw.strip_prefix(base)
        && (stripped.is_empty() || stripped.starts_with('/'))
    {
        rest = stripped.trim_start_matches('/');
    } else if let Some(m) = SCHEME_HOST.find(raw) {
        rest = &raw[m.end()..];
    }

    let rest = rest.trim_start_matches('/');
    let rest = rest
        .strip_prefix(defaults::wire::MEDIA_SEGMENT)
        .unwrap_or(rest);
    if rest.is_empty() {
        None
    } else {
        Some(rest.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn strips_host_and_media_segment() {
        assert_eq!(
            normalize_existing_key("https://host.example/media/abc.jpg", None).as_deref(),
            Some("abc.jpg")
        );
        assert_eq!(
            normalize_existing_key("media/products/abc.jpg", None).as_deref(),
            Some("products/abc.jpg")
        );
        assert_eq!(normalize_existing_key("abc.jpg", None).as_deref(), Some("abc.jpg"));
        assert_eq!(
            normalize_existing_key("/media/abc.jpg", None).as_deref(),
            Some("abc.jpg")
        );
        assert_eq!(normalize_existing_key("/abc.jpg", None).as_deref(), Some("abc.jpg"));
        assert_eq!(normalize_existing_key("   ", None), None);
        assert_eq!(normalize_existing_key("https://host.example/", None), None);
    }

    #[test]
    fn base_url_with_path_prefix_is_stripped_whole() {
        let base = Some("https://api.shop.test/v1/");
        assert_eq!(
            normalize_existing_key("https://api.shop.test/v1/media/x.png", base).as_deref(),
            Some("x.png")
        );
        // A different host still loses its scheme://host/ prefix.
        assert_eq!(
            normalize_existing_key("https://cdn.shop.test/media/y.png", base).as_deref(),
            Some("y.png")
        );
    }

    #[test]
    fn binary_content_wins_over_uri() {
        let file = FileHandle::new("new.jpg", vec![1u8, 2, 3])
            .with_uri("https://host.example/media/old.jpg");
        let value = MediaValue::List(vec![MediaItem::from("https://host.example/media/keep.jpg"), file.clone().into()]);

        let out = reconcile(Some(&value), None);
        assert_eq!(out.existing_keys, vec!["keep.jpg"]);
        assert_eq!(out.new_files, vec![file]);
    }

    #[test]
    fn absent_or_empty_values_yield_nothing() {
        assert!(reconcile(None, None).is_empty());
        assert!(reconcile(Some(&MediaValue::List(vec![])), None).is_empty());
        assert!(reconcile_json(&Value::Null, None).is_empty());
        assert!(reconcile_json(&json!([]), None).is_empty());
    }

    #[test]
    fn duplicate_keys_collapse() {
        let value = MediaValue::List(vec!["a.jpg".into(), "media/a.jpg".into()]);
        assert_eq!(reconcile(Some(&value), None).existing_keys, vec!["a.jpg"]);
    }

    #[test]
    fn json_values_are_existing_references() {
        let out = reconcile_json(
            &json!(["media/a.jpg", {"uri": "https://h.test/media/b.jpg"}, null, 3]),
            None,
        );
        assert_eq!(out.existing_keys, vec!["a.jpg", "b.jpg"]);
        assert!(out.new_files.is_empty());
        assert_eq!(reconcile_json(&json!("c.jpg"), None).existing_keys, vec!["c.jpg"]);
    }
}
