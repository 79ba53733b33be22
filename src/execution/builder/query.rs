//! Query strings for listing endpoints.
//!
//! On paginated operations `page` and `limit` come first (defaulting to 1
//! and the descriptor's page size), followed by every other truthy field in
//! key order. Exports and downloads are unpaginated and send filters only.
//! Falsy fields are left out entirely, never sent as `""` or `false`.

use crate::defaults;
use crate::descriptor::OperationDescriptor;
use crate::types::RequestInput;
use serde_json::Value;

const PAGE: &str = "page";
const LIMIT: &str = "limit";

/// Truthiness as the backend's clients have always applied it: `null`,
/// `false`, `0` and `""` are falsy; arrays and objects are truthy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Text form of a query value, before percent-encoding.
pub fn query_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(query_value).collect::<Vec<_>>().join(","),
        Value::Object(_) => value.to_string(),
    }
}

/// Build the query string (without the leading `?`).
///
/// Unpaginated operations get no `page`/`limit` defaults; every truthy
/// field, `page` and `limit` included, is sent as a plain filter.
pub fn build_query(descriptor: &OperationDescriptor, input: &RequestInput) -> String {
    let fields = input.fields();
    let paginated = descriptor.is_paginated();

    let mut filters: Vec<(&str, String)> = fields
        .iter()
        .filter(|(k, v)| {
            is_truthy(v) && !(paginated && (k.as_str() == PAGE || k.as_str() == LIMIT))
        })
        .map(|(k, v)| (k.as_str(), query_value(v)))
        .collect();
    filters.sort_by(|a, b| a.0.cmp(b.0));

    let mut pairs = Vec::with_capacity(filters.len() + 2);
    if paginated {
        let truthy = |key: &str| fields.get(key).filter(|v| is_truthy(v)).map(query_value);
        let page = truthy(PAGE).unwrap_or_else(|| defaults::pagination::PAGE.to_string());
        let limit = truthy(LIMIT).unwrap_or_else(|| descriptor.default_limit().to_string());
        pairs.push((PAGE, page));
        pairs.push((LIMIT, limit));
    }
    pairs.extend(filters);

    pairs
        .into_iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(&v)))
        .collect::<Vec<_>>()
        .join("&")
}
