//! Shared helpers for integration tests
//!
//! - A fixed envelope key and codec so tests can seal and open payloads
//! - Client construction against a wiremock server
//! - A small multipart reader for asserting on uploaded forms

#![allow(dead_code)]

use serde_json::{Value, json};
use std::sync::Arc;
use vitrine::{
    AuthToken, ClientConfig, MemoryStore, PayloadCodec, StorefrontClient, XChaChaCodec,
};
use wiremock::{MockServer, Request, ResponseTemplate};

/// Base64 of 32 bytes of 0x2a.
pub const KEY_B64: &str = "KioqKioqKioqKioqKioqKioqKioqKioqKioqKioqKio=";

pub fn codec() -> XChaChaCodec {
    XChaChaCodec::from_base64_key(KEY_B64).expect("valid test key")
}

pub fn config_for(server: &MockServer) -> ClientConfig {
    ClientConfig::new(server.uri())
        .with_media_base_url("https://cdn.shop.test")
        .with_shared_secret(KEY_B64)
}

/// Client over a fresh in-memory store, signed out.
pub fn client_for(server: &MockServer) -> (StorefrontClient, Arc<MemoryStore>) {
    let store = MemoryStore::shared();
    let client = StorefrontClient::new(config_for(server), store.clone()).expect("client");
    (client, store)
}

/// Client whose store already holds `token`.
pub async fn signed_in_client(server: &MockServer, token: &str) -> StorefrontClient {
    let (client, _) = client_for(server);
    client
        .session()
        .set(&AuthToken::new(token))
        .await
        .expect("store token");
    client
}

/// 200 response carrying `value` in the `{data: {data: <envelope>}}` shape.
pub fn envelope_response(value: Value) -> ResponseTemplate {
    let envelope = codec().encrypt(&value).expect("encrypt");
    ResponseTemplate::new(200).set_body_json(json!({"data": {"data": envelope.as_str()}}))
}

/// Decrypt the `{ "data": <envelope> }` body of a JSON request.
pub fn open_json_body(request: &Request) -> Value {
    let body: Value = serde_json::from_slice(&request.body).expect("json body");
    let envelope = body["data"].as_str().expect("data envelope");
    codec().decrypt(envelope).expect("decrypt")
}

/// Decrypt a bare envelope string.
pub fn codec_open(envelope: &str) -> Value {
    codec().decrypt(envelope).expect("decrypt")
}

/// One part of a received multipart form.
#[derive(Debug, Clone)]
pub struct FormPart {
    pub name: String,
    pub filename: Option<String>,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl FormPart {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Split a multipart request into its parts, in wire order.
pub fn form_parts(request: &Request) -> Vec<FormPart> {
    let content_type = request
        .headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .expect("content-type header");
    assert!(
        content_type.starts_with("multipart/form-data"),
        "not multipart: {content_type}"
    );
    let boundary = content_type
        .split("boundary=")
        .nth(1)
        .expect("boundary")
        .trim_matches('"');
    let delimiter = format!("--{boundary}").into_bytes();
    let body = request.body.as_slice();

    let marks = find_all(body, &delimiter);
    let mut parts = Vec::new();
    for pair in marks.windows(2) {
        let segment = &body[pair[0] + delimiter.len()..pair[1]];
        let segment = segment.strip_prefix(b"\r\n").unwrap_or(segment);
        let segment = segment.strip_suffix(b"\r\n").unwrap_or(segment);
        let split = find_all(segment, b"\r\n\r\n")[0];
        let head = String::from_utf8_lossy(&segment[..split]).into_owned();

        let mut part = FormPart {
            name: String::new(),
            filename: None,
            content_type: None,
            body: segment[split + 4..].to_vec(),
        };
        for line in head.split("\r\n") {
            let lower = line.to_ascii_lowercase();
            if lower.starts_with("content-disposition:") {
                part.name = header_param(line, "name").unwrap_or_default();
                part.filename = header_param(line, "filename");
            } else if lower.starts_with("content-type:") {
                part.content_type = line.split_once(':').map(|(_, v)| v.trim().to_string());
            }
        }
        parts.push(part);
    }
    parts
}

fn header_param(line: &str, key: &str) -> Option<String> {
    let needle = format!("; {key}=\"");
    let start = line.find(&needle)? + needle.len();
    let end = line[start..].find('"')? + start;
    Some(line[start..end].to_string())
}

fn find_all(haystack: &[u8], needle: &[u8]) -> Vec<usize> {
    haystack
        .windows(needle.len())
        .enumerate()
        .filter(|(_, window)| *window == needle)
        .map(|(i, _)| i)
        .collect()
}
