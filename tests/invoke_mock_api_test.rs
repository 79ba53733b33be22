//! End-to-end invoke tests against a wiremock backend
//!
//! Every test drives the public `StorefrontClient` through the real HTTP
//! transport and checks both what went on the wire and what came back.

mod support;

use serde::Deserialize;
use serde_json::json;
use vitrine::{
    AuthToken, ClientError, ErrorKind, FileHandle, MediaItem, MediaValue, RequestInput, catalog,
};
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn json_mutation_sends_encrypted_body_and_decrypts_reply() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/product/delete"))
        .and(header("authorization", "Bearer tok-1"))
        .respond_with(support::envelope_response(json!({"deleted": true, "id": 7})))
        .expect(1)
        .mount(&server)
        .await;

    let client = support::signed_in_client(&server, "tok-1").await;
    let out = client
        .invoke(&catalog::products::DELETE, RequestInput::new().with_field("id", 7))
        .await
        .unwrap();

    assert_eq!(out, json!({"deleted": true, "id": 7}));

    let requests = server.received_requests().await.unwrap();
    assert_eq!(support::open_json_body(&requests[0]), json!({"id": 7}));
    let raw: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(raw.as_object().unwrap().len(), 1, "body is exactly {{data}}");
}

#[tokio::test]
async fn listing_sends_defaults_and_truthy_filters_only() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/order/list"))
        .respond_with(support::envelope_response(json!({"items": [], "total": 0})))
        .mount(&server)
        .await;

    let client = support::signed_in_client(&server, "tok-1").await;
    let input = RequestInput::new()
        .with_field("status", "paid")
        .with_field("sort_by", "")
        .with_field("archived", false)
        .with_field("customer_id", serde_json::Value::Null);
    client.invoke(&catalog::orders::LIST, input).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests[0].url.query(), Some("page=1&limit=10&status=paid"));
    assert!(requests[0].body.is_empty());
}

#[tokio::test]
async fn file_listing_pages_by_fifty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/file/list"))
        .respond_with(support::envelope_response(json!({"items": []})))
        .mount(&server)
        .await;

    let client = support::signed_in_client(&server, "tok-1").await;
    client
        .invoke(&catalog::files::LIST, RequestInput::new().with_field("page", 3))
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests[0].url.query(), Some("page=3&limit=50"));
}

#[tokio::test]
async fn multipart_update_reconciles_existing_and_new_media() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/product/update"))
        .and(header("authorization", "Bearer tok-1"))
        .respond_with(support::envelope_response(json!({"id": 9})))
        .mount(&server)
        .await;

    let client = support::signed_in_client(&server, "tok-1").await;
    let jpeg = FileHandle::new("new.jpg", vec![0xFFu8, 0xD8, 0xFF, 0xE0, 0, 0x10]);
    let input = RequestInput::new()
        .with_field("id", 9)
        .with_field("title", "Linen shirt")
        .with_media(
            "product_images",
            MediaValue::List(vec![
                MediaItem::from("https://cdn.shop.test/media/abc.jpg"),
                MediaItem::from(jpeg),
            ]),
        );

    let out = client.invoke(&catalog::products::UPDATE, input).await.unwrap();
    assert_eq!(out, json!({"id": 9}));

    let requests = server.received_requests().await.unwrap();
    let parts = support::form_parts(&requests[0]);
    let names: Vec<_> = parts.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["data", "product_images_urls", "product_images"]);

    let data = support::codec_open(&parts[0].text());
    assert_eq!(data, json!({"id": 9, "title": "Linen shirt"}));

    assert_eq!(parts[1].text(), "abc.jpg");
    assert_eq!(parts[2].filename.as_deref(), Some("new.jpg"));
    assert_eq!(parts[2].content_type.as_deref(), Some("image/jpeg"));
    assert_eq!(parts[2].body, vec![0xFFu8, 0xD8, 0xFF, 0xE0, 0, 0x10]);
}

#[tokio::test]
async fn multipart_without_media_sends_only_data() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/collection/create"))
        .respond_with(support::envelope_response(json!({"id": 1})))
        .mount(&server)
        .await;

    let client = support::signed_in_client(&server, "tok-1").await;
    client
        .invoke(
            &catalog::collections::CREATE,
            RequestInput::new()
                .with_field("name", "Summer")
                .with_field("collection_images", json!([])),
        )
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    let parts = support::form_parts(&requests[0]);
    assert_eq!(parts.len(), 1);
    assert_eq!(parts[0].name, "data");
    assert_eq!(support::codec_open(&parts[0].text()), json!({"name": "Summer"}));
}

#[tokio::test]
async fn export_returns_bytes_untouched() {
    let server = MockServer::start().await;
    let csv = b"id,total\n1,9.50\n2,12.00\n".to_vec();
    Mock::given(method("GET"))
        .and(path("/export/orders"))
        .and(header("authorization", "Bearer tok-1"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/csv")
                .set_body_bytes(csv.clone()),
        )
        .mount(&server)
        .await;

    let client = support::signed_in_client(&server, "tok-1").await;
    let bytes = client
        .download(&catalog::exports::ORDERS, RequestInput::new())
        .await
        .unwrap();
    assert_eq!(bytes.as_ref(), csv.as_slice());

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests[0].url.query(), None);
}

#[tokio::test]
async fn server_error_is_transport_with_status_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/product/detail"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&server)
        .await;

    let client = support::signed_in_client(&server, "tok-1").await;
    let err = client
        .invoke(&catalog::products::DETAIL, RequestInput::new().with_field("id", 1))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Transport);
    assert_eq!(err.status_code(), Some(500));
    match err {
        ClientError::Api { body, .. } => assert_eq!(body, "upstream exploded"),
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn missing_token_never_reaches_the_network() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/product/list"))
        .respond_with(support::envelope_response(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let (client, _) = support::client_for(&server);
    let err = client
        .invoke(&catalog::products::LIST, RequestInput::new())
        .await
        .unwrap_err();

    assert_eq!(err, ClientError::AuthMissing);
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn undecryptable_envelope_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/store/detail"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"data": {"data": "bm90LWNpcGhlcnRleHQ="}})),
        )
        .mount(&server)
        .await;

    let client = support::signed_in_client(&server, "tok-1").await;
    let err = client
        .invoke(&catalog::store::DETAIL, RequestInput::new())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Decode);
}

#[tokio::test]
async fn token_is_read_fresh_for_every_call() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/auth/profile"))
        .respond_with(support::envelope_response(json!({"name": "Ada"})))
        .mount(&server)
        .await;

    let (client, _) = support::client_for(&server);
    client.session().set(&AuthToken::new("first")).await.unwrap();
    client
        .invoke(&catalog::auth::PROFILE, RequestInput::new())
        .await
        .unwrap();
    client.session().set(&AuthToken::new("second")).await.unwrap();
    client
        .invoke(&catalog::auth::PROFILE, RequestInput::new())
        .await
        .unwrap();

    let auth: Vec<_> = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .map(|r| r.headers.get("authorization").unwrap().to_str().unwrap().to_string())
        .collect();
    assert_eq!(auth, ["Bearer first", "Bearer second"]);
}

#[tokio::test]
async fn sign_in_stores_token_and_sign_out_clears_it() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_string_contains("\"data\""))
        .respond_with(support::envelope_response(
            json!({"access_token": "fresh-token", "user": {"id": 1}}),
        ))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/auth/profile"))
        .and(header("authorization", "Bearer fresh-token"))
        .respond_with(support::envelope_response(json!({"id": 1, "name": "Ada"})))
        .expect(1)
        .mount(&server)
        .await;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Profile {
        id: u64,
        name: String,
    }

    let (client, _) = support::client_for(&server);
    let credentials = RequestInput::from_value(&json!({"email": "a@shop.test", "password": "pw"}))
        .unwrap();
    client.sign_in(credentials).await.unwrap();
    assert!(client.is_signed_in().await.unwrap());

    let login = &server.received_requests().await.unwrap()[0];
    assert!(login.headers.get("authorization").is_none());
    assert_eq!(
        support::open_json_body(login),
        json!({"email": "a@shop.test", "password": "pw"})
    );

    let profile: Profile = client
        .call(&catalog::auth::PROFILE, RequestInput::new())
        .await
        .unwrap();
    assert_eq!(profile, Profile { id: 1, name: "Ada".into() });

    client.sign_out().await.unwrap();
    let err = client
        .invoke(&catalog::auth::PROFILE, RequestInput::new())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AuthMissing);
}

#[tokio::test]
async fn download_rejects_envelope_operations_without_sending() {
    let server = MockServer::start().await;
    let client = support::signed_in_client(&server, "tok-1").await;

    let err = client
        .download(&catalog::products::LIST, RequestInput::new())
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::InvalidDescriptor(_)));
    assert!(server.received_requests().await.unwrap().is_empty());
}
