//! Integration tests for the Steam inventory client against a mock API.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use deckwatch_core::config::InventoryConfig;
use deckwatch_inventory::{AvailabilityCheck, InventoryError, SteamInventoryClient};

const API_PATH: &str = "/IPhysicalGoodsService/CheckInventoryAvailableByPackage/v1/";

fn client_for(server: &MockServer, timeout: Duration) -> SteamInventoryClient {
    let config = InventoryConfig {
        api_url: format!("{}{}", server.uri(), API_PATH),
        timeout,
    };
    SteamInventoryClient::new(&config).expect("client should build")
}

#[tokio::test]
async fn sends_query_and_store_headers() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(API_PATH))
        .and(query_param("packageid", "903905"))
        .and(query_param("country_code", "ES"))
        .and(query_param("format", "json"))
        .and(header("user-agent", "Mozilla/5.0"))
        .and(header("origin", "https://store.steampowered.com"))
        .and(header("referer", "https://store.steampowered.com/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "response": { "available": true } })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, Duration::from_secs(5));
    let available = client.check(903905, "ES").await.unwrap();
    assert!(available);
}

#[tokio::test]
async fn unavailable_and_missing_flag_read_as_false() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(query_param("packageid", "1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "response": { "available": false } })),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("packageid", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "response": {} })))
        .mount(&server)
        .await;

    let client = client_for(&server, Duration::from_secs(5));
    assert!(!client.check(1, "ES").await.unwrap());
    assert!(!client.check(2, "ES").await.unwrap());
}

#[tokio::test]
async fn server_error_is_a_failure_not_unavailable() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(API_PATH))
        .respond_with(ResponseTemplate::new(503).set_body_string("busy"))
        .mount(&server)
        .await;

    let client = client_for(&server, Duration::from_secs(5));
    let err = client.check(903905, "ES").await.unwrap_err();
    match err {
        InventoryError::Status { status, body } => {
            assert_eq!(status.as_u16(), 503);
            assert_eq!(body, "busy");
        }
        other => panic!("expected Status error, got: {other:?}"),
    }
}

#[tokio::test]
async fn maintenance_page_is_truncated_in_the_error() {
    let server = MockServer::start().await;
    let page = format!("<html><body>{}</body></html>", "Down for maintenance. ".repeat(100));

    Mock::given(method("GET"))
        .and(path(API_PATH))
        .respond_with(ResponseTemplate::new(502).set_body_string(page))
        .mount(&server)
        .await;

    let client = client_for(&server, Duration::from_secs(5));
    let err = client.check(903905, "ES").await.unwrap_err();
    match &err {
        InventoryError::Status { status, body } => {
            assert_eq!(status.as_u16(), 502);
            assert!(body.starts_with("<html><body>Down for maintenance."));
            assert_eq!(body.chars().count(), 201);
        }
        other => panic!("expected Status error, got: {other:?}"),
    }
    assert!(err.to_string().len() < 300);
}

#[tokio::test]
async fn slow_reply_times_out() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(API_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "response": { "available": true } }))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let client = client_for(&server, Duration::from_millis(200));
    let err = client.check(903905, "ES").await.unwrap_err();
    assert!(err.is_timeout(), "expected a timeout, got: {err}");
}

#[tokio::test]
async fn html_body_is_a_decode_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(API_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let client = client_for(&server, Duration::from_secs(5));
    let err = client.check(903905, "ES").await.unwrap_err();
    assert!(matches!(err, InventoryError::Decode(_)), "got: {err:?}");
}
