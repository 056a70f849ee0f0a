//! Integration tests for [`waha_gateway::WahaClient`] against a mock WAHA server.
//!
//! Covers: send payload shape (normalized chat id, session, API key header),
//! HTTP error mapping, and the session status probe.

use capy_core::Gateway;
use waha_gateway::{WahaClient, WahaSettings};

fn settings_for(server: &mockito::ServerGuard) -> WahaSettings {
    WahaSettings {
        base_url: server.url(),
        api_key: "test-key".to_string(),
        session_name: "test-session".to_string(),
        timeout_seconds: 5,
    }
}

#[tokio::test]
async fn test_send_message_posts_normalized_payload() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/send/text")
        .match_header("X-Api-Key", "test-key")
        .match_body(mockito::Matcher::Json(serde_json::json!({
            "chatId": "554199999999@c.us",
            "text": "Olá!",
            "session": "test-session",
        })))
        .with_status(201)
        .create_async()
        .await;

    let client = WahaClient::new(settings_for(&server)).unwrap();
    client.send_message("554199999999", "Olá!").await.unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn test_send_message_maps_http_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/api/send/text")
        .with_status(500)
        .with_body("boom")
        .create_async()
        .await;

    let client = WahaClient::new(settings_for(&server)).unwrap();
    let result = client.send_message("554199999999@c.us", "Olá!").await;

    assert!(result.is_err());
}

#[tokio::test]
async fn test_session_status_parses_working() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/api/sessions/test-session")
        .match_header("X-Api-Key", "test-key")
        .with_status(200)
        .with_body(r#"{"name": "test-session", "status": "WORKING"}"#)
        .create_async()
        .await;

    let client = WahaClient::new(settings_for(&server)).unwrap();
    let status = client.session_status().await.unwrap();

    assert_eq!(status, "WORKING");
}

#[tokio::test]
async fn test_session_status_missing_field_reads_unknown() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/api/sessions/test-session")
        .with_status(200)
        .with_body(r#"{"name": "test-session"}"#)
        .create_async()
        .await;

    let client = WahaClient::new(settings_for(&server)).unwrap();
    let status = client.session_status().await.unwrap();

    assert_eq!(status, "unknown");
}
