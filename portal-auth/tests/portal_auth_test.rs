//! Integration tests for the portal client and the auth service.
//!
//! Covers: portal response mapping (2xx / 401 / 5xx), link storing ciphertext
//! only, and idempotent logout.

use std::sync::Arc;

use portal_auth::{
    AuthProvider, CredentialCipher, FernetCipher, PortalAuthService, PortalClient, PortalSettings,
};
use storage::{SessionRepository, SqlitePoolManager};

async fn session_repo() -> (Arc<SessionRepository>, tempfile::TempDir) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("auth.db");
    let pool = SqlitePoolManager::new(path.to_str().unwrap())
        .await
        .expect("Failed to create pool");
    let repo = SessionRepository::new(pool)
        .await
        .expect("Failed to create repository");
    (Arc::new(repo), dir)
}

fn portal_for(server: &mockito::ServerGuard) -> PortalClient {
    PortalClient::new(PortalSettings {
        login_url: format!("{}/login", server.url()),
        timeout_seconds: 5,
    })
    .unwrap()
}

#[tokio::test]
async fn test_check_credentials_success() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/login")
        .match_body(mockito::Matcher::UrlEncoded(
            "ra".to_string(),
            "a1234567".to_string(),
        ))
        .with_status(200)
        .create_async()
        .await;

    let portal = portal_for(&server);
    assert!(portal.check_credentials("a1234567", "senha").await.unwrap());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_check_credentials_rejected() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/login")
        .with_status(401)
        .create_async()
        .await;

    let portal = portal_for(&server);
    assert!(!portal.check_credentials("a1234567", "errada").await.unwrap());
}

#[tokio::test]
async fn test_check_credentials_server_error_is_provider_failure() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/login")
        .with_status(503)
        .create_async()
        .await;

    let portal = portal_for(&server);
    assert!(portal.check_credentials("a1234567", "senha").await.is_err());
}

#[tokio::test]
async fn test_link_stores_ciphertext_and_logout_clears_it() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/login")
        .with_status(200)
        .create_async()
        .await;

    let (sessions, _dir) = session_repo().await;
    let cipher = Arc::new(FernetCipher::from_secret("test-secret").unwrap());
    let service = PortalAuthService::new(portal_for(&server), sessions.clone(), cipher.clone());

    sessions.get_or_create("555@c.us").await.unwrap();
    assert!(service.authenticate("a1234567", "S3nha!").await.unwrap());
    service.link("555@c.us", "a1234567", "S3nha!").await.unwrap();

    let session = sessions.find("555@c.us").await.unwrap().unwrap();
    assert!(session.is_authenticated);
    assert_eq!(session.ra.as_deref(), Some("a1234567"));

    // First logout unbinds, second is a no-op but not an error.
    assert!(service.logout("555@c.us").await.unwrap());
    let session = sessions.find("555@c.us").await.unwrap().unwrap();
    assert!(!session.is_authenticated);
    assert!(service.logout("555@c.us").await.unwrap());
}

#[test]
fn test_cipher_never_leaks_plaintext() {
    let cipher = FernetCipher::from_secret("test-secret").unwrap();
    let token = cipher.encrypt("S3nha!");
    assert!(!token.contains("S3nha!"));
}
