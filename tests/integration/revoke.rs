//! Integration tests for token revocation

use super::*;
use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, ResponseTemplate};
use yandex_oauth::{OAuthError, ProviderError, TransportError};

#[tokio::test]
async fn test_revoke_success() {
    let mock_server = setup_mock_server().await;

    Mock::given(method("POST"))
        .and(path("/revoke_token"))
        .and(body_string_contains("access_token=access"))
        .and(body_string_contains("client_id=test-client"))
        .and(body_string_contains("client_secret=test-secret"))
        .respond_with(json_response(200, json!({"status": "ok"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    client.revoke("access").await.unwrap();
}

#[tokio::test]
async fn test_revoke_provider_error() {
    let mock_server = setup_mock_server().await;

    Mock::given(method("POST"))
        .and(path("/revoke_token"))
        .respond_with(json_response(
            400,
            json!({"error": "invalid_grant", "error_description": "bad token"}),
        ))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client.revoke("access").await.unwrap_err();

    assert!(err.to_string().contains("bad token"));
    assert!(matches!(
        err,
        OAuthError::Provider(ProviderError::RevocationFailed { .. })
    ));
}

#[tokio::test]
async fn test_revoke_server_error() {
    let mock_server = setup_mock_server().await;

    Mock::given(method("POST"))
        .and(path("/revoke_token"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client.revoke("access").await.unwrap_err();

    assert!(matches!(
        err,
        OAuthError::Transport(TransportError::HttpStatus { status: 500, .. })
    ));
    assert!(err.is_retryable());
}
