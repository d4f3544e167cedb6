//! Integration tests for the token endpoint

use super::*;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, ResponseTemplate};
use yandex_oauth::{GrantType, OAuthError, ProtocolError, ProviderError, TransportError};

#[tokio::test]
async fn test_exchange_code_success() {
    let mock_server = setup_mock_server().await;

    Mock::given(method("POST"))
        .and(path("/token"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string_contains("grant_type=authorization_code"))
        .and(body_string_contains("code=4731906"))
        .and(body_string_contains("client_id=test-client"))
        .and(body_string_contains("client_secret=test-secret"))
        .and(body_string_contains("device_id=device-0001"))
        .respond_with(json_response(
            200,
            json!({
                "token_type": "bearer",
                "access_token": "AQAAAACy1C6ZAAAAfa6vDLuItEy8pg-iIpnDxIs",
                "expires_in": 31536000,
                "refresh_token": "1:GN686QVt0mmakDd9:A4pYuW9LGk0_UnlrMIWklkAuJkUWbq27loFekJVmSYrdfzdePBy7:A-2dHOmBxiXgajnD-kYOwQ",
                "scope": "login:info login:email"
            }),
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let token = client.exchange_code("4731906").await.unwrap();

    assert_eq!(token.token_type, "bearer");
    assert_eq!(token.scopes(), &["login:info", "login:email"]);
    assert!(token.has_refresh_token());
    assert!(!token.is_expired());
}

#[tokio::test]
async fn test_refresh_token_success() {
    let mock_server = setup_mock_server().await;

    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string_contains("grant_type=refresh_token"))
        .and(body_string_contains("refresh_token=1%3Arefresh"))
        .respond_with(json_response(200, json!({"access_token": "new-access", "expires_in": 3600})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let token = client
        .token_request()
        .grant_type(GrantType::RefreshToken)
        .refresh_token("1:refresh")
        .exchange()
        .await
        .unwrap();

    assert_eq!(token.access_token, "new-access");
    assert_eq!(token.expires_in, Some(3600));
}

#[tokio::test]
async fn test_provider_error_in_success_response() {
    let mock_server = setup_mock_server().await;

    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(json_response(200, json!({"error": "invalid_grant"})))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client.exchange_code("4731906").await.unwrap_err();

    assert!(err.to_string().contains("invalid_grant"));
    assert!(matches!(
        err,
        OAuthError::Provider(ProviderError::TokenNotIssued { .. })
    ));
}

#[tokio::test]
async fn test_http_error_status() {
    let mock_server = setup_mock_server().await;

    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(json_response(
            400,
            json!({"error": "bad_verification_code", "error_description": "Invalid code"}),
        ))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client.exchange_code("4731906").await.unwrap_err();

    match err {
        OAuthError::Transport(TransportError::HttpStatus { status, body }) => {
            assert_eq!(status, 400);
            assert!(body.contains("bad_verification_code"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_validation_failure_sends_nothing() {
    let mock_server = setup_mock_server().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client.exchange_code("  ").await.unwrap_err();

    assert!(matches!(err, OAuthError::Validation(_)));
}

#[tokio::test]
async fn test_redirect_is_not_followed() {
    let mock_server = setup_mock_server().await;

    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(302).insert_header("location", "https://elsewhere.example/"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client.exchange_code("4731906").await.unwrap_err();

    assert!(matches!(
        err,
        OAuthError::Protocol(ProtocolError::UnexpectedRedirect { ref location }) if location == "https://elsewhere.example/"
    ));
}

#[tokio::test]
async fn test_timeout() {
    let mock_server = setup_mock_server().await;

    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(
            json_response(200, json!({"access_token": "late"})).set_delay(Duration::from_secs(2)),
        )
        .mount(&mock_server)
        .await;

    let client = client_with_timeout(&mock_server, Duration::from_millis(200));
    let err = client.exchange_code("4731906").await.unwrap_err();

    assert!(matches!(err, OAuthError::Transport(TransportError::Timeout { .. })));
    assert!(err.is_retryable());
}
