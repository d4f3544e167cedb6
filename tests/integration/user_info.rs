//! Integration tests for the user info endpoint

use super::*;
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::Mock;
use yandex_oauth::{OAuthError, Token};

#[tokio::test]
async fn test_user_info_success() {
    let mock_server = setup_mock_server().await;

    Mock::given(method("GET"))
        .and(path("/info"))
        .and(header("Authorization", "OAuth access"))
        .respond_with(json_response(
            200,
            json!({
                "id": "1000034426",
                "login": "ivan",
                "client_id": "test-client",
                "default_email": "test@yandex.ru",
                "default_avatar_id": "131652443",
                "is_avatar_empty": false,
                "psuid": "1.AAceCw.tbHgw5DtJ9_zeqPrk-Ba2w.qPWSRC5v2t2IaksPJgnge"
            }),
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let info = client.user_info(&Token::new("access")).await.unwrap();

    assert_eq!(info.id.as_deref(), Some("1000034426"));
    assert_eq!(info.default_email.as_deref(), Some("test@yandex.ru"));
    assert!(info.avatar_url("islands-200").is_some());
}

#[tokio::test]
async fn test_user_info_with_openid_identity() {
    let mock_server = setup_mock_server().await;

    Mock::given(method("GET"))
        .and(path("/info"))
        .and(query_param("with_openid_identity", "1"))
        .respond_with(json_response(
            200,
            json!({"id": "1", "openid_identities": ["http://openid.yandex.ru/ivan/"]}),
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let info = client
        .user_info_request("access")
        .with_openid_identity(true)
        .fetch()
        .await
        .unwrap();

    assert_eq!(info.openid_identities.len(), 1);
}

#[tokio::test]
async fn test_user_info_unauthorized() {
    let mock_server = setup_mock_server().await;

    Mock::given(method("GET"))
        .and(path("/info"))
        .respond_with(json_response(401, json!({"error": "invalid_token"})))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client.user_info(&Token::new("expired")).await.unwrap_err();

    assert_eq!(err.status(), Some(401));
    assert!(err.needs_reauth());
    assert!(matches!(err, OAuthError::Transport(_)));
}
