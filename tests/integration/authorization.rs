//! Integration tests for the redirect flow

use super::*;
use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::Mock;
use yandex_oauth::InMemorySessionStore;

#[tokio::test]
async fn test_authorization_url_uses_configured_host() {
    let mock_server = setup_mock_server().await;
    let client = client_for(&mock_server);

    let url = client
        .authorization_url("https://myapp.example/callback", ["login:info"])
        .unwrap();

    assert!(url.starts_with(&format!("{}/authorize?response_type=code", mock_server.uri())));
}

#[tokio::test]
async fn test_full_redirect_flow() {
    let mock_server = setup_mock_server().await;

    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string_contains("code=4731906"))
        .respond_with(json_response(200, json!({"access_token": "access", "expires_in": 3600})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let store = InMemorySessionStore::new();

    let url = client
        .start_authorization(
            &store,
            "session-1",
            Some("https://myapp.example/account"),
            client.code_request().redirect_uri("https://myapp.example/callback"),
        )
        .unwrap();

    let state = url::Url::parse(&url)
        .unwrap()
        .query_pairs()
        .find(|(k, _)| k == "state")
        .map(|(_, v)| v.into_owned())
        .unwrap();

    let completed = client
        .complete_authorization(
            &store,
            "session-1",
            &format!("https://myapp.example/callback?code=4731906&state={}", state),
        )
        .await
        .unwrap();

    assert_eq!(completed.token.access_token, "access");
    assert_eq!(
        completed.client_url.as_deref(),
        Some("https://myapp.example/account")
    );
}
