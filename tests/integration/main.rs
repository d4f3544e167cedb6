//! Integration tests using WireMock
//!
//! These tests drive the reqwest transport against a mock provider and cover
//! the full request/response cycle: form encoding, headers, response parsing
//! and error mapping.

mod authorization;
mod revoke;
mod token;
mod user_info;

use std::time::Duration;
use wiremock::{MockServer, ResponseTemplate};
use yandex_oauth::{client_config, OAuthClient};

/// Helper to start a mock provider serving both hosts.
pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

/// Helper to create a client pointed at the mock server.
pub fn client_for(server: &MockServer) -> OAuthClient {
    client_with_timeout(server, Duration::from_secs(5))
}

pub fn client_with_timeout(server: &MockServer, timeout: Duration) -> OAuthClient {
    let config = client_config()
        .client_id("test-client")
        .client_secret("test-secret")
        .device_id("device-0001")
        .oauth_base_url(server.uri())
        .login_base_url(server.uri())
        .timeout(timeout)
        .build()
        .expect("Failed to build config");

    OAuthClient::new(config).expect("Failed to build client")
}

/// Helper to create JSON response templates
pub fn json_response(status: u16, body: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_json(body)
}
