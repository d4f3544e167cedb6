//! Token Request
//!
//! Exchanges an authorization code or a refresh token for an access token.

use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

use super::validate_fields;
use crate::core::{HttpRequest, HttpResponse, HttpTransport, ReqwestHttpTransport};
use crate::error::{OAuthResult, ProtocolError, ProviderError, ProviderErrorBody};
use crate::types::{ClientConfig, Token};
use crate::validation::{device_rules, Condition, FieldSet, Rule, Validator, WireName};

const WIRE_NAMES: &[WireName] = &[
    WireName::new("grant_type", "grant_type"),
    WireName::new("code", "code"),
    WireName::new("refresh_token", "refresh_token"),
    WireName::new("client_id", "client_id"),
    WireName::new("client_secret", "client_secret"),
    WireName::new("device_id", "device_id"),
    WireName::new("device_name", "device_name"),
];

/// OAuth grant used for the exchange.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GrantType {
    #[default]
    AuthorizationCode,
    RefreshToken,
}

impl GrantType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AuthorizationCode => "authorization_code",
            Self::RefreshToken => "refresh_token",
        }
    }
}

/// Token endpoint request.
pub struct TokenRequest<T: HttpTransport = ReqwestHttpTransport> {
    config: Arc<ClientConfig>,
    transport: Arc<T>,
    grant_type: GrantType,
    code: Option<String>,
    refresh_token: Option<String>,
    client_id: Option<String>,
    client_secret: Option<SecretString>,
    device_id: Option<String>,
    device_name: Option<String>,
}

impl<T: HttpTransport> TokenRequest<T> {
    pub fn new(config: Arc<ClientConfig>, transport: Arc<T>) -> Self {
        Self {
            config,
            transport,
            grant_type: GrantType::default(),
            code: None,
            refresh_token: None,
            client_id: None,
            client_secret: None,
            device_id: None,
            device_name: None,
        }
    }

    pub fn grant_type(mut self, grant_type: GrantType) -> Self {
        self.grant_type = grant_type;
        self
    }

    /// Authorization code received on the callback.
    pub fn code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn refresh_token(mut self, refresh_token: impl Into<String>) -> Self {
        self.refresh_token = Some(refresh_token.into());
        self
    }

    pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    pub fn client_secret(mut self, client_secret: impl Into<String>) -> Self {
        self.client_secret = Some(SecretString::new(client_secret.into()));
        self
    }

    pub fn device_id(mut self, device_id: impl Into<String>) -> Self {
        self.device_id = Some(device_id.into());
        self
    }

    pub fn device_name(mut self, device_name: impl Into<String>) -> Self {
        self.device_name = Some(device_name.into());
        self
    }

    fn validator() -> Validator {
        let mut rules = vec![
            Rule::required("grant_type"),
            Rule::In("grant_type", &["authorization_code", "refresh_token"]),
            Rule::trim("code"),
            Rule::default_null("code"),
            Rule::required_when(
                "code",
                Condition::equals("grant_type", GrantType::AuthorizationCode.as_str()),
            ),
            Rule::trim("refresh_token"),
            Rule::default_null("refresh_token"),
            Rule::required_when(
                "refresh_token",
                Condition::equals("grant_type", GrantType::RefreshToken.as_str()),
            ),
            Rule::trim("client_id"),
            Rule::default_from_config("client_id"),
            Rule::required("client_id"),
            Rule::trim("client_secret"),
            Rule::default_from_config("client_secret"),
            Rule::required("client_secret"),
        ];
        rules.extend(device_rules());
        Validator::new("Invalid token request", rules)
    }

    fn fields(&self) -> FieldSet {
        FieldSet::new()
            .with("grant_type", self.grant_type.as_str())
            .with("code", self.code.clone())
            .with("refresh_token", self.refresh_token.clone())
            .with("client_id", self.client_id.clone())
            .with(
                "client_secret",
                self.client_secret.as_ref().map(|s| s.expose_secret().clone()),
            )
            .with("device_id", self.device_id.clone())
            .with("device_name", self.device_name.clone())
    }

    /// Validated and normalized fields.
    pub fn validate(&self) -> OAuthResult<FieldSet> {
        validate_fields(&Self::validator(), self.fields(), &self.config)
    }

    /// Exchange the code or refresh token for a [`Token`].
    pub async fn exchange(&self) -> OAuthResult<Token> {
        let fields = self.validate()?;
        let url = self.config.endpoints().token_url();

        debug!(url = %url, grant_type = self.grant_type.as_str(), "Requesting access token");

        let request = HttpRequest::post_form(url, &fields.to_wire_pairs(WIRE_NAMES))
            .header("Accept", "application/json")
            .timeout(self.config.timeout());
        let response = self.transport.send(request).await?;

        debug!(status = response.status, "Token endpoint responded");

        if !response.is_success() {
            warn!(status = response.status, "Token request rejected");
            return Err(response.status_error());
        }

        parse_token_response(&response)
    }
}

/// A token, or the provider's reason for not issuing one.
fn parse_token_response(response: &HttpResponse) -> OAuthResult<Token> {
    let value: Value = response.json()?;

    let issued = value
        .get("access_token")
        .and_then(Value::as_str)
        .is_some_and(|t| !t.is_empty());

    if !issued {
        let body = ProviderErrorBody::from_value(&value);
        warn!(error = ?body.error, "Access token not issued");
        return Err(ProviderError::TokenNotIssued {
            message: body.message_or("Access token was not issued"),
            error: body.error,
        }
        .into());
    }

    serde_json::from_value(value).map_err(|e| {
        ProtocolError::InvalidJson {
            message: e.to_string(),
        }
        .into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{HttpMethod, MockHttpTransport};
    use crate::error::{OAuthError, TransportError};
    use crate::requests::test_support::{bare_config, config};
    use serde_json::json;
    use std::collections::HashMap;
    use std::time::Duration;

    fn request(transport: &Arc<MockHttpTransport>) -> TokenRequest<MockHttpTransport> {
        TokenRequest::new(config(), transport.clone())
    }

    fn form(transport: &MockHttpTransport) -> HashMap<String, String> {
        transport
            .get_last_request()
            .unwrap()
            .form_pairs()
            .into_iter()
            .collect()
    }

    #[tokio::test]
    async fn test_exchange_code() {
        let transport = Arc::new(MockHttpTransport::new());
        transport.queue_json_response(
            200,
            &json!({
                "token_type": "bearer",
                "access_token": "AQAAAACy1C6ZAAAAfa6vDLuItEy8pg-iIpnDxIs",
                "expires_in": 124234123534u64,
                "refresh_token": "1:GN686QVt0mmakDd9:A4pYuW9LGk0_UnlrMIWklkAuJkUWbq27loFekJVmSYrdfzdePBy7:A-2dHOmBxiXgajnD-kYOwQ"
            }),
        );

        let token = request(&transport).code(" 4731906 ").exchange().await.unwrap();

        assert_eq!(token.access_token, "AQAAAACy1C6ZAAAAfa6vDLuItEy8pg-iIpnDxIs");
        assert!(token.has_refresh_token());
        assert!(token.expire_time().is_some());

        let sent = transport.get_last_request().unwrap();
        assert_eq!(sent.method, HttpMethod::Post);
        assert_eq!(sent.url, "https://oauth.yandex.ru/token");
        assert_eq!(sent.timeout, Some(Duration::from_secs(30)));

        let form = form(&transport);
        assert_eq!(form["grant_type"], "authorization_code");
        assert_eq!(form["code"], "4731906");
        assert_eq!(form["client_id"], "test-client");
        assert_eq!(form["client_secret"], "test-secret");
        assert_eq!(form["device_id"], "device-0001");
        assert_eq!(form["device_name"], "Test device");
        assert!(!form.contains_key("refresh_token"));
    }

    #[tokio::test]
    async fn test_refresh_sends_code_when_set() {
        let transport = Arc::new(MockHttpTransport::new());
        transport.queue_json_response(200, &json!({"access_token": "new", "expires_in": 3600}));

        request(&transport)
            .grant_type(GrantType::RefreshToken)
            .refresh_token("refresh")
            .code("stale-code")
            .client_secret("override-secret")
            .exchange()
            .await
            .unwrap();

        let form = form(&transport);
        assert_eq!(form["grant_type"], "refresh_token");
        assert_eq!(form["refresh_token"], "refresh");
        assert_eq!(form["code"], "stale-code");
        assert_eq!(form["client_secret"], "override-secret");
    }

    #[tokio::test]
    async fn test_missing_code_fails_before_sending() {
        let transport = Arc::new(MockHttpTransport::new());

        let err = request(&transport).code("   ").exchange().await.unwrap_err();

        match err {
            OAuthError::Validation(e) => assert_eq!(e.fields(), vec!["code"]),
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn test_missing_refresh_token_is_named() {
        let transport = Arc::new(MockHttpTransport::new());

        let err = request(&transport)
            .grant_type(GrantType::RefreshToken)
            .code("4731906")
            .exchange()
            .await
            .unwrap_err();

        match err {
            OAuthError::Validation(e) => assert_eq!(e.fields(), vec!["refresh_token"]),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_device_id_bounds() {
        let transport = Arc::new(MockHttpTransport::new());
        let too_long = "d".repeat(51);

        for device_id in ["12345", too_long.as_str()] {
            let err = TokenRequest::new(bare_config(), transport.clone())
                .code("4731906")
                .device_id(device_id)
                .exchange()
                .await
                .unwrap_err();
            assert!(err.validation_details().iter().any(|d| d.field == "device_id"));
        }
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn test_provider_error_without_token() {
        let transport = Arc::new(MockHttpTransport::new());
        transport.queue_json_response(200, &json!({"error": "invalid_grant"}));

        let err = request(&transport).code("4731906").exchange().await.unwrap_err();

        assert!(err.to_string().contains("invalid_grant"));
        assert!(err.needs_reauth());
        assert!(matches!(
            err,
            OAuthError::Provider(ProviderError::TokenNotIssued { error: Some(ref e), .. })
                if e == "invalid_grant"
        ));
    }

    #[tokio::test]
    async fn test_provider_error_prefers_description() {
        let transport = Arc::new(MockHttpTransport::new());
        transport.queue_json_response(
            200,
            &json!({"error": "invalid_grant", "error_description": "Code has expired"}),
        );
        transport.queue_json_response(200, &json!({"access_token": ""}));

        let err = request(&transport).code("c").exchange().await.unwrap_err();
        assert!(err.to_string().contains("Code has expired"));

        let err = request(&transport).code("c").exchange().await.unwrap_err();
        assert!(err.to_string().contains("Access token was not issued"));
    }

    #[tokio::test]
    async fn test_http_status_error() {
        let transport = Arc::new(MockHttpTransport::new());
        transport.queue_text_response(503, "Service Unavailable");

        let err = request(&transport).code("c").exchange().await.unwrap_err();

        assert_eq!(err.status(), Some(503));
        assert!(err.is_retryable());
        assert!(matches!(
            err,
            OAuthError::Transport(TransportError::HttpStatus { ref body, .. }) if body == "Service Unavailable"
        ));
    }

    #[tokio::test]
    async fn test_non_json_body() {
        let transport = Arc::new(MockHttpTransport::new());
        transport.queue_text_response(200, "<html></html>");

        let err = request(&transport).code("c").exchange().await.unwrap_err();
        assert!(matches!(err, OAuthError::Protocol(ProtocolError::InvalidJson { .. })));
    }

    #[tokio::test]
    async fn test_connection_failure() {
        let transport = Arc::new(MockHttpTransport::new());
        transport.queue_error(TransportError::ConnectionFailed {
            message: "connection refused".to_string(),
        });

        let err = request(&transport).code("c").exchange().await.unwrap_err();
        assert!(matches!(err, OAuthError::Transport(TransportError::ConnectionFailed { .. })));
    }
}
