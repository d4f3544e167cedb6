//! Revoke Request
//!
//! Invalidates a previously issued access token.

use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

use super::validate_fields;
use crate::core::{HttpRequest, HttpTransport, ReqwestHttpTransport};
use crate::error::{OAuthError, OAuthResult, ProtocolError, ProviderError, ProviderErrorBody};
use crate::types::ClientConfig;
use crate::validation::{FieldSet, Rule, Validator, WireName};

const WIRE_NAMES: &[WireName] = &[
    WireName::new("access_token", "access_token"),
    WireName::new("client_id", "client_id"),
    WireName::new("client_secret", "client_secret"),
];

/// Token revocation request.
pub struct RevokeRequest<T: HttpTransport = ReqwestHttpTransport> {
    config: Arc<ClientConfig>,
    transport: Arc<T>,
    access_token: Option<SecretString>,
    client_id: Option<String>,
    client_secret: Option<SecretString>,
}

impl<T: HttpTransport> RevokeRequest<T> {
    pub fn new(config: Arc<ClientConfig>, transport: Arc<T>) -> Self {
        Self {
            config,
            transport,
            access_token: None,
            client_id: None,
            client_secret: None,
        }
    }

    /// Token to revoke.
    pub fn access_token(mut self, access_token: impl Into<String>) -> Self {
        self.access_token = Some(SecretString::new(access_token.into()));
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

    fn validator() -> Validator {
        Validator::new(
            "Invalid revoke request",
            vec![
                Rule::trim("access_token"),
                Rule::required("access_token"),
                Rule::trim("client_id"),
                Rule::default_from_config("client_id"),
                Rule::required("client_id"),
                Rule::trim("client_secret"),
                Rule::default_from_config("client_secret"),
                Rule::required("client_secret"),
            ],
        )
    }

    fn fields(&self) -> FieldSet {
        let expose = |s: &Option<SecretString>| s.as_ref().map(|s| s.expose_secret().clone());

        FieldSet::new()
            .with("access_token", expose(&self.access_token))
            .with("client_id", self.client_id.clone())
            .with("client_secret", expose(&self.client_secret))
    }

    /// Validated and normalized fields.
    pub fn validate(&self) -> OAuthResult<FieldSet> {
        validate_fields(&Self::validator(), self.fields(), &self.config)
    }

    /// Revoke the token. Succeeds only when the provider answers `status: ok`.
    pub async fn revoke(&self) -> OAuthResult<()> {
        let fields = self.validate()?;
        let url = self.config.endpoints().revoke_url();

        debug!(url = %url, "Revoking access token");

        let request = HttpRequest::post_form(url, &fields.to_wire_pairs(WIRE_NAMES))
            .header("Accept", "application/json")
            .timeout(self.config.timeout());
        let response = self.transport.send(request).await?;

        debug!(status = response.status, "Revoke endpoint responded");

        let parsed = serde_json::from_str::<Value>(&response.body);

        // Rejections come back as 4xx with a JSON error body.
        if !response.is_success() {
            let body = parsed
                .as_ref()
                .ok()
                .map(ProviderErrorBody::from_value)
                .filter(|b| b.error.is_some() || b.error_description.is_some());
            return Err(match body {
                Some(body) => revocation_failed(body),
                None => {
                    warn!(status = response.status, "Revoke request rejected");
                    response.status_error()
                }
            });
        }

        let value = parsed.map_err(|e| ProtocolError::InvalidJson {
            message: e.to_string(),
        })?;

        if value.get("status").and_then(Value::as_str) == Some("ok") {
            return Ok(());
        }

        Err(revocation_failed(ProviderErrorBody::from_value(&value)))
    }
}

fn revocation_failed(body: ProviderErrorBody) -> OAuthError {
    warn!(error = ?body.error, "Token revocation failed");
    ProviderError::RevocationFailed {
        message: body.message_or("Token was not revoked"),
        error: body.error,
    }
    .into()
}
