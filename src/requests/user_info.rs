//! User Info Request
//!
//! Fetches the Yandex ID profile of the token owner.

use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

use super::{endpoint_url, validate_fields};
use crate::core::{HttpRequest, HttpTransport, ReqwestHttpTransport};
use crate::error::{OAuthResult, ProtocolError, ProviderError, ProviderErrorBody};
use crate::types::{ClientConfig, UserInfo};
use crate::validation::{FieldSet, Rule, Validator, WireName};

const QUERY_NAMES: &[WireName] = &[WireName::new("with_openid_identity", "with_openid_identity")];

/// Profile lookup for an access token.
pub struct UserInfoRequest<T: HttpTransport = ReqwestHttpTransport> {
    config: Arc<ClientConfig>,
    transport: Arc<T>,
    oauth_token: SecretString,
    with_openid_identity: Option<bool>,
}

impl<T: HttpTransport> UserInfoRequest<T> {
    pub fn new(config: Arc<ClientConfig>, transport: Arc<T>, oauth_token: impl Into<String>) -> Self {
        Self {
            config,
            transport,
            oauth_token: SecretString::new(oauth_token.into()),
            with_openid_identity: None,
        }
    }

    /// Ask for the OpenID identities of the user as well.
    pub fn with_openid_identity(mut self, with_openid_identity: bool) -> Self {
        self.with_openid_identity = Some(with_openid_identity);
        self
    }

    fn validator() -> Validator {
        Validator::new(
            "Invalid user info request",
            vec![
                Rule::trim("oauth_token"),
                Rule::required("oauth_token"),
                Rule::default_null("with_openid_identity"),
                Rule::Boolean("with_openid_identity"),
            ],
        )
    }

    fn fields(&self) -> FieldSet {
        FieldSet::new()
            .with("oauth_token", self.oauth_token.expose_secret().as_str())
            .with("with_openid_identity", self.with_openid_identity)
    }

    /// Validated and normalized fields.
    pub fn validate(&self) -> OAuthResult<FieldSet> {
        validate_fields(&Self::validator(), self.fields(), &self.config)
    }

    /// Fetch the profile.
    pub async fn fetch(&self) -> OAuthResult<UserInfo> {
        let fields = self.validate()?;
        let token = fields.get_str("oauth_token").unwrap_or_default();

        let mut url = endpoint_url(&self.config.endpoints().user_info_url())?;
        let query = fields.to_wire_pairs(QUERY_NAMES);
        if !query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(query.iter().map(|(k, v)| (*k, v.as_str())));
        }

        debug!(url = %url, "Requesting user info");

        let request = HttpRequest::get(url.as_str())
            .header("Authorization", format!("OAuth {}", token))
            .header("Accept", "application/json")
            .timeout(self.config.timeout());
        let response = self.transport.send(request).await?;

        debug!(status = response.status, "User info endpoint responded");

        if !response.is_success() {
            warn!(status = response.status, "User info request rejected");
            return Err(response.status_error());
        }

        let value: Value = response.json()?;

        if value.get("error").is_some() && value.get("id").is_none() {
            let body = ProviderErrorBody::from_value(&value);
            warn!(error = ?body.error, "User info request failed");
            return Err(ProviderError::UserInfoFailed {
                message: body.message_or("User info is not available"),
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
}
