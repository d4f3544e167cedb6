//! Authorization Code Request
//!
//! Builds the URL the user is redirected to for granting access.

use std::sync::Arc;
use tracing::debug;

use super::{endpoint_url, validate_fields};
use crate::error::OAuthResult;
use crate::types::ClientConfig;
use crate::validation::{device_rules, Filter, FieldSet, Rule, Validator, WireName};

const WIRE_NAMES: &[WireName] = &[
    WireName::new("response_type", "response_type"),
    WireName::new("client_id", "client_id"),
    WireName::new("device_id", "device_id"),
    WireName::new("device_name", "device_name"),
    WireName::new("redirect_uri", "redirect_uri"),
    WireName::new("login_hint", "login_hint"),
    WireName::new("scope", "scope"),
    WireName::new("optional_scope", "optional_scope"),
    WireName::new("force_confirm", "force_confirm"),
    WireName::new("state", "state"),
];

/// Parameters of the authorization redirect. Makes no network call.
#[derive(Clone, Debug)]
pub struct CodeRequest {
    config: Arc<ClientConfig>,
    response_type: String,
    client_id: Option<String>,
    device_id: Option<String>,
    device_name: Option<String>,
    redirect_uri: Option<String>,
    login_hint: Option<String>,
    scope: Option<Vec<String>>,
    optional_scope: Option<Vec<String>>,
    force_confirm: Option<bool>,
    state: Option<String>,
}

impl CodeRequest {
    pub fn new(config: Arc<ClientConfig>) -> Self {
        Self {
            config,
            response_type: "code".to_string(),
            client_id: None,
            device_id: None,
            device_name: None,
            redirect_uri: None,
            login_hint: None,
            scope: None,
            optional_scope: None,
            force_confirm: None,
            state: None,
        }
    }

    /// Only `code` is accepted by the provider.
    pub fn response_type(mut self, response_type: impl Into<String>) -> Self {
        self.response_type = response_type.into();
        self
    }

    /// Override the configured client ID.
    pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
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

    pub fn redirect_uri(mut self, redirect_uri: impl Into<String>) -> Self {
        self.redirect_uri = Some(redirect_uri.into());
        self
    }

    /// Login or email to prefill on the sign-in page.
    pub fn login_hint(mut self, login_hint: impl Into<String>) -> Self {
        self.login_hint = Some(login_hint.into());
        self
    }

    /// Scopes the application requires.
    pub fn scope<I, S>(mut self, scope: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scope = Some(scope.into_iter().map(Into::into).collect());
        self
    }

    /// Scopes the user may decline.
    pub fn optional_scope<I, S>(mut self, scope: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.optional_scope = Some(scope.into_iter().map(Into::into).collect());
        self
    }

    /// Ask for confirmation even if access was granted before.
    pub fn force_confirm(mut self, force_confirm: bool) -> Self {
        self.force_confirm = Some(force_confirm);
        self
    }

    pub fn state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    fn validator() -> Validator {
        let mut rules = vec![
            Rule::required("response_type"),
            Rule::In("response_type", &["code"]),
            Rule::trim("client_id"),
            Rule::default_from_config("client_id"),
            Rule::required("client_id"),
        ];
        rules.extend(device_rules());
        rules.extend([
            Rule::trim("redirect_uri"),
            Rule::default_null("redirect_uri"),
            Rule::Url("redirect_uri"),
            Rule::trim("login_hint"),
            Rule::default_null("login_hint"),
            Rule::default_null("scope"),
            Rule::Strings("scope"),
            Rule::default_null("optional_scope"),
            Rule::Strings("optional_scope"),
            Rule::default_null("force_confirm"),
            Rule::Boolean("force_confirm"),
            Rule::Filter("force_confirm", Filter::FalseAsAbsent),
            Rule::default_null("state"),
            Rule::max_length("state", 1024),
        ]);
        Validator::new("Invalid authorization request", rules)
    }

    fn fields(&self) -> FieldSet {
        FieldSet::new()
            .with("response_type", self.response_type.as_str())
            .with("client_id", self.client_id.clone())
            .with("device_id", self.device_id.clone())
            .with("device_name", self.device_name.clone())
            .with("redirect_uri", self.redirect_uri.clone())
            .with("login_hint", self.login_hint.clone())
            .with("scope", self.scope.clone())
            .with("optional_scope", self.optional_scope.clone())
            .with("force_confirm", self.force_confirm)
            .with("state", self.state.clone())
    }

    /// Validated and normalized fields.
    pub fn validate(&self) -> OAuthResult<FieldSet> {
        validate_fields(&Self::validator(), self.fields(), &self.config)
    }

    /// Validated query parameters, in wire order.
    pub fn query_params(&self) -> OAuthResult<Vec<(&'static str, String)>> {
        Ok(self.validate()?.to_wire_pairs(WIRE_NAMES))
    }

    /// Build the authorization URL.
    pub fn build_authorization_url(&self) -> OAuthResult<String> {
        let params = self.query_params()?;
        let mut url = endpoint_url(&self.config.endpoints().authorize_url())?;
        url.query_pairs_mut()
            .extend_pairs(params.iter().map(|(k, v)| (*k, v.as_str())));

        debug!(
            params = ?params.iter().map(|(k, _)| *k).collect::<Vec<_>>(),
            "Built authorization URL"
        );

        Ok(url.into())
    }
}
