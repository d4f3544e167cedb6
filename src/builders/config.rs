//! Configuration Builder
//!
//! Fluent builder for the client configuration.

use secrecy::SecretString;
use std::time::Duration;

use crate::error::{ConfigurationError, OAuthError, OAuthResult};
use crate::types::{ClientConfig, Endpoints, DEFAULT_TIMEOUT_SECS};
use crate::validation::{device_rules, FieldSet, NoDefaults, Rule, Validator};

/// Client configuration builder.
#[derive(Default)]
pub struct ClientConfigBuilder {
    client_id: Option<String>,
    client_secret: Option<String>,
    device_id: Option<String>,
    device_name: Option<String>,
    endpoints: Endpoints,
    timeout: Option<Duration>,
}

impl ClientConfigBuilder {
    /// Create new configuration builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set client ID.
    pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    /// Set client secret.
    pub fn client_secret(mut self, client_secret: impl Into<String>) -> Self {
        self.client_secret = Some(client_secret.into());
        self
    }

    /// Set the device identifier sent with every request by default.
    pub fn device_id(mut self, device_id: impl Into<String>) -> Self {
        self.device_id = Some(device_id.into());
        self
    }

    /// Set the device name shown to the user.
    pub fn device_name(mut self, device_name: impl Into<String>) -> Self {
        self.device_name = Some(device_name.into());
        self
    }

    /// Override the OAuth host.
    pub fn oauth_base_url(mut self, url: impl Into<String>) -> Self {
        self.endpoints.oauth_base_url = url.into();
        self
    }

    /// Override the Yandex ID host used for user info.
    pub fn login_base_url(mut self, url: impl Into<String>) -> Self {
        self.endpoints.login_base_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    fn validator() -> Validator {
        let mut rules = vec![
            Rule::trim("client_id"),
            Rule::required("client_id"),
            Rule::trim("client_secret"),
            Rule::required("client_secret"),
        ];
        rules.extend(device_rules());
        rules.extend([
            Rule::trim("oauth_base_url"),
            Rule::required("oauth_base_url"),
            Rule::Url("oauth_base_url"),
            Rule::trim("login_base_url"),
            Rule::required("login_base_url"),
            Rule::Url("login_base_url"),
        ]);
        Validator::new("Invalid client configuration", rules)
    }

    /// Build the client configuration.
    pub fn build(self) -> OAuthResult<ClientConfig> {
        let client_id = self.client_id.ok_or_else(|| {
            OAuthError::Configuration(ConfigurationError::MissingField {
                field: "client_id".to_string(),
            })
        })?;

        let client_secret = self.client_secret.ok_or_else(|| {
            OAuthError::Configuration(ConfigurationError::MissingField {
                field: "client_secret".to_string(),
            })
        })?;

        let fields = FieldSet::new()
            .with("client_id", client_id)
            .with("client_secret", client_secret)
            .with("device_id", self.device_id)
            .with("device_name", self.device_name)
            .with("oauth_base_url", self.endpoints.oauth_base_url)
            .with("login_base_url", self.endpoints.login_base_url);

        let fields = Self::validator()
            .run(fields, &NoDefaults)
            .map_err(|e| OAuthError::Configuration(ConfigurationError::Invalid(e)))?;

        let text = |name: &str| fields.get_str(name).map(String::from);

        Ok(ClientConfig {
            client_id: text("client_id").unwrap_or_default(),
            client_secret: SecretString::new(text("client_secret").unwrap_or_default()),
            device_id: text("device_id"),
            device_name: text("device_name"),
            endpoints: Endpoints {
                oauth_base_url: text("oauth_base_url").unwrap_or_default(),
                login_base_url: text("login_base_url").unwrap_or_default(),
            },
            timeout: self
                .timeout
                .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
        })
    }
}

/// Create a new client configuration builder.
pub fn client_config() -> ClientConfigBuilder {
    ClientConfigBuilder::new()
}
