//! Configuration Types
//!
//! Registered application identity and provider endpoints.

use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;

use crate::builders::ClientConfigBuilder;
use crate::error::{ConfigurationError, OAuthResult, ValidationDetail, ValidationError};
use crate::validation::{DefaultSource, FieldValue};

/// Default OAuth host.
pub const DEFAULT_OAUTH_BASE_URL: &str = "https://oauth.yandex.ru";

/// Default Yandex ID (profile) host.
pub const DEFAULT_LOGIN_BASE_URL: &str = "https://login.yandex.ru";

/// Default request timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Provider endpoint configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Endpoints {
    /// Base of the authorize, token and revoke endpoints.
    pub oauth_base_url: String,
    /// Base of the user info endpoint.
    pub login_base_url: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            oauth_base_url: DEFAULT_OAUTH_BASE_URL.to_string(),
            login_base_url: DEFAULT_LOGIN_BASE_URL.to_string(),
        }
    }
}

impl Endpoints {
    pub fn authorize_url(&self) -> String {
        join_url(&self.oauth_base_url, "authorize")
    }

    pub fn token_url(&self) -> String {
        join_url(&self.oauth_base_url, "token")
    }

    pub fn revoke_url(&self) -> String {
        join_url(&self.oauth_base_url, "revoke_token")
    }

    pub fn user_info_url(&self) -> String {
        join_url(&self.login_base_url, "info")
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path)
}

/// Registered application configuration.
///
/// Built once through [`ClientConfigBuilder`], which trims and validates the
/// fields; read-only afterwards and shared by every request.
#[derive(Clone)]
pub struct ClientConfig {
    pub(crate) client_id: String,
    pub(crate) client_secret: SecretString,
    pub(crate) device_id: Option<String>,
    pub(crate) device_name: Option<String>,
    pub(crate) endpoints: Endpoints,
    pub(crate) timeout: Duration,
}

impl ClientConfig {
    /// Create a new configuration builder.
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::new()
    }

    /// Creates a configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `YANDEX_OAUTH_CLIENT_ID` (required)
    /// - `YANDEX_OAUTH_CLIENT_SECRET` (required)
    /// - `YANDEX_OAUTH_DEVICE_ID`, `YANDEX_OAUTH_DEVICE_NAME` (optional)
    /// - `YANDEX_OAUTH_BASE_URL`, `YANDEX_LOGIN_BASE_URL` (optional)
    /// - `YANDEX_OAUTH_TIMEOUT` (optional): request timeout in seconds
    pub fn from_env() -> OAuthResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`ClientConfig::from_env`] with a custom variable lookup.
    pub fn from_lookup<F>(lookup: F) -> OAuthResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = ClientConfigBuilder::new();

        if let Some(client_id) = lookup("YANDEX_OAUTH_CLIENT_ID") {
            builder = builder.client_id(client_id);
        }
        if let Some(client_secret) = lookup("YANDEX_OAUTH_CLIENT_SECRET") {
            builder = builder.client_secret(client_secret);
        }
        if let Some(device_id) = lookup("YANDEX_OAUTH_DEVICE_ID") {
            builder = builder.device_id(device_id);
        }
        if let Some(device_name) = lookup("YANDEX_OAUTH_DEVICE_NAME") {
            builder = builder.device_name(device_name);
        }
        if let Some(url) = lookup("YANDEX_OAUTH_BASE_URL") {
            builder = builder.oauth_base_url(url);
        }
        if let Some(url) = lookup("YANDEX_LOGIN_BASE_URL") {
            builder = builder.login_base_url(url);
        }
        if let Some(value) = lookup("YANDEX_OAUTH_TIMEOUT") {
            let secs = value.trim().parse::<u64>().map_err(|_| {
                ConfigurationError::Invalid(ValidationError::new(
                    "Invalid client configuration",
                    vec![ValidationDetail::new(
                        "timeout",
                        format!("YANDEX_OAUTH_TIMEOUT must be a whole number of seconds, got {:?}", value),
                    )],
                ))
            })?;
            builder = builder.timeout(Duration::from_secs(secs));
        }

        builder.build()
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub(crate) fn client_secret(&self) -> &str {
        self.client_secret.expose_secret()
    }

    pub fn device_id(&self) -> Option<&str> {
        self.device_id.as_deref()
    }

    pub fn device_name(&self) -> Option<&str> {
        self.device_name.as_deref()
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl DefaultSource for ClientConfig {
    fn default_for(&self, field: &str) -> Option<FieldValue> {
        match field {
            "client_id" => Some(FieldValue::from(self.client_id.as_str())),
            "client_secret" => Some(FieldValue::from(self.client_secret())),
            "device_id" => self.device_id.as_deref().map(FieldValue::from),
            "device_name" => self.device_name.as_deref().map(FieldValue::from),
            _ => None,
        }
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("device_id", &self.device_id)
            .field("device_name", &self.device_name)
            .field("endpoints", &self.endpoints)
            .field("timeout", &self.timeout)
            .finish()
    }
}
