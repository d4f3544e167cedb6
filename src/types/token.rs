//! Token Types
//!
//! The issued access/refresh token pair and its expiry arithmetic.

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use super::scope::serde_scope;
use crate::error::{OAuthResult, ProtocolError, TokenError};

/// Access token issued by the provider.
///
/// Wire names are declared on the fields; `created_at` travels as
/// `create_time` (unix seconds) and is set to "now" when absent.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// Token type, always `bearer` for this provider.
    #[serde(rename = "token_type", default = "default_token_type")]
    pub token_type: String,
    /// Token value.
    #[serde(rename = "access_token")]
    pub access_token: String,
    /// Lifetime in seconds.
    #[serde(rename = "expires_in", default, skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<u64>,
    /// Token used to extend the lifetime of the access token.
    #[serde(rename = "refresh_token", default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// Granted scopes, reported when narrower than requested.
    #[serde(
        rename = "scope",
        default,
        with = "serde_scope",
        skip_serializing_if = "serde_scope::is_empty"
    )]
    pub scope: Option<Vec<String>>,
    #[serde(
        rename = "create_time",
        default = "Utc::now",
        with = "create_time"
    )]
    created_at: DateTime<Utc>,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

/// `create_time` as unix seconds; only positive values decode.
mod create_time {
    use chrono::{DateTime, TimeZone, Utc};
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        chrono::serde::ts_seconds::serialize(value, serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let timestamp = i64::deserialize(deserializer)?;
        if timestamp <= 0 {
            return Err(D::Error::custom(format!(
                "create_time must be a positive timestamp, got {}",
                timestamp
            )));
        }
        Utc.timestamp_opt(timestamp, 0)
            .single()
            .ok_or_else(|| D::Error::custom(format!("create_time out of range: {}", timestamp)))
    }
}

impl Token {
    /// Create a bearer token created now.
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            token_type: default_token_type(),
            access_token: access_token.into(),
            expires_in: None,
            refresh_token: None,
            scope: None,
            created_at: Utc::now(),
        }
    }

    /// Set lifetime in seconds.
    pub fn with_expires_in(mut self, expires_in: u64) -> Self {
        self.expires_in = Some(expires_in);
        self
    }

    /// Set refresh token.
    pub fn with_refresh_token(mut self, refresh_token: impl Into<String>) -> Self {
        self.refresh_token = Some(refresh_token.into());
        self
    }

    /// Set granted scopes; an empty list is stored as `None`.
    pub fn with_scope(mut self, scope: Vec<String>) -> Self {
        self.scope = if scope.is_empty() { None } else { Some(scope) };
        self
    }

    /// Parse the wire (JSON) form.
    pub fn from_json(json: &str) -> OAuthResult<Self> {
        serde_json::from_str(json).map_err(|e| {
            ProtocolError::InvalidJson {
                message: e.to_string(),
            }
            .into()
        })
    }

    /// Encode to the wire (JSON) form.
    pub fn to_json(&self) -> OAuthResult<String> {
        serde_json::to_string(self).map_err(|e| {
            ProtocolError::InvalidJson {
                message: e.to_string(),
            }
            .into()
        })
    }

    /// When the token was created.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Override the creation time. Non-positive timestamps are rejected.
    pub fn set_created_at(&mut self, created_at: DateTime<Utc>) -> OAuthResult<()> {
        let timestamp = created_at.timestamp();
        if timestamp <= 0 {
            return Err(TokenError::InvalidCreateTime { timestamp }.into());
        }
        self.created_at = created_at;
        Ok(())
    }

    /// Override the creation time from unix seconds.
    pub fn set_created_timestamp(&mut self, timestamp: i64) -> OAuthResult<()> {
        let created_at = Utc
            .timestamp_opt(timestamp, 0)
            .single()
            .ok_or(TokenError::InvalidCreateTime { timestamp })?;
        self.set_created_at(created_at)
    }

    /// `created_at + expires_in`; `None` when the lifetime is absent, zero
    /// or too large to represent.
    pub fn expire_time(&self) -> Option<DateTime<Utc>> {
        self.expires_in
            .filter(|secs| *secs > 0)
            .and_then(|secs| i64::try_from(secs).ok())
            .and_then(Duration::try_seconds)
            .and_then(|lifetime| self.created_at.checked_add_signed(lifetime))
    }

    /// Check if token is expired.
    pub fn is_expired(&self) -> bool {
        self.expire_time()
            .map(|exp| exp <= Utc::now())
            .unwrap_or(false)
    }

    /// Check if token expires within `threshold_secs`.
    pub fn is_expiring_soon(&self, threshold_secs: i64) -> bool {
        let Some(exp) = self.expire_time() else {
            return false;
        };
        Duration::try_seconds(threshold_secs)
            .and_then(|threshold| Utc::now().checked_add_signed(threshold))
            .is_some_and(|deadline| exp <= deadline)
    }

    /// Get remaining lifetime in seconds.
    pub fn remaining_lifetime(&self) -> Option<i64> {
        self.expire_time().map(|exp| {
            let now = Utc::now();
            if exp > now {
                (exp - now).num_seconds()
            } else {
                0
            }
        })
    }

    /// Check if has refresh token.
    pub fn has_refresh_token(&self) -> bool {
        self.refresh_token.as_deref().is_some_and(|t| !t.is_empty())
    }

    /// Granted scopes, empty when the provider did not report them.
    pub fn scopes(&self) -> &[String] {
        self.scope.as_deref().unwrap_or(&[])
    }

    pub fn has_scope(&self, scope: &str) -> bool {
        self.scopes().iter().any(|s| s == scope)
    }

    /// Format as Authorization header value.
    pub fn authorization_header(&self) -> String {
        format!("OAuth {}", self.access_token)
    }
}

impl std::fmt::Debug for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Token")
            .field("token_type", &self.token_type)
            .field("access_token", &"[REDACTED]")
            .field("expires_in", &self.expires_in)
            .field(
                "refresh_token",
                &self.refresh_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("scope", &self.scope)
            .field("created_at", &self.created_at)
            .finish()
    }
}
