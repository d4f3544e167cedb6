//! Callback Types
//!
//! Parameters of the provider's redirect back to the application.

use url::Url;

use crate::error::{OAuthResult, ProtocolError, ProviderError};

/// Callback parameters from the authorization redirect.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CallbackParams {
    /// Authorization code (if success).
    pub code: Option<String>,
    /// State parameter echoed back by the provider.
    pub state: Option<String>,
    /// Error code (if authorization failed).
    pub error: Option<String>,
    /// Error description.
    pub error_description: Option<String>,
}

impl CallbackParams {
    /// Parse callback parameters from URL. Empty values count as absent.
    pub fn from_url(url: &Url) -> Self {
        let mut params = Self::default();

        for (key, value) in url.query_pairs() {
            if value.is_empty() {
                continue;
            }
            let slot = match key.as_ref() {
                "code" => &mut params.code,
                "state" => &mut params.state,
                "error" => &mut params.error,
                "error_description" => &mut params.error_description,
                _ => continue,
            };
            *slot = Some(value.into_owned());
        }

        params
    }

    /// Parse callback parameters from URL string.
    pub fn from_url_str(url_str: &str) -> OAuthResult<Self> {
        let url = Url::parse(url_str).map_err(|e| ProtocolError::InvalidUrl {
            url: url_str.to_string(),
            message: e.to_string(),
        })?;
        Ok(Self::from_url(&url))
    }

    /// Check if callback contains an error.
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Check if callback is successful.
    pub fn is_success(&self) -> bool {
        self.code.is_some() && self.error.is_none()
    }

    /// Check `state` against the value issued with the authorization URL.
    pub fn verify_state(&self, expected: &str) -> Result<(), ProviderError> {
        if self.state.as_deref() == Some(expected) {
            Ok(())
        } else {
            Err(ProviderError::StateMismatch {
                expected: expected.to_string(),
                received: self.state.clone(),
            })
        }
    }

    /// The authorization code, or the error the provider redirected with.
    pub fn into_code(self) -> Result<String, ProviderError> {
        if let Some(error) = self.error {
            let message = self
                .error_description
                .unwrap_or_else(|| error.clone());
            return Err(ProviderError::AuthorizationDenied { error, message });
        }

        self.code.ok_or_else(|| ProviderError::AuthorizationDenied {
            error: "missing_code".to_string(),
            message: "Callback carries neither a code nor an error".to_string(),
        })
    }
}
