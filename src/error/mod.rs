//! Yandex OAuth Error Types
//!
//! Error hierarchy for request validation, transport, provider and protocol failures.

use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

/// Root error type for the Yandex OAuth client.
#[derive(Error, Debug)]
pub enum OAuthError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("Token error: {0}")]
    Token(#[from] TokenError),
}

impl OAuthError {
    /// Get error code for telemetry.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "YANDEX_OAUTH_CONFIG",
            Self::Validation(_) => "YANDEX_OAUTH_VALIDATION",
            Self::Transport(_) => "YANDEX_OAUTH_TRANSPORT",
            Self::Provider(_) => "YANDEX_OAUTH_PROVIDER",
            Self::Protocol(_) => "YANDEX_OAUTH_PROTOCOL",
            Self::Token(_) => "YANDEX_OAUTH_TOKEN",
        }
    }

    /// Check if error is retryable.
    ///
    /// Only transport-level failures qualify; the caller owns the retry policy.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_retryable(),
            _ => false,
        }
    }

    /// Check if error requires the user to authorize again.
    pub fn needs_reauth(&self) -> bool {
        match self {
            Self::Provider(ProviderError::TokenNotIssued { error, .. }) => {
                error.as_deref() == Some("invalid_grant")
            }
            Self::Provider(ProviderError::AuthorizationDenied { .. }) => true,
            Self::Transport(TransportError::HttpStatus { status: 401, .. }) => true,
            _ => false,
        }
    }

    /// HTTP status code, when the failure carries one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Transport(e) => e.status(),
            _ => None,
        }
    }

    /// Field-level details for validation failures.
    pub fn validation_details(&self) -> &[ValidationDetail] {
        match self {
            Self::Validation(e) => &e.details,
            Self::Configuration(ConfigurationError::Invalid(e)) => &e.details,
            _ => &[],
        }
    }
}

/// Configuration error.
#[derive(Error, Debug)]
pub enum ConfigurationError {
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("Invalid configuration: {0}")]
    Invalid(ValidationError),

    #[error("Invalid endpoint URL: {url}")]
    InvalidEndpoint { url: String },

    #[error("Failed to create HTTP client: {message}")]
    HttpClient { message: String },
}

/// Validation detail for field-level errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationDetail {
    pub field: String,
    pub description: String,
}

impl ValidationDetail {
    pub fn new(field: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            description: description.into(),
        }
    }
}

/// One or more fields failed their declared rules. No request was sent.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}: {}", summarize_details(.details))]
pub struct ValidationError {
    pub message: String,
    pub details: Vec<ValidationDetail>,
}

impl ValidationError {
    pub fn new(message: impl Into<String>, details: Vec<ValidationDetail>) -> Self {
        Self {
            message: message.into(),
            details,
        }
    }

    /// Check whether the given field is among the failures.
    pub fn has_field(&self, field: &str) -> bool {
        self.details.iter().any(|d| d.field == field)
    }

    /// Names of all failing fields, in report order.
    pub fn fields(&self) -> Vec<&str> {
        self.details.iter().map(|d| d.field.as_str()).collect()
    }
}

fn summarize_details(details: &[ValidationDetail]) -> String {
    details
        .iter()
        .map(|d| format!("{} ({})", d.field, d.description))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Network/transport error.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("HTTP error: {status}")]
    HttpStatus { status: u16, body: String },

    #[error("Connection failed: {message}")]
    ConnectionFailed { message: String },

    #[error("Request timeout after {timeout:?}")]
    Timeout { timeout: Duration },
}

impl TransportError {
    /// Check if error is retryable.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::HttpStatus { status, .. } => *status == 429 || *status >= 500,
            Self::ConnectionFailed { .. } | Self::Timeout { .. } => true,
        }
    }

    /// HTTP status code, if the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Business-level failure reported by the provider in a successful HTTP exchange.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Access token not issued: {message}")]
    TokenNotIssued {
        error: Option<String>,
        message: String,
    },

    #[error("Token revocation failed: {message}")]
    RevocationFailed {
        error: Option<String>,
        message: String,
    },

    #[error("User info request failed: {message}")]
    UserInfoFailed {
        error: Option<String>,
        message: String,
    },

    #[error("Authorization denied: {message}")]
    AuthorizationDenied { error: String, message: String },

    #[error("State parameter mismatch (possible CSRF attack)")]
    StateMismatch {
        expected: String,
        received: Option<String>,
    },
}

impl ProviderError {
    /// Provider error code, if one was returned.
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::TokenNotIssued { error, .. }
            | Self::RevocationFailed { error, .. }
            | Self::UserInfoFailed { error, .. } => error.as_deref(),
            Self::AuthorizationDenied { error, .. } => Some(error),
            Self::StateMismatch { .. } => None,
        }
    }
}

/// Protocol/response parsing error.
#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("Invalid JSON: {message}")]
    InvalidJson { message: String },

    #[error("Invalid URL {url}: {message}")]
    InvalidUrl { url: String, message: String },

    #[error("Unexpected redirect to: {location}")]
    UnexpectedRedirect { location: String },

    #[error("Response too large: {size} bytes")]
    ResponseTooLarge { size: usize },
}

/// Token entity error.
#[derive(Error, Debug)]
pub enum TokenError {
    #[error("Invalid token creation time: {timestamp}")]
    InvalidCreateTime { timestamp: i64 },
}

/// Result type for Yandex OAuth operations.
pub type OAuthResult<T> = Result<T, OAuthError>;

/// Error body returned by the provider.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProviderErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub error_description: Option<String>,
}

impl ProviderErrorBody {
    /// Read the error fields out of an already parsed body.
    pub fn from_value(value: &serde_json::Value) -> Self {
        let field = |name: &str| {
            value
                .get(name)
                .and_then(|v| v.as_str())
                .filter(|s| !s.is_empty())
                .map(String::from)
        };

        Self {
            error: field("error"),
            error_description: field("error_description"),
        }
    }

    /// Description, then error code, then the fallback.
    pub fn message_or(&self, fallback: &str) -> String {
        self.error_description
            .clone()
            .or_else(|| self.error.clone())
            .unwrap_or_else(|| fallback.to_string())
    }
}

/// Parse error body from HTTP response text.
pub fn parse_error_body(body: &str) -> Option<ProviderErrorBody> {
    serde_json::from_str(body).ok()
}

/// Get user-friendly error message.
pub fn get_user_message(error: &OAuthError) -> String {
    match error {
        OAuthError::Validation(_) => {
            "Some of the request parameters are invalid. Please check them and try again."
                .to_string()
        }
        OAuthError::Provider(ProviderError::AuthorizationDenied { .. }) => {
            "Access was denied. Please try signing in again and grant the requested permissions."
                .to_string()
        }
        OAuthError::Provider(ProviderError::StateMismatch { .. }) => {
            "Security validation failed. Please restart the sign-in process.".to_string()
        }
        e if e.needs_reauth() => "Your session has expired. Please sign in again.".to_string(),
        OAuthError::Transport(TransportError::Timeout { .. }) => {
            "The request timed out. Please check your connection and try again.".to_string()
        }
        OAuthError::Transport(e) if e.is_retryable() => {
            "The authentication service is temporarily unavailable. Please try again later."
                .to_string()
        }
        _ => "An authentication error occurred. Please try again.".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_is_retryable() {
        assert!(OAuthError::Transport(TransportError::Timeout {
            timeout: Duration::from_secs(30)
        })
        .is_retryable());
        assert!(OAuthError::Transport(TransportError::HttpStatus {
            status: 503,
            body: String::new()
        })
        .is_retryable());
        assert!(!OAuthError::Transport(TransportError::HttpStatus {
            status: 400,
            body: String::new()
        })
        .is_retryable());
        assert!(!OAuthError::Provider(ProviderError::TokenNotIssued {
            error: Some("invalid_grant".to_string()),
            message: "invalid_grant".to_string(),
        })
        .is_retryable());
    }

    #[test]
    fn test_needs_reauth() {
        let error = OAuthError::Provider(ProviderError::TokenNotIssued {
            error: Some("invalid_grant".to_string()),
            message: "Code has expired".to_string(),
        });
        assert!(error.needs_reauth());

        let error = OAuthError::Provider(ProviderError::TokenNotIssued {
            error: Some("invalid_client".to_string()),
            message: "Client not found".to_string(),
        });
        assert!(!error.needs_reauth());

        assert!(OAuthError::Transport(TransportError::HttpStatus {
            status: 401,
            body: String::new()
        })
        .needs_reauth());
    }

    #[test]
    fn test_validation_error_display_names_fields() {
        let error = ValidationError::new(
            "Invalid token request",
            vec![
                ValidationDetail::new("code", "code is required"),
                ValidationDetail::new("device_id", "device_id must be at least 6 characters"),
            ],
        );

        let text = error.to_string();
        assert!(text.contains("code (code is required)"));
        assert!(text.contains("device_id"));
        assert!(error.has_field("code"));
        assert!(!error.has_field("refresh_token"));
        assert_eq!(error.fields(), vec!["code", "device_id"]);
    }

    #[test]
    fn test_parse_error_body() {
        let body = r#"{"error":"invalid_grant","error_description":"Code has expired"}"#;
        let parsed = parse_error_body(body).unwrap();
        assert_eq!(parsed.error.as_deref(), Some("invalid_grant"));
        assert_eq!(parsed.message_or("fallback"), "Code has expired");

        let parsed = parse_error_body(r#"{"error":"invalid_grant"}"#).unwrap();
        assert_eq!(parsed.message_or("fallback"), "invalid_grant");

        assert_eq!(ProviderErrorBody::default().message_or("fallback"), "fallback");
        assert!(parse_error_body("not json").is_none());
    }

    #[test]
    fn test_error_body_from_value_ignores_empty_strings() {
        let value = serde_json::json!({"error": "", "error_description": "bad token"});
        let body = ProviderErrorBody::from_value(&value);
        assert!(body.error.is_none());
        assert_eq!(body.message_or("fallback"), "bad token");
    }

    #[test]
    fn test_user_message() {
        let error = OAuthError::Transport(TransportError::Timeout {
            timeout: Duration::from_secs(5),
        });
        assert!(get_user_message(&error).contains("timed out"));

        let error = OAuthError::Provider(ProviderError::TokenNotIssued {
            error: Some("invalid_grant".to_string()),
            message: "expired".to_string(),
        });
        assert!(get_user_message(&error).contains("sign in again"));
    }
}
