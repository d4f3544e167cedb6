//! Provider Requests
//!
//! Typed request objects. Each one validates its fields against the client
//! configuration before anything is sent.

pub mod code;
pub mod revoke;
pub mod token;
pub mod user_info;

pub use code::CodeRequest;
pub use revoke::RevokeRequest;
pub use token::{GrantType, TokenRequest};
pub use user_info::UserInfoRequest;

use tracing::debug;
use url::Url;

use crate::error::{ConfigurationError, OAuthError, OAuthResult};
use crate::types::ClientConfig;
use crate::validation::{FieldSet, Validator};

/// Run `validator` with the configuration as the default source.
pub(crate) fn validate_fields(
    validator: &Validator,
    fields: FieldSet,
    config: &ClientConfig,
) -> OAuthResult<FieldSet> {
    validator.run(fields, config).map_err(|e| {
        debug!(fields = ?e.fields(), "{}", e.message);
        OAuthError::from(e)
    })
}

/// Parse a configured endpoint.
pub(crate) fn endpoint_url(url: &str) -> OAuthResult<Url> {
    Url::parse(url).map_err(|_| {
        ConfigurationError::InvalidEndpoint {
            url: url.to_string(),
        }
        .into()
    })
}
