//! Yandex OAuth Client
//!
//! Client side of the Yandex OAuth 2.0 authorization code and refresh token
//! flows, with token revocation and Yandex ID profile lookup.
//!
//! # Features
//!
//! - Authorization URL construction (`/authorize`)
//! - Code and refresh token exchange (`/token`)
//! - Token revocation (`/revoke_token`)
//! - User profile lookup (`login.yandex.ru/info`)
//! - Declarative request validation with defaults from the client configuration
//!
//! # Example
//!
//! ```rust,ignore
//! use yandex_oauth::{client_config, OAuthClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = client_config()
//!         .client_id("my-client-id")
//!         .client_secret("my-client-secret")
//!         .device_id("my-device-0001")
//!         .build()?;
//!
//!     let client = OAuthClient::new(config)?;
//!
//!     let url = client
//!         .code_request()
//!         .redirect_uri("https://myapp.example/callback")
//!         .scope(["login:info", "login:email"])
//!         .force_confirm(true)
//!         .build_authorization_url()?;
//!     println!("Authorization URL: {}", url);
//!
//!     // After the redirect back:
//!     let token = client.exchange_code("4731906").await?;
//!     let profile = client.user_info(&token).await?;
//!     println!("Signed in as {:?}", profile.login);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - `validation`: field rules and the validator shared by all requests
//! - `types`: configuration, token, profile and callback types
//! - `requests`: code, token, revoke and user info requests
//! - `core`: HTTP transport and session storage
//! - `error`: error hierarchy
//! - `builders`: fluent configuration builder
//! - `client`: high-level client and request factory

pub mod builders;
pub mod client;
pub mod core;
pub mod error;
pub mod requests;
pub mod types;
pub mod validation;

// Re-export main client
pub use client::{oauth_client, CompletedAuthorization, OAuthClient};

// Re-export builders
pub use builders::{client_config, ClientConfigBuilder};

// Re-export errors
pub use error::{
    get_user_message, parse_error_body, ConfigurationError, OAuthError, OAuthResult,
    ProtocolError, ProviderError, ProviderErrorBody, TokenError, TransportError,
    ValidationDetail, ValidationError,
};

// Re-export types
pub use types::{
    CallbackParams, ClientConfig, Endpoints, Phone, Token, UserInfo, DEFAULT_LOGIN_BASE_URL,
    DEFAULT_OAUTH_BASE_URL, DEFAULT_TIMEOUT_SECS,
};

// Re-export requests
pub use requests::{CodeRequest, GrantType, RevokeRequest, TokenRequest, UserInfoRequest};

// Re-export core components
pub use crate::core::{
    // Transport
    HttpMethod, HttpRequest, HttpResponse, HttpTransport, MockHttpTransport,
    ReqwestHttpTransport,
    // Session
    generate_state, InMemorySessionStore, SessionStore, DEFAULT_STATE_MAX_AGE,
};
