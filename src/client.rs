//! Yandex OAuth Client
//!
//! Pairs the client configuration with a transport and hands out requests.

use std::sync::Arc;
use tracing::{debug, warn};

use crate::core::{
    generate_state, HttpTransport, ReqwestHttpTransport, SessionStore, DEFAULT_MAX_RESPONSE_SIZE,
};
use crate::error::{OAuthResult, ProviderError};
use crate::requests::{CodeRequest, GrantType, RevokeRequest, TokenRequest, UserInfoRequest};
use crate::types::{CallbackParams, ClientConfig, Token, UserInfo};

/// Outcome of a completed redirect flow.
#[derive(Debug)]
pub struct CompletedAuthorization {
    pub token: Token,
    /// Page the user started from, if one was saved.
    pub client_url: Option<String>,
}

/// Yandex OAuth client.
pub struct OAuthClient<T: HttpTransport = ReqwestHttpTransport> {
    config: Arc<ClientConfig>,
    transport: Arc<T>,
}

impl OAuthClient<ReqwestHttpTransport> {
    /// Create a client with the reqwest transport.
    pub fn new(config: ClientConfig) -> OAuthResult<Self> {
        let transport = ReqwestHttpTransport::with_options(config.timeout(), DEFAULT_MAX_RESPONSE_SIZE)?;
        Ok(Self::with_transport(config, transport))
    }

    /// Create a client configured from environment variables.
    pub fn from_env() -> OAuthResult<Self> {
        Self::new(ClientConfig::from_env()?)
    }
}

impl<T: HttpTransport> OAuthClient<T> {
    /// Create a client with a custom transport.
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self {
            config: Arc::new(config),
            transport: Arc::new(transport),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn code_request(&self) -> CodeRequest {
        CodeRequest::new(self.config.clone())
    }

    pub fn token_request(&self) -> TokenRequest<T> {
        TokenRequest::new(self.config.clone(), self.transport.clone())
    }

    pub fn revoke_request(&self) -> RevokeRequest<T> {
        RevokeRequest::new(self.config.clone(), self.transport.clone())
    }

    pub fn user_info_request(&self, oauth_token: impl Into<String>) -> UserInfoRequest<T> {
        UserInfoRequest::new(self.config.clone(), self.transport.clone(), oauth_token)
    }

    // ========== Authorization ==========

    /// Authorization URL for `redirect_uri` and `scopes`.
    pub fn authorization_url<I, S>(&self, redirect_uri: &str, scopes: I) -> OAuthResult<String>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.code_request()
            .redirect_uri(redirect_uri)
            .scope(scopes)
            .build_authorization_url()
    }

    /// Start the redirect flow for a session.
    ///
    /// A fresh `state` is set on `request` and saved in `store`, together with
    /// the page to return the user to afterwards.
    pub fn start_authorization(
        &self,
        store: &dyn SessionStore,
        session: &str,
        client_url: Option<&str>,
        request: CodeRequest,
    ) -> OAuthResult<String> {
        let state = generate_state();
        let url = request.state(state.as_str()).build_authorization_url()?;

        store.save_state(session, &state);
        if let Some(client_url) = client_url {
            store.save_client_url(session, client_url);
        }

        Ok(url)
    }

    /// Finish the redirect flow started with [`OAuthClient::start_authorization`].
    pub async fn complete_authorization(
        &self,
        store: &dyn SessionStore,
        session: &str,
        callback_url: &str,
    ) -> OAuthResult<CompletedAuthorization> {
        let params = CallbackParams::from_url_str(callback_url)?;

        // The state is spent whether the provider granted access or not.
        let pending = params
            .state
            .as_deref()
            .is_some_and(|state| store.consume_state(session, state));

        if !params.is_error() && !pending {
            warn!("Callback state is not pending for this session");
            return Err(ProviderError::StateMismatch {
                expected: "pending session state".to_string(),
                received: params.state,
            }
            .into());
        }

        let token = self.exchange_code(&params.into_code()?).await?;

        Ok(CompletedAuthorization {
            token,
            client_url: store.client_url(session),
        })
    }

    /// Parse the callback URL, check `state` and exchange the code.
    ///
    /// A provider `error` redirect is reported before the state is compared.
    pub async fn handle_callback(&self, callback_url: &str, expected_state: &str) -> OAuthResult<Token> {
        let params = CallbackParams::from_url_str(callback_url)?;
        debug!(success = params.is_success(), "Handling authorization callback");

        if !params.is_error() {
            params.verify_state(expected_state)?;
        }

        let code = params.into_code()?;
        self.exchange_code(&code).await
    }

    // ========== Tokens ==========

    /// Exchange an authorization code for a token.
    pub async fn exchange_code(&self, code: &str) -> OAuthResult<Token> {
        self.token_request().code(code).exchange().await
    }

    /// Refresh using the refresh token carried by `token`.
    pub async fn refresh(&self, token: &Token) -> OAuthResult<Token> {
        self.refresh_token(token.refresh_token.as_deref().unwrap_or_default())
            .await
    }

    /// Exchange a refresh token for a new token.
    pub async fn refresh_token(&self, refresh_token: &str) -> OAuthResult<Token> {
        self.token_request()
            .grant_type(GrantType::RefreshToken)
            .refresh_token(refresh_token)
            .exchange()
            .await
    }

    /// Revoke an access token.
    pub async fn revoke(&self, access_token: &str) -> OAuthResult<()> {
        self.revoke_request().access_token(access_token).revoke().await
    }

    // ========== User Info ==========

    /// Fetch the profile of the token owner.
    pub async fn user_info(&self, token: &Token) -> OAuthResult<UserInfo> {
        self.user_info_request(token.access_token.as_str()).fetch().await
    }
}

/// Create a new client with the reqwest transport.
pub fn oauth_client(config: ClientConfig) -> OAuthResult<OAuthClient> {
    OAuthClient::new(config)
}
