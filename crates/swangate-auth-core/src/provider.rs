//! Identity provider capability
//!
//! The login flow talks to the provider through the [`IdentityProvider`]
//! trait; [`CognitoProvider`] is the production implementation over the
//! `openidconnect` crate. Discovery runs once at startup and the result is
//! published through a [`ProviderHandle`], which models "not yet ready"
//! explicitly instead of a nullable global.

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use async_trait::async_trait;
use openidconnect::core::{CoreAuthenticationFlow, CoreClient, CoreProviderMetadata};
use openidconnect::{
    AccessToken, AuthorizationCode, ClientId, ClientSecret, CsrfToken, IssuerUrl, Nonce,
    OAuth2TokenResponse, RedirectUrl, Scope, TokenResponse,
};
use url::Url;

use crate::config::OidcConfig;
use crate::session::UserRecord;
use crate::AuthError;

/// Outbound provider calls are network I/O and must not hang
const PROVIDER_TIMEOUT: Duration = Duration::from_secs(10);

/// The subset of provider operations the login flow needs.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Build the authorization URL carrying the given state and nonce
    fn authorization_url(&self, state: &str, nonce: &str) -> Url;

    /// Exchange an authorization code for tokens, verifying the ID token
    /// against the stored nonce. Returns the access token.
    async fn exchange_code(&self, code: &str, nonce: &str) -> Result<AccessToken, AuthError>;

    /// Fetch user claims with an access token
    async fn fetch_user_info(&self, access_token: &AccessToken) -> Result<UserRecord, AuthError>;
}

/// HTTP client suitable for provider calls: bounded timeout, and no redirect
/// following (required to keep the token endpoint exchange non-forwardable).
pub fn provider_http_client() -> Result<reqwest::Client, AuthError> {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .timeout(PROVIDER_TIMEOUT)
        .build()
        .map_err(|e| AuthError::Internal(format!("failed to build HTTP client: {e}")))
}

/// Cognito-backed [`IdentityProvider`].
///
/// Stores the discovered provider metadata rather than a configured client;
/// the `openidconnect` client uses type-state generics that make it awkward
/// to hold, so it is rebuilt from metadata per call.
pub struct CognitoProvider {
    config: Arc<OidcConfig>,
    metadata: CoreProviderMetadata,
    http: reqwest::Client,
}

impl CognitoProvider {
    /// Run OIDC discovery against the configured issuer.
    ///
    /// Failure here is fatal to the process: the relying party must not
    /// serve authenticated routes without provider metadata.
    pub async fn discover(
        config: Arc<OidcConfig>,
        http: reqwest::Client,
    ) -> Result<Self, AuthError> {
        let issuer = IssuerUrl::new(config.issuer_url())
            .map_err(|e| AuthError::Configuration(format!("invalid issuer URL: {e}")))?;

        let metadata = CoreProviderMetadata::discover_async(issuer, &http)
            .await
            .map_err(|e| AuthError::Discovery(e.to_string()))?;

        Ok(Self {
            config,
            metadata,
            http,
        })
    }

    fn client(
        &self,
    ) -> CoreClient<
        openidconnect::EndpointSet,
        openidconnect::EndpointNotSet,
        openidconnect::EndpointNotSet,
        openidconnect::EndpointNotSet,
        openidconnect::EndpointMaybeSet,
        openidconnect::EndpointMaybeSet,
    > {
        CoreClient::from_provider_metadata(
            self.metadata.clone(),
            ClientId::new(self.config.client_id.clone()),
            Some(ClientSecret::new(self.config.client_secret.clone())),
        )
        .set_redirect_uri(RedirectUrl::from_url(self.config.redirect_uri.clone()))
    }
}

#[async_trait]
impl IdentityProvider for CognitoProvider {
    fn authorization_url(&self, state: &str, nonce: &str) -> Url {
        let state = state.to_owned();
        let nonce = nonce.to_owned();
        let client = self.client();
        let mut request = client.authorize_url(
            CoreAuthenticationFlow::AuthorizationCode,
            move || CsrfToken::new(state),
            move || Nonce::new(nonce),
        );
        for scope in &self.config.scopes {
            request = request.add_scope(Scope::new(scope.clone()));
        }
        let (url, _state, _nonce) = request.url();
        url
    }

    async fn exchange_code(&self, code: &str, nonce: &str) -> Result<AccessToken, AuthError> {
        let client = self.client();

        let token_response = client
            .exchange_code(AuthorizationCode::new(code.to_owned()))
            .map_err(|e| AuthError::TokenExchange(format!("token endpoint not configured: {e}")))?
            .request_async(&self.http)
            .await
            .map_err(|e| AuthError::TokenExchange(e.to_string()))?;

        // Verify the ID token (signature, issuer, audience, expiry, nonce)
        let id_token = token_response
            .id_token()
            .ok_or_else(|| AuthError::TokenExchange("no ID token in response".to_string()))?;

        id_token
            .claims(&client.id_token_verifier(), &Nonce::new(nonce.to_owned()))
            .map_err(|e| AuthError::TokenExchange(format!("ID token verification failed: {e}")))?;

        Ok(token_response.access_token().clone())
    }

    async fn fetch_user_info(&self, access_token: &AccessToken) -> Result<UserRecord, AuthError> {
        let claims: openidconnect::core::CoreUserInfoClaims = self
            .client()
            .user_info(access_token.clone(), None)
            .map_err(|e| AuthError::UserInfoFetch(format!("userinfo endpoint not configured: {e}")))?
            .request_async(&self.http)
            .await
            .map_err(|e| AuthError::UserInfoFetch(e.to_string()))?;

        // Round-trip through JSON so provider-specific claims survive in `extra`
        let value = serde_json::to_value(&claims)
            .map_err(|e| AuthError::UserInfoFetch(format!("unserializable claims: {e}")))?;
        serde_json::from_value(value)
            .map_err(|e| AuthError::UserInfoFetch(format!("unexpected claims shape: {e}")))
    }
}

/// Set-once handle to the identity provider.
///
/// Requests arriving before `set` observe `ServiceUnavailable` instead of a
/// crash; after `set` the handle is read-only.
#[derive(Clone, Default)]
pub struct ProviderHandle {
    inner: Arc<OnceLock<Arc<dyn IdentityProvider>>>,
}

impl ProviderHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish the initialized provider. Returns false if already set.
    pub fn set(&self, provider: Arc<dyn IdentityProvider>) -> bool {
        self.inner.set(provider).is_ok()
    }

    /// Get the provider, or `ServiceUnavailable` while initialization is
    /// still in flight.
    pub fn get(&self) -> Result<Arc<dyn IdentityProvider>, AuthError> {
        self.inner
            .get()
            .cloned()
            .ok_or(AuthError::ServiceUnavailable)
    }

    pub fn is_ready(&self) -> bool {
        self.inner.get().is_some()
    }
}

impl std::fmt::Debug for ProviderHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderHandle")
            .field("ready", &self.is_ready())
            .finish()
    }
}
