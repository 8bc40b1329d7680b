//! Client configuration for the OIDC relying party
//!
//! One immutable record per process. The deployment variants (region, pool,
//! redirect URI, logout URI) are all data here, never code.

use std::time::Duration;

use url::Url;

use crate::AuthError;

/// OIDC client configuration, loaded once at startup and never mutated.
#[derive(Clone)]
pub struct OidcConfig {
    /// AWS region (e.g., eu-north-1)
    pub aws_region: String,
    /// Cognito user pool ID (e.g., eu-north-1_xxxxx)
    pub user_pool_id: String,
    /// Cognito app client ID
    pub client_id: String,
    /// Cognito app client secret
    pub client_secret: String,
    /// Redirect URI registered with the provider; its path is the callback route
    pub redirect_uri: Url,
    /// Where the provider sends the browser after its own logout
    pub logout_uri: Url,
    /// Cognito hosted UI domain (hosts the end-session endpoint)
    pub hosted_domain: String,
    /// Scopes requested on login
    pub scopes: Vec<String>,
    /// Session time-to-live, measured from last write
    pub session_ttl: Duration,
}

impl OidcConfig {
    /// Create a new config with validated URIs and default scopes.
    #[allow(clippy::too_many_arguments)]
    pub fn try_new(
        aws_region: impl Into<String>,
        user_pool_id: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        redirect_uri: &str,
        logout_uri: &str,
        hosted_domain: impl Into<String>,
    ) -> Result<Self, AuthError> {
        let redirect_uri = Url::parse(redirect_uri.trim())
            .map_err(|e| AuthError::Configuration(format!("invalid redirect URI: {e}")))?;
        let logout_uri = Url::parse(logout_uri.trim())
            .map_err(|e| AuthError::Configuration(format!("invalid logout URI: {e}")))?;

        Ok(Self {
            aws_region: aws_region.into(),
            user_pool_id: user_pool_id.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            redirect_uri,
            logout_uri,
            hosted_domain: hosted_domain.into(),
            scopes: vec![
                "openid".to_string(),
                "email".to_string(),
                "profile".to_string(),
            ],
            session_ttl: Duration::from_secs(24 * 60 * 60),
        })
    }

    /// Get the Cognito issuer URL for OIDC discovery
    pub fn issuer_url(&self) -> String {
        format!(
            "https://cognito-idp.{}.amazonaws.com/{}",
            self.aws_region, self.user_pool_id
        )
    }

    /// Route path served as the OIDC callback, derived from the redirect URI
    pub fn callback_path(&self) -> String {
        let path = self.redirect_uri.path();
        if path.is_empty() {
            "/".to_string()
        } else {
            path.to_string()
        }
    }

    /// Cognito end-session endpoint the browser is sent to on logout
    pub fn end_session_url(&self) -> Url {
        let mut url = Url::parse(&format!("https://{}/logout", self.hosted_domain))
            .unwrap_or_else(|_| self.logout_uri.clone());
        url.query_pairs_mut()
            .append_pair("client_id", &self.client_id)
            .append_pair("logout_uri", self.logout_uri.as_str());
        url
    }

    /// Set requested scopes
    pub fn with_scopes(mut self, scopes: Vec<String>) -> Self {
        self.scopes = scopes;
        self
    }

    /// Set session time-to-live
    pub fn with_session_ttl(mut self, ttl: Duration) -> Self {
        self.session_ttl = ttl;
        self
    }
}

impl std::fmt::Debug for OidcConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OidcConfig")
            .field("aws_region", &self.aws_region)
            .field("user_pool_id", &self.user_pool_id)
            .field("client_id", &self.client_id)
            .field("client_secret", &"***REDACTED***")
            .field("redirect_uri", &self.redirect_uri.as_str())
            .field("logout_uri", &self.logout_uri.as_str())
            .field("hosted_domain", &self.hosted_domain)
            .field("scopes", &self.scopes)
            .field("session_ttl", &self.session_ttl)
            .finish()
    }
}
