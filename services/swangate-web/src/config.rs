//! Configuration for the web service.
//!
//! Everything comes from the environment with a local-dev fallback; the
//! insecure defaults exist so the app starts on a laptop, and are a
//! deployment concern beyond that.

use std::time::Duration;

use swangate_auth_core::OidcConfig;

/// Web service configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub port: u16,

    /// Session cookie signing secret (minimum 32 bytes)
    pub session_secret: String,

    /// Emit the `Secure` cookie attribute. Off by default: the reference
    /// deployment sits behind a plain-HTTP load balancer. Enable whenever
    /// TLS is confirmed end to end.
    pub cookie_secure: bool,

    /// OIDC client configuration
    pub oidc: OidcConfig,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = env_or("PORT", "3000")
            .parse()
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let session_secret = env_or(
            "SESSION_SECRET",
            "insecure-dev-session-secret-change-in-production",
        );
        if session_secret.len() < 32 {
            return Err(ConfigError::Invalid(
                "SESSION_SECRET must be at least 32 characters",
            ));
        }

        let session_duration_hours: u64 = env_or("SESSION_DURATION_HOURS", "24")
            .parse()
            .map_err(|_| ConfigError::Invalid("SESSION_DURATION_HOURS"))?;

        let cookie_secure = env_or("COOKIE_SECURE", "false")
            .parse()
            .map_err(|_| ConfigError::Invalid("COOKIE_SECURE"))?;

        let region = std::env::var("COGNITO_REGION")
            .or_else(|_| std::env::var("AWS_REGION"))
            .unwrap_or_else(|_| "eu-north-1".to_string());
        let user_pool_id = env_or("COGNITO_USER_POOL_ID", "eu-north-1_EXAMPLE");
        let client_id = env_or("COGNITO_CLIENT_ID", "local-dev-client-id");
        let client_secret = env_or("COGNITO_CLIENT_SECRET", "local-dev-client-secret");
        let redirect_uri = env_or("REDIRECT_URI", "http://localhost:3000/callback");
        let logout_uri = env_or("LOGOUT_URI", "http://localhost:3000");
        let hosted_domain = env_or(
            "COGNITO_DOMAIN",
            "example.auth.eu-north-1.amazoncognito.com",
        );

        let mut oidc = OidcConfig::try_new(
            region,
            user_pool_id,
            client_id,
            client_secret,
            &redirect_uri,
            &logout_uri,
            hosted_domain,
        )
        .map_err(|e| ConfigError::Oidc(e.to_string()))?
        .with_session_ttl(Duration::from_secs(session_duration_hours * 3600));

        // Space-separated scope override, e.g. "openid email"
        if let Ok(scopes) = std::env::var("COGNITO_SCOPES") {
            oidc = oidc.with_scopes(scopes.split_whitespace().map(str::to_string).collect());
        }

        Ok(Self {
            port,
            session_secret,
            cookie_secure,
            oidc,
        })
    }
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for environment variable: {0}")]
    Invalid(&'static str),

    #[error("OIDC config error: {0}")]
    Oidc(String),
}
