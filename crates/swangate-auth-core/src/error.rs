//! Auth errors

use thiserror::Error;

/// Errors produced by the login flow and its collaborators
#[derive(Error, Debug)]
pub enum AuthError {
    /// Identity provider client has not finished initializing
    #[error("authentication service not available")]
    ServiceUnavailable,

    /// Callback state does not match the state stored in the session.
    /// Treated as a forged or replayed callback.
    #[error("callback state mismatch")]
    StateMismatch,

    /// Provider rejected the authorization code or nonce
    #[error("token exchange failed: {0}")]
    TokenExchange(String),

    /// Provider rejected the user info request
    #[error("user info fetch failed: {0}")]
    UserInfoFetch(String),

    /// Provider metadata discovery failed. Fatal at startup.
    #[error("provider discovery failed: {0}")]
    Discovery(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Internal error
    #[error("internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::ServiceUnavailable => 500,
            Self::StateMismatch => 400,
            Self::TokenExchange(_) | Self::UserInfoFetch(_) => 502,
            Self::Discovery(_) | Self::Configuration(_) | Self::Internal(_) => 500,
        }
    }
}
