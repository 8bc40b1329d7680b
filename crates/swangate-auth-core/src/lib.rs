//! swangate-auth-core - OIDC relying-party core
//!
//! The login flow state machine, session storage, signed session cookie, and
//! the Cognito identity-provider capability behind it.

pub mod config;
pub mod crypto;
pub mod error;
pub mod flow;
pub mod provider;
pub mod session;

pub use config::OidcConfig;
pub use crypto::{constant_time_eq, constant_time_str_eq, random_token, HmacKey};
pub use error::AuthError;
pub use flow::{AuthFlow, CallbackParams};
pub use provider::{provider_http_client, CognitoProvider, IdentityProvider, ProviderHandle};
pub use session::{
    CookieCodec, MemorySessionStore, SessionId, SessionRecord, SessionStore, UserRecord,
};
