//! Session cookie extraction

use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use axum::http::header;

use swangate_auth_core::SessionId;

use crate::state::AppState;

/// Name of the session cookie
pub const SESSION_COOKIE: &str = "swangate_session";

/// The session id presented by the browser, if any.
///
/// Infallible: an absent, malformed, or tampered cookie yields `None` and
/// the request proceeds anonymously.
#[derive(Debug, Clone, Copy)]
pub struct ClientSession(pub Option<SessionId>);

impl ClientSession {
    /// The presented id, or a freshly minted one for a new session
    pub fn id_or_new(&self) -> SessionId {
        self.0.unwrap_or_else(SessionId::new)
    }
}

impl<S> FromRequestParts<S> for ClientSession
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);

        let id = cookie_value(parts, SESSION_COOKIE)
            .and_then(|value| app_state.codec.decode(&value));
        if id.is_none() && parts.headers.contains_key(header::COOKIE) {
            tracing::trace!("request carried no valid session cookie");
        }

        Ok(ClientSession(id))
    }
}

/// Find a cookie by name across all Cookie headers
fn cookie_value(parts: &Parts, name: &str) -> Option<String> {
    for header_value in parts.headers.get_all(header::COOKIE) {
        let Ok(cookie_str) = header_value.to_str() else {
            continue;
        };
        for cookie in cookie_str.split(';') {
            if let Some((k, v)) = cookie.trim().split_once('=') {
                if k == name {
                    return Some(v.to_string());
                }
            }
        }
    }
    None
}
