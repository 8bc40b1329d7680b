//! Login, callback, and logout handlers

use axum::extract::{Query, State};
use axum::http::header;
use axum::response::Response;
use serde::Deserialize;

use swangate_auth_core::{CallbackParams, SessionId};

use crate::error::ApiResult;
use crate::extractors::{ClientSession, SESSION_COOKIE};
use crate::handlers::found;
use crate::state::AppState;

/// Where the browser lands after a failed login attempt
const AUTH_FAILED_REDIRECT: &str = "/?error=auth_failed";

/// GET /login
///
/// Starts a login attempt and redirects to the provider's authorization
/// endpoint. Fails with 500 while the provider client is still initializing,
/// without touching any session.
pub async fn login(
    State(state): State<AppState>,
    session: ClientSession,
) -> ApiResult<Response> {
    let session_id = session.id_or_new();
    let auth_url = state.flow.initiate_login(session_id).await?;

    // The cookie is (re)issued on every initiation so a fresh browser gets
    // its session id before the provider redirects back
    let mut response = found(auth_url.as_str());
    response.headers_mut().insert(
        header::SET_COOKIE,
        session_cookie(&state, session_id)
            .parse()
            .map_err(|_| crate::error::ApiError::Internal("invalid cookie header".to_string()))?,
    );
    Ok(response)
}

/// Query parameters the provider may append to the callback redirect
#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

/// GET <callback path> (derived from the configured redirect URI)
///
/// Completes the login attempt. Every failure redirects to the landing page
/// with a generic error indicator; detail is logged server-side only.
pub async fn callback(
    State(state): State<AppState>,
    session: ClientSession,
    Query(query): Query<CallbackQuery>,
) -> Response {
    if let Some(ref error) = query.error {
        let description = query.error_description.as_deref().unwrap_or("unknown");
        tracing::warn!(error, description, "provider returned error on callback");
        return found(AUTH_FAILED_REDIRECT);
    }

    let Some(session_id) = session.0 else {
        tracing::warn!("callback without a session cookie");
        return found(AUTH_FAILED_REDIRECT);
    };

    let (Some(code), Some(callback_state)) = (query.code, query.state) else {
        tracing::warn!(%session_id, "callback missing code or state");
        return found(AUTH_FAILED_REDIRECT);
    };

    let params = CallbackParams {
        code,
        state: callback_state,
    };

    match state.flow.handle_callback(session_id, &params).await {
        Ok(user) => {
            tracing::info!(%session_id, sub = %user.sub, "callback succeeded");
            found("/swans")
        }
        Err(e) => {
            tracing::error!(%session_id, error = %e, "callback failed");
            found(AUTH_FAILED_REDIRECT)
        }
    }
}

/// GET /logout
///
/// Destroys the session (best effort), expires the cookie, and redirects to
/// the provider's end-session endpoint.
pub async fn logout(State(state): State<AppState>, session: ClientSession) -> Response {
    let logout_url = match session.0 {
        Some(session_id) => state.flow.logout(session_id).await,
        None => state.config.oidc.end_session_url(),
    };

    let mut response = found(logout_url.as_str());
    if let Ok(value) = clear_session_cookie(&state).parse() {
        response.headers_mut().insert(header::SET_COOKIE, value);
    }
    response
}

/// Build the Set-Cookie value carrying the signed session id
fn session_cookie(state: &AppState, session_id: SessionId) -> String {
    let mut cookie = format!(
        "{SESSION_COOKIE}={}; HttpOnly; SameSite=Lax; Path=/; Max-Age={}",
        state.codec.encode(session_id),
        state.config.oidc.session_ttl.as_secs(),
    );
    if state.config.cookie_secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Build the Set-Cookie value that expires the session cookie
fn clear_session_cookie(state: &AppState) -> String {
    let mut cookie = format!("{SESSION_COOKIE}=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0");
    if state.config.cookie_secure {
        cookie.push_str("; Secure");
    }
    cookie
}
