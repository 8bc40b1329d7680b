//! swangate-web - OIDC-gated swan viewing app
//!
//! Route dispatch and HTTP plumbing around the `swangate-auth-core` login
//! flow.

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod image;
pub mod state;
pub mod views;

use axum::routing::get;
use axum::Router;

use crate::state::AppState;

/// Routes that are always present, regardless of configuration
const FIXED_ROUTES: &[&str] = &["/", "/swans", "/login", "/logout", "/health"];

/// Build the application router.
///
/// The callback route is derived from the configured redirect URI; a
/// redirect URI whose path collides with a fixed route falls back to
/// `/callback` rather than shadowing it.
pub fn router(state: AppState) -> Router {
    let mut callback_path = state.config.oidc.callback_path();
    if FIXED_ROUTES.contains(&callback_path.as_str()) {
        tracing::warn!(
            configured = %callback_path,
            "redirect URI path collides with a fixed route; serving callback at /callback"
        );
        callback_path = "/callback".to_string();
    }

    Router::new()
        .route("/", get(handlers::pages::home))
        .route("/swans", get(handlers::pages::swans))
        .route("/login", get(handlers::auth::login))
        .route(&callback_path, get(handlers::auth::callback))
        .route("/logout", get(handlers::auth::logout))
        .route("/health", get(handlers::health::health))
        .with_state(state)
}
