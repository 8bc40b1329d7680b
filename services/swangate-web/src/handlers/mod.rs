//! HTTP handlers

pub mod auth;
pub mod health;
pub mod pages;

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

/// 302 Found redirect (browser-driven flows expect 302, not 303/307)
pub(crate) fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}
