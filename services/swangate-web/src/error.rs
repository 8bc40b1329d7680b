//! Error boundary for the web service.
//!
//! Auth-flow failures are handled inside the callback handler (they become a
//! redirect with a generic error indicator); anything reaching this boundary
//! renders the error view with a 500.

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};

use swangate_auth_core::AuthError;

use crate::views;

/// Handler-level error
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Auth(e) => {
                StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        tracing::error!(error = %self, status = %status, "request failed");

        let message = match &self {
            ApiError::Auth(AuthError::ServiceUnavailable) => "Authentication service not available",
            _ => "Something went wrong!",
        };

        // Internal detail is exposed only in development mode
        let detail = if std::env::var("APP_ENV").as_deref() == Ok("development") {
            Some(self.to_string())
        } else {
            None
        };

        (status, Html(views::error_page(message, detail.as_deref()))).into_response()
    }
}

/// Result type for handlers
pub type ApiResult<T> = Result<T, ApiError>;
