//! Page handlers (landing page and protected content)

use axum::extract::{Query, State};
use axum::response::{Html, IntoResponse, Response};
use serde::Deserialize;

use crate::extractors::ClientSession;
use crate::handlers::found;
use crate::image;
use crate::state::AppState;
use crate::views;

#[derive(Debug, Deserialize)]
pub struct HomeQuery {
    pub error: Option<String>,
}

/// GET / - public landing page with current auth status
pub async fn home(
    State(state): State<AppState>,
    session: ClientSession,
    Query(query): Query<HomeQuery>,
) -> Html<String> {
    let user = match session.0 {
        Some(session_id) => state.flow.user_info(session_id).await,
        None => None,
    };

    Html(views::home_page(user.as_ref(), query.error.as_deref()))
}

/// GET /swans - protected; anonymous requests are sent to login
pub async fn swans(State(state): State<AppState>, session: ClientSession) -> Response {
    let user = match session.0 {
        Some(session_id) => state.flow.user_info(session_id).await,
        None => None,
    };

    let Some(user) = user else {
        return found("/login");
    };

    let swan_image = image::resolve_swan_image(&state.http).await;
    Html(views::swans_page(&user, &swan_image)).into_response()
}
