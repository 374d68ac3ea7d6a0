//! Session-cookie middleware for mtt-ui
//!
//! Validates the session cookie against the registry on every protected
//! request. The API surface rejects with 401 JSON; the page surface
//! redirects to the login form. Neither ever serves partial document data.

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde_json::json;
use uuid::Uuid;

use crate::AppState;

/// Session cookie name.
pub const SESSION_COOKIE: &str = "mtt_session";

/// Extract the session token from the Cookie header, if any.
fn session_token(request: &Request) -> Option<Uuid> {
    let cookies = request.headers().get(header::COOKIE)?.to_str().ok()?;
    cookies.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        if name == SESSION_COOKIE {
            Uuid::parse_str(value.trim()).ok()
        } else {
            None
        }
    })
}

fn is_authorized(state: &AppState, request: &Request) -> bool {
    match session_token(request) {
        Some(token) => state.sessions.is_authorized(&token),
        None => false,
    }
}

/// Middleware for the document API: 401 JSON on missing/expired session.
pub async fn require_session(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    if is_authorized(&state, &request) {
        Ok(next.run(request).await)
    } else {
        Err(AuthError::Unauthorized)
    }
}

/// Middleware for the main page: redirect to /login instead of erroring.
pub async fn require_session_page(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    if is_authorized(&state, &request) {
        next.run(request).await
    } else {
        Redirect::to("/login").into_response()
    }
}

/// Authentication error for HTTP responses. Deliberately generic: wrong
/// password, missing cookie and expired session all look the same.
#[derive(Debug)]
pub enum AuthError {
    Unauthorized,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": "Authentication required",
        }));
        (StatusCode::UNAUTHORIZED, body).into_response()
    }
}
