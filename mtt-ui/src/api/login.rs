//! Login and logout handlers
//!
//! POST /login establishes a session from the shared password and sets the
//! session cookie; failures redirect back to the form with a generic error
//! flag, never distinguishing the cause. GET /logout invalidates the
//! session immediately.

use axum::{
    extract::{Query, Request, State},
    http::header,
    response::{AppendHeaders, Html, IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use super::auth::SESSION_COOKIE;
use crate::AppState;

const LOGIN_HTML: &str = include_str!("../ui/login.html");

/// Session cookie lifetime in seconds, matching the 24-hour session TTL.
const COOKIE_MAX_AGE_SECS: u64 = 24 * 60 * 60;

#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub password: String,
}

/// GET /login
///
/// Login form. `?error=1` shows the generic invalid-credentials banner.
pub async fn login_page(Query(query): Query<LoginQuery>) -> Html<String> {
    let display = if query.error.is_some() { "block" } else { "none" };
    Html(LOGIN_HTML.replace("__ERROR_DISPLAY__", display))
}

/// POST /login
///
/// Establish or deny a session.
pub async fn login(State(state): State<AppState>, Form(form): Form<LoginForm>) -> Response {
    match state.sessions.authenticate(&form.password) {
        Some(session) => {
            info!("login succeeded, session valid until {}", session.expires_at);
            let cookie = format!(
                "{}={}; HttpOnly; Path=/; Max-Age={}",
                SESSION_COOKIE, session.token, COOKIE_MAX_AGE_SECS
            );
            (
                AppendHeaders([(header::SET_COOKIE, cookie)]),
                Redirect::to("/"),
            )
                .into_response()
        }
        None => {
            info!("login failed");
            Redirect::to("/login?error=1").into_response()
        }
    }
}

/// GET /logout
///
/// Invalidate the current session and clear the cookie.
pub async fn logout(State(state): State<AppState>, request: Request) -> Response {
    if let Some(token) = request_token(&request) {
        state.sessions.logout(&token);
    }
    let clear = format!("{}=; HttpOnly; Path=/; Max-Age=0", SESSION_COOKIE);
    (
        AppendHeaders([(header::SET_COOKIE, clear)]),
        Redirect::to("/login"),
    )
        .into_response()
}

fn request_token(request: &Request) -> Option<Uuid> {
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
