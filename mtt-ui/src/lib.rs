//! mtt-ui library - web service over the shared training document
//!
//! Session-gated CRUD over one JSON document: authorized clients read the
//! whole document, mutate it locally, and write it back wholesale.

use std::sync::Arc;

use axum::Router;
use mtt_common::session::SessionRegistry;
use mtt_common::store::DocumentStore;
use tower_http::trace::TraceLayer;

pub mod api;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// The single persisted training document
    pub store: Arc<DocumentStore>,
    /// Live sessions behind the shared password
    pub sessions: Arc<SessionRegistry>,
}

impl AppState {
    pub fn new(store: DocumentStore, sessions: SessionRegistry) -> Self {
        Self {
            store: Arc::new(store),
            sessions: Arc::new(sessions),
        }
    }
}

/// Build application router
///
/// Protected surfaces: the document API (401 on missing/expired session)
/// and the main page (redirect to /login). Login, logout and the health
/// probe are public.
pub fn build_router(state: AppState) -> Router {
    use axum::middleware;
    use axum::routing::get;

    // Document API (requires a live session; rejected with 401 JSON)
    let protected_api = Router::new()
        .route(
            "/api/data",
            get(api::get_data).post(api::save_data).put(api::save_data),
        )
        .route("/api/backup", get(api::download_backup))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            api::require_session,
        ));

    // Main page (requires a live session; redirected to /login)
    let protected_page = Router::new()
        .route("/", get(api::serve_index))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            api::require_session_page,
        ));

    // Public routes (no authentication)
    let public = Router::new()
        .route("/login", get(api::login_page).post(api::login))
        .route("/logout", get(api::logout))
        .merge(api::health_routes());

    Router::new()
        .merge(protected_api)
        .merge(protected_page)
        .merge(public)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
