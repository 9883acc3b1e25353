//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! One Axum router serves the server-rendered auth pages, the signed-in
//! area and static assets. The session guard wraps every route; it only
//! consults the auth backend for paths in its access table.

pub mod app;
pub mod auth;
pub mod pages;

use axum::Router;
use axum::http::StatusCode;
use axum::response::Redirect;
use axum::routing::{get, post};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::guard::session_guard;
use crate::paths;
use crate::state::AppState;

/// Full application router.
pub fn app(state: AppState) -> Router {
    let static_dir = state.config.static_dir.clone();

    Router::new()
        .route(paths::HOME, get(redirect_home_to_app))
        .route(paths::LOGIN, get(auth::login_page).post(auth::login_submit))
        .route(paths::SIGNUP, get(auth::signup_page).post(auth::signup_submit))
        .route(paths::LOGIN_VALIDATE, post(auth::login_validate))
        .route(paths::SIGNUP_VALIDATE, post(auth::signup_validate))
        .route(paths::LOGOUT, post(auth::logout))
        .route(paths::APP, get(app::home))
        .route(paths::APP_SETTINGS, get(app::settings))
        .route(paths::APP_ACTION_ROUTE, post(app::press_action))
        .route(paths::HEALTHZ, get(healthz))
        .nest_service(paths::STATIC, ServeDir::new(static_dir))
        .fallback(not_found)
        .layer(axum::middleware::from_fn_with_state(state.clone(), session_guard))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn redirect_home_to_app() -> Redirect {
    Redirect::temporary(paths::APP)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

async fn not_found() -> StatusCode {
    StatusCode::NOT_FOUND
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
