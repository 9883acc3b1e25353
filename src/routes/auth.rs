//! Auth routes: login, sign-up, logout, per-field validation.
//!
//! Each POST builds a fresh form controller, replays the submitted fields
//! into it and submits. Navigation and notices requested by the controller
//! are captured and turned into the HTTP response.
//!
//! The `/validate` endpoints replay the fields the same way, mark the field
//! the user just left as visited and answer only that field's control.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::Form;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::CookieJar;

use super::pages::{self, render_page};
use crate::forms::login::LoginField;
use crate::forms::signup::SignUpField;
use crate::forms::{FormField, LoginController, Navigator, Notifier, SignUpController, SubmitOutcome};
use crate::paths;
use crate::session;
use crate::state::AppState;

// =============================================================================
// NAVIGATION + NOTICES
// =============================================================================

/// Records the last navigation target so the handler can redirect to it.
#[derive(Default)]
pub struct RedirectNavigator {
    target: Mutex<Option<String>>,
}

impl RedirectNavigator {
    #[must_use]
    pub fn target(&self) -> Option<String> {
        self.target.lock().ok().and_then(|t| t.clone())
    }
}

impl Navigator for RedirectNavigator {
    fn push(&self, path: &str) {
        if let Ok(mut target) = self.target.lock() {
            *target = Some(path.to_owned());
        }
    }
}

/// Collects notices to show on the next rendered page.
#[derive(Default)]
pub struct FlashNotifier {
    messages: Mutex<Vec<String>>,
}

impl FlashNotifier {
    #[must_use]
    pub fn take(&self) -> Option<String> {
        let mut messages = self.messages.lock().ok()?;
        if messages.is_empty() {
            return None;
        }
        let joined = messages.join(" ");
        messages.clear();
        Some(joined)
    }
}

impl Notifier for FlashNotifier {
    fn notify(&self, message: &str) {
        if let Ok(mut messages) = self.messages.lock() {
            messages.push(message.to_owned());
        }
    }
}

fn submitted<F: FormField>(form: &HashMap<String, String>) -> impl Iterator<Item = (F, String)> + '_ {
    F::ALL
        .iter()
        .map(|field| (*field, form.get(field.name()).cloned().unwrap_or_default()))
}

/// Form key naming the field that lost focus.
const BLURRED_FIELD: &str = "field";

fn blurred<F: FormField>(form: &HashMap<String, String>) -> Option<F> {
    form.get(BLURRED_FIELD).and_then(|name| F::from_name(name))
}

fn failure_status<T>(outcome: &SubmitOutcome<T>) -> StatusCode {
    match outcome {
        SubmitOutcome::Busy => StatusCode::CONFLICT,
        _ => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

// =============================================================================
// LOGIN
// =============================================================================

/// `GET /login`
pub async fn login_page(State(state): State<AppState>) -> Response {
    let controller = LoginController::new(state.backend.clone(), Arc::new(RedirectNavigator::default()));
    match pages::login_page(&controller.state()) {
        Ok(page) => render_page(StatusCode::OK, &page),
        Err(e) => template_error(&e),
    }
}

/// `POST /login`: sign in, set the session cookies and redirect to the app.
pub async fn login_submit(State(state): State<AppState>, jar: CookieJar, Form(form): Form<HashMap<String, String>>) -> Response {
    let navigator = Arc::new(RedirectNavigator::default());
    let mut controller = LoginController::new(state.backend.clone(), navigator.clone());
    for (field, value) in submitted::<LoginField>(&form) {
        controller.set_field(field, value);
    }

    let outcome = controller.submit().await;
    if let SubmitOutcome::Accepted(session) = &outcome {
        let jar = session::store(jar, session, state.config.cookie_secure);
        let target = navigator.target().unwrap_or_else(|| paths::APP.to_owned());
        return (jar, Redirect::to(&target)).into_response();
    }

    match pages::login_page(&controller.state()) {
        Ok(page) => render_page(failure_status(&outcome), &page),
        Err(e) => template_error(&e),
    }
}

/// `POST /login/validate`
pub async fn login_validate(State(state): State<AppState>, Form(form): Form<HashMap<String, String>>) -> Response {
    let Some(field) = blurred::<LoginField>(&form) else {
        return StatusCode::BAD_REQUEST.into_response();
    };
    let mut controller = LoginController::new(state.backend.clone(), Arc::new(RedirectNavigator::default()));
    for (name, value) in submitted::<LoginField>(&form) {
        controller.set_field(name, value);
    }
    controller.blur_field(field);
    render_page(StatusCode::OK, &pages::login_control(&controller.state(), field))
}

// =============================================================================
// SIGN-UP
// =============================================================================

/// `GET /signup`
pub async fn signup_page(State(state): State<AppState>) -> Response {
    let controller = SignUpController::new(state.backend.clone(), Arc::new(FlashNotifier::default()));
    match pages::signup_page(&controller.state(), None) {
        Ok(page) => render_page(StatusCode::OK, &page),
        Err(e) => template_error(&e),
    }
}

/// `POST /signup`: register and show the confirmation notice.
///
/// Projects with email confirmation disabled answer with a session; it is
/// stored like a login so the app is reachable straight away.
pub async fn signup_submit(State(state): State<AppState>, jar: CookieJar, Form(form): Form<HashMap<String, String>>) -> Response {
    let notifier = Arc::new(FlashNotifier::default());
    let mut controller = SignUpController::new(state.backend.clone(), notifier.clone());
    for (field, value) in submitted::<SignUpField>(&form) {
        controller.set_field(field, value);
    }

    let outcome = controller.submit().await;
    let (jar, status) = match &outcome {
        SubmitOutcome::Accepted(response) => {
            let jar = match &response.session {
                Some(session) => session::store(jar, session, state.config.cookie_secure),
                None => jar,
            };
            (jar, StatusCode::OK)
        }
        other => (jar, failure_status(other)),
    };

    match pages::signup_page(&controller.state(), notifier.take()) {
        Ok(page) => (jar, render_page(status, &page)).into_response(),
        Err(e) => template_error(&e),
    }
}

/// `POST /signup/validate`
pub async fn signup_validate(State(state): State<AppState>, Form(form): Form<HashMap<String, String>>) -> Response {
    let Some(field) = blurred::<SignUpField>(&form) else {
        return StatusCode::BAD_REQUEST.into_response();
    };
    let mut controller = SignUpController::new(state.backend.clone(), Arc::new(FlashNotifier::default()));
    for (name, value) in submitted::<SignUpField>(&form) {
        controller.set_field(name, value);
    }
    controller.blur_field(field);
    render_page(StatusCode::OK, &pages::signup_control(&controller.state(), field))
}

// =============================================================================
// LOGOUT
// =============================================================================

/// `POST /logout`: revoke the session at GoTrue (best effort), clear the
/// cookies and go back to the login page.
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> Response {
    if let Some(tokens) = session::read_tokens(&jar) {
        if let Err(e) = state.backend.sign_out(&tokens.access_token).await {
            tracing::warn!(error = %e, "sign-out at auth service failed; clearing cookies anyway");
        }
    }
    let jar = session::clear(jar, state.config.cookie_secure);
    (jar, Redirect::to(paths::LOGIN)).into_response()
}

fn template_error(e: &askama::Error) -> Response {
    tracing::error!(error = %e, "page build failed");
    StatusCode::INTERNAL_SERVER_ERROR.into_response()
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
