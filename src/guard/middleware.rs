//! Axum middleware enforcing [`super::ACCESS_RULES`].

use axum::extract::{FromRequestParts, Request, State};
use axum::http::Method;
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::CookieJar;

use super::{decide, rule_for};
use crate::paths;
use crate::session;
use crate::state::AppState;
use crate::supabase::{Session, SessionTokens};

/// Session confirmed by the guard for this request.
///
/// Handlers behind the guard take this as a parameter; without it the
/// request is sent to the login page.
#[derive(Clone, Debug)]
pub struct CurrentSession(pub Session);

impl<S> FromRequestParts<S> for CurrentSession
where
    S: Send + Sync,
{
    type Rejection = Redirect;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Self>()
            .cloned()
            .ok_or_else(|| Redirect::temporary(paths::LOGIN))
    }
}

/// Ask the backend for the session behind `tokens`. Failures count as no
/// session.
async fn resolve(state: &AppState, tokens: Option<&SessionTokens>) -> Option<Session> {
    let tokens = tokens?;
    match state.backend.get_session(tokens).await {
        Ok(session) => session,
        Err(e) => {
            tracing::warn!(error = %e, status = ?e.status(), "session lookup failed; treating request as signed out");
            None
        }
    }
}

/// 307 keeps the method, so it is only safe for reads. Anything else (a
/// signed-in user re-posting `/login`) gets 303 and lands on a GET.
fn redirect_for(method: &Method, location: &str) -> Redirect {
    if *method == Method::GET || *method == Method::HEAD { Redirect::temporary(location) } else { Redirect::to(location) }
}

/// `from_fn_with_state` middleware. Governed paths resolve the session and
/// may redirect; everything else passes through untouched.
pub async fn session_guard(State(state): State<AppState>, jar: CookieJar, mut request: Request, next: Next) -> Response {
    let path = request.uri().path().to_owned();
    if rule_for(&path).is_none() {
        return next.run(request).await;
    }

    let tokens = session::read_tokens(&jar);
    let current = resolve(&state, tokens.as_ref()).await;
    let secure = state.config.cookie_secure;

    // GoTrue hands back new tokens when it had to refresh.
    let jar = match (&current, &tokens) {
        (Some(s), Some(t)) if s.access_token != t.access_token => {
            tracing::debug!(user_id = %s.user.id, "session refreshed");
            session::store(jar, s, secure)
        }
        _ => jar,
    };

    let decision = decide(&path, current.is_some());
    if let Some(location) = decision.location() {
        tracing::debug!(%path, ?decision, "guard redirect");
        let jar = if current.is_none() && session::has_cookies(&jar) { session::clear(jar, secure) } else { jar };
        return (jar, redirect_for(request.method(), location)).into_response();
    }

    if let Some(current) = current {
        request.extensions_mut().insert(CurrentSession(current));
    }
    let response = next.run(request).await;
    (jar, response).into_response()
}

#[cfg(test)]
#[path = "middleware_test.rs"]
mod tests;
