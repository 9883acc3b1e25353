//! Session cookies.
//!
//! The browser carries the GoTrue token pair in two HttpOnly cookies. The
//! server is the only reader and writer; no session state is kept here.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;

use crate::supabase::{Session, SessionTokens};

pub const ACCESS_COOKIE: &str = "sb-access-token";
pub const REFRESH_COOKIE: &str = "sb-refresh-token";

/// Cookie lifetime used by the Supabase SSR helpers. The access token inside
/// expires much sooner and is renewed with the refresh token.
const COOKIE_MAX_AGE: Duration = Duration::days(400);

fn session_cookie(name: &'static str, value: String, secure: bool) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(COOKIE_MAX_AGE)
        .build()
}

fn removal_cookie(name: &'static str, secure: bool) -> Cookie<'static> {
    Cookie::build((name, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(Duration::ZERO)
        .build()
}

/// Token pair from the request cookies. `None` without an access token.
#[must_use]
pub fn read_tokens(jar: &CookieJar) -> Option<SessionTokens> {
    let access_token = jar.get(ACCESS_COOKIE).map(Cookie::value).unwrap_or_default();
    if access_token.is_empty() {
        return None;
    }
    let refresh_token = jar
        .get(REFRESH_COOKIE)
        .map(Cookie::value)
        .filter(|v| !v.is_empty())
        .map(str::to_owned);
    Some(SessionTokens { access_token: access_token.to_owned(), refresh_token })
}

/// `true` when the request carries any session cookie, valid or not.
#[must_use]
pub fn has_cookies(jar: &CookieJar) -> bool {
    jar.get(ACCESS_COOKIE).is_some() || jar.get(REFRESH_COOKIE).is_some()
}

/// Write the session's tokens. A session without a refresh token drops
/// any stale refresh cookie.
#[must_use]
pub fn store(jar: CookieJar, session: &Session, secure: bool) -> CookieJar {
    let jar = jar.add(session_cookie(ACCESS_COOKIE, session.access_token.clone(), secure));
    match &session.refresh_token {
        Some(refresh) => jar.add(session_cookie(REFRESH_COOKIE, refresh.clone(), secure)),
        None => jar.add(removal_cookie(REFRESH_COOKIE, secure)),
    }
}

/// Expire both session cookies.
#[must_use]
pub fn clear(jar: CookieJar, secure: bool) -> CookieJar {
    jar.add(removal_cookie(ACCESS_COOKIE, secure))
        .add(removal_cookie(REFRESH_COOKIE, secure))
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
