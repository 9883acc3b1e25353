//! Supabase Auth (GoTrue) HTTP client.
//!
//! DESIGN
//! ======
//! Thin wrapper over the `/auth/v1` REST endpoints. Every request carries the
//! project's anon key as `apikey`; user-scoped calls add the user's access
//! token as the bearer. Response parsing lives in free functions so it can be
//! tested without a network.

pub mod types;

use std::time::Duration;

use reqwest::RequestBuilder;
use serde::Deserialize;

use crate::config::SupabaseConfig;
pub use types::{AuthBackend, AuthError, Session, SessionTokens, SignUpResponse, User};

// =============================================================================
// CLIENT
// =============================================================================

pub struct SupabaseAuth {
    http: reqwest::Client,
    base_url: String,
    anon_key: String,
    redirect_to: Option<String>,
}

impl SupabaseAuth {
    /// Build a client for the configured project.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: &SupabaseConfig) -> Result<Self, AuthError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .build()
            .map_err(|e| AuthError::HttpClientBuild(e.to_string()))?;
        Ok(Self {
            http,
            base_url: config.url.clone(),
            anon_key: config.anon_key.clone(),
            redirect_to: config.redirect_to.clone(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        auth_endpoint(&self.base_url, path)
    }

    /// Attach the project key; `bearer` defaults to the anon key for
    /// unauthenticated calls, as supabase-js does.
    fn authorize(&self, req: RequestBuilder, bearer: Option<&str>) -> RequestBuilder {
        req.header("apikey", &self.anon_key)
            .bearer_auth(bearer.unwrap_or(self.anon_key.as_str()))
    }

    /// Send and return the body of a 2xx response.
    async fn send(&self, req: RequestBuilder) -> Result<String, AuthError> {
        let response = req.send().await.map_err(|e| AuthError::Request(e.to_string()))?;
        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| AuthError::Request(e.to_string()))?;

        if !(200..300).contains(&status) {
            return Err(api_error(status, &text));
        }
        Ok(text)
    }

    async fn fetch_user(&self, access_token: &str) -> Result<User, AuthError> {
        let req = self.authorize(self.http.get(self.endpoint("user")), Some(access_token));
        let body = self.send(req).await?;
        parse_user(&body)
    }

    async fn refresh(&self, refresh_token: &str) -> Result<Session, AuthError> {
        let req = self
            .authorize(self.http.post(self.endpoint("token")), None)
            .query(&[("grant_type", "refresh_token")])
            .json(&serde_json::json!({ "refresh_token": refresh_token }));
        let body = self.send(req).await?;
        parse_session(&body)
    }
}

#[async_trait::async_trait]
impl AuthBackend for SupabaseAuth {
    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let req = self
            .authorize(self.http.post(self.endpoint("token")), None)
            .query(&[("grant_type", "password")])
            .json(&serde_json::json!({ "email": email, "password": password }));
        let body = self.send(req).await?;
        parse_session(&body)
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<SignUpResponse, AuthError> {
        let mut req = self
            .authorize(self.http.post(self.endpoint("signup")), None)
            .json(&serde_json::json!({ "email": email, "password": password }));
        if let Some(redirect_to) = &self.redirect_to {
            req = req.query(&[("redirect_to", redirect_to.as_str())]);
        }
        let body = self.send(req).await?;
        parse_sign_up(&body)
    }

    async fn get_session(&self, tokens: &SessionTokens) -> Result<Option<Session>, AuthError> {
        match self.fetch_user(&tokens.access_token).await {
            Ok(user) => Ok(Some(Session::from_tokens(tokens, user))),
            Err(e) if e.is_token_rejection() => {
                let Some(refresh_token) = tokens.refresh_token.as_deref() else {
                    return Ok(None);
                };
                tracing::debug!(status = ?e.status(), "access token rejected, refreshing");
                match self.refresh(refresh_token).await {
                    Ok(session) => Ok(Some(session)),
                    Err(e) if e.is_refresh_rejection() => Ok(None),
                    Err(e) => Err(e),
                }
            }
            Err(e) => Err(e),
        }
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), AuthError> {
        let req = self.authorize(self.http.post(self.endpoint("logout")), Some(access_token));
        self.send(req).await.map(|_| ())
    }
}

// =============================================================================
// PARSING
// =============================================================================

fn auth_endpoint(base_url: &str, path: &str) -> String {
    format!("{}/auth/v1/{}", base_url.trim_end_matches('/'), path.trim_start_matches('/'))
}

/// GoTrue has used several error envelopes over time; all of them are read.
#[derive(Deserialize, Default)]
struct ErrorBody {
    msg: Option<String>,
    error_description: Option<String>,
    message: Option<String>,
    error: Option<String>,
}

fn api_error(status: u16, body: &str) -> AuthError {
    let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
    let message = [parsed.msg, parsed.error_description, parsed.message, parsed.error]
        .into_iter()
        .flatten()
        .find(|m| !m.trim().is_empty())
        .unwrap_or_else(|| format!("auth service returned status {status}"));
    AuthError::Api { status, message }
}

fn parse_session(json: &str) -> Result<Session, AuthError> {
    serde_json::from_str(json).map_err(|e| AuthError::Parse(e.to_string()))
}

fn parse_user(json: &str) -> Result<User, AuthError> {
    serde_json::from_str(json).map_err(|e| AuthError::Parse(e.to_string()))
}

/// Sign-up answers with a full session when the project auto-confirms
/// emails, and with the bare user otherwise.
fn parse_sign_up(json: &str) -> Result<SignUpResponse, AuthError> {
    let value: serde_json::Value = serde_json::from_str(json).map_err(|e| AuthError::Parse(e.to_string()))?;
    if value.get("access_token").is_some() {
        let session: Session = serde_json::from_value(value).map_err(|e| AuthError::Parse(e.to_string()))?;
        return Ok(SignUpResponse { user: session.user.clone(), session: Some(session) });
    }
    let user_value = if value.get("user").is_some_and(serde_json::Value::is_object) {
        value["user"].clone()
    } else {
        value
    };
    let user: User = serde_json::from_value(user_value).map_err(|e| AuthError::Parse(e.to_string()))?;
    Ok(SignUpResponse { user, session: None })
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
