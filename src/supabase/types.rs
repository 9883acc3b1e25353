//! Supabase Auth (GoTrue) types: sessions, users, errors and the backend trait.
//!
//! Wire shapes follow the GoTrue REST responses. Only the fields this server
//! reads are modelled; unknown fields are ignored by serde.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by auth backend operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// The HTTP request never produced a response (DNS, TLS, timeout).
    #[error("auth request failed: {0}")]
    Request(String),

    /// GoTrue answered with a non-success status. `message` is shown verbatim.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// A success response body could not be deserialized.
    #[error("auth response parse failed: {0}")]
    Parse(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl AuthError {
    /// HTTP status returned by GoTrue, if the error came from a response.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// `true` when GoTrue refused the access token (expired, malformed or
    /// revoked) rather than failing. Only these trigger a refresh.
    #[must_use]
    pub fn is_token_rejection(&self) -> bool {
        matches!(self.status(), Some(401 | 403))
    }

    /// `true` when the refresh grant was refused. GoTrue answers a dead
    /// refresh token with `400 invalid_grant`.
    #[must_use]
    pub fn is_refresh_rejection(&self) -> bool {
        matches!(self.status(), Some(400 | 401 | 403))
    }
}

// =============================================================================
// USER + SESSION
// =============================================================================

/// Authenticated user as reported by GoTrue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    #[serde(default)]
    pub email: Option<String>,
    /// Unset while the email confirmation link has not been followed.
    #[serde(default)]
    pub email_confirmed_at: Option<String>,
}

/// Session issued by GoTrue on sign-in, refresh or auto-confirmed sign-up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    /// Lifetime of the access token in seconds.
    #[serde(default)]
    pub expires_in: Option<u64>,
    /// Absolute expiry as unix seconds.
    #[serde(default)]
    pub expires_at: Option<i64>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub user: User,
}

fn default_token_type() -> String {
    "bearer".to_owned()
}

impl Session {
    /// Rebuild a session from cookie tokens and the user GoTrue resolved them to.
    #[must_use]
    pub fn from_tokens(tokens: &SessionTokens, user: User) -> Self {
        Self {
            access_token: tokens.access_token.clone(),
            token_type: default_token_type(),
            expires_in: None,
            expires_at: None,
            refresh_token: tokens.refresh_token.clone(),
            user,
        }
    }
}

/// Result of a sign-up call.
///
/// `session` is `None` when the project requires email confirmation, which
/// is the common case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignUpResponse {
    pub user: User,
    pub session: Option<Session>,
}

impl SignUpResponse {
    #[must_use]
    pub fn confirmation_pending(&self) -> bool {
        self.session.is_none()
    }
}

/// Token pair carried by the browser's session cookies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionTokens {
    pub access_token: String,
    pub refresh_token: Option<String>,
}

// =============================================================================
// AUTH BACKEND TRAIT
// =============================================================================

/// Hosted auth service seam. Implemented by [`super::SupabaseAuth`] and by
/// test doubles.
#[async_trait::async_trait]
pub trait AuthBackend: Send + Sync {
    /// Exchange an email + password for a session.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Api`] with GoTrue's message on bad credentials.
    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session, AuthError>;

    /// Register a new account.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Api`] when GoTrue refuses the registration.
    async fn sign_up(&self, email: &str, password: &str) -> Result<SignUpResponse, AuthError>;

    /// Resolve cookie tokens to a live session, refreshing an expired access
    /// token when a refresh token is available. `Ok(None)` means GoTrue no
    /// longer recognises the tokens.
    ///
    /// # Errors
    ///
    /// Returns an error only when the backend could not be asked.
    async fn get_session(&self, tokens: &SessionTokens) -> Result<Option<Session>, AuthError>;

    /// Revoke the session behind `access_token`.
    ///
    /// # Errors
    ///
    /// Returns an error if GoTrue cannot be reached or refuses the token.
    async fn sign_out(&self, access_token: &str) -> Result<(), AuthError>;
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
