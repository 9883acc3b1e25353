//! Server configuration parsed from environment variables.
//!
//! A `.env` file is loaded first when present; variables already set in the
//! process environment win.

use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_AUTH_REQUEST_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_AUTH_CONNECT_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_STATIC_DIR: &str = "static";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required env var {0}")]
    MissingVar(&'static str),

    #[error("invalid value for {key}: {reason}")]
    InvalidValue { key: &'static str, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

/// Connection settings for the Supabase project.
#[derive(Clone, PartialEq, Eq)]
pub struct SupabaseConfig {
    /// Project URL without trailing slash, e.g. `https://abc.supabase.co`.
    pub url: String,
    pub anon_key: String,
    /// Where confirmation emails send the user back to.
    pub redirect_to: Option<String>,
    pub timeouts: AuthTimeouts,
}

impl std::fmt::Debug for SupabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SupabaseConfig")
            .field("url", &self.url)
            .field("anon_key", &"[REDACTED]")
            .field("redirect_to", &self.redirect_to)
            .field("timeouts", &self.timeouts)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub port: u16,
    pub cookie_secure: bool,
    pub static_dir: PathBuf,
    pub supabase: SupabaseConfig,
}

impl AppConfig {
    /// Build typed config from environment variables.
    ///
    /// Required:
    /// - `SUPABASE_URL`
    /// - `SUPABASE_ANON_KEY`
    ///
    /// Optional:
    /// - `PORT`: default 3000
    /// - `SITE_URL`: public origin, sent as the sign-up `redirect_to`
    /// - `COOKIE_SECURE`: bool; inferred from an `https://` `SITE_URL` when unset
    /// - `AUTH_REQUEST_TIMEOUT_SECS`: default 10
    /// - `AUTH_CONNECT_TIMEOUT_SECS`: default 5
    /// - `STATIC_DIR`: default `static`
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is missing or a value is malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let url = required("SUPABASE_URL")?.trim_end_matches('/').to_owned();
        if !(url.starts_with("https://") || url.starts_with("http://")) {
            return Err(ConfigError::InvalidValue { key: "SUPABASE_URL", reason: format!("not an http(s) URL: {url}") });
        }
        let anon_key = required("SUPABASE_ANON_KEY")?;

        let port = match std::env::var("PORT") {
            Ok(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|e| ConfigError::InvalidValue { key: "PORT", reason: format!("{e}: {raw}") })?,
            Err(_) => DEFAULT_PORT,
        };

        let site_url = std::env::var("SITE_URL")
            .ok()
            .map(|v| v.trim().trim_end_matches('/').to_owned())
            .filter(|v| !v.is_empty());
        let cookie_secure = env_bool("COOKIE_SECURE")
            .unwrap_or_else(|| site_url.as_deref().is_some_and(|u| u.starts_with("https://")));

        let timeouts = AuthTimeouts {
            request_secs: env_parse_u64("AUTH_REQUEST_TIMEOUT_SECS", DEFAULT_AUTH_REQUEST_TIMEOUT_SECS),
            connect_secs: env_parse_u64("AUTH_CONNECT_TIMEOUT_SECS", DEFAULT_AUTH_CONNECT_TIMEOUT_SECS),
        };

        let static_dir = std::env::var("STATIC_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_STATIC_DIR));

        Ok(Self {
            port,
            cookie_secure,
            static_dir,
            supabase: SupabaseConfig { url, anon_key, redirect_to: site_url, timeouts },
        })
    }
}

fn required(key: &'static str) -> Result<String, ConfigError> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
        .ok_or(ConfigError::MissingVar(key))
}

pub(crate) fn env_bool(key: &str) -> Option<bool> {
    std::env::var(key)
        .ok()
        .and_then(|raw| match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Some(true),
            "0" | "false" | "no" | "off" => Some(false),
            _ => None,
        })
}

fn env_parse_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
