use super::*;
use std::sync::{Mutex, MutexGuard};

// Env vars are process-global; every test that touches them holds this lock.
static ENV_LOCK: Mutex<()> = Mutex::new(());

fn lock_env() -> MutexGuard<'static, ()> {
    ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

const KEYS: &[&str] = &[
    "SUPABASE_URL",
    "SUPABASE_ANON_KEY",
    "PORT",
    "SITE_URL",
    "COOKIE_SECURE",
    "AUTH_REQUEST_TIMEOUT_SECS",
    "AUTH_CONNECT_TIMEOUT_SECS",
    "STATIC_DIR",
];

/// # Safety
/// Callers hold `ENV_LOCK`.
unsafe fn clear_env() {
    for key in KEYS {
        unsafe { std::env::remove_var(key) };
    }
}

/// # Safety
/// Callers hold `ENV_LOCK`.
unsafe fn set_required() {
    unsafe {
        std::env::set_var("SUPABASE_URL", "https://abc.supabase.co/");
        std::env::set_var("SUPABASE_ANON_KEY", "anon-key");
    }
}

#[test]
fn from_env_applies_defaults() {
    let _guard = lock_env();
    unsafe {
        clear_env();
        set_required();
    }

    let cfg = AppConfig::from_env().unwrap();
    assert_eq!(cfg.port, DEFAULT_PORT);
    assert!(!cfg.cookie_secure);
    assert_eq!(cfg.static_dir, PathBuf::from(DEFAULT_STATIC_DIR));
    assert_eq!(cfg.supabase.url, "https://abc.supabase.co");
    assert_eq!(cfg.supabase.anon_key, "anon-key");
    assert!(cfg.supabase.redirect_to.is_none());
    assert_eq!(
        cfg.supabase.timeouts,
        AuthTimeouts {
            request_secs: DEFAULT_AUTH_REQUEST_TIMEOUT_SECS,
            connect_secs: DEFAULT_AUTH_CONNECT_TIMEOUT_SECS
        }
    );

    unsafe { clear_env() };
}

#[test]
fn from_env_missing_url_errors() {
    let _guard = lock_env();
    unsafe {
        clear_env();
        std::env::set_var("SUPABASE_ANON_KEY", "anon-key");
    }
    assert!(matches!(AppConfig::from_env(), Err(ConfigError::MissingVar("SUPABASE_URL"))));
    unsafe { clear_env() };
}

#[test]
fn from_env_blank_anon_key_errors() {
    let _guard = lock_env();
    unsafe {
        clear_env();
        set_required();
        std::env::set_var("SUPABASE_ANON_KEY", "   ");
    }
    assert!(matches!(AppConfig::from_env(), Err(ConfigError::MissingVar("SUPABASE_ANON_KEY"))));
    unsafe { clear_env() };
}

#[test]
fn from_env_rejects_non_http_url() {
    let _guard = lock_env();
    unsafe {
        clear_env();
        set_required();
        std::env::set_var("SUPABASE_URL", "abc.supabase.co");
    }
    assert!(matches!(AppConfig::from_env(), Err(ConfigError::InvalidValue { key: "SUPABASE_URL", .. })));
    unsafe { clear_env() };
}

#[test]
fn from_env_invalid_port_errors() {
    let _guard = lock_env();
    unsafe {
        clear_env();
        set_required();
        std::env::set_var("PORT", "eighty");
    }
    assert!(matches!(AppConfig::from_env(), Err(ConfigError::InvalidValue { key: "PORT", .. })));
    unsafe { clear_env() };
}

#[test]
fn from_env_https_site_url_implies_secure_cookies() {
    let _guard = lock_env();
    unsafe {
        clear_env();
        set_required();
        std::env::set_var("SITE_URL", "https://starter.example.com/");
    }
    let cfg = AppConfig::from_env().unwrap();
    assert!(cfg.cookie_secure);
    assert_eq!(cfg.supabase.redirect_to.as_deref(), Some("https://starter.example.com"));
    unsafe { clear_env() };
}

#[test]
fn from_env_explicit_cookie_secure_overrides_inference() {
    let _guard = lock_env();
    unsafe {
        clear_env();
        set_required();
        std::env::set_var("SITE_URL", "https://starter.example.com");
        std::env::set_var("COOKIE_SECURE", "off");
    }
    assert!(!AppConfig::from_env().unwrap().cookie_secure);
    unsafe { clear_env() };
}

#[test]
fn from_env_reads_overrides() {
    let _guard = lock_env();
    unsafe {
        clear_env();
        set_required();
        std::env::set_var("PORT", "8080");
        std::env::set_var("AUTH_REQUEST_TIMEOUT_SECS", "30");
        std::env::set_var("AUTH_CONNECT_TIMEOUT_SECS", "2");
        std::env::set_var("STATIC_DIR", "/srv/static");
    }
    let cfg = AppConfig::from_env().unwrap();
    assert_eq!(cfg.port, 8080);
    assert_eq!(cfg.supabase.timeouts, AuthTimeouts { request_secs: 30, connect_secs: 2 });
    assert_eq!(cfg.static_dir, PathBuf::from("/srv/static"));
    unsafe { clear_env() };
}

#[test]
fn from_env_bad_timeout_falls_back_to_default() {
    let _guard = lock_env();
    unsafe {
        clear_env();
        set_required();
        std::env::set_var("AUTH_REQUEST_TIMEOUT_SECS", "soon");
    }
    let cfg = AppConfig::from_env().unwrap();
    assert_eq!(cfg.supabase.timeouts.request_secs, DEFAULT_AUTH_REQUEST_TIMEOUT_SECS);
    unsafe { clear_env() };
}

#[test]
fn supabase_config_debug_redacts_key() {
    let cfg = SupabaseConfig {
        url: "https://abc.supabase.co".into(),
        anon_key: "super-secret".into(),
        redirect_to: None,
        timeouts: AuthTimeouts { request_secs: 1, connect_secs: 1 },
    };
    let rendered = format!("{cfg:?}");
    assert!(rendered.contains("[REDACTED]"));
    assert!(!rendered.contains("super-secret"));
}

// =============================================================================
// env_bool: unique var names, no lock needed.
// =============================================================================

#[test]
fn env_bool_true_variants() {
    for (i, val) in ["1", "true", "YES", " On "].iter().enumerate() {
        let key = format!("__SUPASTART_EB_TRUE_{i}__");
        unsafe { std::env::set_var(&key, val) };
        assert_eq!(env_bool(&key), Some(true), "expected true for {val:?}");
        unsafe { std::env::remove_var(&key) };
    }
}

#[test]
fn env_bool_false_variants() {
    for (i, val) in ["0", "false", "No", "off"].iter().enumerate() {
        let key = format!("__SUPASTART_EB_FALSE_{i}__");
        unsafe { std::env::set_var(&key, val) };
        assert_eq!(env_bool(&key), Some(false), "expected false for {val:?}");
        unsafe { std::env::remove_var(&key) };
    }
}

#[test]
fn env_bool_garbage_and_unset_are_none() {
    let key = "__SUPASTART_EB_GARBAGE__";
    unsafe { std::env::set_var(key, "maybe") };
    assert_eq!(env_bool(key), None);
    unsafe { std::env::remove_var(key) };
    assert_eq!(env_bool("__SUPASTART_EB_SURELY_UNSET__"), None);
}
