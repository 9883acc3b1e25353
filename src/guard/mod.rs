//! Session guard: route access rules and the middleware that enforces them.
//!
//! DESIGN
//! ======
//! The access table is a static slice. Paths it does not govern pass
//! straight through without touching the auth backend; governed paths
//! resolve the session from cookies first, then [`decide`] picks the
//! outcome. `decide` is pure, so the table can be tested on its own.

pub mod middleware;

pub use middleware::{CurrentSession, session_guard};

use crate::paths;

// =============================================================================
// ACCESS RULES
// =============================================================================

/// How a rule matches a request path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PathMatch {
    /// The path itself.
    Exact(&'static str),
    /// The path and everything below it, on segment boundaries
    /// (`/app` covers `/app/settings` but not `/apple`).
    Prefix(&'static str),
}

impl PathMatch {
    #[must_use]
    pub fn matches(self, path: &str) -> bool {
        match self {
            Self::Exact(p) => path == p,
            Self::Prefix(p) => path
                .strip_prefix(p)
                .is_some_and(|rest| rest.is_empty() || rest.starts_with('/')),
        }
    }
}

/// Session state a path demands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Requirement {
    /// Signed in, else sent to the login page.
    Authenticated,
    /// Signed out, else sent to the app home.
    Anonymous,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AccessRule {
    pub path: PathMatch,
    pub requires: Requirement,
}

pub static ACCESS_RULES: &[AccessRule] = &[
    AccessRule { path: PathMatch::Prefix(paths::APP), requires: Requirement::Authenticated },
    AccessRule { path: PathMatch::Exact(paths::LOGIN), requires: Requirement::Anonymous },
    AccessRule { path: PathMatch::Exact(paths::SIGNUP), requires: Requirement::Anonymous },
];

/// First rule governing `path`, if any.
#[must_use]
pub fn rule_for(path: &str) -> Option<&'static AccessRule> {
    ACCESS_RULES.iter().find(|rule| rule.path.matches(path))
}

// =============================================================================
// DECISION
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardDecision {
    Continue,
    RedirectToLogin,
    RedirectToApp,
}

impl GuardDecision {
    /// Redirect target, or `None` to let the request through.
    #[must_use]
    pub fn location(self) -> Option<&'static str> {
        match self {
            Self::Continue => None,
            Self::RedirectToLogin => Some(paths::LOGIN),
            Self::RedirectToApp => Some(paths::APP),
        }
    }
}

/// Apply the access table to a path and the resolved session state.
#[must_use]
pub fn decide(path: &str, has_session: bool) -> GuardDecision {
    match rule_for(path).map(|rule| rule.requires) {
        Some(Requirement::Authenticated) if !has_session => GuardDecision::RedirectToLogin,
        Some(Requirement::Anonymous) if has_session => GuardDecision::RedirectToApp,
        _ => GuardDecision::Continue,
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
