//! Route paths shared by the router, the guard and the form controllers.

pub const HOME: &str = "/";
pub const APP: &str = "/app";
pub const APP_SETTINGS: &str = "/app/settings";
pub const APP_ACTIONS: &str = "/app/actions";
pub const APP_ACTION_ROUTE: &str = "/app/actions/{variant}";
pub const LOGIN: &str = "/login";
pub const SIGNUP: &str = "/signup";
pub const LOGIN_VALIDATE: &str = "/login/validate";
pub const SIGNUP_VALIDATE: &str = "/signup/validate";
pub const LOGOUT: &str = "/logout";
pub const HEALTHZ: &str = "/healthz";
pub const STATIC: &str = "/static";

/// Target of the dashboard's demo button for `variant`.
#[must_use]
pub fn app_action(variant: &str) -> String {
    format!("{APP_ACTIONS}/{variant}")
}
