//! Page templates.
//!
//! Pages hold their components pre-rendered; a component that fails to
//! render fails the page build.

use askama::Template;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};

use crate::forms::login::LoginField;
use crate::forms::signup::SignUpField;
use crate::forms::{FormField, FormState};
use crate::paths;
use crate::supabase::Session;
use crate::ui::{ActionButton, Button, FormControl, Sidebar, SidebarLink, Toggle};

/// Render a page, answering 500 if the template fails.
pub(crate) fn render_page<T: Template>(status: StatusCode, page: &T) -> Response {
    match page.render() {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "template render failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

// =============================================================================
// AUTH FORMS
// =============================================================================

#[derive(Template)]
#[template(path = "auth_form.html")]
pub struct AuthFormPage {
    pub title: &'static str,
    pub heading: &'static str,
    pub action: &'static str,
    pub validate_action: &'static str,
    pub fields: Vec<String>,
    pub form_error: Option<String>,
    pub notice: Option<String>,
    pub submit: String,
    pub alternate_prompt: &'static str,
    pub alternate_href: &'static str,
    pub alternate_label: &'static str,
}

fn control<F: FormField>(
    state: &FormState<F>,
    field: F,
    label: &str,
    input_type: &str,
    autocomplete: &str,
) -> FormControl {
    FormControl::new(field.name(), label)
        .input_type(input_type)
        .autocomplete(autocomplete)
        .value(state.value(field))
        .disabled(state.is_submitting())
        .error(state.visible_error(field))
}

fn render_controls<F: FormField>(
    state: &FormState<F>,
    build: fn(&FormState<F>, F) -> FormControl,
) -> askama::Result<Vec<String>> {
    F::ALL.iter().map(|field| build(state, *field).render()).collect()
}

#[must_use]
pub fn login_control(state: &FormState<LoginField>, field: LoginField) -> FormControl {
    match field {
        LoginField::Email => control(state, field, "Email address", "email", "email"),
        LoginField::Password => control(state, field, "Password", "password", "current-password"),
    }
}

#[must_use]
pub fn signup_control(state: &FormState<SignUpField>, field: SignUpField) -> FormControl {
    match field {
        SignUpField::Email => control(state, field, "Email address", "email", "email"),
        SignUpField::Password => control(state, field, "Password", "password", "new-password"),
        SignUpField::ConfirmPassword => control(state, field, "Confirm Password", "password", "new-password"),
    }
}

/// # Errors
///
/// Returns an error if a component template fails to render.
pub fn login_page(state: &FormState<LoginField>) -> askama::Result<AuthFormPage> {
    Ok(AuthFormPage {
        title: "Sign in",
        heading: "Sign in to your account",
        action: paths::LOGIN,
        validate_action: paths::LOGIN_VALIDATE,
        fields: render_controls(state, login_control)?,
        form_error: state.last_error().map(ToString::to_string),
        notice: None,
        submit: Button::new("Sign In").loading(state.is_submitting()).render()?,
        alternate_prompt: "Don't have an account?",
        alternate_href: paths::SIGNUP,
        alternate_label: "Sign up",
    })
}

/// # Errors
///
/// Returns an error if a component template fails to render.
pub fn signup_page(state: &FormState<SignUpField>, notice: Option<String>) -> askama::Result<AuthFormPage> {
    Ok(AuthFormPage {
        title: "Sign up",
        heading: "Create your account",
        action: paths::SIGNUP,
        validate_action: paths::SIGNUP_VALIDATE,
        fields: render_controls(state, signup_control)?,
        form_error: state.last_error().map(ToString::to_string),
        notice,
        submit: Button::new("Sign Up")
            .loading(state.is_submitting())
            .loading_text("Signing Up...")
            .render()?,
        alternate_prompt: "Already have an account?",
        alternate_href: paths::LOGIN,
        alternate_label: "Sign in",
    })
}

// =============================================================================
// APP
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppSection {
    Home,
    Settings,
}

impl AppSection {
    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Self::Home => paths::APP,
            Self::Settings => paths::APP_SETTINGS,
        }
    }

    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::Home => "Dashboard",
            Self::Settings => "Settings",
        }
    }
}

#[derive(Template)]
#[template(path = "app.html")]
pub struct AppPage {
    pub title: &'static str,
    pub section: AppSection,
    pub email: String,
    pub user_id: String,
    pub email_confirmed: bool,
    pub sidebar: String,
    pub sidebar_open: bool,
    pub toggle_href: String,
    pub demo_buttons: Vec<String>,
}

pub(crate) fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    chars
        .next()
        .map(|first| first.to_uppercase().chain(chars).collect())
        .unwrap_or_default()
}

/// Dashboard page. `actions` are the demo buttons, rendered with their
/// live status on the home section only.
///
/// # Errors
///
/// Returns an error if a component template fails to render.
pub fn app_page<'a>(
    session: &Session,
    section: AppSection,
    sidebar_open: bool,
    actions: impl IntoIterator<Item = &'a ActionButton>,
) -> askama::Result<AppPage> {
    let sidebar = Sidebar::controlled(sidebar_open)
        .link(SidebarLink::new("Home", paths::APP).active(section == AppSection::Home))
        .link(SidebarLink::new("Settings", paths::APP_SETTINGS).active(section == AppSection::Settings));
    let mut next = Toggle::new(sidebar_open);
    next.toggle();
    let next = if next.get() { "open" } else { "closed" };

    let demo_buttons = if section == AppSection::Home {
        actions
            .into_iter()
            .map(|button| button.view().render())
            .collect::<askama::Result<Vec<_>>>()?
    } else {
        Vec::new()
    };

    Ok(AppPage {
        title: section.title(),
        section,
        email: session.user.email.clone().unwrap_or_default(),
        user_id: session.user.id.to_string(),
        email_confirmed: session.user.email_confirmed_at.is_some(),
        sidebar: sidebar.render()?,
        sidebar_open,
        toggle_href: format!("{}?sidebar={next}", section.path()),
        demo_buttons,
    })
}

#[cfg(test)]
#[path = "pages_test.rs"]
mod tests;
