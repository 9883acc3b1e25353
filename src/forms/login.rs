//! Login form: email + password, navigates to the app on success.

use std::sync::Arc;

use tokio::sync::watch;

use super::validation::{self, LOGIN_INVALID_EMAIL, LOGIN_REQUIRED, Rule};
use super::{FieldErrors, FieldValues, Form, FormField, FormSchema, FormState, Navigator, SubmitOutcome, take};
use crate::paths;
use crate::supabase::{AuthBackend, Session};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LoginField {
    Email,
    Password,
}

impl FormField for LoginField {
    const ALL: &'static [Self] = &[Self::Email, Self::Password];

    fn name(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Password => "password",
        }
    }
}

pub struct LoginSchema;

const EMAIL_RULES: &[Rule] =
    &[(validation::is_present, LOGIN_REQUIRED), (validation::is_email_or_empty, LOGIN_INVALID_EMAIL)];

impl FormSchema for LoginSchema {
    type Field = LoginField;

    fn validate(values: &FieldValues<LoginField>) -> FieldErrors<LoginField> {
        let mut errors = FieldErrors::new();
        let email = values.get(&LoginField::Email).map_or("", String::as_str);
        if let Some(message) = validation::first_failure(email, EMAIL_RULES) {
            errors.insert(LoginField::Email, message);
        }
        let password = values.get(&LoginField::Password).map_or("", String::as_str);
        if !validation::is_present(password) {
            errors.insert(LoginField::Password, LOGIN_REQUIRED);
        }
        errors
    }
}

/// Drives the login form against the auth backend.
pub struct LoginController {
    form: Form<LoginSchema>,
    backend: Arc<dyn AuthBackend>,
    navigator: Arc<dyn Navigator>,
}

impl LoginController {
    #[must_use]
    pub fn new(backend: Arc<dyn AuthBackend>, navigator: Arc<dyn Navigator>) -> Self {
        Self { form: Form::new(), backend, navigator }
    }

    pub fn set_field(&mut self, field: LoginField, value: impl Into<String>) {
        self.form.set_field(field, value);
    }

    pub fn blur_field(&mut self, field: LoginField) {
        self.form.blur_field(field);
    }

    #[must_use]
    pub fn state(&self) -> FormState<LoginField> {
        self.form.state()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<FormState<LoginField>> {
        self.form.subscribe()
    }

    /// Validate, then sign in. On success the navigator is pushed to the
    /// app home exactly once and the new session is handed back.
    pub async fn submit(&mut self) -> SubmitOutcome<Session> {
        let values = match self.form.begin_submit() {
            Ok(values) => values,
            Err(outcome) => return outcome,
        };
        let email = take(&values, LoginField::Email);
        let password = take(&values, LoginField::Password);

        match self.backend.sign_in_with_password(&email, &password).await {
            Ok(session) => {
                tracing::info!(user_id = %session.user.id, "sign-in succeeded");
                self.form.finish_ok();
                self.navigator.push(paths::APP);
                SubmitOutcome::Accepted(session)
            }
            Err(e) => {
                tracing::info!(error = %e, "sign-in rejected");
                self.form.finish_err(e.clone());
                SubmitOutcome::Rejected(e)
            }
        }
    }
}

#[cfg(test)]
#[path = "login_test.rs"]
mod tests;
