//! Sign-up form: email, password, confirmation.

use std::sync::Arc;

use tokio::sync::watch;

use super::validation::{
    self, CONFIRM_REQUIRED, EMAIL_REQUIRED, INVALID_EMAIL, PASSWORD_REQUIRED, PASSWORD_TOO_SHORT, PASSWORD_TOO_WEAK,
    PASSWORDS_MUST_MATCH, Rule,
};
use super::{FieldErrors, FieldValues, Form, FormField, FormSchema, FormState, Notifier, SubmitOutcome, take};
use crate::supabase::{AuthBackend, SignUpResponse};

pub const SIGN_UP_SUCCESS: &str = "Sign up successful! Please check your email to confirm your registration.";

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SignUpField {
    Email,
    Password,
    ConfirmPassword,
}

impl FormField for SignUpField {
    const ALL: &'static [Self] = &[Self::Email, Self::Password, Self::ConfirmPassword];

    fn name(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Password => "password",
            Self::ConfirmPassword => "confirmPassword",
        }
    }
}

pub struct SignUpSchema;

const EMAIL_RULES: &[Rule] = &[(validation::is_present, EMAIL_REQUIRED), (validation::is_email_or_empty, INVALID_EMAIL)];

const PASSWORD_RULES: &[Rule] = &[
    (validation::is_present, PASSWORD_REQUIRED),
    (validation::has_min_len, PASSWORD_TOO_SHORT),
    (validation::is_strong_password, PASSWORD_TOO_WEAK),
];

impl FormSchema for SignUpSchema {
    type Field = SignUpField;

    fn validate(values: &FieldValues<SignUpField>) -> FieldErrors<SignUpField> {
        let get = |field| values.get(&field).map_or("", String::as_str);
        let mut errors = FieldErrors::new();

        if let Some(message) = validation::first_failure(get(SignUpField::Email), EMAIL_RULES) {
            errors.insert(SignUpField::Email, message);
        }
        let password = get(SignUpField::Password);
        if let Some(message) = validation::first_failure(password, PASSWORD_RULES) {
            errors.insert(SignUpField::Password, message);
        }
        let confirm = get(SignUpField::ConfirmPassword);
        if !validation::is_present(confirm) {
            errors.insert(SignUpField::ConfirmPassword, CONFIRM_REQUIRED);
        } else if confirm != password {
            errors.insert(SignUpField::ConfirmPassword, PASSWORDS_MUST_MATCH);
        }
        errors
    }
}

/// Drives the sign-up form against the auth backend.
pub struct SignUpController {
    form: Form<SignUpSchema>,
    backend: Arc<dyn AuthBackend>,
    notifier: Arc<dyn Notifier>,
}

impl SignUpController {
    #[must_use]
    pub fn new(backend: Arc<dyn AuthBackend>, notifier: Arc<dyn Notifier>) -> Self {
        Self { form: Form::new(), backend, notifier }
    }

    pub fn set_field(&mut self, field: SignUpField, value: impl Into<String>) {
        self.form.set_field(field, value);
    }

    pub fn blur_field(&mut self, field: SignUpField) {
        self.form.blur_field(field);
    }

    #[must_use]
    pub fn state(&self) -> FormState<SignUpField> {
        self.form.state()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<FormState<SignUpField>> {
        self.form.subscribe()
    }

    /// Validate, then register. Mismatched or weak passwords never leave
    /// the form.
    pub async fn submit(&mut self) -> SubmitOutcome<SignUpResponse> {
        let values = match self.form.begin_submit() {
            Ok(values) => values,
            Err(outcome) => return outcome,
        };
        let email = take(&values, SignUpField::Email);
        let password = take(&values, SignUpField::Password);

        match self.backend.sign_up(&email, &password).await {
            Ok(response) => {
                tracing::info!(
                    user_id = %response.user.id,
                    confirmation_pending = response.confirmation_pending(),
                    "sign-up succeeded"
                );
                self.form.finish_ok();
                self.notifier.notify(SIGN_UP_SUCCESS);
                SubmitOutcome::Accepted(response)
            }
            Err(e) => {
                tracing::info!(error = %e, "sign-up rejected");
                self.form.finish_err(e.clone());
                SubmitOutcome::Rejected(e)
            }
        }
    }
}

#[cfg(test)]
#[path = "signup_test.rs"]
mod tests;
