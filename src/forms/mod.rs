//! Auth form controllers (login, sign-up).
//!
//! ARCHITECTURE
//! ============
//! A controller owns one form's field values, validation errors, touched
//! flags and submission phase. Collaborators (auth backend, navigator,
//! notifier) are passed in at construction, so controllers run the same
//! under an HTTP handler and under a unit test.
//!
//! State lives in a `tokio::sync::watch` channel: the controller is the only
//! writer, and anything that needs to react to `Submitting` (a loading
//! button, a test) subscribes to it.

pub mod login;
pub mod signup;
pub mod validation;

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::marker::PhantomData;

use tokio::sync::watch;

use crate::supabase::AuthError;

pub use login::LoginController;
pub use signup::SignUpController;

// =============================================================================
// FIELDS + SCHEMA
// =============================================================================

/// A named input of a form.
pub trait FormField: Copy + Ord + fmt::Debug + Send + Sync + 'static {
    /// Every field, in display order.
    const ALL: &'static [Self];

    /// HTML `name` attribute of the field.
    fn name(self) -> &'static str;

    /// Look a field up by its HTML name.
    #[must_use]
    fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|f| f.name() == name)
    }
}

pub type FieldValues<F> = BTreeMap<F, String>;
pub type FieldErrors<F> = BTreeMap<F, &'static str>;

/// Client-side validation rules for a form.
pub trait FormSchema {
    type Field: FormField;

    /// Validate every field, reporting the first failing rule per field.
    fn validate(values: &FieldValues<Self::Field>) -> FieldErrors<Self::Field>;
}

// =============================================================================
// STATE
// =============================================================================

/// Submission lifecycle. Any field edit returns a terminal phase to `Idle`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SubmitPhase {
    #[default]
    Idle,
    Submitting,
    Succeeded,
    Failed,
}

/// Snapshot of a form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormState<F: FormField> {
    values: FieldValues<F>,
    errors: FieldErrors<F>,
    touched: BTreeSet<F>,
    phase: SubmitPhase,
    last_error: Option<AuthError>,
}

impl<F: FormField> FormState<F> {
    fn new() -> Self {
        Self {
            values: F::ALL.iter().map(|f| (*f, String::new())).collect(),
            errors: BTreeMap::new(),
            touched: BTreeSet::new(),
            phase: SubmitPhase::Idle,
            last_error: None,
        }
    }

    #[must_use]
    pub fn value(&self, field: F) -> &str {
        self.values.get(&field).map_or("", String::as_str)
    }

    #[must_use]
    pub fn values(&self) -> &FieldValues<F> {
        &self.values
    }

    /// Current validation error, shown or not.
    #[must_use]
    pub fn error(&self, field: F) -> Option<&'static str> {
        self.errors.get(&field).copied()
    }

    /// Error to render next to the field: only once the user has left it.
    #[must_use]
    pub fn visible_error(&self, field: F) -> Option<&'static str> {
        if self.is_touched(field) { self.error(field) } else { None }
    }

    #[must_use]
    pub fn errors(&self) -> &FieldErrors<F> {
        &self.errors
    }

    #[must_use]
    pub fn is_touched(&self, field: F) -> bool {
        self.touched.contains(&field)
    }

    #[must_use]
    pub fn phase(&self) -> SubmitPhase {
        self.phase
    }

    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.phase == SubmitPhase::Submitting
    }

    /// Form-level backend error from the most recent submission.
    #[must_use]
    pub fn last_error(&self) -> Option<&AuthError> {
        self.last_error.as_ref()
    }
}

// =============================================================================
// COLLABORATORS
// =============================================================================

/// Client-side navigation target (router push).
pub trait Navigator: Send + Sync {
    fn push(&self, path: &str);
}

/// User-visible confirmation channel.
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str);
}

/// Result of [`LoginController::submit`] / [`SignUpController::submit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome<T> {
    /// Validation failed; the backend was not called.
    Invalid,
    /// A submission is already in flight.
    Busy,
    /// The backend refused the request; the error is kept on the form.
    Rejected(AuthError),
    /// The backend accepted the request.
    Accepted(T),
}

// =============================================================================
// FORM CORE
// =============================================================================

/// Field bookkeeping shared by the concrete controllers.
pub struct Form<S: FormSchema> {
    state: watch::Sender<FormState<S::Field>>,
    _schema: PhantomData<fn() -> S>,
}

impl<S: FormSchema> Default for Form<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: FormSchema> Form<S> {
    #[must_use]
    pub fn new() -> Self {
        let (state, _) = watch::channel(FormState::new());
        Self { state, _schema: PhantomData }
    }

    /// Observe state changes, including the `Submitting` window.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<FormState<S::Field>> {
        self.state.subscribe()
    }

    #[must_use]
    pub fn state(&self) -> FormState<S::Field> {
        self.state.borrow().clone()
    }

    /// Store a value and revalidate. A finished submission goes back to idle.
    pub fn set_field(&mut self, field: S::Field, value: impl Into<String>) {
        let value = value.into();
        self.state.send_modify(|s| {
            s.values.insert(field, value);
            s.errors = S::validate(&s.values);
            if matches!(s.phase, SubmitPhase::Succeeded | SubmitPhase::Failed) {
                s.phase = SubmitPhase::Idle;
            }
        });
    }

    /// Mark a field as visited and revalidate.
    pub fn blur_field(&mut self, field: S::Field) {
        self.state.send_modify(|s| {
            s.touched.insert(field);
            s.errors = S::validate(&s.values);
        });
    }

    /// Touch and validate everything, then enter `Submitting` if the form is
    /// clean. Returns the values to submit.
    fn begin_submit<T>(&mut self) -> Result<FieldValues<S::Field>, SubmitOutcome<T>> {
        if self.state.borrow().is_submitting() {
            return Err(SubmitOutcome::Busy);
        }
        let mut clean = false;
        self.state.send_modify(|s| {
            s.touched.extend(<S::Field as FormField>::ALL.iter().copied());
            s.errors = S::validate(&s.values);
            clean = s.errors.is_empty();
            if clean {
                s.phase = SubmitPhase::Submitting;
                s.last_error = None;
            }
        });
        if clean { Ok(self.state.borrow().values.clone()) } else { Err(SubmitOutcome::Invalid) }
    }

    fn finish_ok(&mut self) {
        self.state.send_modify(|s| s.phase = SubmitPhase::Succeeded);
    }

    fn finish_err(&mut self, error: AuthError) {
        self.state.send_modify(|s| {
            s.phase = SubmitPhase::Failed;
            s.last_error = Some(error);
        });
    }
}

/// Value of `field`, or empty when the map does not carry it.
fn take<F: FormField>(values: &FieldValues<F>, field: F) -> String {
    values.get(&field).cloned().unwrap_or_default()
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
