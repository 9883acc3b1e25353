//! Buttons.
//!
//! [`Button`] is the form submit button: it disables itself and swaps its
//! label while the owning form is loading. [`ActionButton`] runs an async
//! action itself and walks `Idle -> Loading -> Success -> Idle`.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use askama::Template;
use tokio::sync::watch;

pub const DEFAULT_LOADING_TEXT: &str = "Loading...";

/// How long the success state is shown before the button accepts presses again.
pub const SUCCESS_RESET_DELAY: Duration = Duration::from_millis(2200);

// =============================================================================
// BUTTON
// =============================================================================

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ButtonKind {
    #[default]
    Submit,
    Button,
}

impl ButtonKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Submit => "submit",
            Self::Button => "button",
        }
    }
}

#[derive(Template, Clone, Debug, PartialEq, Eq)]
#[template(path = "ui/button.html")]
pub struct Button {
    pub label: String,
    pub kind: ButtonKind,
    pub is_loading: bool,
    pub loading_text: String,
    pub disabled: bool,
}

impl Button {
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            kind: ButtonKind::Submit,
            is_loading: false,
            loading_text: DEFAULT_LOADING_TEXT.to_owned(),
            disabled: false,
        }
    }

    #[must_use]
    pub fn kind(mut self, kind: ButtonKind) -> Self {
        self.kind = kind;
        self
    }

    #[must_use]
    pub fn loading(mut self, is_loading: bool) -> Self {
        self.is_loading = is_loading;
        self
    }

    #[must_use]
    pub fn loading_text(mut self, text: impl Into<String>) -> Self {
        self.loading_text = text.into();
        self
    }

    #[must_use]
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.is_loading || self.disabled
    }

    /// Text currently shown on the button.
    #[must_use]
    pub fn text(&self) -> &str {
        if self.is_loading { &self.loading_text } else { &self.label }
    }
}

// =============================================================================
// ACTION BUTTON
// =============================================================================

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Variant {
    #[default]
    Primary,
    Secondary,
    Link,
    Success,
    Warning,
    Error,
}

impl Variant {
    pub const ALL: [Self; 6] = [Self::Primary, Self::Secondary, Self::Link, Self::Success, Self::Warning, Self::Error];

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.as_str() == name)
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Secondary => "secondary",
            Self::Link => "link",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }

    /// CSS class for the variant, see `static/app.css`.
    #[must_use]
    pub fn class(self) -> String {
        format!("action-btn action-btn-{}", self.as_str())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ButtonStatus {
    #[default]
    Idle,
    Loading,
    Success,
}

impl ButtonStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Success => "success",
        }
    }

    /// Live-region text announced to screen readers.
    #[must_use]
    pub fn screen_reader_text(self) -> &'static str {
        match self {
            Self::Idle => "",
            Self::Loading => "Loading, please wait.",
            Self::Success => "Action completed successfully.",
        }
    }
}

/// Button that runs an async action and shows its progress.
///
/// Clones share the same status, so a press started through one handle
/// blocks presses through every other. With a submit target the button
/// renders inside a POST form; without one it is a plain `type="button"`.
#[derive(Clone)]
pub struct ActionButton {
    label: String,
    variant: Variant,
    disabled: bool,
    submit_to: Option<String>,
    status: Arc<watch::Sender<ButtonStatus>>,
}

impl ActionButton {
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        let (status, _) = watch::channel(ButtonStatus::Idle);
        Self { label: label.into(), variant: Variant::Primary, disabled: false, submit_to: None, status: Arc::new(status) }
    }

    #[must_use]
    pub fn submit_to(mut self, path: impl Into<String>) -> Self {
        self.submit_to = Some(path.into());
        self
    }


    #[must_use]
    pub fn variant(mut self, variant: Variant) -> Self {
        self.variant = variant;
        self
    }

    #[must_use]
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    #[must_use]
    pub fn status(&self) -> ButtonStatus {
        *self.status.borrow()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ButtonStatus> {
        self.status.subscribe()
    }

    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.disabled || self.status() != ButtonStatus::Idle
    }

    /// Run `action` unless the button is busy or disabled.
    ///
    /// Returns `None` when the press was ignored. After the action finishes
    /// the button shows success, then returns to idle after
    /// [`SUCCESS_RESET_DELAY`] on a background task.
    pub async fn press<F>(&self, action: F) -> Option<F::Output>
    where
        F: Future,
    {
        if self.disabled {
            return None;
        }
        let started = self.status.send_if_modified(|status| {
            if *status == ButtonStatus::Idle {
                *status = ButtonStatus::Loading;
                true
            } else {
                false
            }
        });
        if !started {
            tracing::trace!(label = %self.label, "press ignored while busy");
            return None;
        }

        let output = action.await;

        self.status.send_replace(ButtonStatus::Success);
        let status = Arc::clone(&self.status);
        tokio::spawn(async move {
            tokio::time::sleep(SUCCESS_RESET_DELAY).await;
            status.send_replace(ButtonStatus::Idle);
        });
        Some(output)
    }

    /// Snapshot for rendering.
    #[must_use]
    pub fn view(&self) -> ActionButtonView<'_> {
        let status = self.status();
        ActionButtonView {
            label: &self.label,
            submit_to: self.submit_to.as_deref(),
            class: self.variant.class(),
            status,
            disabled: self.is_disabled(),
            sr_text: status.screen_reader_text(),
        }
    }
}

#[derive(Template)]
#[template(path = "ui/action_button.html")]
pub struct ActionButtonView<'a> {
    pub label: &'a str,
    pub submit_to: Option<&'a str>,
    pub class: String,
    pub status: ButtonStatus,
    pub disabled: bool,
    pub sr_text: &'static str,
}

#[cfg(test)]
#[path = "button_test.rs"]
mod tests;
