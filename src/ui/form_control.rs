//! Labelled input with an optional error line.

use askama::Template;

#[derive(Template, Clone, Debug, Default, PartialEq, Eq)]
#[template(path = "ui/form_control.html")]
pub struct FormControl {
    pub id: String,
    pub label: String,
    pub name: String,
    pub input_type: String,
    pub autocomplete: Option<String>,
    pub value: String,
    pub required: bool,
    pub disabled: bool,
    pub error: Option<String>,
}

impl FormControl {
    /// Text input whose `id` and `name` are both `name`.
    #[must_use]
    pub fn new(name: impl Into<String>, label: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: name.clone(),
            label: label.into(),
            name,
            input_type: "text".to_owned(),
            required: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn input_type(mut self, input_type: impl Into<String>) -> Self {
        self.input_type = input_type.into();
        self
    }

    #[must_use]
    pub fn autocomplete(mut self, autocomplete: impl Into<String>) -> Self {
        self.autocomplete = Some(autocomplete.into());
        self
    }

    #[must_use]
    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    #[must_use]
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Error line under the input. `None` renders nothing.
    #[must_use]
    pub fn error(mut self, error: Option<&str>) -> Self {
        self.error = error.map(str::to_owned);
        self
    }
}

#[cfg(test)]
#[path = "form_control_test.rs"]
mod tests;
