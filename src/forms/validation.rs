//! Field rules for the auth forms.
//!
//! Messages are user-facing and kept stable; tests match on them.

use std::sync::LazyLock;

use regex::Regex;

pub const PASSWORD_MIN_LEN: usize = 8;

pub const LOGIN_REQUIRED: &str = "Required";
pub const LOGIN_INVALID_EMAIL: &str = "Invalid email";

pub const EMAIL_REQUIRED: &str = "Email is required";
pub const INVALID_EMAIL: &str = "Invalid email address";
pub const PASSWORD_REQUIRED: &str = "Password is required";
pub const PASSWORD_TOO_SHORT: &str = "Password must be at least 8 characters";
pub const PASSWORD_TOO_WEAK: &str = "Password must be alphanumeric and contain at least one special character.";
pub const CONFIRM_REQUIRED: &str = "Confirm password is required";
pub const PASSWORDS_MUST_MATCH: &str = "Passwords must match";

/// WHATWG `input[type=email]` pattern: permissive local part, dot-separated
/// host labels of at most 63 characters.
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .expect("valid regex")
});

#[must_use]
pub fn is_email(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}

/// At least one ASCII letter, one ASCII digit and one character that is
/// neither alphanumeric nor whitespace.
#[must_use]
pub fn is_strong_password(value: &str) -> bool {
    let has_letter = value.chars().any(|c| c.is_ascii_alphabetic());
    let has_digit = value.chars().any(|c| c.is_ascii_digit());
    let has_special = value
        .chars()
        .any(|c| !c.is_ascii_alphanumeric() && !c.is_whitespace());
    has_letter && has_digit && has_special
}

/// A check paired with the message reported when it fails.
pub type Rule = (fn(&str) -> bool, &'static str);

/// Run `rules` in order and return the first message whose check fails.
#[must_use]
pub fn first_failure(value: &str, rules: &[Rule]) -> Option<&'static str> {
    rules
        .iter()
        .find(|(check, _)| !check(value))
        .map(|(_, message)| *message)
}

#[must_use]
pub fn is_present(value: &str) -> bool {
    !value.is_empty()
}

/// Empty values pass; presence is a separate rule.
#[must_use]
pub fn is_email_or_empty(value: &str) -> bool {
    value.is_empty() || is_email(value)
}

/// Length in UTF-16 code units, the unit browsers and JS validators count.
/// An emoji outside the BMP counts as two.
#[must_use]
pub fn has_min_len(value: &str) -> bool {
    value.encode_utf16().count() >= PASSWORD_MIN_LEN
}

#[cfg(test)]
#[path = "validation_test.rs"]
mod tests;
