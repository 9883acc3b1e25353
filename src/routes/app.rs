//! Signed-in area under `/app`.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use serde::Deserialize;

use super::pages::{self, AppSection, render_page};
use crate::guard::CurrentSession;
use crate::paths;
use crate::state::AppState;
use crate::ui::{ActionButton, Variant};

/// How long a demo action runs before its button reports success.
pub const DEMO_ACTION_DURATION: Duration = Duration::from_millis(800);

/// `?sidebar=open|closed` drives the mobile sidebar.
#[derive(Debug, Default, Deserialize)]
pub struct AppQuery {
    #[serde(default)]
    pub sidebar: Option<String>,
}

impl AppQuery {
    #[must_use]
    pub fn sidebar_open(&self) -> bool {
        self.sidebar.as_deref() == Some("open")
    }
}

// =============================================================================
// ACTION DEMO
// =============================================================================

/// The dashboard's demo buttons, one per variant.
///
/// Shared by every request, so a press made by one visitor shows as loading
/// (then success) to everyone until the button resets.
#[derive(Clone)]
pub struct ActionDemo {
    buttons: Arc<[(Variant, ActionButton)]>,
}

impl Default for ActionDemo {
    fn default() -> Self {
        Self::new()
    }
}

impl ActionDemo {
    #[must_use]
    pub fn new() -> Self {
        let buttons = Variant::ALL
            .into_iter()
            .map(|variant| {
                let button = ActionButton::new(pages::capitalize(variant.as_str()))
                    .variant(variant)
                    .submit_to(paths::app_action(variant.as_str()));
                (variant, button)
            })
            .collect();
        Self { buttons }
    }

    #[must_use]
    pub fn button(&self, variant: Variant) -> Option<&ActionButton> {
        self.buttons.iter().find(|(v, _)| *v == variant).map(|(_, b)| b)
    }

    pub fn buttons(&self) -> impl Iterator<Item = &ActionButton> {
        self.buttons.iter().map(|(_, b)| b)
    }
}

// =============================================================================
// HANDLERS
// =============================================================================

fn render_section(state: &AppState, current: &CurrentSession, section: AppSection, query: &AppQuery) -> Response {
    match pages::app_page(&current.0, section, query.sidebar_open(), state.actions.buttons()) {
        Ok(page) => render_page(StatusCode::OK, &page),
        Err(e) => {
            tracing::error!(error = %e, ?section, "page build failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// `GET /app`
pub async fn home(State(state): State<AppState>, current: CurrentSession, Query(query): Query<AppQuery>) -> Response {
    render_section(&state, &current, AppSection::Home, &query)
}

/// `GET /app/settings`
pub async fn settings(State(state): State<AppState>, current: CurrentSession, Query(query): Query<AppQuery>) -> Response {
    render_section(&state, &current, AppSection::Settings, &query)
}

/// `POST /app/actions/{variant}`: run the demo action on that button, then
/// go back to the dashboard, which shows the button's status.
pub async fn press_action(
    State(state): State<AppState>,
    CurrentSession(current): CurrentSession,
    Path(variant): Path<String>,
) -> Response {
    let Some(button) = Variant::from_name(&variant).and_then(|v| state.actions.button(v)) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    match button.press(tokio::time::sleep(DEMO_ACTION_DURATION)).await {
        Some(()) => tracing::info!(user_id = %current.user.id, %variant, "demo action completed"),
        None => tracing::debug!(%variant, "demo action ignored while busy"),
    }
    Redirect::to(paths::APP).into_response()
}

#[cfg(test)]
#[path = "app_test.rs"]
mod tests;
