//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers and the session guard via the
//! `State` extractor. It holds the loaded configuration, the auth backend
//! and the dashboard's demo buttons. Clone is required by Axum, so every
//! field is `Arc`-backed.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::routes::app::ActionDemo;
use crate::supabase::AuthBackend;

// =============================================================================
// APP STATE
// =============================================================================

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub backend: Arc<dyn AuthBackend>,
    pub actions: ActionDemo,
}

impl AppState {
    #[must_use]
    pub fn new(config: AppConfig, backend: Arc<dyn AuthBackend>) -> Self {
        Self { config: Arc::new(config), backend, actions: ActionDemo::new() }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
