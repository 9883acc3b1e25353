pub mod config;
pub mod forms;
pub mod guard;
pub mod paths;
pub mod routes;
pub mod session;
pub mod state;
pub mod supabase;
pub mod ui;
