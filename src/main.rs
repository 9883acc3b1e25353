use std::sync::Arc;

use supastart::{config, routes, state, supabase};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")))
        .init();

    let config = config::AppConfig::from_env().expect("configuration invalid");
    tracing::info!(
        supabase_url = %config.supabase.url,
        cookie_secure = config.cookie_secure,
        static_dir = %config.static_dir.display(),
        "configuration loaded"
    );

    let backend = supabase::SupabaseAuth::new(&config.supabase).expect("auth client init failed");
    let port = config.port;
    let state = state::AppState::new(config, Arc::new(backend));

    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, "supastart listening");
    axum::serve(listener, app).await.expect("server failed");
}
