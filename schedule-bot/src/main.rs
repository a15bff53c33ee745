use std::process::ExitCode;
use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use schedule_bot::cache::CacheConfig;
use schedule_bot::config::AppConfig;
use schedule_bot::dialogue::Dialogue;
use schedule_bot::schedule::FetcherConfig;
use schedule_bot::store::RouteStore;
use schedule_bot::web::{AppState, create_router};
use schedule_bot::yandex::YandexClient;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            error!("{message}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), String> {
    let config = AppConfig::from_env().map_err(|e| format!("Configuration error: {e}"))?;

    // One HTTP client serves both the schedule search and the station directory.
    let client = YandexClient::new(config.yandex())
        .map_err(|e| format!("Failed to create Yandex client: {e}"))?;

    let store = Arc::new(RouteStore::open(config.route_store()));
    info!(
        users = store.user_count(),
        dir = %config.routes_dir.display(),
        "route store ready"
    );

    let dialogue = Dialogue::new(
        client.clone(),
        client,
        store,
        &CacheConfig::default(),
        FetcherConfig::default(),
    );

    let state = AppState::new(dialogue, config.utc_offset);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .map_err(|e| format!("Failed to bind {}: {e}", config.bind_addr))?;

    info!(addr = %config.bind_addr, "schedule bot listening");
    info!("  GET  /health                 - Health check");
    info!("  POST /messages               - Send a chat message");
    info!("  GET  /users/:user_id/routes  - List saved routes");

    axum::serve(listener, app)
        .await
        .map_err(|e| format!("Server error: {e}"))
}
