use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pairquiz::{
    api,
    config::ServerConfig,
    state::AppState,
    store::{FileStore, RoomStore},
};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present (before any env var reads)
    if let Err(e) = dotenvy::dotenv() {
        // Not an error if .env doesn't exist, only log if it's a different issue
        if !matches!(e, dotenvy::Error::Io(_)) {
            eprintln!("Warning: Failed to load .env file: {}", e);
        }
    }

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pairquiz=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting pairquiz...");

    let config = ServerConfig::from_env();

    let store = FileStore::new(&config.rooms_file);
    tracing::info!(
        "Using {} store at {}",
        store.name(),
        store.path().display()
    );

    let state = Arc::new(AppState::new(store).with_default_edition(config.default_edition.clone()));
    tracing::info!(
        "New rooms get {} questions, edition '{}'",
        state.questions().len(),
        config.default_edition
    );

    let app = api::router(state, &config.static_dir);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await
}
