use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use booking_ingest::config::AppConfig;
use booking_ingest::db::Storage;
use booking_ingest::routes;
use booking_ingest::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    let storage = Storage::new(&config);
    if let Err(e) = storage.connect() {
        tracing::error!("failed to connect to database: {e:#}");
        std::process::exit(1);
    }

    let state = Arc::new(AppState { storage });

    let app = routes::router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
