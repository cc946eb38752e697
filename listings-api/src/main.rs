use anyhow::Context;
use listings_api::{build_client, build_router, AppState, ServerSettings};
use listings_core::AppConfig;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let settings = ServerSettings::from_env()?;
    let config = AppConfig::load();
    let client = build_client(&config.fetch).context("failed to build HTTP client")?;

    info!(
        areas = config.sources.areas.len(),
        concurrency = config.fetch.concurrency(),
        "sources configured"
    );

    let app = build_router(AppState::new(client, config));
    let listener = TcpListener::bind(settings.addr())
        .await
        .with_context(|| format!("failed to bind {}", settings.addr()))?;
    info!(addr = %settings.addr(), "listening");

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
