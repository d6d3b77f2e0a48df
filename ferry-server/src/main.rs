use std::error::Error;

use ferry_server::config::ServerConfig;
use ferry_server::store::MemoryStore;
use ferry_server::web::{AppState, create_router};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ferry_server=info,tower_http=info".into()),
        )
        .init();

    let config = ServerConfig::from_env()?;
    tracing::info!(
        data = %config.data_path.display(),
        delay_minutes = config.engine.delay_minutes,
        cache_ttl_secs = config.cache.ttl.as_secs(),
        "starting ferry timetable service"
    );

    // Fail fast on a missing or invalid timetable
    let store = MemoryStore::load(&config.data_path)?;

    let state = AppState::new(store, config.engine, &config.cache);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "listening");
    tracing::info!("  GET    /health");
    tracing::info!("  GET    /stops");
    tracing::info!("  GET    /departures?from=&to=&date=&time=&mode=");
    tracing::info!("  POST   /exceptions");
    tracing::info!("  DELETE /exceptions/:id");

    axum::serve(listener, app).await?;
    Ok(())
}
