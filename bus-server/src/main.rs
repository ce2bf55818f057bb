use bus_server::aggregator::Aggregator;
use bus_server::config::{AppConfig, build_providers};
use bus_server::web::{AppState, create_router};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = AppConfig::from_env()?;

    let providers = build_providers(&config)?;
    if providers.is_empty() {
        warn!("no providers configured; searches will fail");
    }

    let state = AppState::new(Aggregator::new(providers));
    let app = create_router(state);

    let addr = config.addr;
    info!("Bus Booking Aggregator listening on http://{addr}");
    info!("API Endpoints:");
    info!("  GET  /           - Welcome");
    info!("  GET  /health     - Health check");
    info!("  POST /search     - Search routes (JSON body)");
    info!("  GET  /routes     - Search routes (query parameters)");
    info!("  GET  /cities     - Available cities");
    info!("  GET  /platforms  - Registered booking platforms");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
