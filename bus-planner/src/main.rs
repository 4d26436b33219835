use std::process::ExitCode;

use tower_http::trace::TraceLayer;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use bus_planner::cache::CachedTimetables;
use bus_planner::config::AppConfig;
use bus_planner::dataset::Dataset;
use bus_planner::network::Network;
use bus_planner::web::{AppState, create_router};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "bus planner failed");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::from_env()?;

    info!(path = %config.dataset.display(), "loading dataset");
    let dataset = Dataset::load(&config.dataset)?;
    let network = Network::build(&dataset);

    let backend = config.timetables.backend()?;
    info!(timetables = ?config.timetables, "timetable source ready");
    let timetables = CachedTimetables::new(backend, &config.cache);

    let state = AppState::new(network, timetables, config.planner.clone());
    let app = create_router(state).layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    info!("Bus Journey Planner listening on http://{}", config.addr);
    info!("API endpoints:");
    info!("  GET /health                    - Health check");
    info!("  GET /api/lines                 - All lines");
    info!("  GET /api/stops/:id/lines       - Lines serving a stop");
    info!("  GET /api/stops/:id/timetable   - Decoded stop timetable");
    info!("  GET /api/terminals             - Terminal clusters");
    info!("  GET /api/route?from=&to=       - Fewest-hops route");
    info!("  GET /api/journey?from=&to=     - Journey plan");

    axum::serve(listener, app).await?;
    Ok(())
}
