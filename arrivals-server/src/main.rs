use std::process::ExitCode;

use chrono::Utc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use arrivals_server::config::ServerConfig;
use arrivals_server::poller::Poller;
use arrivals_server::snapshot::{Snapshot, SnapshotPublisher};
use arrivals_server::transiter::TransiterClient;
use arrivals_server::web::{AppState, create_router};

#[tokio::main]
async fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("invalid configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    match serve(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("server failed: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn serve(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    info!(
        transiter = %config.transiter.base_url,
        system = %config.transiter.system_id,
        "using Transiter feed"
    );

    // Create Transiter client
    let client = TransiterClient::new(config.transiter)?;

    // Readers see an empty snapshot until the first cycle completes
    let publisher = SnapshotPublisher::new(Snapshot::empty(Utc::now()));
    let state = AppState::new(publisher.reader());

    // Spawn the single polling worker
    let poller = Poller::new(client, publisher, config.poller);
    tokio::spawn(poller.run());

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!("Subway arrivals listening on http://{}", config.bind_addr);
    info!("  GET  /health    - Health check");
    info!("  GET  /arrivals  - Latest arrivals snapshot");

    axum::serve(listener, app).await?;
    Ok(())
}
