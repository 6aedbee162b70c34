//! Simulate command implementation

use crate::cli::{load_base_config, SimulateArgs};
use crate::config::TccConfig;
use crate::logging::init_tracing;
use crate::sim::{create_router, SimState};
use std::sync::Arc;

/// Load configuration with simulator overrides from the command line.
pub fn load_config_with_overrides(
    args: &SimulateArgs,
) -> Result<TccConfig, Box<dyn std::error::Error>> {
    let mut config = load_base_config(&args.config)?;

    if let Some(port) = args.port {
        config.simulator.port = port;
    }
    if let Some(ref host) = args.host {
        config.simulator.host = host.clone();
    }
    if args.seed.is_some() {
        config.simulator.seed = args.seed;
    }
    if let Some(ref log_level) = args.log_level {
        config.logging.level = log_level.clone();
    }

    config.validate()?;
    Ok(config)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to install CTRL+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Received SIGINT, shutting down...");
}

/// Main simulate command handler
pub async fn run_simulate(args: SimulateArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config_with_overrides(&args)?;
    init_tracing(&config.logging)?;

    let sim = &config.simulator;
    let state = Arc::new(SimState::new(sim.seed, sim.horizon));
    let app = create_router(state);

    let addr = format!("{}:{}", sim.host, sim.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(
        addr = %addr,
        seed = ?sim.seed,
        horizon = sim.horizon,
        "Simulator listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Simulator stopped");
    Ok(())
}
