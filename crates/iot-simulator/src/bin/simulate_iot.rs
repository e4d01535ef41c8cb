//! Emulate dispenser sensors against a running pantry API.
//!
//! # Examples
//! ```sh
//! SIMULATOR_BASE_URL=http://localhost:8080 cargo run -p iot-simulator -- --iterations 20
//! ```

use color_eyre::eyre::{Result, WrapErr, eyre};
use iot_simulator::{HttpDispenserApi, Simulator, SimulatorSettings, TokioSleeper};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

async fn interrupted() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "cannot listen for Ctrl-C; run until the iteration limit");
        std::future::pending::<()>().await;
    }
    info!("interrupt received");
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let config = SimulatorSettings::load()
        .map_err(|err| eyre!("failed to load settings: {err}"))?
        .into_config()?;
    info!(base_url = %config.base_url, user = config.credentials.username(), "connecting");
    let api = HttpDispenserApi::new(config.base_url.clone(), config.request_timeout)
        .wrap_err("HTTP client construction failed")?;

    let summary = Simulator::new(api, TokioSleeper, config)
        .run(interrupted())
        .await?;
    info!(
        iterations = summary.iterations,
        updates = summary.updates,
        failures = summary.failures,
        "simulation finished"
    );
    Ok(())
}
