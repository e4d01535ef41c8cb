//! Dispenser sensor emulator for the pantry API.
//!
//! Logs in with the configured credentials, fetches every dispenser and then
//! repeatedly picks one at random, posting a lower absolute level as a real
//! sensor would after consumption. A failed update triggers a fresh login;
//! the run stops when that login fails, on shutdown, or after an optional
//! iteration limit.
//!
//! # Example
//!
//! ```no_run
//! use iot_simulator::{HttpDispenserApi, Simulator, SimulatorConfig, TokioSleeper};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = SimulatorConfig::new("http://localhost:8080".parse()?).with_iterations(10);
//! let api = HttpDispenserApi::new(config.base_url.clone(), config.request_timeout)?;
//! let summary = Simulator::new(api, TokioSleeper, config)
//!     .run(std::future::pending())
//!     .await?;
//! assert_eq!(summary.iterations, 10);
//! # Ok(())
//! # }
//! ```

mod client;
mod config;
mod error;
mod simulator;

pub use client::{AccessToken, DispenserApi, DispenserReading, HttpDispenserApi};
pub use config::{
    CONSUMPTION_RANGE, Credentials, DelayRange, SimulatorConfig, SimulatorSettings,
};
pub use error::{ClientError, ConfigError, SimulatorError};
pub use simulator::{SimulationSummary, Simulator, Sleeper, StopReason, TokioSleeper, next_level};
