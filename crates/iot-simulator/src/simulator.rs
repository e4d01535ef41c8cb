//! The simulation loop.

use std::future::Future;
use std::pin::pin;
use std::time::Duration;

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{info, warn};

use crate::client::{AccessToken, DispenserApi, DispenserReading};
use crate::config::{CONSUMPTION_RANGE, SimulatorConfig};
use crate::error::SimulatorError;

/// Pauses between updates.
#[async_trait]
pub trait Sleeper: Send + Sync {
    /// Wait for `duration`.
    async fn sleep(&self, duration: Duration);
}

/// [`Sleeper`] backed by the Tokio timer.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Why a run stopped without error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The shutdown future resolved.
    Interrupted,
    /// The configured number of updates was attempted.
    IterationLimit,
}

/// Counters for a completed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulationSummary {
    /// Update attempts.
    pub iterations: u64,
    /// Updates the API accepted.
    pub updates: u64,
    /// Updates that failed and forced a fresh login.
    pub failures: u64,
    /// Why the run ended.
    pub stop: StopReason,
}

/// Level after consuming `consumption` units, floored at zero.
///
/// # Examples
/// ```
/// use iot_simulator::next_level;
///
/// assert_eq!(next_level(40, 7), 33);
/// assert_eq!(next_level(3, 7), 0);
/// ```
#[must_use]
pub const fn next_level(current: i64, consumption: i64) -> i64 {
    let level = current.saturating_sub(consumption);
    if level < 0 { 0 } else { level }
}

enum Step {
    Updated,
    Failed,
}

/// Drives random level drops against a [`DispenserApi`].
pub struct Simulator<A, S> {
    api: A,
    sleeper: S,
    config: SimulatorConfig,
    rng: StdRng,
}

impl<A, S> Simulator<A, S>
where
    A: DispenserApi,
    S: Sleeper,
{
    /// Build a simulator. The RNG is seeded from the config when set.
    #[must_use]
    pub fn new(api: A, sleeper: S, config: SimulatorConfig) -> Self {
        let rng = config
            .seed
            .map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64);
        Self {
            api,
            sleeper,
            config,
            rng,
        }
    }

    /// Run until `shutdown` resolves, the iteration limit is reached, or
    /// re-authentication fails.
    ///
    /// # Errors
    ///
    /// Returns [`SimulatorError`] when the initial login or dispenser fetch
    /// fails, no dispensers exist, or logging in again after a failed update
    /// fails.
    pub async fn run<F>(mut self, shutdown: F) -> Result<SimulationSummary, SimulatorError>
    where
        F: Future<Output = ()>,
    {
        let mut token = self
            .api
            .login(&self.config.credentials)
            .await
            .map_err(SimulatorError::Login)?;
        let mut dispensers = self
            .api
            .list_dispensers(&token)
            .await
            .map_err(SimulatorError::FetchDispensers)?;
        if dispensers.is_empty() {
            return Err(SimulatorError::NoDispensers);
        }
        info!(dispensers = dispensers.len(), "simulation started");

        let mut shutdown = pin!(shutdown);
        let mut iterations = 0_u64;
        let mut updates = 0_u64;
        let mut failures = 0_u64;
        let stop = loop {
            if self.config.iterations.is_some_and(|limit| iterations >= limit) {
                break StopReason::IterationLimit;
            }
            tokio::select! {
                biased;
                () = &mut shutdown => break StopReason::Interrupted,
                step = self.step(&mut token, &mut dispensers) => {
                    iterations += 1;
                    match step? {
                        Step::Updated => updates += 1,
                        Step::Failed => failures += 1,
                    }
                }
            }
        };

        let summary = SimulationSummary {
            iterations,
            updates,
            failures,
            stop,
        };
        info!(
            iterations,
            updates,
            failures,
            stop = ?summary.stop,
            "simulation stopped"
        );
        Ok(summary)
    }

    async fn step(
        &mut self,
        token: &mut AccessToken,
        dispensers: &mut [DispenserReading],
    ) -> Result<Step, SimulatorError> {
        let index = self.rng.random_range(0..dispensers.len());
        let consumption = self.rng.random_range(CONSUMPTION_RANGE);
        let target = dispensers
            .get_mut(index)
            .ok_or(SimulatorError::NoDispensers)?;
        let level = next_level(target.current_level, consumption);

        let step = match self.api.update_level(token, target.id, level).await {
            Ok(()) => {
                info!(dispenser = target.id, consumption, level, "dispenser updated");
                target.current_level = level;
                Step::Updated
            }
            Err(err) => {
                warn!(dispenser = target.id, error = %err, "update failed; logging in again");
                *token = self
                    .api
                    .login(&self.config.credentials)
                    .await
                    .map_err(SimulatorError::Reauthenticate)?;
                Step::Failed
            }
        };

        self.sleeper.sleep(self.config.delay.sample(&mut self.rng)).await;
        Ok(step)
    }
}
