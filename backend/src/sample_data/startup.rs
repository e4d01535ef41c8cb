//! Startup seeding orchestration.

use tracing::info;

use crate::domain::{SampleDataOutcome, SampleDataSeeder, SampleDataSeedingError};
use crate::outbound::StoreAdapters;

use super::config::SampleDataSettings;

/// Generate, or reset then generate, the sample inventory.
///
/// # Errors
///
/// Returns [`SampleDataSeedingError`] when generation or persistence fails.
pub async fn run_sample_data(
    stores: &StoreAdapters,
    seed: u64,
    reset: bool,
) -> Result<SampleDataOutcome, SampleDataSeedingError> {
    let seeder = SampleDataSeeder::new(
        stores.users.clone(),
        stores.floors.clone(),
        stores.pantries.clone(),
        stores.dispensers.clone(),
    );
    if reset {
        seeder.reset(seed).await
    } else {
        seeder.generate(seed).await
    }
}

/// Apply sample data on startup when enabled.
///
/// # Examples
///
/// ```rust,no_run
/// use pantry_backend::outbound::StoreAdapters;
/// use pantry_backend::sample_data::{SampleDataSettings, seed_sample_data_on_startup};
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let settings = SampleDataSettings { enabled: false, reset: false, seed: None };
/// let outcome = seed_sample_data_on_startup(&settings, &StoreAdapters::in_memory()).await?;
/// assert!(outcome.is_none());
/// # Ok(())
/// # }
/// ```
///
/// # Errors
///
/// Returns [`SampleDataSeedingError`] when seeding is enabled and fails.
pub async fn seed_sample_data_on_startup(
    settings: &SampleDataSettings,
    stores: &StoreAdapters,
) -> Result<Option<SampleDataOutcome>, SampleDataSeedingError> {
    if !settings.enabled {
        info!(reason = "disabled", "sample data seeding skipped");
        return Ok(None);
    }
    let outcome = run_sample_data(stores, settings.seed(), settings.reset).await?;
    Ok(Some(outcome))
}
