//! Startup wiring for sample inventory seeding.

mod config;
mod startup;

pub use config::{DEFAULT_SAMPLE_SEED, SampleDataSettings};
pub use startup::{run_sample_data, seed_sample_data_on_startup};
