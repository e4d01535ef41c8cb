//! Sample data configuration loaded via OrthoConfig.

use ortho_config::OrthoConfig;
use serde::Deserialize;

/// Seed used when none is configured.
pub const DEFAULT_SAMPLE_SEED: u64 = 2024;

/// Configuration values controlling sample data seeding at startup.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "PANTRY_SAMPLE_DATA")]
pub struct SampleDataSettings {
    /// Seed the inventory on startup.
    #[ortho_config(default = false)]
    pub enabled: bool,
    /// Also remove the sample user before seeding.
    #[ortho_config(default = false)]
    pub reset: bool,
    /// Generator seed.
    pub seed: Option<u64>,
}

impl SampleDataSettings {
    /// Return the configured seed, falling back to the default.
    pub fn seed(&self) -> u64 {
        self.seed.unwrap_or(DEFAULT_SAMPLE_SEED)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    fn load_from_empty_args() -> SampleDataSettings {
        SampleDataSettings::load_from_iter([OsString::from("pantry-backend")])
            .expect("config should load")
    }

    #[rstest]
    fn default_values_are_used_when_missing() {
        let _guard = lock_env([
            ("PANTRY_SAMPLE_DATA_ENABLED", None::<String>),
            ("PANTRY_SAMPLE_DATA_RESET", None::<String>),
            ("PANTRY_SAMPLE_DATA_SEED", None::<String>),
        ]);

        let settings = load_from_empty_args();
        assert!(!settings.enabled);
        assert!(!settings.reset);
        assert_eq!(settings.seed(), DEFAULT_SAMPLE_SEED);
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("PANTRY_SAMPLE_DATA_ENABLED", Some("true".to_owned())),
            ("PANTRY_SAMPLE_DATA_RESET", Some("true".to_owned())),
            ("PANTRY_SAMPLE_DATA_SEED", Some("7".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert!(settings.enabled);
        assert!(settings.reset);
        assert_eq!(settings.seed(), 7);
    }
}
