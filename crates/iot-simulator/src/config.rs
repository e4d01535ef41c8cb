//! Simulator configuration.
//!
//! [`SimulatorSettings`] is the raw layer loaded by OrthoConfig from CLI
//! flags, `SIMULATOR_*` environment variables and an optional config file.
//! [`SimulatorSettings::into_config`] validates it into the explicit
//! [`SimulatorConfig`] the simulator is constructed with.

use std::fmt;
use std::ops::RangeInclusive;
use std::time::Duration;

use ortho_config::OrthoConfig;
use rand::Rng;
use reqwest::Url;
use serde::Deserialize;
use zeroize::Zeroizing;

use crate::error::ConfigError;

/// Units consumed per simulated update.
pub const CONSUMPTION_RANGE: RangeInclusive<i64> = 1..=10;

const DEFAULT_BASE_URL: &str = "http://localhost:8080";
const DEFAULT_USERNAME: &str = "sampleuser";
const DEFAULT_PASSWORD: &str = "password123";
const DEFAULT_MIN_DELAY_MS: u64 = 2_000;
const DEFAULT_MAX_DELAY_MS: u64 = 5_000;
const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;

/// Raw simulator settings.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "SIMULATOR")]
pub struct SimulatorSettings {
    /// API root, e.g. `http://localhost:8080`.
    pub base_url: Option<String>,
    /// Login username.
    pub username: Option<String>,
    /// Login password.
    pub password: Option<String>,
    /// Shortest pause between updates, in milliseconds.
    #[ortho_config(default = DEFAULT_MIN_DELAY_MS)]
    pub min_delay_ms: u64,
    /// Longest pause between updates, in milliseconds.
    #[ortho_config(default = DEFAULT_MAX_DELAY_MS)]
    pub max_delay_ms: u64,
    /// Stop after this many updates.
    pub iterations: Option<u64>,
    /// Seed for reproducible runs.
    pub seed: Option<u64>,
    /// Per-request timeout, in milliseconds.
    #[ortho_config(default = DEFAULT_REQUEST_TIMEOUT_MS)]
    pub request_timeout_ms: u64,
}

impl SimulatorSettings {
    /// Validate and apply defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the base URL does not parse, the delay
    /// range is empty, or the request timeout is zero.
    pub fn into_config(self) -> Result<SimulatorConfig, ConfigError> {
        let raw_url = self.base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_owned());
        let base_url = Url::parse(&raw_url).map_err(|err| ConfigError::BaseUrl {
            value: raw_url.clone(),
            message: err.to_string(),
        })?;
        let delay = DelayRange::from_millis(self.min_delay_ms, self.max_delay_ms)?;
        let timeout_ms = self.request_timeout_ms;
        if timeout_ms == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(SimulatorConfig {
            base_url,
            credentials: Credentials::new(
                self.username.unwrap_or_else(|| DEFAULT_USERNAME.to_owned()),
                self.password.unwrap_or_else(|| DEFAULT_PASSWORD.to_owned()),
            ),
            delay,
            iterations: self.iterations,
            seed: self.seed,
            request_timeout: Duration::from_millis(timeout_ms),
        })
    }
}

/// Login credentials. The password is wiped from memory on drop.
#[derive(Clone)]
pub struct Credentials {
    username: String,
    password: Zeroizing<String>,
}

impl Credentials {
    /// Pair a username with its password.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: Zeroizing::new(password.into()),
        }
    }

    /// Login name.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Plain password.
    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Inclusive bounds for the pause between updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelayRange {
    min_ms: u64,
    max_ms: u64,
}

impl DelayRange {
    /// Build a range from millisecond bounds.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::DelayRange`] when `min_ms > max_ms`.
    pub const fn from_millis(min_ms: u64, max_ms: u64) -> Result<Self, ConfigError> {
        if min_ms > max_ms {
            return Err(ConfigError::DelayRange { min_ms, max_ms });
        }
        Ok(Self { min_ms, max_ms })
    }

    /// Draw a pause uniformly from the range.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        Duration::from_millis(rng.random_range(self.min_ms..=self.max_ms))
    }
}

impl Default for DelayRange {
    fn default() -> Self {
        Self {
            min_ms: DEFAULT_MIN_DELAY_MS,
            max_ms: DEFAULT_MAX_DELAY_MS,
        }
    }
}

/// Validated simulator configuration.
#[derive(Debug, Clone)]
pub struct SimulatorConfig {
    /// API root.
    pub base_url: Url,
    /// Login credentials.
    pub credentials: Credentials,
    /// Pause between updates.
    pub delay: DelayRange,
    /// Stop after this many updates; unbounded when `None`.
    pub iterations: Option<u64>,
    /// Seed for reproducible runs; entropy from the OS when `None`.
    pub seed: Option<u64>,
    /// Per-request timeout.
    pub request_timeout: Duration,
}

impl SimulatorConfig {
    /// Defaults against `base_url`, using the sample user.
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            credentials: Credentials::new(DEFAULT_USERNAME, DEFAULT_PASSWORD),
            delay: DelayRange::default(),
            iterations: None,
            seed: None,
            request_timeout: Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS),
        }
    }

    /// Override the credentials.
    #[must_use]
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }

    /// Override the pause range.
    #[must_use]
    pub const fn with_delay(mut self, delay: DelayRange) -> Self {
        self.delay = delay;
        self
    }

    /// Stop after `iterations` updates.
    #[must_use]
    pub const fn with_iterations(mut self, iterations: u64) -> Self {
        self.iterations = Some(iterations);
        self
    }

    /// Fix the random seed.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}
