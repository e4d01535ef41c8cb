//! Simulator error types.

use thiserror::Error;

/// Invalid simulator settings.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The API base URL does not parse.
    #[error("invalid base URL {value:?}: {message}")]
    BaseUrl {
        /// Configured value.
        value: String,
        /// Parser message.
        message: String,
    },
    /// The minimum delay exceeds the maximum.
    #[error("delay range is empty: min {min_ms} ms > max {max_ms} ms")]
    DelayRange {
        /// Lower bound in milliseconds.
        min_ms: u64,
        /// Upper bound in milliseconds.
        max_ms: u64,
    },
    /// A timeout of zero was configured.
    #[error("request timeout must be greater than zero")]
    ZeroTimeout,
}

/// Failures talking to the pantry API.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The API rejected the credentials or token.
    #[error("unauthorised")]
    Unauthorized,
    /// The API answered with an unexpected status.
    #[error("unexpected status {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, possibly empty.
        body: String,
    },
    /// An endpoint URL could not be built from the base URL.
    #[error("invalid endpoint {path:?}: {message}")]
    Endpoint {
        /// Relative path being joined.
        path: String,
        /// Parser message.
        message: String,
    },
    /// The request did not complete or the body did not decode.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Reasons a simulation run ends early.
#[derive(Debug, Error)]
pub enum SimulatorError {
    /// The initial login failed.
    #[error("authentication failed: {0}")]
    Login(#[source] ClientError),
    /// Listing dispensers failed.
    #[error("failed to fetch dispensers: {0}")]
    FetchDispensers(#[source] ClientError),
    /// The API has no dispensers to simulate.
    #[error("no dispensers found")]
    NoDispensers,
    /// Logging in again after a failed update failed.
    #[error("re-authentication failed: {0}")]
    Reauthenticate(#[source] ClientError),
}
