//! Error types for the sample-data crate.

use thiserror::Error;

/// Errors raised while generating sample inventory.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// A shape dimension was zero.
    #[error("inventory shape must have at least one {dimension}")]
    EmptyDimension {
        /// Name of the zero dimension.
        dimension: &'static str,
    },

    /// The requested tree would exceed the supported number of floors.
    #[error("inventory shape requests {requested} floors; at most {max} are supported")]
    TooManyFloors {
        /// Requested floor count.
        requested: u32,
        /// Supported maximum.
        max: u32,
    },
}
