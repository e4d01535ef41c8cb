//! Deterministic sample pantry inventory for demonstrations and local runs.
//!
//! The crate is independent of backend domain types so it can be reused by
//! tooling without pulling in the web stack. The backend converts the seed
//! types into its own validated drafts before persisting them.
//!
//! # Example
//!
//! ```
//! use sample_data::{InventoryShape, generate_sample_inventory};
//!
//! let inventory = generate_sample_inventory(7, InventoryShape::default()).expect("valid shape");
//!
//! assert_eq!(inventory.floors.len(), 5);
//! assert_eq!(inventory.dispenser_count(), 45);
//! assert_eq!(inventory.user.username, "sampleuser");
//! ```

mod error;
mod generator;
mod seed;

pub use error::GenerationError;
pub use generator::{
    DEFAULT_MAX_CAPACITY, DEFAULT_THRESHOLD, InventoryShape, MIN_CURRENT_LEVEL,
    generate_sample_inventory,
};
pub use seed::{
    DispenserKindSeed, SampleDispenserSeed, SampleFloorSeed, SampleInventory, SamplePantrySeed,
    SampleUserSeed,
};
