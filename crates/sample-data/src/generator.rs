//! Deterministic inventory generation.
//!
//! The same seed and shape always produce an identical tree.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::error::GenerationError;
use crate::seed::{
    DispenserKindSeed, SampleDispenserSeed, SampleFloorSeed, SampleInventory, SamplePantrySeed,
    SampleUserSeed,
};

/// Capacity given to every generated dispenser.
pub const DEFAULT_MAX_CAPACITY: u32 = 100;

/// Lowest starting level of a generated dispenser.
pub const MIN_CURRENT_LEVEL: u32 = 20;

/// Threshold given to every generated dispenser.
pub const DEFAULT_THRESHOLD: u32 = 10;

/// Upper bound on generated floors.
const MAX_FLOORS: u32 = 1_000;

/// Dimensions of the generated tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InventoryShape {
    /// Number of floors.
    pub floors: u32,
    /// Pantries on each floor.
    pub pantries_per_floor: u32,
    /// Dispensers in each pantry.
    pub dispensers_per_pantry: u32,
}

impl Default for InventoryShape {
    fn default() -> Self {
        Self {
            floors: 5,
            pantries_per_floor: 3,
            dispensers_per_pantry: 3,
        }
    }
}

impl InventoryShape {
    fn validate(self) -> Result<Self, GenerationError> {
        for (dimension, value) in [
            ("floor", self.floors),
            ("pantry per floor", self.pantries_per_floor),
            ("dispenser per pantry", self.dispensers_per_pantry),
        ] {
            if value == 0 {
                return Err(GenerationError::EmptyDimension { dimension });
            }
        }
        if self.floors > MAX_FLOORS {
            return Err(GenerationError::TooManyFloors {
                requested: self.floors,
                max: MAX_FLOORS,
            });
        }
        Ok(self)
    }
}

/// Generates a sample inventory owned by the default sample user.
///
/// Every dispenser gets a random kind, a capacity of
/// [`DEFAULT_MAX_CAPACITY`], a level between [`MIN_CURRENT_LEVEL`] and the
/// capacity, and a threshold of [`DEFAULT_THRESHOLD`].
///
/// # Errors
///
/// Returns [`GenerationError`] when a shape dimension is zero or too large.
///
/// # Example
///
/// ```
/// use sample_data::{InventoryShape, generate_sample_inventory};
///
/// let first = generate_sample_inventory(42, InventoryShape::default()).expect("generated");
/// let second = generate_sample_inventory(42, InventoryShape::default()).expect("generated");
/// assert_eq!(first, second);
/// assert_eq!(first.floors[1].pantries[0].name, "Pantry 1 on Floor 2");
/// ```
pub fn generate_sample_inventory(
    seed: u64,
    shape: InventoryShape,
) -> Result<SampleInventory, GenerationError> {
    let shape = shape.validate()?;
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let floors = (1..=shape.floors)
        .map(|number| SampleFloorSeed {
            number,
            pantries: (1..=shape.pantries_per_floor)
                .map(|index| SamplePantrySeed {
                    name: format!("Pantry {index} on Floor {number}"),
                    dispensers: (0..shape.dispensers_per_pantry)
                        .map(|_| generate_dispenser(&mut rng))
                        .collect(),
                })
                .collect(),
        })
        .collect();

    Ok(SampleInventory {
        user: SampleUserSeed::default(),
        floors,
    })
}

fn generate_dispenser(rng: &mut ChaCha8Rng) -> SampleDispenserSeed {
    let kind_index = rng.random_range(0..DispenserKindSeed::ALL.len());
    let kind = DispenserKindSeed::ALL
        .get(kind_index)
        .copied()
        .unwrap_or(DispenserKindSeed::Drink);
    SampleDispenserSeed {
        kind,
        max_capacity: DEFAULT_MAX_CAPACITY,
        current_level: rng.random_range(MIN_CURRENT_LEVEL..=DEFAULT_MAX_CAPACITY),
        threshold: DEFAULT_THRESHOLD,
    }
}
