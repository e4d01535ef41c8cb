//! Seed types describing a generated inventory tree.

use serde::{Deserialize, Serialize};

/// Contents type of a generated dispenser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DispenserKindSeed {
    /// Cold drinks (`DR`).
    #[serde(rename = "DR")]
    Drink,
    /// Snacks (`SN`).
    #[serde(rename = "SN")]
    Snack,
    /// Coffee (`CO`).
    #[serde(rename = "CO")]
    Coffee,
}

impl DispenserKindSeed {
    /// Every kind, in code order.
    pub const ALL: [Self; 3] = [Self::Drink, Self::Snack, Self::Coffee];

    /// Two-letter code shared with the backend.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Drink => "DR",
            Self::Snack => "SN",
            Self::Coffee => "CO",
        }
    }
}

/// Account that owns the generated floors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleUserSeed {
    /// Login name.
    pub username: String,
    /// Contact address.
    pub email: String,
    /// Plain-text password, hashed by the backend before storage.
    pub password: String,
}

impl Default for SampleUserSeed {
    fn default() -> Self {
        Self {
            username: "sampleuser".to_owned(),
            email: "sampleuser@example.com".to_owned(),
            password: "password123".to_owned(),
        }
    }
}

/// Generated dispenser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleDispenserSeed {
    /// Contents type.
    pub kind: DispenserKindSeed,
    /// Capacity in units.
    pub max_capacity: u32,
    /// Starting level in units.
    pub current_level: u32,
    /// Running-low percentage.
    pub threshold: u32,
}

/// Generated pantry and its dispensers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SamplePantrySeed {
    /// Pantry name, e.g. `Pantry 2 on Floor 4`.
    pub name: String,
    /// Dispensers in the pantry.
    pub dispensers: Vec<SampleDispenserSeed>,
}

/// Generated floor and its pantries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleFloorSeed {
    /// Floor number, starting at one.
    pub number: u32,
    /// Pantries on the floor.
    pub pantries: Vec<SamplePantrySeed>,
}

/// Complete generated tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleInventory {
    /// Owner of every floor.
    pub user: SampleUserSeed,
    /// Floors in ascending number order.
    pub floors: Vec<SampleFloorSeed>,
}

impl SampleInventory {
    /// Total number of pantries.
    #[must_use]
    pub fn pantry_count(&self) -> usize {
        self.floors.iter().map(|floor| floor.pantries.len()).sum()
    }

    /// Total number of dispensers.
    #[must_use]
    pub fn dispenser_count(&self) -> usize {
        self.floors
            .iter()
            .flat_map(|floor| &floor.pantries)
            .map(|pantry| pantry.dispensers.len())
            .sum()
    }
}
