//! Pantries hosted on a floor.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::FloorId;

/// Maximum pantry name length.
pub const PANTRY_NAME_MAX: usize = 100;

/// Store-assigned pantry identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PantryId(i64);

impl PantryId {
    /// Wrap a raw identifier.
    pub fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Raw identifier value.
    pub fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for PantryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validation failures for pantry fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PantryValidationError {
    /// Name was blank once trimmed.
    EmptyName,
    /// Name exceeded [`PANTRY_NAME_MAX`] characters.
    NameTooLong { max: usize },
}

impl fmt::Display for PantryValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "pantry name must not be empty"),
            Self::NameTooLong { max } => {
                write!(f, "pantry name must be at most {max} characters")
            }
        }
    }
}

impl std::error::Error for PantryValidationError {}

/// Validated mutable fields of a pantry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PantryDraft {
    name: String,
    floor: FloorId,
}

impl PantryDraft {
    /// Validate a pantry name and parent floor.
    pub fn new(name: &str, floor: FloorId) -> Result<Self, PantryValidationError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(PantryValidationError::EmptyName);
        }
        if trimmed.chars().count() > PANTRY_NAME_MAX {
            return Err(PantryValidationError::NameTooLong {
                max: PANTRY_NAME_MAX,
            });
        }
        Ok(Self {
            name: trimmed.to_owned(),
            floor,
        })
    }

    /// Pantry name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parent floor.
    pub fn floor(&self) -> FloorId {
        self.floor
    }
}

/// Persisted pantry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pantry {
    id: PantryId,
    name: String,
    floor: FloorId,
}

impl Pantry {
    /// Combine a store-assigned id with validated fields.
    pub fn from_draft(id: PantryId, draft: PantryDraft) -> Self {
        Self {
            id,
            name: draft.name,
            floor: draft.floor,
        }
    }

    /// Identifier.
    pub fn id(&self) -> PantryId {
        self.id
    }

    /// Pantry name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parent floor.
    pub fn floor(&self) -> FloorId {
        self.floor
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn trims_names() {
        let draft = PantryDraft::new("  East Pantry ", FloorId::new(1)).expect("valid");
        assert_eq!(draft.name(), "East Pantry");
    }

    #[rstest]
    #[case("", PantryValidationError::EmptyName)]
    #[case("   ", PantryValidationError::EmptyName)]
    fn rejects_blank_names(#[case] name: &str, #[case] expected: PantryValidationError) {
        assert_eq!(
            PantryDraft::new(name, FloorId::new(1)).expect_err("blank"),
            expected
        );
    }

    #[rstest]
    fn rejects_long_names() {
        let name = "p".repeat(PANTRY_NAME_MAX + 1);
        assert_eq!(
            PantryDraft::new(&name, FloorId::new(1)).expect_err("too long"),
            PantryValidationError::NameTooLong {
                max: PANTRY_NAME_MAX
            }
        );
    }
}
