//! Building floors, the root of the inventory tree.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::UserId;

/// Store-assigned floor identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FloorId(i64);

impl FloorId {
    /// Wrap a raw identifier.
    pub fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Raw identifier value.
    pub fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for FloorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validation failures for floor fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FloorValidationError {
    /// Floor numbers start at one.
    NonPositiveNumber { number: i64 },
}

impl fmt::Display for FloorValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveNumber { number } => {
                write!(f, "floor number must be a positive integer, got {number}")
            }
        }
    }
}

impl std::error::Error for FloorValidationError {}

/// Validated mutable fields of a floor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FloorDraft {
    number: i32,
    owner: UserId,
}

impl FloorDraft {
    /// Validate a floor number for `owner`.
    ///
    /// # Examples
    /// ```
    /// use pantry_backend::domain::{FloorDraft, UserId};
    ///
    /// assert!(FloorDraft::new(3, UserId::random()).is_ok());
    /// assert!(FloorDraft::new(0, UserId::random()).is_err());
    /// ```
    pub fn new(number: i64, owner: UserId) -> Result<Self, FloorValidationError> {
        match i32::try_from(number) {
            Ok(value) if value > 0 => Ok(Self {
                number: value,
                owner,
            }),
            _ => Err(FloorValidationError::NonPositiveNumber { number }),
        }
    }

    /// Floor number.
    pub fn number(&self) -> i32 {
        self.number
    }

    /// Owning user.
    pub fn owner(&self) -> UserId {
        self.owner
    }
}

/// Persisted floor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Floor {
    id: FloorId,
    number: i32,
    owner: UserId,
}

impl Floor {
    /// Combine a store-assigned id with validated fields.
    pub fn from_draft(id: FloorId, draft: FloorDraft) -> Self {
        Self {
            id,
            number: draft.number,
            owner: draft.owner,
        }
    }

    /// Identifier.
    pub fn id(&self) -> FloorId {
        self.id
    }

    /// Floor number.
    pub fn number(&self) -> i32 {
        self.number
    }

    /// Owning user.
    pub fn owner(&self) -> UserId {
        self.owner
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0)]
    #[case(-4)]
    #[case(i64::from(i32::MAX) + 1)]
    fn rejects_out_of_range_numbers(#[case] number: i64) {
        assert_eq!(
            FloorDraft::new(number, UserId::random()).expect_err("invalid number"),
            FloorValidationError::NonPositiveNumber { number }
        );
    }

    #[rstest]
    fn from_draft_keeps_fields() {
        let owner = UserId::random();
        let draft = FloorDraft::new(7, owner).expect("valid draft");
        let floor = Floor::from_draft(FloorId::new(2), draft);
        assert_eq!(floor.id().get(), 2);
        assert_eq!(floor.number(), 7);
        assert_eq!(floor.owner(), owner);
    }
}
