//! Port for dispenser persistence, including the atomic level write.

use async_trait::async_trait;

use crate::domain::{
    CurrentLevel, Dispenser, DispenserDraft, DispenserId, DispenserLocation, PantryId,
};

use super::InventoryRepositoryError;

/// Port for reading and writing dispensers.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DispenserRepository: Send + Sync {
    /// Dispensers ordered by id, optionally restricted to one pantry.
    async fn list(
        &self,
        pantry: Option<PantryId>,
    ) -> Result<Vec<Dispenser>, InventoryRepositoryError>;

    /// Fetch a dispenser by id.
    async fn find_by_id(
        &self,
        id: DispenserId,
    ) -> Result<Option<Dispenser>, InventoryRepositoryError>;

    /// Insert a dispenser and return it with its assigned id.
    async fn insert(&self, draft: &DispenserDraft) -> Result<Dispenser, InventoryRepositoryError>;

    /// Replace a dispenser's fields; `None` when the dispenser does not exist.
    async fn update(
        &self,
        id: DispenserId,
        draft: &DispenserDraft,
    ) -> Result<Option<Dispenser>, InventoryRepositoryError>;

    /// Delete a dispenser; `false` when absent.
    async fn delete(&self, id: DispenserId) -> Result<bool, InventoryRepositoryError>;

    /// Set the absolute level of one dispenser in a single atomic write and
    /// return the committed record; `None` when the dispenser is gone.
    ///
    /// Concurrent writes to the same dispenser serialise with the last
    /// committed value winning. Writes to different dispensers never block
    /// each other.
    async fn set_current_level(
        &self,
        id: DispenserId,
        level: CurrentLevel,
    ) -> Result<Option<Dispenser>, InventoryRepositoryError>;

    /// Pantry name and floor number hosting a dispenser.
    async fn find_location(
        &self,
        id: DispenserId,
    ) -> Result<Option<DispenserLocation>, InventoryRepositoryError>;
}

/// Fixture implementation for tests that do not exercise dispenser persistence.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureDispenserRepository;

#[async_trait]
impl DispenserRepository for FixtureDispenserRepository {
    async fn list(
        &self,
        _pantry: Option<PantryId>,
    ) -> Result<Vec<Dispenser>, InventoryRepositoryError> {
        Ok(Vec::new())
    }

    async fn find_by_id(
        &self,
        _id: DispenserId,
    ) -> Result<Option<Dispenser>, InventoryRepositoryError> {
        Ok(None)
    }

    async fn insert(&self, draft: &DispenserDraft) -> Result<Dispenser, InventoryRepositoryError> {
        Ok(Dispenser::from_draft(DispenserId::new(1), *draft))
    }

    async fn update(
        &self,
        _id: DispenserId,
        _draft: &DispenserDraft,
    ) -> Result<Option<Dispenser>, InventoryRepositoryError> {
        Ok(None)
    }

    async fn delete(&self, _id: DispenserId) -> Result<bool, InventoryRepositoryError> {
        Ok(false)
    }

    async fn set_current_level(
        &self,
        _id: DispenserId,
        _level: CurrentLevel,
    ) -> Result<Option<Dispenser>, InventoryRepositoryError> {
        Ok(None)
    }

    async fn find_location(
        &self,
        _id: DispenserId,
    ) -> Result<Option<DispenserLocation>, InventoryRepositoryError> {
        Ok(None)
    }
}
