//! Port for pantry persistence.

use async_trait::async_trait;

use crate::domain::{FloorId, Pantry, PantryDraft, PantryId};

use super::InventoryRepositoryError;

/// Port for reading and writing pantries.
///
/// Deleting a pantry removes its dispensers.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PantryRepository: Send + Sync {
    /// Pantries ordered by id, optionally restricted to one floor.
    async fn list(&self, floor: Option<FloorId>) -> Result<Vec<Pantry>, InventoryRepositoryError>;

    /// Fetch a pantry by id.
    async fn find_by_id(&self, id: PantryId) -> Result<Option<Pantry>, InventoryRepositoryError>;

    /// Insert a pantry and return it with its assigned id.
    async fn insert(&self, draft: &PantryDraft) -> Result<Pantry, InventoryRepositoryError>;

    /// Replace a pantry's fields; `None` when the pantry does not exist.
    async fn update(
        &self,
        id: PantryId,
        draft: &PantryDraft,
    ) -> Result<Option<Pantry>, InventoryRepositoryError>;

    /// Delete a pantry and its dispensers; `false` when absent.
    async fn delete(&self, id: PantryId) -> Result<bool, InventoryRepositoryError>;
}

/// Fixture implementation for tests that do not exercise pantry persistence.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixturePantryRepository;

#[async_trait]
impl PantryRepository for FixturePantryRepository {
    async fn list(&self, _floor: Option<FloorId>) -> Result<Vec<Pantry>, InventoryRepositoryError> {
        Ok(Vec::new())
    }

    async fn find_by_id(&self, _id: PantryId) -> Result<Option<Pantry>, InventoryRepositoryError> {
        Ok(None)
    }

    async fn insert(&self, draft: &PantryDraft) -> Result<Pantry, InventoryRepositoryError> {
        Ok(Pantry::from_draft(PantryId::new(1), draft.clone()))
    }

    async fn update(
        &self,
        _id: PantryId,
        _draft: &PantryDraft,
    ) -> Result<Option<Pantry>, InventoryRepositoryError> {
        Ok(None)
    }

    async fn delete(&self, _id: PantryId) -> Result<bool, InventoryRepositoryError> {
        Ok(false)
    }
}
