//! Port for floor persistence.

use async_trait::async_trait;

use crate::domain::{Floor, FloorDraft, FloorId};

use super::InventoryRepositoryError;

/// Port for reading and writing floors.
///
/// Deleting a floor removes its pantries and their dispensers.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FloorRepository: Send + Sync {
    /// All floors ordered by id.
    async fn list(&self) -> Result<Vec<Floor>, InventoryRepositoryError>;

    /// Fetch a floor by id.
    async fn find_by_id(&self, id: FloorId) -> Result<Option<Floor>, InventoryRepositoryError>;

    /// Insert a floor and return it with its assigned id.
    async fn insert(&self, draft: &FloorDraft) -> Result<Floor, InventoryRepositoryError>;

    /// Replace a floor's fields; `None` when the floor does not exist.
    async fn update(
        &self,
        id: FloorId,
        draft: &FloorDraft,
    ) -> Result<Option<Floor>, InventoryRepositoryError>;

    /// Delete a floor and everything below it; `false` when absent.
    async fn delete(&self, id: FloorId) -> Result<bool, InventoryRepositoryError>;

    /// Delete every floor, returning how many were removed.
    async fn delete_all(&self) -> Result<u64, InventoryRepositoryError>;
}

/// Fixture implementation for tests that do not exercise floor persistence.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureFloorRepository;

#[async_trait]
impl FloorRepository for FixtureFloorRepository {
    async fn list(&self) -> Result<Vec<Floor>, InventoryRepositoryError> {
        Ok(Vec::new())
    }

    async fn find_by_id(&self, _id: FloorId) -> Result<Option<Floor>, InventoryRepositoryError> {
        Ok(None)
    }

    async fn insert(&self, draft: &FloorDraft) -> Result<Floor, InventoryRepositoryError> {
        Ok(Floor::from_draft(FloorId::new(1), *draft))
    }

    async fn update(
        &self,
        _id: FloorId,
        _draft: &FloorDraft,
    ) -> Result<Option<Floor>, InventoryRepositoryError> {
        Ok(None)
    }

    async fn delete(&self, _id: FloorId) -> Result<bool, InventoryRepositoryError> {
        Ok(false)
    }

    async fn delete_all(&self) -> Result<u64, InventoryRepositoryError> {
        Ok(0)
    }
}
