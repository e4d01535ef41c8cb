//! Driving port for inventory mutations.
//!
//! Payloads carry unvalidated values; the implementing service validates
//! them into domain drafts and checks that parent records exist.

use async_trait::async_trait;

use crate::domain::{
    Dispenser, DispenserId, DispenserKind, Error, Floor, FloorId, Pantry, PantryId, UserId,
};

/// Raw floor fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FloorPayload {
    pub number: i64,
}

/// Raw pantry fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PantryPayload {
    pub name: String,
    pub floor: FloorId,
}

/// Raw dispenser fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispenserPayload {
    pub kind: DispenserKind,
    pub max_capacity: i64,
    pub current_level: i64,
    pub threshold: Option<i64>,
    pub pantry: PantryId,
}

/// Domain use-case port for creating, replacing and deleting inventory.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InventoryCommand: Send + Sync {
    /// Create a floor owned by `owner`.
    async fn create_floor(&self, owner: UserId, payload: FloorPayload) -> Result<Floor, Error>;

    /// Replace a floor's number. The owner is preserved.
    async fn update_floor(&self, id: FloorId, payload: FloorPayload) -> Result<Floor, Error>;

    /// Delete a floor and everything on it.
    async fn delete_floor(&self, id: FloorId) -> Result<(), Error>;

    /// Create a pantry on an existing floor.
    async fn create_pantry(&self, payload: PantryPayload) -> Result<Pantry, Error>;

    /// Replace a pantry's fields.
    async fn update_pantry(&self, id: PantryId, payload: PantryPayload) -> Result<Pantry, Error>;

    /// Delete a pantry and its dispensers.
    async fn delete_pantry(&self, id: PantryId) -> Result<(), Error>;

    /// Create a dispenser in an existing pantry.
    async fn create_dispenser(&self, payload: DispenserPayload) -> Result<Dispenser, Error>;

    /// Replace a dispenser's fields.
    async fn update_dispenser(
        &self,
        id: DispenserId,
        payload: DispenserPayload,
    ) -> Result<Dispenser, Error>;

    /// Delete a dispenser.
    async fn delete_dispenser(&self, id: DispenserId) -> Result<(), Error>;
}

/// Fixture command that rejects every mutation as unavailable.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureInventoryCommand;

fn unavailable() -> Error {
    Error::service_unavailable("inventory store is not configured")
}

#[async_trait]
impl InventoryCommand for FixtureInventoryCommand {
    async fn create_floor(&self, _owner: UserId, _payload: FloorPayload) -> Result<Floor, Error> {
        Err(unavailable())
    }

    async fn update_floor(&self, _id: FloorId, _payload: FloorPayload) -> Result<Floor, Error> {
        Err(unavailable())
    }

    async fn delete_floor(&self, _id: FloorId) -> Result<(), Error> {
        Err(unavailable())
    }

    async fn create_pantry(&self, _payload: PantryPayload) -> Result<Pantry, Error> {
        Err(unavailable())
    }

    async fn update_pantry(
        &self,
        _id: PantryId,
        _payload: PantryPayload,
    ) -> Result<Pantry, Error> {
        Err(unavailable())
    }

    async fn delete_pantry(&self, _id: PantryId) -> Result<(), Error> {
        Err(unavailable())
    }

    async fn create_dispenser(&self, _payload: DispenserPayload) -> Result<Dispenser, Error> {
        Err(unavailable())
    }

    async fn update_dispenser(
        &self,
        _id: DispenserId,
        _payload: DispenserPayload,
    ) -> Result<Dispenser, Error> {
        Err(unavailable())
    }

    async fn delete_dispenser(&self, _id: DispenserId) -> Result<(), Error> {
        Err(unavailable())
    }
}
