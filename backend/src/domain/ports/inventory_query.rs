//! Driving port for inventory reads.

use async_trait::async_trait;

use crate::domain::{Dispenser, DispenserId, Error, Floor, FloorId, Pantry, PantryId};

/// Domain use-case port for reading floors, pantries and dispensers.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InventoryQuery: Send + Sync {
    /// All floors.
    async fn list_floors(&self) -> Result<Vec<Floor>, Error>;

    /// One floor, or `not_found`.
    async fn get_floor(&self, id: FloorId) -> Result<Floor, Error>;

    /// Pantries, optionally restricted to one floor.
    async fn list_pantries(&self, floor: Option<FloorId>) -> Result<Vec<Pantry>, Error>;

    /// One pantry, or `not_found`.
    async fn get_pantry(&self, id: PantryId) -> Result<Pantry, Error>;

    /// Dispensers, optionally restricted to one pantry.
    async fn list_dispensers(&self, pantry: Option<PantryId>) -> Result<Vec<Dispenser>, Error>;

    /// One dispenser, or `not_found`.
    async fn get_dispenser(&self, id: DispenserId) -> Result<Dispenser, Error>;
}

/// Fixture query over an empty inventory.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureInventoryQuery;

#[async_trait]
impl InventoryQuery for FixtureInventoryQuery {
    async fn list_floors(&self) -> Result<Vec<Floor>, Error> {
        Ok(Vec::new())
    }

    async fn get_floor(&self, _id: FloorId) -> Result<Floor, Error> {
        Err(Error::not_found("Floor not found"))
    }

    async fn list_pantries(&self, _floor: Option<FloorId>) -> Result<Vec<Pantry>, Error> {
        Ok(Vec::new())
    }

    async fn get_pantry(&self, _id: PantryId) -> Result<Pantry, Error> {
        Err(Error::not_found("Pantry not found"))
    }

    async fn list_dispensers(&self, _pantry: Option<PantryId>) -> Result<Vec<Dispenser>, Error> {
        Ok(Vec::new())
    }

    async fn get_dispenser(&self, _id: DispenserId) -> Result<Dispenser, Error> {
        Err(Error::not_found("Dispenser not found"))
    }
}
