//! Inventory domain service.
//!
//! Implements the inventory driving ports over the floor, pantry and
//! dispenser repositories. Parent records are checked before children are
//! written; cascading deletes are left to the adapters.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use crate::domain::ports::{
    DispenserPayload, DispenserRepository, FloorPayload, FloorRepository, InventoryCommand,
    InventoryQuery, PantryPayload, PantryRepository,
};
use crate::domain::{
    Dispenser, DispenserDraft, DispenserFields, DispenserId, Error, Floor, FloorDraft, FloorId,
    Pantry, PantryDraft, PantryId, UserId,
};

fn floor_not_found() -> Error {
    Error::not_found("Floor not found")
}

fn pantry_not_found() -> Error {
    Error::not_found("Pantry not found")
}

fn dispenser_not_found() -> Error {
    Error::not_found("Dispenser not found")
}

fn invalid(err: impl std::fmt::Display) -> Error {
    Error::invalid_request(err.to_string())
}

fn missing_parent(field: &str, id: i64) -> Error {
    Error::invalid_request(format!("Invalid {field} {id}: object does not exist"))
        .with_details(json!({ "field": field, "code": "does_not_exist" }))
}

fn dispenser_draft(payload: DispenserPayload) -> Result<DispenserDraft, Error> {
    DispenserDraft::new(DispenserFields {
        kind: payload.kind,
        max_capacity: payload.max_capacity,
        current_level: payload.current_level,
        threshold: payload.threshold,
        pantry: payload.pantry,
    })
    .map_err(invalid)
}

/// Service implementing [`InventoryCommand`] and [`InventoryQuery`].
pub struct InventoryService<F: ?Sized, P: ?Sized, D: ?Sized> {
    floors: Arc<F>,
    pantries: Arc<P>,
    dispensers: Arc<D>,
}

impl<F: ?Sized, P: ?Sized, D: ?Sized> Clone for InventoryService<F, P, D> {
    fn clone(&self) -> Self {
        Self {
            floors: Arc::clone(&self.floors),
            pantries: Arc::clone(&self.pantries),
            dispensers: Arc::clone(&self.dispensers),
        }
    }
}

impl<F, P, D> InventoryService<F, P, D>
where
    F: FloorRepository + ?Sized,
    P: PantryRepository + ?Sized,
    D: DispenserRepository + ?Sized,
{
    /// Create the service over the three inventory repositories.
    pub fn new(floors: Arc<F>, pantries: Arc<P>, dispensers: Arc<D>) -> Self {
        Self {
            floors,
            pantries,
            dispensers,
        }
    }

    async fn require_floor(&self, id: FloorId) -> Result<Floor, Error> {
        self.floors
            .find_by_id(id)
            .await
            .map_err(Error::from)?
            .ok_or_else(floor_not_found)
    }

    async fn require_pantry(&self, id: PantryId) -> Result<Pantry, Error> {
        self.pantries
            .find_by_id(id)
            .await
            .map_err(Error::from)?
            .ok_or_else(pantry_not_found)
    }

    /// Resolve a floor referenced by a payload. Absence is a client error.
    async fn parent_floor(&self, id: FloorId) -> Result<Floor, Error> {
        self.floors
            .find_by_id(id)
            .await
            .map_err(Error::from)?
            .ok_or_else(|| missing_parent("floor", id.get()))
    }

    async fn parent_pantry(&self, id: PantryId) -> Result<Pantry, Error> {
        self.pantries
            .find_by_id(id)
            .await
            .map_err(Error::from)?
            .ok_or_else(|| missing_parent("pantry", id.get()))
    }
}

#[async_trait]
impl<F, P, D> InventoryQuery for InventoryService<F, P, D>
where
    F: FloorRepository + ?Sized,
    P: PantryRepository + ?Sized,
    D: DispenserRepository + ?Sized,
{
    async fn list_floors(&self) -> Result<Vec<Floor>, Error> {
        self.floors.list().await.map_err(Error::from)
    }

    async fn get_floor(&self, id: FloorId) -> Result<Floor, Error> {
        self.require_floor(id).await
    }

    async fn list_pantries(&self, floor: Option<FloorId>) -> Result<Vec<Pantry>, Error> {
        self.pantries
            .list(floor)
            .await
            .map_err(Error::from)
    }

    async fn get_pantry(&self, id: PantryId) -> Result<Pantry, Error> {
        self.require_pantry(id).await
    }

    async fn list_dispensers(&self, pantry: Option<PantryId>) -> Result<Vec<Dispenser>, Error> {
        self.dispensers
            .list(pantry)
            .await
            .map_err(Error::from)
    }

    async fn get_dispenser(&self, id: DispenserId) -> Result<Dispenser, Error> {
        self.dispensers
            .find_by_id(id)
            .await
            .map_err(Error::from)?
            .ok_or_else(dispenser_not_found)
    }
}

#[async_trait]
impl<F, P, D> InventoryCommand for InventoryService<F, P, D>
where
    F: FloorRepository + ?Sized,
    P: PantryRepository + ?Sized,
    D: DispenserRepository + ?Sized,
{
    async fn create_floor(&self, owner: UserId, payload: FloorPayload) -> Result<Floor, Error> {
        let draft = FloorDraft::new(payload.number, owner).map_err(invalid)?;
        self.floors
            .insert(&draft)
            .await
            .map_err(Error::from)
    }

    async fn update_floor(&self, id: FloorId, payload: FloorPayload) -> Result<Floor, Error> {
        let existing = self.require_floor(id).await?;
        let draft = FloorDraft::new(payload.number, existing.owner()).map_err(invalid)?;
        self.floors
            .update(id, &draft)
            .await
            .map_err(Error::from)?
            .ok_or_else(floor_not_found)
    }

    async fn delete_floor(&self, id: FloorId) -> Result<(), Error> {
        let deleted = self.floors.delete(id).await.map_err(Error::from)?;
        if deleted {
            Ok(())
        } else {
            Err(floor_not_found())
        }
    }

    async fn create_pantry(&self, payload: PantryPayload) -> Result<Pantry, Error> {
        let draft = PantryDraft::new(&payload.name, payload.floor).map_err(invalid)?;
        self.parent_floor(draft.floor()).await?;
        self.pantries
            .insert(&draft)
            .await
            .map_err(Error::from)
    }

    async fn update_pantry(&self, id: PantryId, payload: PantryPayload) -> Result<Pantry, Error> {
        let draft = PantryDraft::new(&payload.name, payload.floor).map_err(invalid)?;
        self.require_pantry(id).await?;
        self.parent_floor(draft.floor()).await?;
        self.pantries
            .update(id, &draft)
            .await
            .map_err(Error::from)?
            .ok_or_else(pantry_not_found)
    }

    async fn delete_pantry(&self, id: PantryId) -> Result<(), Error> {
        let deleted = self
            .pantries
            .delete(id)
            .await
            .map_err(Error::from)?;
        if deleted {
            Ok(())
        } else {
            Err(pantry_not_found())
        }
    }

    async fn create_dispenser(&self, payload: DispenserPayload) -> Result<Dispenser, Error> {
        let draft = dispenser_draft(payload)?;
        self.parent_pantry(draft.pantry()).await?;
        self.dispensers
            .insert(&draft)
            .await
            .map_err(Error::from)
    }

    async fn update_dispenser(
        &self,
        id: DispenserId,
        payload: DispenserPayload,
    ) -> Result<Dispenser, Error> {
        let draft = dispenser_draft(payload)?;
        self.get_dispenser(id).await?;
        self.parent_pantry(draft.pantry()).await?;
        self.dispensers
            .update(id, &draft)
            .await
            .map_err(Error::from)?
            .ok_or_else(dispenser_not_found)
    }

    async fn delete_dispenser(&self, id: DispenserId) -> Result<(), Error> {
        let deleted = self
            .dispensers
            .delete(id)
            .await
            .map_err(Error::from)?;
        if deleted {
            Ok(())
        } else {
            Err(dispenser_not_found())
        }
    }
}

#[cfg(test)]
#[path = "inventory_service_tests.rs"]
mod tests;
