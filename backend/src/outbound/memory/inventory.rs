//! In-memory floor, pantry and dispenser store.
//!
//! Table indexes sit behind one `RwLock`; each dispenser record additionally
//! sits behind its own `Mutex`. Level writes take the index lock shared and
//! then the record lock, so writes to different dispensers proceed in
//! parallel while writes to the same dispenser serialise. Structural changes
//! (inserts, replacements, deletes) take the index lock exclusively, which
//! also keeps foreign keys and cascades consistent.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};

use crate::domain::ports::{
    DispenserRepository, FloorRepository, InventoryRepositoryError, PantryRepository,
};
use crate::domain::{
    CurrentLevel, Dispenser, DispenserDraft, DispenserId, DispenserLocation, Floor, FloorDraft,
    FloorId, Pantry, PantryDraft, PantryId,
};

struct DispenserSlot {
    pantry: PantryId,
    record: Arc<Mutex<Dispenser>>,
}

#[derive(Default)]
struct Tables {
    last_floor_id: i64,
    last_pantry_id: i64,
    last_dispenser_id: i64,
    floors: BTreeMap<FloorId, Floor>,
    pantries: BTreeMap<PantryId, Pantry>,
    dispensers: BTreeMap<DispenserId, DispenserSlot>,
}

impl Tables {
    fn remove_pantries_where(&mut self, keep: impl Fn(&Pantry) -> bool) {
        self.pantries.retain(|_, pantry| keep(pantry));
        let pantries = &self.pantries;
        self.dispensers
            .retain(|_, slot| pantries.contains_key(&slot.pantry));
    }
}

fn missing_parent(table: &str, id: i64) -> InventoryRepositoryError {
    InventoryRepositoryError::query(format!(
        "foreign key violation: {table} {id} does not exist"
    ))
}

/// Inventory store kept in process memory.
///
/// Used when no database is configured and in tests. Identifiers are
/// assigned sequentially from one and never reused.
#[derive(Default)]
pub struct InMemoryInventory {
    tables: RwLock<Tables>,
}

impl InMemoryInventory {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FloorRepository for InMemoryInventory {
    async fn list(&self) -> Result<Vec<Floor>, InventoryRepositoryError> {
        Ok(self.tables.read().await.floors.values().copied().collect())
    }

    async fn find_by_id(&self, id: FloorId) -> Result<Option<Floor>, InventoryRepositoryError> {
        Ok(self.tables.read().await.floors.get(&id).copied())
    }

    async fn insert(&self, draft: &FloorDraft) -> Result<Floor, InventoryRepositoryError> {
        let mut tables = self.tables.write().await;
        tables.last_floor_id += 1;
        let floor = Floor::from_draft(FloorId::new(tables.last_floor_id), *draft);
        tables.floors.insert(floor.id(), floor);
        Ok(floor)
    }

    async fn update(
        &self,
        id: FloorId,
        draft: &FloorDraft,
    ) -> Result<Option<Floor>, InventoryRepositoryError> {
        let mut tables = self.tables.write().await;
        let Some(slot) = tables.floors.get_mut(&id) else {
            return Ok(None);
        };
        *slot = Floor::from_draft(id, *draft);
        Ok(Some(*slot))
    }

    async fn delete(&self, id: FloorId) -> Result<bool, InventoryRepositoryError> {
        let mut tables = self.tables.write().await;
        if tables.floors.remove(&id).is_none() {
            return Ok(false);
        }
        tables.remove_pantries_where(|pantry| pantry.floor() != id);
        Ok(true)
    }

    async fn delete_all(&self) -> Result<u64, InventoryRepositoryError> {
        let mut tables = self.tables.write().await;
        let removed = tables.floors.len() as u64;
        tables.floors.clear();
        tables.pantries.clear();
        tables.dispensers.clear();
        Ok(removed)
    }
}

#[async_trait]
impl PantryRepository for InMemoryInventory {
    async fn list(&self, floor: Option<FloorId>) -> Result<Vec<Pantry>, InventoryRepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables
            .pantries
            .values()
            .filter(|pantry| floor.is_none_or(|floor| pantry.floor() == floor))
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: PantryId) -> Result<Option<Pantry>, InventoryRepositoryError> {
        Ok(self.tables.read().await.pantries.get(&id).cloned())
    }

    async fn insert(&self, draft: &PantryDraft) -> Result<Pantry, InventoryRepositoryError> {
        let mut tables = self.tables.write().await;
        if !tables.floors.contains_key(&draft.floor()) {
            return Err(missing_parent("floor", draft.floor().get()));
        }
        tables.last_pantry_id += 1;
        let pantry = Pantry::from_draft(PantryId::new(tables.last_pantry_id), draft.clone());
        tables.pantries.insert(pantry.id(), pantry.clone());
        Ok(pantry)
    }

    async fn update(
        &self,
        id: PantryId,
        draft: &PantryDraft,
    ) -> Result<Option<Pantry>, InventoryRepositoryError> {
        let mut tables = self.tables.write().await;
        if !tables.floors.contains_key(&draft.floor()) {
            return Err(missing_parent("floor", draft.floor().get()));
        }
        let Some(slot) = tables.pantries.get_mut(&id) else {
            return Ok(None);
        };
        *slot = Pantry::from_draft(id, draft.clone());
        Ok(Some(slot.clone()))
    }

    async fn delete(&self, id: PantryId) -> Result<bool, InventoryRepositoryError> {
        let mut tables = self.tables.write().await;
        if !tables.pantries.contains_key(&id) {
            return Ok(false);
        }
        tables.remove_pantries_where(|pantry| pantry.id() != id);
        Ok(true)
    }
}

#[async_trait]
impl DispenserRepository for InMemoryInventory {
    async fn list(
        &self,
        pantry: Option<PantryId>,
    ) -> Result<Vec<Dispenser>, InventoryRepositoryError> {
        let tables = self.tables.read().await;
        let mut listed = Vec::with_capacity(tables.dispensers.len());
        for slot in tables.dispensers.values() {
            if pantry.is_none_or(|pantry| slot.pantry == pantry) {
                listed.push(*slot.record.lock().await);
            }
        }
        Ok(listed)
    }

    async fn find_by_id(
        &self,
        id: DispenserId,
    ) -> Result<Option<Dispenser>, InventoryRepositoryError> {
        let tables = self.tables.read().await;
        match tables.dispensers.get(&id) {
            Some(slot) => Ok(Some(*slot.record.lock().await)),
            None => Ok(None),
        }
    }

    async fn insert(&self, draft: &DispenserDraft) -> Result<Dispenser, InventoryRepositoryError> {
        let mut tables = self.tables.write().await;
        if !tables.pantries.contains_key(&draft.pantry()) {
            return Err(missing_parent("pantry", draft.pantry().get()));
        }
        tables.last_dispenser_id += 1;
        let dispenser = Dispenser::from_draft(DispenserId::new(tables.last_dispenser_id), *draft);
        tables.dispensers.insert(
            dispenser.id(),
            DispenserSlot {
                pantry: dispenser.pantry(),
                record: Arc::new(Mutex::new(dispenser)),
            },
        );
        Ok(dispenser)
    }

    async fn update(
        &self,
        id: DispenserId,
        draft: &DispenserDraft,
    ) -> Result<Option<Dispenser>, InventoryRepositoryError> {
        let mut tables = self.tables.write().await;
        if !tables.pantries.contains_key(&draft.pantry()) {
            return Err(missing_parent("pantry", draft.pantry().get()));
        }
        let Some(slot) = tables.dispensers.get_mut(&id) else {
            return Ok(None);
        };
        let replaced = Dispenser::from_draft(id, *draft);
        slot.pantry = replaced.pantry();
        *slot.record.lock().await = replaced;
        Ok(Some(replaced))
    }

    async fn delete(&self, id: DispenserId) -> Result<bool, InventoryRepositoryError> {
        Ok(self.tables.write().await.dispensers.remove(&id).is_some())
    }

    async fn set_current_level(
        &self,
        id: DispenserId,
        level: CurrentLevel,
    ) -> Result<Option<Dispenser>, InventoryRepositoryError> {
        let tables = self.tables.read().await;
        let Some(slot) = tables.dispensers.get(&id) else {
            return Ok(None);
        };
        let mut record = slot.record.lock().await;
        *record = record.with_current_level(level);
        Ok(Some(*record))
    }

    async fn find_location(
        &self,
        id: DispenserId,
    ) -> Result<Option<DispenserLocation>, InventoryRepositoryError> {
        let tables = self.tables.read().await;
        let location = tables
            .dispensers
            .get(&id)
            .and_then(|slot| tables.pantries.get(&slot.pantry))
            .and_then(|pantry| {
                tables
                    .floors
                    .get(&pantry.floor())
                    .map(|floor| DispenserLocation {
                        pantry_name: pantry.name().to_owned(),
                        floor_number: floor.number(),
                    })
            });
        Ok(location)
    }
}

#[cfg(test)]
#[path = "inventory_tests.rs"]
mod tests;
