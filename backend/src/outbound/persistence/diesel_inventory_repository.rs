//! PostgreSQL-backed floor, pantry and dispenser repositories.
//!
//! Level writes are a single `UPDATE ... RETURNING` statement, so PostgreSQL
//! row locking serialises concurrent writes to the same dispenser. Cascading
//! deletes are enforced by the foreign keys in the migrations.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{
    DispenserRepository, FloorRepository, InventoryRepositoryError, PantryRepository,
};
use crate::domain::{
    CurrentLevel, Dispenser, DispenserDraft, DispenserId, DispenserLocation, Floor, FloorDraft,
    FloorId, Pantry, PantryDraft, PantryId,
};

use super::error_mapping::{inventory_diesel_error, inventory_pool_error};
use super::models::{
    DispenserChanges, DispenserRow, FloorChanges, FloorRow, PantryChanges, PantryRow,
};
use super::pool::DbPool;
use super::schema::{dispensers, floors, pantries};

/// Diesel implementation of the inventory repository ports.
#[derive(Clone)]
pub struct DieselInventoryRepository {
    pool: DbPool,
}

impl DieselInventoryRepository {
    /// Create a repository backed by `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn convert<R, T>(row: R) -> Result<T, InventoryRepositoryError>
where
    T: TryFrom<R, Error = String>,
{
    T::try_from(row).map_err(InventoryRepositoryError::query)
}

fn convert_all<R, T>(rows: Vec<R>) -> Result<Vec<T>, InventoryRepositoryError>
where
    T: TryFrom<R, Error = String>,
{
    rows.into_iter().map(convert).collect()
}

fn affected(rows: usize) -> u64 {
    u64::try_from(rows).unwrap_or(u64::MAX)
}

#[async_trait]
impl FloorRepository for DieselInventoryRepository {
    async fn list(&self) -> Result<Vec<Floor>, InventoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(inventory_pool_error)?;
        let rows: Vec<FloorRow> = floors::table
            .order(floors::id)
            .select(FloorRow::as_select())
            .load(&mut conn)
            .await
            .map_err(inventory_diesel_error)?;
        convert_all(rows)
    }

    async fn find_by_id(&self, id: FloorId) -> Result<Option<Floor>, InventoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(inventory_pool_error)?;
        floors::table
            .find(id.get())
            .select(FloorRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(inventory_diesel_error)?
            .map(convert)
            .transpose()
    }

    async fn insert(&self, draft: &FloorDraft) -> Result<Floor, InventoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(inventory_pool_error)?;
        let row: FloorRow = diesel::insert_into(floors::table)
            .values(FloorChanges::from(draft))
            .returning(FloorRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(inventory_diesel_error)?;
        convert(row)
    }

    async fn update(
        &self,
        id: FloorId,
        draft: &FloorDraft,
    ) -> Result<Option<Floor>, InventoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(inventory_pool_error)?;
        diesel::update(floors::table.find(id.get()))
            .set(FloorChanges::from(draft))
            .returning(FloorRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(inventory_diesel_error)?
            .map(convert)
            .transpose()
    }

    async fn delete(&self, id: FloorId) -> Result<bool, InventoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(inventory_pool_error)?;
        let removed = diesel::delete(floors::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(inventory_diesel_error)?;
        Ok(removed > 0)
    }

    async fn delete_all(&self) -> Result<u64, InventoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(inventory_pool_error)?;
        let removed = diesel::delete(floors::table)
            .execute(&mut conn)
            .await
            .map_err(inventory_diesel_error)?;
        Ok(affected(removed))
    }
}

#[async_trait]
impl PantryRepository for DieselInventoryRepository {
    async fn list(&self, floor: Option<FloorId>) -> Result<Vec<Pantry>, InventoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(inventory_pool_error)?;
        let mut query = pantries::table
            .order(pantries::id)
            .select(PantryRow::as_select())
            .into_boxed();
        if let Some(floor) = floor {
            query = query.filter(pantries::floor_id.eq(floor.get()));
        }
        let rows: Vec<PantryRow> = query
            .load(&mut conn)
            .await
            .map_err(inventory_diesel_error)?;
        convert_all(rows)
    }

    async fn find_by_id(&self, id: PantryId) -> Result<Option<Pantry>, InventoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(inventory_pool_error)?;
        pantries::table
            .find(id.get())
            .select(PantryRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(inventory_diesel_error)?
            .map(convert)
            .transpose()
    }

    async fn insert(&self, draft: &PantryDraft) -> Result<Pantry, InventoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(inventory_pool_error)?;
        let row: PantryRow = diesel::insert_into(pantries::table)
            .values(PantryChanges::from(draft))
            .returning(PantryRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(inventory_diesel_error)?;
        convert(row)
    }

    async fn update(
        &self,
        id: PantryId,
        draft: &PantryDraft,
    ) -> Result<Option<Pantry>, InventoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(inventory_pool_error)?;
        diesel::update(pantries::table.find(id.get()))
            .set(PantryChanges::from(draft))
            .returning(PantryRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(inventory_diesel_error)?
            .map(convert)
            .transpose()
    }

    async fn delete(&self, id: PantryId) -> Result<bool, InventoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(inventory_pool_error)?;
        let removed = diesel::delete(pantries::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(inventory_diesel_error)?;
        Ok(removed > 0)
    }
}

#[async_trait]
impl DispenserRepository for DieselInventoryRepository {
    async fn list(
        &self,
        pantry: Option<PantryId>,
    ) -> Result<Vec<Dispenser>, InventoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(inventory_pool_error)?;
        let mut query = dispensers::table
            .order(dispensers::id)
            .select(DispenserRow::as_select())
            .into_boxed();
        if let Some(pantry) = pantry {
            query = query.filter(dispensers::pantry_id.eq(pantry.get()));
        }
        let rows: Vec<DispenserRow> = query
            .load(&mut conn)
            .await
            .map_err(inventory_diesel_error)?;
        convert_all(rows)
    }

    async fn find_by_id(
        &self,
        id: DispenserId,
    ) -> Result<Option<Dispenser>, InventoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(inventory_pool_error)?;
        dispensers::table
            .find(id.get())
            .select(DispenserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(inventory_diesel_error)?
            .map(convert)
            .transpose()
    }

    async fn insert(&self, draft: &DispenserDraft) -> Result<Dispenser, InventoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(inventory_pool_error)?;
        let row: DispenserRow = diesel::insert_into(dispensers::table)
            .values(DispenserChanges::from(draft))
            .returning(DispenserRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(inventory_diesel_error)?;
        convert(row)
    }

    async fn update(
        &self,
        id: DispenserId,
        draft: &DispenserDraft,
    ) -> Result<Option<Dispenser>, InventoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(inventory_pool_error)?;
        diesel::update(dispensers::table.find(id.get()))
            .set(DispenserChanges::from(draft))
            .returning(DispenserRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(inventory_diesel_error)?
            .map(convert)
            .transpose()
    }

    async fn delete(&self, id: DispenserId) -> Result<bool, InventoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(inventory_pool_error)?;
        let removed = diesel::delete(dispensers::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(inventory_diesel_error)?;
        Ok(removed > 0)
    }

    async fn set_current_level(
        &self,
        id: DispenserId,
        level: CurrentLevel,
    ) -> Result<Option<Dispenser>, InventoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(inventory_pool_error)?;
        diesel::update(dispensers::table.find(id.get()))
            .set(dispensers::current_level.eq(level.get()))
            .returning(DispenserRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(inventory_diesel_error)?
            .map(convert)
            .transpose()
    }

    async fn find_location(
        &self,
        id: DispenserId,
    ) -> Result<Option<DispenserLocation>, InventoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(inventory_pool_error)?;
        let row: Option<(String, i32)> = dispensers::table
            .inner_join(pantries::table.inner_join(floors::table))
            .filter(dispensers::id.eq(id.get()))
            .select((pantries::name, floors::number))
            .first(&mut conn)
            .await
            .optional()
            .map_err(inventory_diesel_error)?;
        Ok(row.map(|(pantry_name, floor_number)| DispenserLocation {
            pantry_name,
            floor_number,
        }))
    }
}
