//! Outbound adapters implementing domain ports.
//!
//! - **persistence**: PostgreSQL repositories using Diesel.
//! - **memory**: process-local repositories for database-free runs and tests.
//! - **notification**: log and webhook transports for running-low messages.
//!
//! Adapters translate between domain types and infrastructure
//! representations. They contain no business logic.

pub mod memory;
pub mod notification;
pub mod persistence;

use std::sync::Arc;

use crate::domain::ports::{
    DispenserRepository, FloorRepository, PantryRepository, TokenStore, UserRepository,
};

use self::memory::{InMemoryInventory, InMemoryTokenStore, InMemoryUserRepository};
use self::persistence::{DbPool, DieselInventoryRepository, DieselTokenStore, DieselUserRepository};

/// Which backing store a [`StoreAdapters`] bundle talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// Process-local maps.
    Memory,
    /// PostgreSQL through the shared pool.
    Postgres,
}

impl StoreBackend {
    /// Stable lowercase label used in logs and probe bodies.
    pub fn label(self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::Postgres => "postgres",
        }
    }
}

/// Storage adapters selected for one process.
///
/// Every port in a bundle shares one backing store, so cascades and foreign
/// keys hold across them.
#[derive(Clone)]
pub struct StoreAdapters {
    /// Backing store shared by every port below.
    pub backend: StoreBackend,
    /// Accounts.
    pub users: Arc<dyn UserRepository>,
    /// Issued token digests.
    pub tokens: Arc<dyn TokenStore>,
    /// Floors.
    pub floors: Arc<dyn FloorRepository>,
    /// Pantries.
    pub pantries: Arc<dyn PantryRepository>,
    /// Dispensers.
    pub dispensers: Arc<dyn DispenserRepository>,
}

impl StoreAdapters {
    /// Process-local stores, lost on exit.
    pub fn in_memory() -> Self {
        let inventory = Arc::new(InMemoryInventory::new());
        Self {
            backend: StoreBackend::Memory,
            users: Arc::new(InMemoryUserRepository::new()),
            tokens: Arc::new(InMemoryTokenStore::new()),
            floors: inventory.clone(),
            pantries: inventory.clone(),
            dispensers: inventory,
        }
    }

    /// PostgreSQL-backed stores sharing one pool.
    pub fn postgres(pool: &DbPool) -> Self {
        let inventory = Arc::new(DieselInventoryRepository::new(pool.clone()));
        Self {
            backend: StoreBackend::Postgres,
            users: Arc::new(DieselUserRepository::new(pool.clone())),
            tokens: Arc::new(DieselTokenStore::new(pool.clone())),
            floors: inventory.clone(),
            pantries: inventory.clone(),
            dispensers: inventory,
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::{FloorDraft, PantryDraft, UserId};
    use rstest::rstest;

    #[rstest]
    #[tokio::test]
    async fn in_memory_ports_share_one_inventory() {
        let stores = StoreAdapters::in_memory();
        let floor = stores
            .floors
            .insert(&FloorDraft::new(1, UserId::random()).expect("floor"))
            .await
            .expect("floor inserted");

        let pantry = stores
            .pantries
            .insert(&PantryDraft::new("North", floor.id()).expect("pantry"))
            .await;

        assert!(pantry.is_ok(), "pantry sees the floor written via another port");
    }
}
