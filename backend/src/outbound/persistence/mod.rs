//! PostgreSQL persistence adapters using Diesel.
//!
//! Repositories translate between internal row structs and domain types; no
//! business rules live here. Connections come from a `bb8` pool through
//! `diesel-async`, except migrations which use a blocking connection.
//!
//! # Example
//!
//! ```no_run
//! use pantry_backend::outbound::persistence::{DbPool, DieselInventoryRepository, PoolConfig};
//!
//! # async fn connect() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/pantry")).await?;
//! let inventory = DieselInventoryRepository::new(pool);
//! # let _ = inventory;
//! # Ok(())
//! # }
//! ```

mod diesel_inventory_repository;
mod diesel_token_store;
mod diesel_user_repository;
mod error_mapping;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_inventory_repository::DieselInventoryRepository;
pub use diesel_token_store::DieselTokenStore;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
