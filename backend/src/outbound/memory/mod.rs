//! Process-local adapters used when no database URL is configured.
//!
//! State is lost on restart. The server falls back to these adapters so the
//! API can be exercised without PostgreSQL.

mod inventory;
mod tokens;
mod users;

pub use inventory::InMemoryInventory;
pub use tokens::InMemoryTokenStore;
pub use users::InMemoryUserRepository;
