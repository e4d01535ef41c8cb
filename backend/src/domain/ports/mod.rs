//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (repositories, token store, notification transport) expose
//! typed errors built with `define_port_error!`; driving ports return the
//! domain [`Error`](crate::domain::Error) consumed by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod account_command;
mod dispenser_level_command;
mod dispenser_repository;
mod floor_repository;
mod inventory_command;
mod inventory_query;
mod inventory_repository_error;
mod notification_transport;
mod pantry_repository;
mod token_store;
mod user_repository;

#[cfg(test)]
pub use account_command::{MockAccessTokenVerifier, MockAccountCommand};
pub use account_command::{
    AccessTokenVerifier, AccountCommand, FIXTURE_ACCESS_TOKEN, FIXTURE_USER_ID,
    FixtureAccessTokenVerifier, FixtureAccountCommand,
};
#[cfg(test)]
pub use dispenser_level_command::MockDispenserLevelCommand;
pub use dispenser_level_command::{
    DispenserLevelCommand, FixtureDispenserLevelCommand, UpdateLevelRequest, UpdateLevelResponse,
};
#[cfg(test)]
pub use dispenser_repository::MockDispenserRepository;
pub use dispenser_repository::{DispenserRepository, FixtureDispenserRepository};
#[cfg(test)]
pub use floor_repository::MockFloorRepository;
pub use floor_repository::{FixtureFloorRepository, FloorRepository};
#[cfg(test)]
pub use inventory_command::MockInventoryCommand;
pub use inventory_command::{
    DispenserPayload, FixtureInventoryCommand, FloorPayload, InventoryCommand, PantryPayload,
};
#[cfg(test)]
pub use inventory_query::MockInventoryQuery;
pub use inventory_query::{FixtureInventoryQuery, InventoryQuery};
pub use inventory_repository_error::InventoryRepositoryError;
#[cfg(test)]
pub use notification_transport::MockNotificationTransport;
pub use notification_transport::{
    FixtureNotificationTransport, NotificationTransport, NotificationTransportError,
    OutboundMessage,
};
#[cfg(test)]
pub use pantry_repository::MockPantryRepository;
pub use pantry_repository::{FixturePantryRepository, PantryRepository};
#[cfg(test)]
pub use token_store::MockTokenStore;
pub use token_store::{FixtureTokenStore, TokenStore, TokenStoreError};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{
    FixtureUserRepository, StoredUser, UserPersistenceError, UserRepository,
};
