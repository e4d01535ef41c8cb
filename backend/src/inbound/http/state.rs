//! Shared HTTP adapter state.
//!
//! Handlers receive this bundle through `web::Data` and depend only on the
//! driving ports, so they are testable with fixtures or mocks.

use std::sync::Arc;

use crate::domain::ports::{
    AccessTokenVerifier, AccountCommand, DispenserLevelCommand, FixtureAccessTokenVerifier,
    FixtureAccountCommand, FixtureDispenserLevelCommand, FixtureInventoryCommand,
    FixtureInventoryQuery, InventoryCommand, InventoryQuery,
};

/// Parameter object bundling every port used by the HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    /// Registration, login and token refresh.
    pub accounts: Arc<dyn AccountCommand>,
    /// Bearer token verification for protected routes.
    pub tokens: Arc<dyn AccessTokenVerifier>,
    /// Inventory reads.
    pub inventory: Arc<dyn InventoryQuery>,
    /// Inventory writes.
    pub inventory_commands: Arc<dyn InventoryCommand>,
    /// Dispenser level updates.
    pub levels: Arc<dyn DispenserLevelCommand>,
}

impl Default for HttpStatePorts {
    fn default() -> Self {
        Self {
            accounts: Arc::new(FixtureAccountCommand),
            tokens: Arc::new(FixtureAccessTokenVerifier),
            inventory: Arc::new(FixtureInventoryQuery),
            inventory_commands: Arc::new(FixtureInventoryCommand),
            levels: Arc::new(FixtureDispenserLevelCommand),
        }
    }
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub(crate) accounts: Arc<dyn AccountCommand>,
    pub(crate) tokens: Arc<dyn AccessTokenVerifier>,
    pub(crate) inventory: Arc<dyn InventoryQuery>,
    pub(crate) inventory_commands: Arc<dyn InventoryCommand>,
    pub(crate) levels: Arc<dyn DispenserLevelCommand>,
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}

impl HttpState {
    /// Construct state from a ports bundle.
    ///
    /// # Examples
    /// ```
    /// use pantry_backend::inbound::http::state::{HttpState, HttpStatePorts};
    ///
    /// let state = HttpState::new(HttpStatePorts::default());
    /// let _clone = state.clone();
    /// ```
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            accounts,
            tokens,
            inventory,
            inventory_commands,
            levels,
        } = ports;
        Self {
            accounts,
            tokens,
            inventory,
            inventory_commands,
            levels,
        }
    }
}
