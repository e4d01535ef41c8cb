//! HTTP server configuration object.

use std::net::SocketAddr;

use pantry_backend::domain::{LowLevelNotifier, TokenLifetimes};
use pantry_backend::outbound::{StoreAdapters, StoreBackend};

/// Everything needed to build the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) stores: StoreAdapters,
    pub(crate) notifier: LowLevelNotifier,
    pub(crate) lifetimes: TokenLifetimes,
}

impl ServerConfig {
    /// Construct a configuration over the selected stores.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, stores: StoreAdapters, notifier: LowLevelNotifier) -> Self {
        Self {
            bind_addr,
            stores,
            notifier,
            lifetimes: TokenLifetimes::default(),
        }
    }

    /// Backing store the server will run against.
    #[must_use]
    pub fn store_backend(&self) -> StoreBackend {
        self.stores.backend
    }

    /// Override token lifetimes.
    #[must_use]
    pub fn with_token_lifetimes(mut self, lifetimes: TokenLifetimes) -> Self {
        self.lifetimes = lifetimes;
        self
    }
}
