//! Builders turning store adapters into the HTTP handler state.

use std::sync::Arc;

use actix_web::web;
use mockable::DefaultClock;

use pantry_backend::domain::{AccountService, InventoryService, LevelUpdateService};
use pantry_backend::inbound::http::state::{HttpState, HttpStatePorts};

use super::ServerConfig;

/// Wire the domain services over the configured stores.
pub(crate) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let stores = &config.stores;
    let accounts = Arc::new(AccountService::new(
        stores.users.clone(),
        stores.tokens.clone(),
        Arc::new(DefaultClock),
        config.lifetimes,
    ));
    let inventory = Arc::new(InventoryService::new(
        stores.floors.clone(),
        stores.pantries.clone(),
        stores.dispensers.clone(),
    ));
    let levels = Arc::new(LevelUpdateService::new(
        stores.dispensers.clone(),
        config.notifier.clone(),
    ));
    web::Data::new(HttpState::new(HttpStatePorts {
        accounts: accounts.clone(),
        tokens: accounts,
        inventory: inventory.clone(),
        inventory_commands: inventory,
        levels,
    }))
}
