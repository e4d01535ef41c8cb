//! Error type shared by the floor, pantry and dispenser repositories.

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by inventory repository adapters.
    pub store enum InventoryRepositoryError = "inventory repository";
}
