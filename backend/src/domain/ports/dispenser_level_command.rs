//! Driving port for the dispenser level-update use-case.
//!
//! Inbound adapters hand over the raw `current_level` JSON value untouched;
//! the lookup happens before any validation so unknown dispensers always
//! answer `not_found`, whatever the payload.

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::{Dispenser, DispenserId, Error};

/// Request to set a dispenser's absolute level.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateLevelRequest {
    /// Target dispenser.
    pub dispenser_id: DispenserId,
    /// Raw `current_level` value; `None` when the field was absent.
    pub current_level: Option<Value>,
}

/// Result of a successful level update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateLevelResponse {
    /// Record as committed by the store.
    pub dispenser: Dispenser,
    /// Whether the committed level is below the threshold.
    pub running_low: bool,
    /// Whether a running-low notification was accepted by the transport.
    pub notified: bool,
}

/// Domain use-case port for level updates.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DispenserLevelCommand: Send + Sync {
    /// Validate and apply a level update.
    async fn update_level(&self, request: UpdateLevelRequest)
    -> Result<UpdateLevelResponse, Error>;
}

/// Fixture command that knows no dispensers.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureDispenserLevelCommand;

#[async_trait]
impl DispenserLevelCommand for FixtureDispenserLevelCommand {
    async fn update_level(
        &self,
        _request: UpdateLevelRequest,
    ) -> Result<UpdateLevelResponse, Error> {
        Err(Error::not_found("Dispenser not found"))
    }
}
