//! Dispenser level-update workflow.
//!
//! Order matters: the dispenser lookup runs before payload validation, the
//! level is written in one atomic store call, and only then is the
//! running-low predicate evaluated against the committed record. The
//! notification step can fail in any way without changing the result.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, warn};

use crate::domain::ports::{
    DispenserLevelCommand, DispenserRepository, UpdateLevelRequest, UpdateLevelResponse,
};
use crate::domain::{
    Dispenser, DispenserId, Error, LowLevelNotice, LowLevelNotifier, NotificationFailure,
    NotifyOutcome, parse_current_level,
};

fn dispenser_not_found() -> Error {
    Error::not_found("Dispenser not found")
}

/// Committed state after a level update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelUpdateOutcome {
    /// Record as committed by the store.
    pub dispenser: Dispenser,
    /// Running-low predicate evaluated on the committed record.
    pub running_low: bool,
}

/// Service implementing [`DispenserLevelCommand`].
pub struct LevelUpdateService<R: ?Sized> {
    dispensers: Arc<R>,
    notifier: LowLevelNotifier,
}

impl<R: ?Sized> Clone for LevelUpdateService<R> {
    fn clone(&self) -> Self {
        Self {
            dispensers: Arc::clone(&self.dispensers),
            notifier: self.notifier.clone(),
        }
    }
}

impl<R> LevelUpdateService<R>
where
    R: DispenserRepository + ?Sized,
{
    /// Create the service over a dispenser repository and a notifier.
    pub fn new(dispensers: Arc<R>, notifier: LowLevelNotifier) -> Self {
        Self {
            dispensers,
            notifier,
        }
    }

    /// Run the workflow, returning the committed outcome and, when the
    /// dispenser is running low, the notification result.
    pub async fn apply(
        &self,
        id: DispenserId,
        raw_level: Option<&serde_json::Value>,
    ) -> Result<(LevelUpdateOutcome, Option<NotifyOutcome>), Error> {
        self.dispensers
            .find_by_id(id)
            .await
            .map_err(Error::from)?
            .ok_or_else(dispenser_not_found)?;

        let level = parse_current_level(raw_level).map_err(|err| {
            Error::invalid_request(err.to_string()).with_details(json!({
                "field": "current_level",
                "code": err.code(),
            }))
        })?;

        let dispenser = self
            .dispensers
            .set_current_level(id, level)
            .await
            .map_err(Error::from)?
            .ok_or_else(dispenser_not_found)?;

        let running_low = dispenser.is_running_low();
        debug!(
            dispenser = %id,
            level = dispenser.current_level(),
            fill = dispenser.fill_percentage(),
            running_low,
            "dispenser level updated"
        );
        let outcome = LevelUpdateOutcome {
            dispenser,
            running_low,
        };
        if !running_low {
            return Ok((outcome, None));
        }
        let notified = self.notify_running_low(&dispenser).await;
        Ok((outcome, Some(notified)))
    }

    async fn notify_running_low(&self, dispenser: &Dispenser) -> NotifyOutcome {
        let deadline = self.notifier.timeout();
        let lookup = tokio::time::timeout(deadline, self.dispensers.find_location(dispenser.id()));
        let location = match lookup.await {
            Ok(Ok(Some(location))) => location,
            Ok(Ok(None)) => {
                return location_failure(dispenser.id(), "dispenser has no pantry".to_owned());
            }
            Ok(Err(err)) => return location_failure(dispenser.id(), err.to_string()),
            Err(_) => {
                return location_failure(
                    dispenser.id(),
                    format!("lookup timed out after {} ms", deadline.as_millis()),
                );
            }
        };
        let notice = LowLevelNotice {
            kind: dispenser.kind(),
            pantry_name: location.pantry_name,
            floor_number: location.floor_number,
        };
        self.notifier.notify(&notice).await
    }
}

fn location_failure(id: DispenserId, message: String) -> NotifyOutcome {
    warn!(dispenser = %id, error = %message, "low-level notification skipped");
    NotifyOutcome::Failed(NotificationFailure::Location { message })
}

#[async_trait]
impl<R> DispenserLevelCommand for LevelUpdateService<R>
where
    R: DispenserRepository + ?Sized,
{
    async fn update_level(
        &self,
        request: UpdateLevelRequest,
    ) -> Result<UpdateLevelResponse, Error> {
        let (outcome, notification) = self
            .apply(request.dispenser_id, request.current_level.as_ref())
            .await?;
        Ok(UpdateLevelResponse {
            dispenser: outcome.dispenser,
            running_low: outcome.running_low,
            notified: notification.is_some_and(|outcome| outcome.is_sent()),
        })
    }
}

#[cfg(test)]
#[path = "level_update_tests.rs"]
mod tests;
