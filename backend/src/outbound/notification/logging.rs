//! Transport that logs messages instead of sending them.

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{NotificationTransport, NotificationTransportError, OutboundMessage};

/// Emits each message as a structured `info` event.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotificationTransport;

#[async_trait]
impl NotificationTransport for LogNotificationTransport {
    async fn send(&self, message: &OutboundMessage) -> Result<(), NotificationTransportError> {
        info!(
            from = %message.from,
            to = %message.to,
            subject = %message.subject,
            body = %message.body,
            "notification message"
        );
        Ok(())
    }
}
