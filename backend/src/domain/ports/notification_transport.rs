//! Port for outbound message delivery.
use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Errors raised by notification transports.
    pub enum NotificationTransportError {
        /// Transport refused the message.
        Rejected { message: String } => "notification rejected: {message}",
        /// Transport could not be reached.
        Unavailable { message: String } => "notification transport unavailable: {message}",
    }
}

/// Fully addressed message handed to a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    /// Sender address.
    pub from: String,
    /// Recipient address.
    pub to: String,
    /// Single-line subject.
    pub subject: String,
    /// Plain-text body.
    pub body: String,
}

/// Port for delivering notification messages.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationTransport: Send + Sync {
    /// Deliver one message.
    async fn send(&self, message: &OutboundMessage) -> Result<(), NotificationTransportError>;
}

/// Fixture transport that accepts every message.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureNotificationTransport;

#[async_trait]
impl NotificationTransport for FixtureNotificationTransport {
    async fn send(&self, _message: &OutboundMessage) -> Result<(), NotificationTransportError> {
        Ok(())
    }
}
