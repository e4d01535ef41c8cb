//! Notification transports.
//!
//! `LogNotificationTransport` writes messages to the log, which mirrors a
//! console mail backend and is the default. `WebhookNotificationTransport`
//! posts each message as JSON to a configured endpoint.

mod logging;
mod webhook;

pub use logging::LogNotificationTransport;
pub use webhook::WebhookNotificationTransport;
