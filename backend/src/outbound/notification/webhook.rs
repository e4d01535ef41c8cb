//! Reqwest-backed webhook transport.
//!
//! Each message is posted as `{"from", "to", "subject", "body"}`. Any
//! non-success status is a rejection; connection failures and timeouts are
//! reported as unavailability.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Serialize;

use crate::domain::ports::{NotificationTransport, NotificationTransportError, OutboundMessage};

const USER_AGENT: &str = "pantry-backend-notifier/0.1";

#[derive(Serialize)]
struct WebhookPayload<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    body: &'a str,
}

impl<'a> From<&'a OutboundMessage> for WebhookPayload<'a> {
    fn from(message: &'a OutboundMessage) -> Self {
        Self {
            from: &message.from,
            to: &message.to,
            subject: &message.subject,
            body: &message.body,
        }
    }
}

/// Posts notification messages to one HTTP endpoint.
pub struct WebhookNotificationTransport {
    client: Client,
    endpoint: Url,
}

impl WebhookNotificationTransport {
    /// Build a transport whose requests time out after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(endpoint: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client, endpoint })
    }
}

#[async_trait]
impl NotificationTransport for WebhookNotificationTransport {
    async fn send(&self, message: &OutboundMessage) -> Result<(), NotificationTransportError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&WebhookPayload::from(message))
            .send()
            .await
            .map_err(|err| NotificationTransportError::unavailable(err.to_string()))?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(map_status(status))
        }
    }
}

fn map_status(status: StatusCode) -> NotificationTransportError {
    let message = format!("webhook responded with status {}", status.as_u16());
    if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
        NotificationTransportError::unavailable(message)
    } else {
        NotificationTransportError::rejected(message)
    }
}
