//! Best-effort low-level notifications.
//!
//! [`LowLevelNotifier`] composes the running-low message and hands it to a
//! [`NotificationTransport`]. Every failure is logged and returned as a
//! [`NotifyOutcome::Failed`] value; nothing here ever produces a domain
//! [`Error`](super::Error), so callers cannot accidentally surface delivery
//! problems to clients.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures_util::FutureExt;
use thiserror::Error;
use tracing::{info, warn};

use super::DispenserKind;
use super::ports::{NotificationTransport, OutboundMessage};

/// Default sender address.
pub const DEFAULT_SENDER: &str = "no-reply@yourapp.com";
/// Default recipient address.
pub const DEFAULT_RECIPIENT: &str = "user@example.com";
/// Default upper bound for one delivery attempt.
pub const DEFAULT_NOTIFICATION_TIMEOUT: Duration = Duration::from_secs(5);

/// Facts needed to describe a running-low dispenser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LowLevelNotice {
    /// Dispenser contents type.
    pub kind: DispenserKind,
    /// Hosting pantry name.
    pub pantry_name: String,
    /// Floor number of the hosting pantry.
    pub floor_number: i32,
}

impl LowLevelNotice {
    /// Message subject, e.g. `Coffee Dispenser Running Low`.
    ///
    /// # Examples
    /// ```
    /// use pantry_backend::domain::{DispenserKind, LowLevelNotice};
    ///
    /// let notice = LowLevelNotice {
    ///     kind: DispenserKind::Coffee,
    ///     pantry_name: "East".into(),
    ///     floor_number: 3,
    /// };
    /// assert_eq!(notice.subject(), "Coffee Dispenser Running Low");
    /// ```
    pub fn subject(&self) -> String {
        format!("{} Dispenser Running Low", self.kind.display_name())
    }

    /// Message body naming the pantry and floor.
    pub fn body(&self) -> String {
        format!(
            "The dispenser in pantry '{}' on floor '{}' is running low. Please refill it soon.",
            self.pantry_name, self.floor_number
        )
    }
}

/// Reasons a notification was not delivered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotificationFailure {
    /// Subject or address would inject extra headers.
    #[error("invalid header in {field}")]
    InvalidHeader { field: &'static str },
    /// Transport reported an error.
    #[error("transport failed: {message}")]
    Transport { message: String },
    /// Transport did not answer within the configured bound.
    #[error("transport timed out after {timeout_ms} ms")]
    TimedOut { timeout_ms: u128 },
    /// Pantry or floor details could not be resolved.
    #[error("could not resolve dispenser location: {message}")]
    Location { message: String },
}

/// Result of one notification attempt. Never an error to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifyOutcome {
    /// Transport accepted the message.
    Sent,
    /// Delivery was abandoned; the failure has already been logged.
    Failed(NotificationFailure),
}

impl NotifyOutcome {
    /// Whether the transport accepted the message.
    pub fn is_sent(&self) -> bool {
        matches!(self, Self::Sent)
    }
}

/// Sends running-low messages through a transport with a time bound.
#[derive(Clone)]
pub struct LowLevelNotifier {
    transport: Arc<dyn NotificationTransport>,
    sender: String,
    recipient: String,
    timeout: Duration,
}

impl LowLevelNotifier {
    /// Build a notifier with explicit addresses and timeout.
    pub fn new(
        transport: Arc<dyn NotificationTransport>,
        sender: impl Into<String>,
        recipient: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            transport,
            sender: sender.into(),
            recipient: recipient.into(),
            timeout,
        }
    }

    /// Build a notifier with the default addresses and timeout.
    pub fn with_defaults(transport: Arc<dyn NotificationTransport>) -> Self {
        Self::new(
            transport,
            DEFAULT_SENDER,
            DEFAULT_RECIPIENT,
            DEFAULT_NOTIFICATION_TIMEOUT,
        )
    }

    /// Upper bound on one delivery attempt.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Attempt delivery once. Failures are logged and returned, never raised.
    pub async fn notify(&self, notice: &LowLevelNotice) -> NotifyOutcome {
        let outcome = self.deliver(notice).await;
        match &outcome {
            NotifyOutcome::Sent => info!(
                kind = notice.kind.code(),
                pantry = %notice.pantry_name,
                floor = notice.floor_number,
                "low-level notification sent"
            ),
            NotifyOutcome::Failed(failure) => warn!(
                kind = notice.kind.code(),
                pantry = %notice.pantry_name,
                floor = notice.floor_number,
                error = %failure,
                "low-level notification failed"
            ),
        }
        outcome
    }

    async fn deliver(&self, notice: &LowLevelNotice) -> NotifyOutcome {
        let subject = notice.subject();
        for (field, value) in [
            ("subject", subject.as_str()),
            ("sender", self.sender.as_str()),
            ("recipient", self.recipient.as_str()),
        ] {
            if value.contains(['\r', '\n']) {
                return NotifyOutcome::Failed(NotificationFailure::InvalidHeader { field });
            }
        }
        let message = OutboundMessage {
            from: self.sender.clone(),
            to: self.recipient.clone(),
            subject,
            body: notice.body(),
        };
        let send = AssertUnwindSafe(self.transport.send(&message)).catch_unwind();
        match tokio::time::timeout(self.timeout, send).await {
            Ok(Ok(Ok(()))) => NotifyOutcome::Sent,
            Ok(Ok(Err(err))) => NotifyOutcome::Failed(NotificationFailure::Transport {
                message: err.to_string(),
            }),
            Ok(Err(_)) => NotifyOutcome::Failed(NotificationFailure::Transport {
                message: "transport panicked".to_owned(),
            }),
            Err(_) => NotifyOutcome::Failed(NotificationFailure::TimedOut {
                timeout_ms: self.timeout.as_millis(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ports::{MockNotificationTransport, NotificationTransportError};
    use async_trait::async_trait;
    use rstest::{fixture, rstest};

    #[fixture]
    fn notice() -> LowLevelNotice {
        LowLevelNotice {
            kind: DispenserKind::Snack,
            pantry_name: "Pantry 2 on Floor 4".to_owned(),
            floor_number: 4,
        }
    }

    #[rstest]
    fn renders_subject_and_body(notice: LowLevelNotice) {
        assert_eq!(notice.subject(), "Snack Dispenser Running Low");
        assert_eq!(
            notice.body(),
            "The dispenser in pantry 'Pantry 2 on Floor 4' on floor '4' is running low. \
             Please refill it soon."
        );
    }

    #[rstest]
    #[tokio::test]
    async fn sends_message_to_configured_recipient(notice: LowLevelNotice) {
        let mut transport = MockNotificationTransport::new();
        transport
            .expect_send()
            .withf(|message| {
                message.from == DEFAULT_SENDER
                    && message.to == DEFAULT_RECIPIENT
                    && message.subject == "Snack Dispenser Running Low"
            })
            .times(1)
            .return_once(|_| Ok(()));
        let notifier = LowLevelNotifier::with_defaults(Arc::new(transport));

        assert_eq!(notifier.notify(&notice).await, NotifyOutcome::Sent);
    }

    #[rstest]
    #[tokio::test]
    async fn transport_errors_become_failed_outcomes(notice: LowLevelNotice) {
        let mut transport = MockNotificationTransport::new();
        transport
            .expect_send()
            .times(1)
            .return_once(|_| Err(NotificationTransportError::unavailable("smtp down")));
        let notifier = LowLevelNotifier::with_defaults(Arc::new(transport));

        let outcome = notifier.notify(&notice).await;
        assert!(matches!(
            outcome,
            NotifyOutcome::Failed(NotificationFailure::Transport { .. })
        ));
    }

    #[rstest]
    #[tokio::test]
    async fn header_injection_is_rejected_before_sending(notice: LowLevelNotice) {
        let mut transport = MockNotificationTransport::new();
        transport.expect_send().times(0);
        let notifier = LowLevelNotifier::new(
            Arc::new(transport),
            DEFAULT_SENDER,
            "ops@example.com\r\nBcc: attacker@example.com",
            DEFAULT_NOTIFICATION_TIMEOUT,
        );

        assert_eq!(
            notifier.notify(&notice).await,
            NotifyOutcome::Failed(NotificationFailure::InvalidHeader { field: "recipient" })
        );
    }

    struct StalledTransport;

    #[async_trait]
    impl NotificationTransport for StalledTransport {
        async fn send(&self, _message: &OutboundMessage) -> Result<(), NotificationTransportError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(())
        }
    }

    #[rstest]
    #[tokio::test(start_paused = true)]
    async fn slow_transports_are_abandoned_after_timeout(notice: LowLevelNotice) {
        let notifier = LowLevelNotifier::new(
            Arc::new(StalledTransport),
            DEFAULT_SENDER,
            DEFAULT_RECIPIENT,
            Duration::from_millis(250),
        );

        assert_eq!(
            notifier.notify(&notice).await,
            NotifyOutcome::Failed(NotificationFailure::TimedOut { timeout_ms: 250 })
        );
    }

    struct PanickingTransport;

    #[async_trait]
    impl NotificationTransport for PanickingTransport {
        async fn send(&self, _message: &OutboundMessage) -> Result<(), NotificationTransportError> {
            panic!("mail relay client bug")
        }
    }

    #[rstest]
    #[tokio::test]
    async fn panicking_transports_are_contained(notice: LowLevelNotice) {
        let notifier = LowLevelNotifier::with_defaults(Arc::new(PanickingTransport));

        assert_eq!(
            notifier.notify(&notice).await,
            NotifyOutcome::Failed(NotificationFailure::Transport {
                message: "transport panicked".to_owned()
            })
        );
    }
}
