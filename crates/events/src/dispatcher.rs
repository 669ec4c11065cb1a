//! Background task turning domain events into donor emails.
//!
//! [`NotificationDispatcher`] subscribes to the event bus and sends a
//! confirmation email for every `donation.listed` event. Delivery happens
//! after the donation is already persisted, so a failure here is logged
//! and never affects the listing. Nothing is retried.

use std::sync::Arc;

use foodshare_core::notification::{DonationListedNotice, EVENT_DONATION_LISTED};
use tokio::sync::broadcast;

use crate::bus::DomainEvent;
use crate::delivery::email::{EmailError, EmailMessage, Mailer};

/// Why a single event could not be delivered.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("Malformed event payload: {0}")]
    Payload(#[from] serde_json::Error),

    #[error(transparent)]
    Email(#[from] EmailError),
}

/// Delivers notification emails for domain events.
pub struct NotificationDispatcher {
    /// `None` when SMTP is not configured; events are then logged and skipped.
    mailer: Option<Arc<dyn Mailer>>,
}

impl NotificationDispatcher {
    pub fn new(mailer: Option<Arc<dyn Mailer>>) -> Self {
        Self { mailer }
    }

    /// Run the dispatch loop.
    ///
    /// The loop exits when the channel is closed (i.e. the
    /// [`EventBus`](crate::EventBus) is dropped).
    pub async fn run(self, mut receiver: broadcast::Receiver<DomainEvent>) {
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    if let Err(e) = self.dispatch(&event).await {
                        tracing::error!(
                            error = %e,
                            event_type = %event.event_type,
                            donation_id = ?event.donation_id,
                            "Failed to deliver notification"
                        );
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Notification dispatcher lagged");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, notification dispatcher shutting down");
                    break;
                }
            }
        }
    }

    /// Handle a single event. Events other than `donation.listed` are ignored.
    pub async fn dispatch(&self, event: &DomainEvent) -> Result<(), DispatchError> {
        if event.event_type != EVENT_DONATION_LISTED {
            return Ok(());
        }

        let notice: DonationListedNotice = serde_json::from_value(event.payload.clone())?;

        let Some(mailer) = &self.mailer else {
            tracing::debug!(
                donation_id = notice.donation_id,
                "Email not configured, skipping donor confirmation"
            );
            return Ok(());
        };

        let message = EmailMessage {
            to: notice.donor_email.clone(),
            name: notice.donor_name.clone(),
            subject: notice.subject(),
            body: notice.compose_message(),
        };
        mailer.send(message).await?;

        tracing::info!(donation_id = notice.donation_id, "Donor confirmation sent");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
