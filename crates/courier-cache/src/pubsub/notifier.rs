//! Redis-backed implementation of the core Notifier port.
//!
//! Delivery failures are logged and swallowed; a broken push path must
//! never fail the operation that triggered the event.

use async_trait::async_trait;

use courier_core::traits::Notifier;
use courier_core::{DomainEvent, Snowflake};

use crate::pubsub::{PubSubChannel, PubSubEvent, Publisher};

/// Fan-out notifier publishing domain events to per-user Redis channels
#[derive(Clone)]
pub struct RedisNotifier {
    publisher: Publisher,
}

impl RedisNotifier {
    /// Create a new notifier over a publisher
    #[must_use]
    pub fn new(publisher: Publisher) -> Self {
        Self { publisher }
    }
}

#[async_trait]
impl Notifier for RedisNotifier {
    async fn notify_users(&self, recipients: &[Snowflake], event: &DomainEvent) {
        if recipients.is_empty() {
            return;
        }

        let wrapped = match PubSubEvent::from_domain(event) {
            Ok(wrapped) => wrapped,
            Err(e) => {
                tracing::warn!(
                    event_type = event.event_type(),
                    error = %e,
                    "Failed to serialize event, dropping notification"
                );
                return;
            }
        };

        let channels: Vec<PubSubChannel> =
            recipients.iter().map(|&id| PubSubChannel::user(id)).collect();

        if let Err(e) = self.publisher.publish_many(&channels, &wrapped).await {
            tracing::warn!(
                event_type = event.event_type(),
                recipients = recipients.len(),
                error = %e,
                "Failed to publish notification"
            );
        }
    }
}
