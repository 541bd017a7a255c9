//! Notifier port - best-effort push to the notification collaborator

use async_trait::async_trait;

use crate::events::DomainEvent;
use crate::value_objects::Snowflake;

/// Fan-out seam for real-time notifications.
///
/// Delivery is best-effort: implementations log failures and return
/// normally, so a broken push path never fails the triggering operation.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver an event to each recipient's channel
    async fn notify_users(&self, recipients: &[Snowflake], event: &DomainEvent);
}
