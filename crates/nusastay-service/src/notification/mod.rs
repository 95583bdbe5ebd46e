//! Outbound notification plumbing.
//!
//! Email delivery is owned by an external collaborator that consumes
//! booking events (it sends the confirmation message when it sees
//! `confirmed`). This backend only publishes; [`LogEventSink`] is the
//! default sink and writes each event to the structured log, where the
//! delivery pipeline picks it up.

use async_trait::async_trait;

use nusastay_core::events::DomainEvent;
use nusastay_core::result::AppResult;
use nusastay_core::traits::EventSink;

/// [`EventSink`] that emits events as structured log records.
#[derive(Debug, Default, Clone)]
pub struct LogEventSink;

#[async_trait]
impl EventSink for LogEventSink {
    async fn publish(&self, event: &DomainEvent) -> AppResult<()> {
        let payload = serde_json::to_string(&event.payload)?;
        tracing::info!(
            event_id = %event.id,
            actor_id = ?event.actor_id,
            %payload,
            "domain event published"
        );
        Ok(())
    }
}
