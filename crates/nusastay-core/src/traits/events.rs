//! Outbound event sink trait.

use async_trait::async_trait;

use crate::events::DomainEvent;
use crate::result::AppResult;

/// Destination for outbound domain events.
///
/// Implementations deliver events to external collaborators (email
/// service, webhooks). Callers treat delivery as best-effort: a returned
/// error is logged by the caller, never propagated to the request.
#[async_trait]
pub trait EventSink: Send + Sync + 'static {
    /// Publish a single event.
    async fn publish(&self, event: &DomainEvent) -> AppResult<()>;
}
