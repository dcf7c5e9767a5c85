use crate::models::{Ticket, TicketStatus};
use async_trait::async_trait;
use boxoffice_core::CoreResult;
use uuid::Uuid;

/// Repository trait for ticket data access.
///
/// Implementations must reject an insert whose QR code, alternate id, or
/// seat (while a valid/used ticket exists for it) collides with an existing
/// ticket, and must apply `transition` only when the current status matches
/// the expected one, serialized against concurrent transitions.
#[async_trait]
pub trait TicketRepository: Send + Sync {
    async fn insert(&self, ticket: Ticket) -> CoreResult<()>;

    async fn get(&self, id: Uuid) -> CoreResult<Ticket>;

    /// Look up by QR code (case-insensitive) or alternate id (exact).
    async fn find_by_scan(&self, scan_id: &str) -> CoreResult<Option<Ticket>>;

    async fn list_for_user(&self, user_id: Uuid) -> CoreResult<Vec<Ticket>>;

    async fn list_for_event(&self, event_id: Uuid) -> CoreResult<Vec<Ticket>>;

    /// Guarded status change: succeeds only if the ticket is currently in
    /// `expect`, returning the updated ticket. Fails with a conflict
    /// otherwise.
    async fn transition(&self, id: Uuid, expect: TicketStatus, next: TicketStatus)
        -> CoreResult<Ticket>;

    /// Guarded `valid` -> `transferred` change recording the recipient email
    /// and transfer timestamp.
    async fn record_transfer(&self, id: Uuid, target_email: &str) -> CoreResult<Ticket>;
}
