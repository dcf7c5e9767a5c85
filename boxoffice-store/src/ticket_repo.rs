use async_trait::async_trait;
use boxoffice_core::{CoreError, CoreResult};
use boxoffice_ticket::models::{Ticket, TicketStatus};
use boxoffice_ticket::repository::TicketRepository;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::RwLock;
use uuid::Uuid;

/// Ticket table plus its lookup indexes. Everything sits behind one lock so
/// an insert and its index updates are a single atomic step, and guarded
/// status transitions are serialized.
#[derive(Default)]
struct TicketTable {
    by_id: HashMap<Uuid, Ticket>,
    /// QR codes are stored uppercased; scans match case-insensitively.
    by_qr: HashMap<String, Uuid>,
    by_alt: HashMap<String, Uuid>,
    by_user: HashMap<Uuid, Vec<Uuid>>,
    by_event: HashMap<Uuid, Vec<Uuid>>,
}

#[derive(Default)]
pub struct MemoryTicketRepository {
    table: RwLock<TicketTable>,
}

impl MemoryTicketRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned() -> CoreError {
    CoreError::InternalError("Ticket store lock poisoned".into())
}

#[async_trait]
impl TicketRepository for MemoryTicketRepository {
    async fn insert(&self, ticket: Ticket) -> CoreResult<()> {
        let mut table = self.table.write().map_err(|_| poisoned())?;

        if table.by_id.contains_key(&ticket.id) {
            return Err(CoreError::ConflictError("Ticket id already exists".into()));
        }
        let qr_key = ticket.qr_code.to_uppercase();
        if table.by_qr.contains_key(&qr_key) {
            return Err(CoreError::ConflictError("QR code already in use".into()));
        }
        if table.by_alt.contains_key(&ticket.alternate_id) {
            return Err(CoreError::ConflictError("Alternate id already in use".into()));
        }

        // One live ticket per seat. The ledger already guards this through
        // seat claims; this check keeps the store consistent on its own.
        if let Some(ids) = table.by_event.get(&ticket.event_id) {
            let seat_taken = ids.iter().any(|id| {
                table
                    .by_id
                    .get(id)
                    .is_some_and(|t| t.seat_id == ticket.seat_id && t.occupies_seat())
            });
            if seat_taken {
                return Err(CoreError::ConflictError("Seat already has an active ticket".into()));
            }
        }

        table.by_qr.insert(qr_key, ticket.id);
        table.by_alt.insert(ticket.alternate_id.clone(), ticket.id);
        table.by_user.entry(ticket.user_id).or_default().push(ticket.id);
        table.by_event.entry(ticket.event_id).or_default().push(ticket.id);
        table.by_id.insert(ticket.id, ticket);
        Ok(())
    }

    async fn get(&self, id: Uuid) -> CoreResult<Ticket> {
        let table = self.table.read().map_err(|_| poisoned())?;
        table
            .by_id
            .get(&id)
            .cloned()
            .ok_or_else(|| CoreError::NotFoundError(format!("Ticket {id} not found")))
    }

    async fn find_by_scan(&self, scan_id: &str) -> CoreResult<Option<Ticket>> {
        let table = self.table.read().map_err(|_| poisoned())?;
        let id = table
            .by_qr
            .get(&scan_id.to_uppercase())
            .or_else(|| table.by_alt.get(scan_id));
        Ok(id.and_then(|id| table.by_id.get(id)).cloned())
    }

    async fn list_for_user(&self, user_id: Uuid) -> CoreResult<Vec<Ticket>> {
        let table = self.table.read().map_err(|_| poisoned())?;
        Ok(table
            .by_user
            .get(&user_id)
            .into_iter()
            .flatten()
            .filter_map(|id| table.by_id.get(id))
            .cloned()
            .collect())
    }

    async fn list_for_event(&self, event_id: Uuid) -> CoreResult<Vec<Ticket>> {
        let table = self.table.read().map_err(|_| poisoned())?;
        Ok(table
            .by_event
            .get(&event_id)
            .into_iter()
            .flatten()
            .filter_map(|id| table.by_id.get(id))
            .cloned()
            .collect())
    }

    async fn transition(
        &self,
        id: Uuid,
        expect: TicketStatus,
        next: TicketStatus,
    ) -> CoreResult<Ticket> {
        let mut table = self.table.write().map_err(|_| poisoned())?;
        let ticket = table
            .by_id
            .get_mut(&id)
            .ok_or_else(|| CoreError::NotFoundError(format!("Ticket {id} not found")))?;

        if ticket.status != expect {
            return Err(CoreError::ConflictError(
                "Ticket is not in the expected state for this transition".into(),
            ));
        }
        ticket.status = next;
        Ok(ticket.clone())
    }

    async fn record_transfer(&self, id: Uuid, target_email: &str) -> CoreResult<Ticket> {
        let mut table = self.table.write().map_err(|_| poisoned())?;
        let ticket = table
            .by_id
            .get_mut(&id)
            .ok_or_else(|| CoreError::NotFoundError(format!("Ticket {id} not found")))?;

        if ticket.status != TicketStatus::Valid {
            return Err(CoreError::ConflictError("Only valid tickets can be transferred".into()));
        }
        ticket.status = TicketStatus::Transferred;
        ticket.transferred_to_email = Some(target_email.to_string());
        ticket.transferred_at = Some(Utc::now());
        Ok(ticket.clone())
    }
}
