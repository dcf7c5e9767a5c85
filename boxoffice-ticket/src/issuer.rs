use crate::audit::{AuditAction, AuditEntry, AuditSink};
use crate::models::Ticket;
use crate::repository::TicketRepository;
use boxoffice_catalog::registry::EventRepository;
use boxoffice_core::identity::User;
use boxoffice_core::{CoreError, CoreResult};
use rand::Rng;
use std::sync::Arc;
use uuid::Uuid;

const QR_CODE_LEN: usize = 12;
const QR_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const MAX_TOKEN_RETRIES: usize = 8;

/// Opaque scan token: 12 uppercase alphanumeric characters.
pub fn generate_qr_code<R: Rng>(rng: &mut R) -> String {
    (0..QR_CODE_LEN)
        .map(|_| QR_CHARSET[rng.gen_range(0..QR_CHARSET.len())] as char)
        .collect()
}

/// Human-typable fallback: zero-padded 6-digit numeric string.
pub fn generate_alternate_id<R: Rng>(rng: &mut R) -> String {
    format!("{:06}", rng.gen_range(0..1_000_000u32))
}

/// Mints tickets against successful seat claims.
///
/// Booking is one unit of work from the caller's perspective: the seat claim
/// and the ticket insert either both happen or neither does. A failed insert
/// triggers a compensating seat release before the error propagates.
pub struct TicketIssuer {
    events: Arc<dyn EventRepository>,
    tickets: Arc<dyn TicketRepository>,
    audit: Arc<dyn AuditSink>,
}

impl TicketIssuer {
    pub fn new(
        events: Arc<dyn EventRepository>,
        tickets: Arc<dyn TicketRepository>,
        audit: Arc<dyn AuditSink>,
    ) -> Self {
        Self { events, tickets, audit }
    }

    /// Claim the seat and issue a ticket for it.
    pub async fn book(&self, user: &User, event_id: Uuid, seat_id: Uuid) -> CoreResult<Ticket> {
        let claim = self.events.claim_seat(event_id, seat_id).await?;

        match self.insert_with_fresh_tokens(user, &claim).await {
            Ok(ticket) => {
                if let Err(err) = self
                    .audit
                    .record(AuditEntry::for_ticket(ticket.id, AuditAction::Created, user.id))
                    .await
                {
                    tracing::warn!(ticket_id = %ticket.id, %err, "Failed to record audit entry");
                }
                tracing::info!(
                    ticket_id = %ticket.id,
                    event_id = %event_id,
                    seat_id = %seat_id,
                    "Ticket issued"
                );
                Ok(ticket)
            }
            Err(err) => {
                // Compensate: a claimed seat with no ticket is a consistency
                // violation.
                if let Err(release_err) = self.events.release_seat(event_id, seat_id).await {
                    tracing::error!(
                        event_id = %event_id,
                        seat_id = %seat_id,
                        %release_err,
                        "Failed to release seat after ticket insert failure"
                    );
                }
                Err(err)
            }
        }
    }

    async fn insert_with_fresh_tokens(
        &self,
        user: &User,
        claim: &boxoffice_catalog::registry::SeatClaim,
    ) -> CoreResult<Ticket> {
        for _ in 0..MAX_TOKEN_RETRIES {
            let (qr_code, alternate_id) = {
                let mut rng = rand::thread_rng();
                (generate_qr_code(&mut rng), generate_alternate_id(&mut rng))
            };
            let ticket = Ticket::mint(user, claim, qr_code, alternate_id);

            match self.tickets.insert(ticket.clone()).await {
                Ok(()) => return Ok(ticket),
                // Token collision: regenerate and retry.
                Err(CoreError::ConflictError(_)) => continue,
                Err(err) => return Err(err),
            }
        }

        Err(CoreError::InternalError(
            "Could not generate unique ticket identifiers".into(),
        ))
    }
}
