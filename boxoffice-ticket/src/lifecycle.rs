use crate::audit::{AuditAction, AuditEntry, AuditSink};
use crate::models::{Ticket, TicketStatus};
use crate::repository::TicketRepository;
use boxoffice_catalog::registry::EventRepository;
use boxoffice_core::{CoreError, CoreResult};
use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

/// Outcome of an enforcer scan. "Not found" is a business outcome here, not
/// an error.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationOutcome {
    pub valid: bool,
    pub status: ScanStatus,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticket: Option<TicketPreview>,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ScanStatus {
    Valid,
    Used,
    Invalid,
}

/// What the enforcer sees about a scanned ticket.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketPreview {
    pub event_name: String,
    pub venue: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub row: u32,
    pub column: u32,
    pub is_faculty_only: bool,
}

impl From<&Ticket> for TicketPreview {
    fn from(ticket: &Ticket) -> Self {
        Self {
            event_name: ticket.event_name.clone(),
            venue: ticket.venue.clone(),
            date: ticket.date,
            time: ticket.time,
            row: ticket.row,
            column: ticket.column,
            is_faculty_only: ticket.is_faculty_only,
        }
    }
}

/// Drives tickets through valid -> used / invalid / transferred.
///
/// Every operation is a guarded transition on the ticket store; invalid
/// transitions fail with a typed error instead of silently succeeding.
pub struct TicketLifecycle {
    tickets: Arc<dyn TicketRepository>,
    events: Arc<dyn EventRepository>,
    audit: Arc<dyn AuditSink>,
}

impl TicketLifecycle {
    pub fn new(
        tickets: Arc<dyn TicketRepository>,
        events: Arc<dyn EventRepository>,
        audit: Arc<dyn AuditSink>,
    ) -> Self {
        Self { tickets, events, audit }
    }

    /// Enforcer scan: look up by QR code or alternate id and grant entry at
    /// most once. Every scan, including failed lookups, is recorded.
    pub async fn validate(&self, scan_id: &str, enforcer_id: Uuid) -> CoreResult<ValidationOutcome> {
        let Some(ticket) = self.tickets.find_by_scan(scan_id).await? else {
            self.record(AuditEntry::for_scan(scan_id, enforcer_id, "Ticket ID not found"))
                .await;
            return Ok(ValidationOutcome {
                valid: false,
                status: ScanStatus::Invalid,
                message: "Ticket ID not found.".to_string(),
                ticket: None,
            });
        };

        match ticket.status {
            TicketStatus::Used => {
                self.record(
                    AuditEntry::for_scan(scan_id, enforcer_id, "Already used")
                        .with_details(format!("ticket {}", ticket.id)),
                )
                .await;
                Ok(ValidationOutcome {
                    valid: false,
                    status: ScanStatus::Used,
                    message: "Ticket already scanned and used for entry.".to_string(),
                    ticket: Some(TicketPreview::from(&ticket)),
                })
            }
            TicketStatus::Invalid | TicketStatus::Transferred => {
                self.record(
                    AuditEntry::for_scan(scan_id, enforcer_id, "Returned or cancelled")
                        .with_details(format!("ticket {}", ticket.id)),
                )
                .await;
                Ok(ValidationOutcome {
                    valid: false,
                    status: ScanStatus::Invalid,
                    message: "Ticket has been returned/cancelled and is no longer valid."
                        .to_string(),
                    ticket: Some(TicketPreview::from(&ticket)),
                })
            }
            TicketStatus::Valid => {
                let updated = match self
                    .tickets
                    .transition(ticket.id, TicketStatus::Valid, TicketStatus::Used)
                    .await
                {
                    Ok(t) => t,
                    // Lost the race to another scanner: report as already used.
                    Err(CoreError::ConflictError(_)) => {
                        return Ok(ValidationOutcome {
                            valid: false,
                            status: ScanStatus::Used,
                            message: "Ticket already scanned and used for entry.".to_string(),
                            ticket: Some(TicketPreview::from(&ticket)),
                        });
                    }
                    Err(err) => return Err(err),
                };

                self.record(AuditEntry::for_ticket(updated.id, AuditAction::Used, enforcer_id))
                    .await;
                tracing::info!(ticket_id = %updated.id, enforcer_id = %enforcer_id, "Entry granted");
                Ok(ValidationOutcome {
                    valid: true,
                    status: ScanStatus::Valid,
                    message: "SUCCESS! Ticket is VALID. Entry granted.".to_string(),
                    ticket: Some(TicketPreview::from(&updated)),
                })
            }
        }
    }

    /// Return a valid ticket: mark it invalid, free its seat, and report the
    /// refund (the holder's final price).
    pub async fn return_ticket(&self, ticket_id: Uuid, user_id: Uuid) -> CoreResult<Decimal> {
        let ticket = self.owned_ticket(ticket_id, user_id).await?;

        if ticket.status != TicketStatus::Valid {
            return Err(CoreError::ConflictError("Ticket cannot be returned".into()));
        }

        let updated = self
            .tickets
            .transition(ticket.id, TicketStatus::Valid, TicketStatus::Invalid)
            .await?;

        // A valid ticket always holds its seat, so this release only fails
        // if the store has already lost consistency.
        self.events
            .release_seat(updated.event_id, updated.seat_id)
            .await
            .map_err(|err| {
                tracing::error!(ticket_id = %ticket_id, %err, "Seat release failed during return");
                CoreError::InternalError("Seat release failed during return".into())
            })?;

        self.record(AuditEntry::for_ticket(updated.id, AuditAction::Returned, user_id))
            .await;
        tracing::info!(ticket_id = %ticket_id, refund = %updated.final_price, "Ticket returned");
        Ok(updated.final_price)
    }

    /// Transfer a valid ticket to a recipient email. The ticket becomes
    /// terminal for the sender and the seat stays booked: a transfer
    /// reassigns the ticket, it does not release inventory.
    pub async fn transfer(
        &self,
        ticket_id: Uuid,
        user_id: Uuid,
        target_email: &str,
    ) -> CoreResult<Ticket> {
        if !target_email.contains('@') {
            return Err(CoreError::ValidationError("Invalid recipient email".into()));
        }

        let ticket = self.owned_ticket(ticket_id, user_id).await?;
        if ticket.status != TicketStatus::Valid {
            return Err(CoreError::ConflictError("Ticket cannot be transferred".into()));
        }

        let updated = self.tickets.record_transfer(ticket.id, target_email).await?;

        self.record(
            AuditEntry::for_ticket(updated.id, AuditAction::Transferred, user_id)
                .with_details(format!("Transferred to {target_email}")),
        )
        .await;
        tracing::info!(ticket_id = %ticket_id, target_email, "Ticket transferred");
        Ok(updated)
    }

    /// Cascade step of event deletion: every still-valid ticket for the
    /// event flips to invalid. No refunds are computed and no seats are
    /// released; the aggregate is being removed. Returns the number of
    /// tickets invalidated.
    pub async fn invalidate_for_event(&self, event_id: Uuid, performed_by: Uuid) -> CoreResult<usize> {
        let tickets = self.tickets.list_for_event(event_id).await?;
        let mut invalidated = 0;

        for ticket in tickets {
            if ticket.status != TicketStatus::Valid {
                continue;
            }
            match self
                .tickets
                .transition(ticket.id, TicketStatus::Valid, TicketStatus::Invalid)
                .await
            {
                Ok(updated) => {
                    invalidated += 1;
                    self.record(
                        AuditEntry::for_ticket(updated.id, AuditAction::Cancelled, performed_by)
                            .with_details("Event deleted"),
                    )
                    .await;
                }
                // Raced with a concurrent return/use; that outcome stands.
                Err(CoreError::ConflictError(_)) => continue,
                Err(err) => return Err(err),
            }
        }

        if invalidated > 0 {
            tracing::info!(event_id = %event_id, invalidated, "Cancelled tickets for deleted event");
        }
        Ok(invalidated)
    }

    async fn owned_ticket(&self, ticket_id: Uuid, user_id: Uuid) -> CoreResult<Ticket> {
        let ticket = self.tickets.get(ticket_id).await?;
        if ticket.user_id != user_id {
            // Do not reveal other holders' tickets.
            return Err(CoreError::NotFoundError("Ticket not found".into()));
        }
        Ok(ticket)
    }

    async fn record(&self, entry: AuditEntry) {
        if let Err(err) = self.audit.record(entry).await {
            tracing::warn!(%err, "Failed to record audit entry");
        }
    }
}
