use boxoffice_core::identity::User;
use boxoffice_catalog::pricing;
use boxoffice_catalog::registry::SeatClaim;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Ticket status in the lifecycle. `valid` is the only non-terminal state;
/// everything else is final for the holder.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TicketStatus {
    Valid,
    Used,
    Invalid,
    Transferred,
}

/// The record binding a user to a seat within an event.
///
/// Event and seat display fields are copied at issuance so wallet views and
/// enforcer scans keep working after the event aggregate is deleted. Tickets
/// are never removed; history is retained through status changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: Uuid,
    pub user_id: Uuid,
    pub event_id: Uuid,
    pub seat_id: Uuid,
    pub event_name: String,
    pub venue: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub row: u32,
    pub column: u32,
    pub original_price: Decimal,
    pub final_price: Decimal,
    pub qr_code: String,
    pub alternate_id: String,
    pub is_faculty_only: bool,
    pub status: TicketStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transferred_to_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transferred_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Ticket {
    /// Mint a ticket from a successful seat claim. The final price applies
    /// the holder's effective discount at currency precision.
    pub fn mint(user: &User, claim: &SeatClaim, qr_code: String, alternate_id: String) -> Self {
        let original_price = claim.seat.price;
        Self {
            id: Uuid::new_v4(),
            user_id: user.id,
            event_id: claim.event.id,
            seat_id: claim.seat.id,
            event_name: claim.event.name.clone(),
            venue: claim.event.venue.clone(),
            date: claim.event.date,
            time: claim.event.time,
            row: claim.seat.row,
            column: claim.seat.column,
            original_price,
            final_price: pricing::final_price(original_price, user.effective_discount()),
            qr_code,
            alternate_id,
            is_faculty_only: claim.seat.is_faculty_only,
            status: TicketStatus::Valid,
            transferred_to_email: None,
            transferred_at: None,
            created_at: Utc::now(),
        }
    }

    /// A ticket currently occupying its seat: valid or already used.
    pub fn occupies_seat(&self) -> bool {
        matches!(self.status, TicketStatus::Valid | TicketStatus::Used)
    }
}
