use boxoffice_catalog::registry::EventRepository;
use boxoffice_core::CoreError;
use boxoffice_store::seed::seed_demo_data;
use boxoffice_store::{MemoryAuditLog, MemoryEventRepository, MemoryTicketRepository, MemoryUserRepository};
use boxoffice_ticket::audit::{AuditAction, AuditSink};
use boxoffice_ticket::issuer::TicketIssuer;
use boxoffice_ticket::lifecycle::{ScanStatus, TicketLifecycle};
use boxoffice_ticket::models::TicketStatus;
use boxoffice_ticket::repository::TicketRepository;
use rust_decimal_macros::dec;
use std::sync::Arc;
use uuid::Uuid;

struct Stack {
    events: Arc<MemoryEventRepository>,
    tickets: Arc<MemoryTicketRepository>,
    audit: Arc<MemoryAuditLog>,
    issuer: TicketIssuer,
    lifecycle: TicketLifecycle,
}

async fn seeded_stack() -> (Stack, boxoffice_store::seed::SeedSummary) {
    let users = Arc::new(MemoryUserRepository::new());
    let events = Arc::new(MemoryEventRepository::new());
    let tickets = Arc::new(MemoryTicketRepository::new());
    let audit = Arc::new(MemoryAuditLog::new());

    let summary = seed_demo_data(users.as_ref(), events.as_ref(), dec!(0.10))
        .await
        .unwrap();

    let issuer = TicketIssuer::new(events.clone(), tickets.clone(), audit.clone());
    let lifecycle = TicketLifecycle::new(tickets.clone(), events.clone(), audit.clone());

    (Stack { events, tickets, audit, issuer, lifecycle }, summary)
}

#[tokio::test]
async fn booking_applies_discount_and_updates_inventory() {
    let (stack, summary) = seeded_stack().await;
    let jazz = summary
        .events
        .iter()
        .find(|e| e.name == "Jazz Ensemble Concert")
        .unwrap();

    // A standard seat in the concert hall costs 20; Emily gets 10% off.
    let detail = stack.events.get(jazz.id).await.unwrap();
    let seat = detail.auditoriums[0]
        .seats
        .iter()
        .find(|s| s.price == dec!(20) && !s.is_faculty_only)
        .unwrap()
        .clone();

    let ticket = stack.issuer.book(&summary.buyer, jazz.id, seat.id).await.unwrap();
    assert_eq!(ticket.original_price, dec!(20));
    assert_eq!(ticket.final_price, dec!(18.00));
    assert_eq!(ticket.status, TicketStatus::Valid);
    assert_eq!(ticket.event_name, "Jazz Ensemble Concert");
    assert_eq!(ticket.qr_code.len(), 12);
    assert_eq!(ticket.alternate_id.len(), 6);

    let detail = stack.events.get(jazz.id).await.unwrap();
    assert_eq!(detail.event.booked_seats, 1);

    // Same seat again conflicts.
    let err = stack.issuer.book(&summary.buyer, jazz.id, seat.id).await.unwrap_err();
    assert!(matches!(err, CoreError::ConflictError(_)));

    let history = stack.audit.entries_for_ticket(ticket.id).await.unwrap();
    assert_eq!(history[0].action, AuditAction::Created);
}

#[tokio::test]
async fn scan_grants_entry_exactly_once() {
    let (stack, summary) = seeded_stack().await;
    let jazz = summary
        .events
        .iter()
        .find(|e| e.name == "Jazz Ensemble Concert")
        .unwrap();
    let detail = stack.events.get(jazz.id).await.unwrap();
    let seat_id = detail.auditoriums[0].seats[1].id;

    let ticket = stack.issuer.book(&summary.buyer, jazz.id, seat_id).await.unwrap();

    // First scan, lowercased QR still matches.
    let outcome = stack
        .lifecycle
        .validate(&ticket.qr_code.to_lowercase(), summary.enforcer.id)
        .await
        .unwrap();
    assert!(outcome.valid);
    assert_eq!(outcome.status, ScanStatus::Valid);
    assert_eq!(outcome.message, "SUCCESS! Ticket is VALID. Entry granted.");
    assert_eq!(outcome.ticket.unwrap().event_name, "Jazz Ensemble Concert");

    // Second scan via the alternate id is rejected.
    let outcome = stack
        .lifecycle
        .validate(&ticket.alternate_id, summary.enforcer.id)
        .await
        .unwrap();
    assert!(!outcome.valid);
    assert_eq!(outcome.status, ScanStatus::Used);
    assert_eq!(outcome.message, "Ticket already scanned and used for entry.");

    // Unknown tokens are a business outcome, not an error.
    let outcome = stack.lifecycle.validate("ZZZZZZZZZZZZ", summary.enforcer.id).await.unwrap();
    assert!(!outcome.valid);
    assert_eq!(outcome.status, ScanStatus::Invalid);
    assert_eq!(outcome.message, "Ticket ID not found.");
    assert!(outcome.ticket.is_none());
}

#[tokio::test]
async fn return_frees_seat_and_refunds_final_price() {
    let (stack, summary) = seeded_stack().await;
    let jazz = summary
        .events
        .iter()
        .find(|e| e.name == "Jazz Ensemble Concert")
        .unwrap();
    let detail = stack.events.get(jazz.id).await.unwrap();
    let seat = detail.auditoriums[0]
        .seats
        .iter()
        .find(|s| s.price == dec!(20) && !s.is_faculty_only)
        .unwrap()
        .clone();

    let ticket = stack.issuer.book(&summary.buyer, jazz.id, seat.id).await.unwrap();

    let refund = stack
        .lifecycle
        .return_ticket(ticket.id, summary.buyer.id)
        .await
        .unwrap();
    assert_eq!(refund, dec!(18.00));

    let detail = stack.events.get(jazz.id).await.unwrap();
    assert_eq!(detail.event.booked_seats, 0);

    // The returned ticket no longer admits entry.
    let outcome = stack.lifecycle.validate(&ticket.qr_code, summary.enforcer.id).await.unwrap();
    assert_eq!(outcome.status, ScanStatus::Invalid);
    assert_eq!(
        outcome.message,
        "Ticket has been returned/cancelled and is no longer valid."
    );

    // And the seat can be booked again.
    stack.issuer.book(&summary.buyer, jazz.id, seat.id).await.unwrap();

    // A second return of the same ticket conflicts.
    let err = stack
        .lifecycle
        .return_ticket(ticket.id, summary.buyer.id)
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::ConflictError(_)));
}

#[tokio::test]
async fn transfer_is_terminal_and_keeps_seat_booked() {
    let (stack, summary) = seeded_stack().await;
    let jazz = summary
        .events
        .iter()
        .find(|e| e.name == "Jazz Ensemble Concert")
        .unwrap();
    let detail = stack.events.get(jazz.id).await.unwrap();
    let seat_id = detail.auditoriums[0].seats[1].id;

    let ticket = stack.issuer.book(&summary.buyer, jazz.id, seat_id).await.unwrap();

    let err = stack
        .lifecycle
        .transfer(ticket.id, summary.buyer.id, "not-an-email")
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::ValidationError(_)));

    let transferred = stack
        .lifecycle
        .transfer(ticket.id, summary.buyer.id, "friend@cofc.edu")
        .await
        .unwrap();
    assert_eq!(transferred.status, TicketStatus::Transferred);
    assert_eq!(transferred.transferred_to_email.as_deref(), Some("friend@cofc.edu"));

    // Inventory is untouched by a transfer.
    let detail = stack.events.get(jazz.id).await.unwrap();
    assert_eq!(detail.event.booked_seats, 1);

    // The transferred ticket no longer scans for the sender.
    let outcome = stack.lifecycle.validate(&ticket.qr_code, summary.enforcer.id).await.unwrap();
    assert_eq!(outcome.status, ScanStatus::Invalid);
}

#[tokio::test]
async fn ownership_is_checked_before_lifecycle_changes() {
    let (stack, summary) = seeded_stack().await;
    let jazz = summary
        .events
        .iter()
        .find(|e| e.name == "Jazz Ensemble Concert")
        .unwrap();
    let detail = stack.events.get(jazz.id).await.unwrap();
    let seat_id = detail.auditoriums[0].seats[1].id;

    let ticket = stack.issuer.book(&summary.buyer, jazz.id, seat_id).await.unwrap();

    // Another account cannot return or transfer the ticket; the failure does
    // not reveal that the ticket exists.
    let err = stack
        .lifecycle
        .return_ticket(ticket.id, summary.admin.id)
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::NotFoundError(_)));

    let err = stack
        .lifecycle
        .transfer(ticket.id, Uuid::new_v4(), "friend@cofc.edu")
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::NotFoundError(_)));

    assert_eq!(
        stack.tickets.get(ticket.id).await.unwrap().status,
        TicketStatus::Valid
    );
}

#[tokio::test]
async fn event_deletion_cancels_outstanding_tickets() {
    let (stack, summary) = seeded_stack().await;
    let jazz = summary
        .events
        .iter()
        .find(|e| e.name == "Jazz Ensemble Concert")
        .unwrap();
    let detail = stack.events.get(jazz.id).await.unwrap();
    let seats: Vec<Uuid> = detail.auditoriums[0].seats[1..4].iter().map(|s| s.id).collect();

    let mut issued = Vec::new();
    for seat_id in seats {
        issued.push(stack.issuer.book(&summary.buyer, jazz.id, seat_id).await.unwrap());
    }
    let returned = stack
        .lifecycle
        .return_ticket(issued[0].id, summary.buyer.id)
        .await;
    assert!(returned.is_ok());

    let cancelled = stack
        .lifecycle
        .invalidate_for_event(jazz.id, summary.admin.id)
        .await
        .unwrap();
    assert_eq!(cancelled, 2);

    stack.events.delete(jazz.id).await.unwrap();

    // Wallet history survives the aggregate: the ticket still scans, as
    // cancelled.
    let outcome = stack
        .lifecycle
        .validate(&issued[1].qr_code, summary.enforcer.id)
        .await
        .unwrap();
    assert_eq!(outcome.status, ScanStatus::Invalid);
    assert_eq!(
        outcome.message,
        "Ticket has been returned/cancelled and is no longer valid."
    );
    let preview = outcome.ticket.unwrap();
    assert_eq!(preview.event_name, "Jazz Ensemble Concert");
}
