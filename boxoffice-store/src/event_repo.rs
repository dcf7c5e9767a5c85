use async_trait::async_trait;
use boxoffice_catalog::inventory::{LedgerError, SeatInventory};
use boxoffice_catalog::registry::{Event, EventDetail, EventRepository, SeatClaim};
use boxoffice_catalog::seatmap::{Auditorium, Seat};
use boxoffice_core::{CoreError, CoreResult};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

/// One event aggregate held in memory. The event metadata and seat layout
/// are immutable after insert; all booking state lives in the inventory
/// ledger, so claims and releases never take the repository lock for more
/// than a map lookup.
struct EventRecord {
    event: Event,
    auditoriums: Vec<Auditorium>,
    inventory: SeatInventory,
    /// seat id -> (auditorium index, seat index) for claim snapshots.
    seat_index: HashMap<Uuid, (usize, usize)>,
}

impl EventRecord {
    fn new(event: Event, auditoriums: Vec<Auditorium>) -> Self {
        let mut seat_index = HashMap::new();
        for (ai, auditorium) in auditoriums.iter().enumerate() {
            for (si, seat) in auditorium.seats.iter().enumerate() {
                seat_index.insert(seat.id, (ai, si));
            }
        }
        let inventory =
            SeatInventory::from_seats(auditoriums.iter().flat_map(|a| a.seats.iter()));
        Self { event, auditoriums, inventory, seat_index }
    }

    /// Event metadata with the booked counter read from the ledger.
    fn render_event(&self) -> Event {
        let mut event = self.event.clone();
        event.booked_seats = self.inventory.booked_count();
        event
    }

    /// Full detail view with per-seat booked flags read from the ledger.
    fn render_detail(&self) -> EventDetail {
        let auditoriums = self
            .auditoriums
            .iter()
            .map(|a| {
                let mut auditorium = a.clone();
                for seat in &mut auditorium.seats {
                    seat.is_booked = self.inventory.is_booked(seat.id).unwrap_or(false);
                }
                auditorium
            })
            .collect();
        EventDetail { event: self.render_event(), auditoriums }
    }

    fn seat(&self, seat_id: Uuid) -> Option<(&Auditorium, &Seat)> {
        let &(ai, si) = self.seat_index.get(&seat_id)?;
        let auditorium = &self.auditoriums[ai];
        Some((auditorium, &auditorium.seats[si]))
    }
}

/// In-memory event store. Aggregates sit behind `Arc` so seat claims run
/// against the ledger after the map lock is already released.
#[derive(Default)]
pub struct MemoryEventRepository {
    events: RwLock<HashMap<Uuid, Arc<EventRecord>>>,
}

impl MemoryEventRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&self, event_id: Uuid) -> CoreResult<Arc<EventRecord>> {
        self.events
            .read()
            .map_err(|_| CoreError::InternalError("Event store lock poisoned".into()))?
            .get(&event_id)
            .cloned()
            .ok_or_else(|| CoreError::NotFoundError(format!("Event {event_id} not found")))
    }
}

#[async_trait]
impl EventRepository for MemoryEventRepository {
    async fn insert(&self, event: Event, auditoriums: Vec<Auditorium>) -> CoreResult<()> {
        let mut events = self
            .events
            .write()
            .map_err(|_| CoreError::InternalError("Event store lock poisoned".into()))?;
        if events.contains_key(&event.id) {
            return Err(CoreError::ConflictError(format!("Event {} already exists", event.id)));
        }
        events.insert(event.id, Arc::new(EventRecord::new(event, auditoriums)));
        Ok(())
    }

    async fn delete(&self, event_id: Uuid) -> CoreResult<()> {
        let mut events = self
            .events
            .write()
            .map_err(|_| CoreError::InternalError("Event store lock poisoned".into()))?;
        events
            .remove(&event_id)
            .map(|_| ())
            .ok_or_else(|| CoreError::NotFoundError(format!("Event {event_id} not found")))
    }

    async fn list(&self) -> CoreResult<Vec<Event>> {
        let events = self
            .events
            .read()
            .map_err(|_| CoreError::InternalError("Event store lock poisoned".into()))?;
        Ok(events.values().map(|r| r.render_event()).collect())
    }

    async fn get(&self, event_id: Uuid) -> CoreResult<EventDetail> {
        Ok(self.record(event_id)?.render_detail())
    }

    async fn claim_seat(&self, event_id: Uuid, seat_id: Uuid) -> CoreResult<SeatClaim> {
        let record = self.record(event_id)?;

        record.inventory.claim(seat_id).map_err(|err| match err {
            LedgerError::SeatNotFound(_) => {
                CoreError::NotFoundError(format!("Seat {seat_id} not found"))
            }
            LedgerError::AlreadyBooked(_) | LedgerError::NotBooked(_) => {
                CoreError::ConflictError("Seat is already booked".into())
            }
        })?;

        let (auditorium, seat) = record
            .seat(seat_id)
            .ok_or_else(|| CoreError::InternalError("Claimed seat missing from layout".into()))?;
        let mut seat = seat.clone();
        seat.is_booked = true;

        Ok(SeatClaim {
            event: record.render_event(),
            auditorium_id: auditorium.id,
            seat,
        })
    }

    async fn release_seat(&self, event_id: Uuid, seat_id: Uuid) -> CoreResult<()> {
        let record = self.record(event_id)?;

        record.inventory.release(seat_id).map_err(|err| match err {
            LedgerError::SeatNotFound(_) => {
                CoreError::NotFoundError(format!("Seat {seat_id} not found"))
            }
            LedgerError::AlreadyBooked(_) | LedgerError::NotBooked(_) => {
                CoreError::ConflictError("Seat is not booked".into())
            }
        })
    }
}
