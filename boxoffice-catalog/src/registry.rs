use crate::seatmap::{Auditorium, Seat, SeatTemplate};
use async_trait::async_trait;
use boxoffice_core::identity::SpecialAccommodations;
use boxoffice_core::{CoreError, CoreResult};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Top-level event aggregate. `capacity` is the authoritative seat count
/// across auditoriums; `booked_seats` is derived from the inventory ledger
/// and must always equal the number of booked seats.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: Uuid,
    pub name: String,
    pub venue: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub capacity: u32,
    pub booked_seats: u32,
    pub description: String,
    pub category: String,
    pub created_at: DateTime<Utc>,
}

/// Event with its nested auditoriums and full seat arrays.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDetail {
    #[serde(flatten)]
    pub event: Event,
    pub auditoriums: Vec<Auditorium>,
}

impl EventDetail {
    /// Drop seats a buyer with these accommodations may not select. Advisory
    /// view only; the ledger does not enforce eligibility.
    pub fn filtered_for(mut self, accommodations: &SpecialAccommodations) -> Self {
        for auditorium in &mut self.auditoriums {
            auditorium.seats.retain(|s| s.selectable_by(accommodations));
        }
        self
    }
}

/// Admin input for event creation. Capacity is derived from the seat
/// template, not supplied by the caller.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEvent {
    pub name: String,
    pub venue: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
}

/// Snapshot handed back by a successful seat claim, carrying everything the
/// ticket issuer needs without re-reading the aggregate.
#[derive(Debug, Clone)]
pub struct SeatClaim {
    pub event: Event,
    pub auditorium_id: Uuid,
    pub seat: Seat,
}

/// Repository trait for event aggregates. Implementations own the ledger
/// atomicity contract: `claim_seat` must succeed at most once per seat until
/// the matching `release_seat`, even under concurrent callers.
#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn insert(&self, event: Event, auditoriums: Vec<Auditorium>) -> CoreResult<()>;

    /// Remove the aggregate (auditoriums and seats included). Outstanding
    /// ticket invalidation is orchestrated above this layer.
    async fn delete(&self, event_id: Uuid) -> CoreResult<()>;

    async fn list(&self) -> CoreResult<Vec<Event>>;

    async fn get(&self, event_id: Uuid) -> CoreResult<EventDetail>;

    async fn claim_seat(&self, event_id: Uuid, seat_id: Uuid) -> CoreResult<SeatClaim>;

    async fn release_seat(&self, event_id: Uuid, seat_id: Uuid) -> CoreResult<()>;
}

/// Owns event creation/lookup and the invariants around them. Booking and
/// lifecycle mutations go through the ticket services instead.
pub struct EventRegistry {
    events: Arc<dyn EventRepository>,
}

impl EventRegistry {
    pub fn new(events: Arc<dyn EventRepository>) -> Self {
        Self { events }
    }

    /// Create an event with one default auditorium populated from the seat
    /// template.
    pub async fn create_event(&self, fields: NewEvent, template: &SeatTemplate) -> CoreResult<Event> {
        if fields.name.trim().is_empty() {
            return Err(CoreError::ValidationError("Event name is required".into()));
        }
        if fields.venue.trim().is_empty() {
            return Err(CoreError::ValidationError("Event venue is required".into()));
        }
        if template.seat_count == 0 || template.bands.is_empty() {
            return Err(CoreError::ValidationError(
                "Seat template must define at least one seat".into(),
            ));
        }
        if template.seats_per_row == 0 {
            return Err(CoreError::ValidationError(
                "Seat template must define row geometry".into(),
            ));
        }

        let seats = template.generate();
        let event = Event {
            id: Uuid::new_v4(),
            name: fields.name.trim().to_string(),
            venue: fields.venue.trim().to_string(),
            date: fields.date,
            time: fields.time,
            capacity: seats.len() as u32,
            booked_seats: 0,
            description: fields.description,
            category: fields.category,
            created_at: Utc::now(),
        };
        let auditorium = Auditorium {
            id: Uuid::new_v4(),
            event_id: event.id,
            name: format!("{} Main Area", event.venue),
            seats,
        };

        self.events.insert(event.clone(), vec![auditorium]).await?;
        tracing::info!(event_id = %event.id, name = %event.name, "Event created");
        Ok(event)
    }

    /// All events, ordered by (date, time) ascending.
    pub async fn list_events(&self) -> CoreResult<Vec<Event>> {
        let mut events = self.events.list().await?;
        events.sort_by(|a, b| (a.date, a.time).cmp(&(b.date, b.time)));
        Ok(events)
    }

    pub async fn get_event(&self, event_id: Uuid) -> CoreResult<EventDetail> {
        self.events.get(event_id).await
    }
}
