use boxoffice_catalog::registry::{Event, EventRepository};
use boxoffice_catalog::seatmap::{Auditorium, SeatTemplate, SeatTier, TierBand};
use boxoffice_core::identity::{Role, User};
use boxoffice_core::repository::UserRepository;
use boxoffice_core::CoreResult;
use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

/// Accounts and events loaded by the demo seed.
pub struct SeedSummary {
    pub admin: User,
    pub enforcer: User,
    pub buyer: User,
    pub events: Vec<Event>,
}

/// Arena layout: 400 seats, 20 per row, premium front block.
pub fn arena_template() -> SeatTemplate {
    SeatTemplate {
        seat_count: 400,
        seats_per_row: 20,
        bands: vec![
            TierBand { upto: 80, tier: SeatTier::Premium, price: dec!(85) },
            TierBand { upto: 240, tier: SeatTier::Standard, price: dec!(45) },
            TierBand { upto: 400, tier: SeatTier::Economy, price: dec!(25) },
        ],
        handicap_every: 25,
        faculty_every: 30,
        faculty_cutoff: 60,
    }
}

/// Theatre layout: 240 seats, 15 per row.
pub fn theatre_template() -> SeatTemplate {
    SeatTemplate {
        seat_count: 240,
        seats_per_row: 15,
        bands: vec![
            TierBand { upto: 45, tier: SeatTier::Premium, price: dec!(35) },
            TierBand { upto: 150, tier: SeatTier::Standard, price: dec!(25) },
            TierBand { upto: 240, tier: SeatTier::Economy, price: dec!(15) },
        ],
        handicap_every: 20,
        faculty_every: 25,
        faculty_cutoff: 45,
    }
}

/// Concert hall layout: 150 seats, 12 per row.
pub fn concert_hall_template() -> SeatTemplate {
    SeatTemplate {
        seat_count: 150,
        seats_per_row: 12,
        bands: vec![
            TierBand { upto: 36, tier: SeatTier::Premium, price: dec!(30) },
            TierBand { upto: 96, tier: SeatTier::Standard, price: dec!(20) },
            TierBand { upto: 150, tier: SeatTier::Economy, price: dec!(12) },
        ],
        handicap_every: 15,
        faculty_every: 20,
        faculty_cutoff: 40,
    }
}

struct EventFixture {
    name: &'static str,
    venue: &'static str,
    date: &'static str,
    time: &'static str,
    description: &'static str,
    category: &'static str,
    auditorium: &'static str,
    template: SeatTemplate,
}

fn fixtures() -> Vec<EventFixture> {
    vec![
        EventFixture {
            name: "Cougar Basketball vs Citadel",
            venue: "TD Arena",
            date: "2025-11-25",
            time: "19:00:00",
            description: "CofC Cougars take on The Citadel Bulldogs.",
            category: "Sports",
            auditorium: "Main Court",
            template: arena_template(),
        },
        EventFixture {
            name: "Theatre: The Tempest",
            venue: "Emmett Robinson Theatre",
            date: "2025-12-05",
            time: "19:30:00",
            description: "Shakespeare's final play performed by CofC Theatre students",
            category: "Theatre",
            auditorium: "Main Theatre",
            template: theatre_template(),
        },
        EventFixture {
            name: "Jazz Ensemble Concert",
            venue: "Recital Hall",
            date: "2025-11-29",
            time: "20:00:00",
            description: "CofC Jazz Ensemble presents an evening of contemporary and classic jazz",
            category: "Music",
            auditorium: "Concert Hall",
            template: concert_hall_template(),
        },
        EventFixture {
            name: "Violin Ensemble Concert",
            venue: "Recital Hall",
            date: "2025-11-30",
            time: "20:00:00",
            description: "CofC Violin Ensemble presents an evening of contemporary and classic violin",
            category: "Music",
            auditorium: "Concert Hall",
            template: concert_hall_template(),
        },
        EventFixture {
            name: "Cougar Volleyball vs Charleston Southern",
            venue: "TD Arena",
            date: "2026-01-26",
            time: "19:00:00",
            description: "CofC Cougars take on Charleston Southern.",
            category: "Sports",
            auditorium: "Main Court",
            template: arena_template(),
        },
        EventFixture {
            name: "Cougar Basketball vs Charleston Southern",
            venue: "TD Arena",
            date: "2026-01-28",
            time: "19:00:00",
            description: "CofC Cougars take on Charleston Southern.",
            category: "Sports",
            auditorium: "Main Court",
            template: arena_template(),
        },
    ]
}

/// Load the demo accounts and event catalog. Meant for fresh stores; seeding
/// twice fails on the duplicate accounts.
pub async fn seed_demo_data(
    users: &dyn UserRepository,
    events: &dyn EventRepository,
    buyer_discount: Decimal,
) -> CoreResult<SeedSummary> {
    let admin = User::new("Sarah Chen", "admin", "admin@cofc.edu", Role::Admin, Decimal::ZERO);
    let enforcer = User::new(
        "Marcus Williams",
        "enforcer",
        "enforcer@cofc.edu",
        Role::Enforcer,
        Decimal::ZERO,
    );
    let buyer = User::new(
        "Emily Rodriguez",
        "student",
        "student@cofc.edu",
        Role::Buyer,
        buyer_discount,
    );

    users.insert(admin.clone()).await?;
    users.insert(enforcer.clone()).await?;
    users.insert(buyer.clone()).await?;

    let mut seeded = Vec::new();
    for fixture in fixtures() {
        let seats = fixture.template.generate();
        let event = Event {
            id: Uuid::new_v4(),
            name: fixture.name.to_string(),
            venue: fixture.venue.to_string(),
            date: fixture.date.parse().map_err(|_| {
                boxoffice_core::CoreError::InternalError("Invalid seed date".into())
            })?,
            time: fixture.time.parse().map_err(|_| {
                boxoffice_core::CoreError::InternalError("Invalid seed time".into())
            })?,
            capacity: seats.len() as u32,
            booked_seats: 0,
            description: fixture.description.to_string(),
            category: fixture.category.to_string(),
            created_at: Utc::now(),
        };
        let auditorium = Auditorium {
            id: Uuid::new_v4(),
            event_id: event.id,
            name: fixture.auditorium.to_string(),
            seats,
        };
        events.insert(event.clone(), vec![auditorium]).await?;
        seeded.push(event);
    }

    tracing::info!(users = 3, events = seeded.len(), "Demo data loaded");
    Ok(SeedSummary { admin, enforcer, buyer, events: seeded })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event_repo::MemoryEventRepository;
    use crate::user_repo::MemoryUserRepository;

    #[tokio::test]
    async fn test_seed_loads_accounts_and_catalog() {
        let users = MemoryUserRepository::new();
        let events = MemoryEventRepository::new();

        let summary = seed_demo_data(&users, &events, dec!(0.10)).await.unwrap();

        assert_eq!(summary.buyer.discount, dec!(0.10));
        assert_eq!(summary.events.len(), 6);

        let arena = summary
            .events
            .iter()
            .find(|e| e.name == "Cougar Basketball vs Citadel")
            .unwrap();
        assert_eq!(arena.capacity, 400);

        let detail = events.get(arena.id).await.unwrap();
        assert_eq!(detail.auditoriums[0].name, "Main Court");
        assert_eq!(detail.auditoriums[0].seats.len(), 400);
        assert_eq!(detail.auditoriums[0].seats[0].price, dec!(85));
        assert!(detail.auditoriums[0].seats[0].is_faculty_only);

        // Seeding into the same store again conflicts on the demo accounts.
        assert!(seed_demo_data(&users, &events, dec!(0.10)).await.is_err());
    }

    #[tokio::test]
    async fn test_concert_hall_band_prices() {
        let seats = concert_hall_template().generate();
        assert_eq!(seats.len(), 150);
        assert_eq!(seats[0].price, dec!(30));
        assert_eq!(seats[36].price, dec!(20));
        assert_eq!(seats[96].price, dec!(12));
    }
}
