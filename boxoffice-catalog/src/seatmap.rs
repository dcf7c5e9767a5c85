use boxoffice_core::identity::SpecialAccommodations;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Price/category classification for a seat. Fixes the default price.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SeatTier {
    Premium,
    Standard,
    Economy,
}

/// A single seat within an auditorium. Identity and position are fixed at
/// creation; only `is_booked` changes afterwards, and only through the
/// inventory ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Seat {
    pub id: Uuid,
    pub row: u32,
    pub column: u32,
    pub tier: SeatTier,
    pub price: Decimal,
    pub is_handicap: bool,
    pub is_faculty_only: bool,
    pub is_booked: bool,
}

impl Seat {
    /// Advisory pre-claim filter: whether this seat belongs in a buyer's
    /// selectable set. Faculty-only seats are hidden from non-faculty buyers;
    /// buyers needing handicap access only see handicap seats. The ledger
    /// itself does not enforce this.
    pub fn selectable_by(&self, accommodations: &SpecialAccommodations) -> bool {
        if self.is_faculty_only && !accommodations.faculty_restricted {
            return false;
        }
        if accommodations.handicap_accessible && !self.is_handicap {
            return false;
        }
        true
    }
}

/// An auditorium owns an ordered set of seats. Insertion order is display
/// order and carries no other meaning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Auditorium {
    pub id: Uuid,
    pub event_id: Uuid,
    pub name: String,
    pub seats: Vec<Seat>,
}

impl Auditorium {
    pub fn seat(&self, seat_id: Uuid) -> Option<&Seat> {
        self.seats.iter().find(|s| s.id == seat_id)
    }
}

/// One contiguous band of seats sharing a tier and price. Bands are applied
/// in order against the running seat index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TierBand {
    /// Exclusive upper bound on the seat index this band covers.
    pub upto: usize,
    pub tier: SeatTier,
    pub price: Decimal,
}

/// Row/column geometry, tier thresholds and accessibility predicates used to
/// generate the full seat set for one auditorium.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeatTemplate {
    pub seat_count: usize,
    pub seats_per_row: u32,
    /// Tier bands in ascending `upto` order; the final band must cover
    /// `seat_count`.
    pub bands: Vec<TierBand>,
    /// Every n-th seat (by index) is handicap-accessible.
    pub handicap_every: usize,
    /// Every n-th seat below `faculty_cutoff` is faculty-only.
    pub faculty_every: usize,
    pub faculty_cutoff: usize,
}

impl SeatTemplate {
    /// Generate the seat set. Seats start unbooked; positions are 1-based.
    pub fn generate(&self) -> Vec<Seat> {
        (0..self.seat_count)
            .map(|i| {
                let band = self
                    .bands
                    .iter()
                    .find(|b| i < b.upto)
                    .unwrap_or_else(|| self.bands.last().expect("template has at least one band"));
                Seat {
                    id: Uuid::new_v4(),
                    row: (i as u32 / self.seats_per_row) + 1,
                    column: (i as u32 % self.seats_per_row) + 1,
                    tier: band.tier,
                    price: band.price,
                    is_handicap: self.handicap_every != 0 && i % self.handicap_every == 0,
                    is_faculty_only: self.faculty_every != 0
                        && i % self.faculty_every == 0
                        && i < self.faculty_cutoff,
                    is_booked: false,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn arena_template() -> SeatTemplate {
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

    #[test]
    fn test_template_generates_geometry() {
        let seats = arena_template().generate();
        assert_eq!(seats.len(), 400);

        // First seat: row 1 col 1, premium, handicap and faculty-only.
        assert_eq!(seats[0].row, 1);
        assert_eq!(seats[0].column, 1);
        assert_eq!(seats[0].tier, SeatTier::Premium);
        assert_eq!(seats[0].price, dec!(85));
        assert!(seats[0].is_handicap);
        assert!(seats[0].is_faculty_only);

        // Seat index 20 wraps to row 2.
        assert_eq!(seats[20].row, 2);
        assert_eq!(seats[20].column, 1);

        // Band boundaries.
        assert_eq!(seats[79].tier, SeatTier::Premium);
        assert_eq!(seats[80].tier, SeatTier::Standard);
        assert_eq!(seats[80].price, dec!(45));
        assert_eq!(seats[240].tier, SeatTier::Economy);
        assert_eq!(seats[240].price, dec!(25));

        // Faculty flag stops at the cutoff: index 60 is divisible by 30 but
        // not below 60.
        assert!(seats[30].is_faculty_only);
        assert!(!seats[60].is_faculty_only);

        assert!(seats.iter().all(|s| !s.is_booked));
    }

    #[test]
    fn test_eligibility_filter() {
        let seats = arena_template().generate();
        let faculty_seat = &seats[0];
        let plain_seat = &seats[1];

        let standard_buyer = SpecialAccommodations::default();
        assert!(!faculty_seat.selectable_by(&standard_buyer));
        assert!(plain_seat.selectable_by(&standard_buyer));

        let faculty_buyer = SpecialAccommodations {
            has_accommodations: true,
            handicap_accessible: false,
            faculty_restricted: true,
        };
        assert!(faculty_seat.selectable_by(&faculty_buyer));

        // A buyer needing handicap access only sees handicap seats.
        let handicap_buyer = SpecialAccommodations {
            has_accommodations: true,
            handicap_accessible: true,
            faculty_restricted: false,
        };
        assert!(!plain_seat.selectable_by(&handicap_buyer));
        assert!(seats[25].is_handicap && !seats[25].is_faculty_only);
        assert!(seats[25].selectable_by(&handicap_buyer));
    }
}
