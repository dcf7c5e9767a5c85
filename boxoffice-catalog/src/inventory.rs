use crate::seatmap::Seat;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use uuid::Uuid;

/// Availability ledger for one event's seats.
///
/// Each seat's booked flag is an atomic boolean: a claim is a single
/// compare-and-swap from free to booked, so two concurrent claims on the same
/// seat resolve to exactly one winner without any lock, and claims on
/// different seats never contend. The booked counter is adjusted only by the
/// thread that won the swap, which keeps it equal to the number of booked
/// seats at all times.
pub struct SeatInventory {
    states: HashMap<Uuid, AtomicBool>,
    booked: AtomicU32,
}

impl SeatInventory {
    pub fn from_seats<'a>(seats: impl IntoIterator<Item = &'a Seat>) -> Self {
        let states: HashMap<Uuid, AtomicBool> = seats
            .into_iter()
            .map(|s| (s.id, AtomicBool::new(s.is_booked)))
            .collect();
        // Rehydrated seat sets may already carry bookings; the counter must
        // match them from the start or a release would wrap it.
        let booked = states.values().filter(|s| s.load(Ordering::Relaxed)).count() as u32;
        Self { states, booked: AtomicU32::new(booked) }
    }

    /// Claim a seat: free -> booked, exactly once per booking attempt.
    pub fn claim(&self, seat_id: Uuid) -> Result<(), LedgerError> {
        let state = self
            .states
            .get(&seat_id)
            .ok_or_else(|| LedgerError::SeatNotFound(seat_id.to_string()))?;

        state
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| LedgerError::AlreadyBooked(seat_id.to_string()))?;

        self.booked.fetch_add(1, Ordering::AcqRel);
        Ok(())
    }

    /// Release a seat: booked -> free. Releasing an unbooked seat fails
    /// cleanly instead of driving the counter negative.
    pub fn release(&self, seat_id: Uuid) -> Result<(), LedgerError> {
        let state = self
            .states
            .get(&seat_id)
            .ok_or_else(|| LedgerError::SeatNotFound(seat_id.to_string()))?;

        state
            .compare_exchange(true, false, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| LedgerError::NotBooked(seat_id.to_string()))?;

        self.booked.fetch_sub(1, Ordering::AcqRel);
        Ok(())
    }

    pub fn is_booked(&self, seat_id: Uuid) -> Option<bool> {
        self.states.get(&seat_id).map(|s| s.load(Ordering::Acquire))
    }

    pub fn booked_count(&self) -> u32 {
        self.booked.load(Ordering::Acquire)
    }

    pub fn seat_count(&self) -> usize {
        self.states.len()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("Seat not found: {0}")]
    SeatNotFound(String),

    #[error("Seat already booked: {0}")]
    AlreadyBooked(String),

    #[error("Seat is not booked: {0}")]
    NotBooked(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seatmap::{SeatTemplate, SeatTier, TierBand};
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    fn small_inventory() -> (SeatInventory, Vec<Uuid>) {
        let template = SeatTemplate {
            seat_count: 3,
            seats_per_row: 3,
            bands: vec![TierBand { upto: 3, tier: SeatTier::Standard, price: dec!(20) }],
            handicap_every: 0,
            faculty_every: 0,
            faculty_cutoff: 0,
        };
        let seats = template.generate();
        let ids = seats.iter().map(|s| s.id).collect();
        (SeatInventory::from_seats(&seats), ids)
    }

    #[test]
    fn test_claim_release_cycle() {
        let (inv, ids) = small_inventory();

        inv.claim(ids[0]).unwrap();
        assert_eq!(inv.is_booked(ids[0]), Some(true));
        assert_eq!(inv.booked_count(), 1);

        // Second claim on the same seat fails.
        assert!(matches!(inv.claim(ids[0]), Err(LedgerError::AlreadyBooked(_))));
        assert_eq!(inv.booked_count(), 1);

        inv.release(ids[0]).unwrap();
        assert_eq!(inv.is_booked(ids[0]), Some(false));
        assert_eq!(inv.booked_count(), 0);
    }

    #[test]
    fn test_release_unbooked_seat_fails_without_mutation() {
        let (inv, ids) = small_inventory();

        assert!(matches!(inv.release(ids[1]), Err(LedgerError::NotBooked(_))));
        assert_eq!(inv.booked_count(), 0);

        // Double release after a real claim also fails cleanly.
        inv.claim(ids[1]).unwrap();
        inv.release(ids[1]).unwrap();
        assert!(matches!(inv.release(ids[1]), Err(LedgerError::NotBooked(_))));
        assert_eq!(inv.booked_count(), 0);
    }

    #[test]
    fn test_counter_reflects_prebooked_seats() {
        let template = SeatTemplate {
            seat_count: 3,
            seats_per_row: 3,
            bands: vec![TierBand { upto: 3, tier: SeatTier::Standard, price: dec!(20) }],
            handicap_every: 0,
            faculty_every: 0,
            faculty_cutoff: 0,
        };
        let mut seats = template.generate();
        seats[0].is_booked = true;

        let inv = SeatInventory::from_seats(&seats);
        assert_eq!(inv.booked_count(), 1);
        assert_eq!(inv.is_booked(seats[0].id), Some(true));

        // Releasing the rehydrated booking brings the counter back to zero,
        // never below it.
        inv.release(seats[0].id).unwrap();
        assert_eq!(inv.booked_count(), 0);
        assert!(matches!(inv.release(seats[0].id), Err(LedgerError::NotBooked(_))));
        assert_eq!(inv.booked_count(), 0);
    }

    #[test]
    fn test_unknown_seat() {
        let (inv, _) = small_inventory();
        assert!(matches!(inv.claim(Uuid::new_v4()), Err(LedgerError::SeatNotFound(_))));
        assert!(matches!(inv.release(Uuid::new_v4()), Err(LedgerError::SeatNotFound(_))));
    }

    #[test]
    fn test_concurrent_claims_have_one_winner() {
        let (inv, ids) = small_inventory();
        let inv = Arc::new(inv);
        let seat = ids[0];

        let handles: Vec<_> = (0..32)
            .map(|_| {
                let inv = Arc::clone(&inv);
                std::thread::spawn(move || inv.claim(seat).is_ok())
            })
            .collect();

        let wins = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|&won| won)
            .count();
        assert_eq!(wins, 1);
        assert_eq!(inv.booked_count(), 1);
    }

    #[test]
    fn test_claims_on_different_seats_are_independent() {
        let (inv, ids) = small_inventory();
        let inv = Arc::new(inv);

        let handles: Vec<_> = ids
            .iter()
            .map(|&seat| {
                let inv = Arc::clone(&inv);
                std::thread::spawn(move || inv.claim(seat).is_ok())
            })
            .collect();

        assert!(handles.into_iter().all(|h| h.join().unwrap()));
        assert_eq!(inv.booked_count(), 3);
    }
}
