pub mod inventory;
pub mod pricing;
pub mod registry;
pub mod seatmap;

pub use inventory::{LedgerError, SeatInventory};
pub use registry::{Event, EventDetail, EventRegistry, EventRepository, NewEvent, SeatClaim};
pub use seatmap::{Auditorium, Seat, SeatTemplate, SeatTier, TierBand};
