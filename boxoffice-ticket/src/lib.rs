pub mod audit;
pub mod issuer;
pub mod lifecycle;
pub mod models;
pub mod repository;

pub use audit::{AuditAction, AuditEntry, AuditSink};
pub use issuer::TicketIssuer;
pub use lifecycle::{ScanStatus, TicketLifecycle, ValidationOutcome};
pub use models::{Ticket, TicketStatus};
pub use repository::TicketRepository;
