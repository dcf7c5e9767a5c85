pub mod app_config;
pub mod audit_log;
pub mod event_repo;
pub mod seed;
pub mod ticket_repo;
pub mod user_repo;

pub use audit_log::MemoryAuditLog;
pub use event_repo::MemoryEventRepository;
pub use ticket_repo::MemoryTicketRepository;
pub use user_repo::MemoryUserRepository;
