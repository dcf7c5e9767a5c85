use boxoffice_catalog::registry::{EventRegistry, EventRepository};
use boxoffice_core::repository::UserRepository;
use boxoffice_ticket::issuer::TicketIssuer;
use boxoffice_ticket::lifecycle::TicketLifecycle;
use boxoffice_ticket::repository::TicketRepository;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub events: Arc<dyn EventRepository>,
    pub tickets: Arc<dyn TicketRepository>,
    pub registry: Arc<EventRegistry>,
    pub issuer: Arc<TicketIssuer>,
    pub lifecycle: Arc<TicketLifecycle>,
}
