use boxoffice_api::{app, state::AppState};
use boxoffice_catalog::registry::{EventRegistry, EventRepository};
use boxoffice_core::repository::UserRepository;
use boxoffice_store::{MemoryAuditLog, MemoryEventRepository, MemoryTicketRepository, MemoryUserRepository};
use boxoffice_ticket::audit::AuditSink;
use boxoffice_ticket::issuer::TicketIssuer;
use boxoffice_ticket::lifecycle::TicketLifecycle;
use boxoffice_ticket::repository::TicketRepository;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "boxoffice_api=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = boxoffice_store::app_config::Config::load().expect("Failed to load config");
    tracing::info!("Starting Box Office API on port {}", config.server.port);

    let users: Arc<dyn UserRepository> = Arc::new(MemoryUserRepository::new());
    let events: Arc<dyn EventRepository> = Arc::new(MemoryEventRepository::new());
    let tickets: Arc<dyn TicketRepository> = Arc::new(MemoryTicketRepository::new());
    let audit: Arc<dyn AuditSink> = Arc::new(MemoryAuditLog::new());

    if config.business_rules.seed_demo_data {
        boxoffice_store::seed::seed_demo_data(
            users.as_ref(),
            events.as_ref(),
            config.business_rules.default_buyer_discount,
        )
        .await
        .expect("Failed to seed demo data");
    }

    let app_state = AppState {
        users: users.clone(),
        events: events.clone(),
        tickets: tickets.clone(),
        registry: Arc::new(EventRegistry::new(events.clone())),
        issuer: Arc::new(TicketIssuer::new(events.clone(), tickets.clone(), audit.clone())),
        lifecycle: Arc::new(TicketLifecycle::new(tickets, events, audit)),
    };

    let app = app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
