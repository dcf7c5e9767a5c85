use async_trait::async_trait;
use boxoffice_core::CoreResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    Created,
    Returned,
    Transferred,
    Used,
    Cancelled,
    ScanRejected,
}

/// One entry in the ticket history trail. Failed scans carry the raw scan id
/// instead of a ticket reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    pub ticket_id: Option<Uuid>,
    pub scan_id: Option<String>,
    pub action: AuditAction,
    pub performed_by: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl AuditEntry {
    pub fn for_ticket(ticket_id: Uuid, action: AuditAction, performed_by: Uuid) -> Self {
        Self {
            ticket_id: Some(ticket_id),
            scan_id: None,
            action,
            performed_by,
            details: None,
            created_at: Utc::now(),
        }
    }

    pub fn for_scan(scan_id: &str, performed_by: Uuid, details: &str) -> Self {
        Self {
            ticket_id: None,
            scan_id: Some(scan_id.to_string()),
            action: AuditAction::ScanRejected,
            performed_by,
            details: Some(details.to_string()),
            created_at: Utc::now(),
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Sink for lifecycle audit records. Observability only: recording failures
/// are logged by callers, never surfaced to users.
#[async_trait]
pub trait AuditSink: Send + Sync {
    async fn record(&self, entry: AuditEntry) -> CoreResult<()>;

    async fn entries_for_ticket(&self, ticket_id: Uuid) -> CoreResult<Vec<AuditEntry>>;
}
