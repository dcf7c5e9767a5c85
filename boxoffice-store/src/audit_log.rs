use async_trait::async_trait;
use boxoffice_core::{CoreError, CoreResult};
use boxoffice_ticket::audit::{AuditEntry, AuditSink};
use std::sync::RwLock;
use uuid::Uuid;

/// Append-only audit trail. Entries are never mutated or removed.
#[derive(Default)]
pub struct MemoryAuditLog {
    entries: RwLock<Vec<AuditEntry>>,
}

impl MemoryAuditLog {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AuditSink for MemoryAuditLog {
    async fn record(&self, entry: AuditEntry) -> CoreResult<()> {
        self.entries
            .write()
            .map_err(|_| CoreError::InternalError("Audit log lock poisoned".into()))?
            .push(entry);
        Ok(())
    }

    async fn entries_for_ticket(&self, ticket_id: Uuid) -> CoreResult<Vec<AuditEntry>> {
        let entries = self
            .entries
            .read()
            .map_err(|_| CoreError::InternalError("Audit log lock poisoned".into()))?;
        Ok(entries
            .iter()
            .filter(|e| e.ticket_id == Some(ticket_id))
            .cloned()
            .collect())
    }
}
