//! Audit recorder — append-only accountability trail.

use tracing::error;

use arx_core::error::{AccessError, AccessResult};
use arx_core::models::audit::{AuditEntry, CreateAuditEntry};
use arx_core::repository::AuditLogRepository;

/// What happened to a mutation's audit entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditStatus {
    /// Entry durably recorded.
    Recorded,
    /// Append failed on a non-critical action; logged and dropped.
    Dropped,
    /// Append failed on an audit-critical action; the mutation succeeded
    /// but callers should surface a warning so operators notice the gap.
    Degraded,
}

/// Records audit entries through an [`AuditLogRepository`].
pub struct AuditRecorder<A: AuditLogRepository> {
    repo: A,
}

impl<A: AuditLogRepository> AuditRecorder<A> {
    pub fn new(repo: A) -> Self {
        Self { repo }
    }

    /// Strict append: failures propagate as
    /// [`AccessError::AuditWriteFailed`].
    pub async fn record(&self, entry: CreateAuditEntry) -> AccessResult<AuditEntry> {
        self.repo
            .append(entry)
            .await
            .map_err(|e| AccessError::AuditWriteFailed(e.to_string()))
    }

    /// Best-effort append used by the gate after successful mutations.
    ///
    /// A failed write never fails the caller: it is logged as a system
    /// error and reported as [`AuditStatus::Dropped`], or
    /// [`AuditStatus::Degraded`] when the action is audit-critical.
    pub async fn record_best_effort(
        &self,
        entry: CreateAuditEntry,
        critical: bool,
    ) -> AuditStatus {
        let action = entry.action.clone();
        match self.repo.append(entry).await {
            Ok(_) => AuditStatus::Recorded,
            Err(e) => {
                error!(action = %action, error = %e, "audit append failed");
                if critical {
                    AuditStatus::Degraded
                } else {
                    AuditStatus::Dropped
                }
            }
        }
    }
}
