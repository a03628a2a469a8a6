//! Audit trail domain model.
//!
//! Entries are append-only: nothing in the API updates or deletes them.
//! `tenant_id` and `actor_id` are always copied from the triggering
//! tenant context, never accepted from request payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuditOutcome {
    Success,
    Denied,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub actor_id: Uuid,
    /// Action name, e.g. `ORG_UPDATE`, `CUSTOMER_DELETE`.
    pub action: String,
    /// Kind of the affected entity, e.g. `organization`.
    pub target_type: String,
    pub target_id: Option<Uuid>,
    pub outcome: AuditOutcome,
    pub metadata: serde_json::Value,
    pub timestamp: DateTime<Utc>,
}

/// Insert payload. The store assigns `id` and `timestamp`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAuditEntry {
    pub tenant_id: Uuid,
    pub actor_id: Uuid,
    pub action: String,
    pub target_type: String,
    pub target_id: Option<Uuid>,
    pub outcome: AuditOutcome,
    pub metadata: serde_json::Value,
}
