//! SurrealDB implementation of [`AuditLogRepository`].
//!
//! The audit log is append-only: this repository exposes `append` and
//! `list`, nothing else. Rows are never rewritten.

use arx_core::error::AccessResult;
use arx_core::models::audit::{AuditEntry, AuditOutcome, CreateAuditEntry};
use arx_core::repository::{AuditLogFilter, AuditLogRepository, PaginatedResult, Pagination};
use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

fn parse_outcome(s: &str) -> Result<AuditOutcome, DbError> {
    match s {
        "Success" => Ok(AuditOutcome::Success),
        "Denied" => Ok(AuditOutcome::Denied),
        other => Err(DbError::Migration(format!(
            "unknown audit outcome: {other}"
        ))),
    }
}

fn outcome_to_string(o: &AuditOutcome) -> &'static str {
    match o {
        AuditOutcome::Success => "Success",
        AuditOutcome::Denied => "Denied",
    }
}

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct AuditRow {
    tenant_id: String,
    actor_id: String,
    action: String,
    target_type: String,
    target_id: Option<String>,
    outcome: String,
    metadata: serde_json::Value,
    timestamp: DateTime<Utc>,
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct AuditRowWithId {
    record_id: String,
    tenant_id: String,
    actor_id: String,
    action: String,
    target_type: String,
    target_id: Option<String>,
    outcome: String,
    metadata: serde_json::Value,
    timestamp: DateTime<Utc>,
}

fn row_fields_into_entry(
    id: Uuid,
    tenant_id: &str,
    actor_id: &str,
    action: String,
    target_type: String,
    target_id: Option<String>,
    outcome: &str,
    metadata: serde_json::Value,
    timestamp: DateTime<Utc>,
) -> Result<AuditEntry, DbError> {
    let tenant_id = Uuid::parse_str(tenant_id)
        .map_err(|e| DbError::Migration(format!("invalid tenant UUID: {e}")))?;
    let actor_id = Uuid::parse_str(actor_id)
        .map_err(|e| DbError::Migration(format!("invalid actor UUID: {e}")))?;
    let target_id = target_id
        .map(|t| {
            Uuid::parse_str(&t).map_err(|e| DbError::Migration(format!("invalid target UUID: {e}")))
        })
        .transpose()?;
    Ok(AuditEntry {
        id,
        tenant_id,
        actor_id,
        action,
        target_type,
        target_id,
        outcome: parse_outcome(outcome)?,
        metadata,
        timestamp,
    })
}

impl AuditRow {
    fn into_entry(self, id: Uuid) -> Result<AuditEntry, DbError> {
        row_fields_into_entry(
            id,
            &self.tenant_id,
            &self.actor_id,
            self.action,
            self.target_type,
            self.target_id,
            &self.outcome,
            self.metadata,
            self.timestamp,
        )
    }
}

impl AuditRowWithId {
    fn try_into_entry(self) -> Result<AuditEntry, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Migration(format!("invalid UUID: {e}")))?;
        row_fields_into_entry(
            id,
            &self.tenant_id,
            &self.actor_id,
            self.action,
            self.target_type,
            self.target_id,
            &self.outcome,
            self.metadata,
            self.timestamp,
        )
    }
}

/// Row struct for count queries.
#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

/// SurrealDB implementation of the audit log repository.
#[derive(Clone)]
pub struct SurrealAuditLogRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealAuditLogRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

/// Build the WHERE clause for a filtered audit query. Bindings are
/// applied separately, in the same order the predicates are pushed.
fn filter_predicates(filter: &AuditLogFilter) -> Vec<&'static str> {
    let mut predicates = vec!["tenant_id = $tenant_id"];
    if filter.actor_id.is_some() {
        predicates.push("actor_id = $actor_id");
    }
    if filter.action.is_some() {
        predicates.push("action = $action");
    }
    if filter.target_type.is_some() {
        predicates.push("target_type = $target_type");
    }
    if filter.from.is_some() {
        predicates.push("timestamp >= $from");
    }
    if filter.to.is_some() {
        predicates.push("timestamp <= $to");
    }
    predicates
}

impl<C: Connection> AuditLogRepository for SurrealAuditLogRepository<C> {
    async fn append(&self, input: CreateAuditEntry) -> AccessResult<AuditEntry> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('audit_log', $id) SET \
                 tenant_id = $tenant_id, actor_id = $actor_id, \
                 action = $action, \
                 target_type = $target_type, target_id = $target_id, \
                 outcome = $outcome, \
                 metadata = $metadata",
            )
            .bind(("id", id_str.clone()))
            .bind(("tenant_id", input.tenant_id.to_string()))
            .bind(("actor_id", input.actor_id.to_string()))
            .bind(("action", input.action))
            .bind(("target_type", input.target_type))
            .bind(("target_id", input.target_id.map(|t| t.to_string())))
            .bind(("outcome", outcome_to_string(&input.outcome).to_string()))
            .bind(("metadata", input.metadata))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<AuditRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "audit_log".into(),
            id: id_str,
        })?;

        Ok(row.into_entry(id)?)
    }

    async fn list(
        &self,
        tenant_id: Uuid,
        filter: AuditLogFilter,
        pagination: Pagination,
    ) -> AccessResult<PaginatedResult<AuditEntry>> {
        let tenant_id_str = tenant_id.to_string();
        let where_clause = filter_predicates(&filter).join(" AND ");

        let count_query =
            format!("SELECT count() AS total FROM audit_log WHERE {where_clause} GROUP ALL");
        let list_query = format!(
            "SELECT meta::id(id) AS record_id, * FROM audit_log \
             WHERE {where_clause} \
             ORDER BY timestamp DESC \
             LIMIT $limit START $offset"
        );

        let mut count_builder = self
            .db
            .query(count_query)
            .bind(("tenant_id", tenant_id_str.clone()));
        let mut list_builder = self
            .db
            .query(list_query)
            .bind(("tenant_id", tenant_id_str))
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset));

        if let Some(actor_id) = filter.actor_id {
            let actor = actor_id.to_string();
            count_builder = count_builder.bind(("actor_id", actor.clone()));
            list_builder = list_builder.bind(("actor_id", actor));
        }
        if let Some(action) = filter.action {
            count_builder = count_builder.bind(("action", action.clone()));
            list_builder = list_builder.bind(("action", action));
        }
        if let Some(target_type) = filter.target_type {
            count_builder = count_builder.bind(("target_type", target_type.clone()));
            list_builder = list_builder.bind(("target_type", target_type));
        }
        if let Some(from) = filter.from {
            count_builder = count_builder.bind(("from", from));
            list_builder = list_builder.bind(("from", from));
        }
        if let Some(to) = filter.to {
            count_builder = count_builder.bind(("to", to));
            list_builder = list_builder.bind(("to", to));
        }

        let mut count_result = count_builder.await.map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        let mut result = list_builder.await.map_err(DbError::from)?;
        let rows: Vec<AuditRowWithId> = result.take(0).map_err(DbError::from)?;

        let items = rows
            .into_iter()
            .map(|row| row.try_into_entry())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }
}
