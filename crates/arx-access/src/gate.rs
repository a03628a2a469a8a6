//! Scoped query gate.
//!
//! Every data operation runs through the gate with a [`TenantContext`]
//! attached. The gate checks the required permission before execution,
//! passes the context's tenant id to the operation (operations must be
//! written tenant-aware), and verifies after execution that returned
//! entities belong to the calling tenant. A cross-tenant hit is reported
//! as `NotFound` — never `Forbidden` — so existence across the tenant
//! boundary cannot be probed.
//!
//! Within one request the ordering is fixed: permission check, then the
//! operation, then the audit append. Audit writes are at-least-once;
//! committed side effects are not rolled back if the append fails.

use tracing::warn;
use uuid::Uuid;

use arx_core::context::TenantContext;
use arx_core::error::{AccessError, AccessResult};
use arx_core::models::audit::{AuditOutcome, CreateAuditEntry};
use arx_core::models::permission::Permission;
use arx_core::repository::{AuditLogRepository, PaginatedResult, TenantOwned};

use crate::audit::{AuditRecorder, AuditStatus};
use crate::config::AccessConfig;

/// Description of a gated mutation, used to build its audit entry.
#[derive(Debug, Clone)]
pub struct MutationSpec {
    pub permission: Permission,
    /// Audit action name, e.g. `ORG_UPDATE`.
    pub action: String,
    /// Audit target type, e.g. `organization`.
    pub target_type: String,
    pub target_id: Option<Uuid>,
    pub metadata: serde_json::Value,
}

/// A successful mutation plus the fate of its audit entry.
#[derive(Debug)]
pub struct MutationOutcome<T> {
    pub value: T,
    pub audit: AuditStatus,
}

/// The scoped query gate.
pub struct ScopedGate<A: AuditLogRepository> {
    recorder: AuditRecorder<A>,
    config: AccessConfig,
}

impl<A: AuditLogRepository> ScopedGate<A> {
    pub fn new(audit_repo: A, config: AccessConfig) -> Self {
        Self {
            recorder: AuditRecorder::new(audit_repo),
            config,
        }
    }

    pub fn recorder(&self) -> &AuditRecorder<A> {
        &self.recorder
    }

    /// Run a tenant-aware read returning a single entity.
    ///
    /// Fails `Forbidden` before the operation runs if the context lacks
    /// `permission`; collapses cross-tenant results into `NotFound`.
    pub async fn read_one<T, F, Fut>(
        &self,
        ctx: &TenantContext,
        permission: Permission,
        op: F,
    ) -> AccessResult<T>
    where
        T: TenantOwned,
        F: FnOnce(Uuid) -> Fut,
        Fut: Future<Output = AccessResult<T>>,
    {
        ctx.require(permission)?;
        let entity = op(ctx.tenant_id()).await?;
        verify_owner(ctx, entity)
    }

    /// Run a tenant-aware read returning a list; every row is verified.
    pub async fn read_many<T, F, Fut>(
        &self,
        ctx: &TenantContext,
        permission: Permission,
        op: F,
    ) -> AccessResult<Vec<T>>
    where
        T: TenantOwned,
        F: FnOnce(Uuid) -> Fut,
        Fut: Future<Output = AccessResult<Vec<T>>>,
    {
        ctx.require(permission)?;
        let items = op(ctx.tenant_id()).await?;
        items
            .into_iter()
            .map(|item| verify_owner(ctx, item))
            .collect()
    }

    /// Paginated variant of [`read_many`](Self::read_many).
    pub async fn read_page<T, F, Fut>(
        &self,
        ctx: &TenantContext,
        permission: Permission,
        op: F,
    ) -> AccessResult<PaginatedResult<T>>
    where
        T: TenantOwned,
        F: FnOnce(Uuid) -> Fut,
        Fut: Future<Output = AccessResult<PaginatedResult<T>>>,
    {
        ctx.require(permission)?;
        let PaginatedResult {
            items,
            total,
            offset,
            limit,
        } = op(ctx.tenant_id()).await?;
        let items = items
            .into_iter()
            .map(|item| verify_owner(ctx, item))
            .collect::<AccessResult<Vec<_>>>()?;
        Ok(PaginatedResult {
            items,
            total,
            offset,
            limit,
        })
    }

    /// Run a tenant-aware mutation and append exactly one audit entry on
    /// success.
    ///
    /// On `Forbidden` the operation never runs and nothing is audited.
    /// A failed audit append is logged and reported through
    /// [`MutationOutcome::audit`]; it does not fail the mutation.
    pub async fn mutate<T, F, Fut>(
        &self,
        ctx: &TenantContext,
        spec: MutationSpec,
        op: F,
    ) -> AccessResult<MutationOutcome<T>>
    where
        F: FnOnce(Uuid) -> Fut,
        Fut: Future<Output = AccessResult<T>>,
    {
        ctx.require(spec.permission)?;
        let value = op(ctx.tenant_id()).await?;
        let audit = self.append_audit(ctx, spec).await;
        Ok(MutationOutcome { value, audit })
    }

    /// Like [`mutate`](Self::mutate) for operations returning the
    /// mutated entity: the result's owning tenant is verified before the
    /// audit entry is written. A cross-tenant result maps to `NotFound`
    /// and suppresses the audit append.
    pub async fn mutate_owned<T, F, Fut>(
        &self,
        ctx: &TenantContext,
        spec: MutationSpec,
        op: F,
    ) -> AccessResult<MutationOutcome<T>>
    where
        T: TenantOwned,
        F: FnOnce(Uuid) -> Fut,
        Fut: Future<Output = AccessResult<T>>,
    {
        ctx.require(spec.permission)?;
        let value = op(ctx.tenant_id()).await?;
        let value = verify_owner(ctx, value)?;
        let audit = self.append_audit(ctx, spec).await;
        Ok(MutationOutcome { value, audit })
    }

    async fn append_audit(&self, ctx: &TenantContext, spec: MutationSpec) -> AuditStatus {
        let critical = self.config.is_audit_critical(&spec.action);
        let entry = CreateAuditEntry {
            tenant_id: ctx.tenant_id(),
            actor_id: ctx.principal_id(),
            action: spec.action,
            target_type: spec.target_type,
            target_id: spec.target_id,
            outcome: AuditOutcome::Success,
            metadata: spec.metadata,
        };
        self.recorder.record_best_effort(entry, critical).await
    }
}

/// Post-execution ownership check: an entity from another tenant is
/// indistinguishable from a missing one.
fn verify_owner<T: TenantOwned>(ctx: &TenantContext, entity: T) -> AccessResult<T> {
    if entity.owner_tenant_id() == ctx.tenant_id() {
        Ok(entity)
    } else {
        warn!(
            entity = T::KIND,
            tenant = %ctx.tenant_id(),
            owner = %entity.owner_tenant_id(),
            "cross-tenant row reached the gate; reporting NotFound"
        );
        Err(AccessError::NotFound {
            entity: T::KIND.into(),
            id: entity.id().to_string(),
        })
    }
}
