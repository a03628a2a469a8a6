//! End-to-end tests for the scoped query gate: permission enforcement,
//! cross-tenant collapse to NotFound, and audit recording, wired to
//! real repositories over in-memory SurrealDB.

use std::sync::atomic::{AtomicBool, Ordering};

use arx_access::{AccessConfig, AuditStatus, MutationSpec, ScopedGate, build_context};
use arx_core::context::TenantContext;
use arx_core::error::{AccessError, AccessResult};
use arx_core::industry::Industry;
use arx_core::models::audit::{AuditEntry, CreateAuditEntry};
use arx_core::models::customer::CreateCustomer;
use arx_core::models::organization::{CreateOrganization, Organization, UpdateOrganization};
use arx_core::models::permission::Permission;
use arx_core::models::principal::SessionData;
use arx_core::repository::{
    AuditLogFilter, AuditLogRepository, CustomerRepository, OrganizationRepository,
    PaginatedResult, Pagination,
};
use arx_db::repository::{
    SurrealAuditLogRepository, SurrealCustomerRepository, SurrealOrganizationRepository,
};
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};
use uuid::Uuid;

/// Spin up in-memory DB, run migrations, create two organizations.
async fn setup() -> (Surreal<Db>, Organization, Organization) {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    arx_db::run_migrations(&db).await.unwrap();

    let org_repo = SurrealOrganizationRepository::new(db.clone());
    let org1 = org_repo
        .create(CreateOrganization {
            name: "Org One".into(),
            slug: "org-one".into(),
            industry: Industry::RealEstate,
            metadata: None,
        })
        .await
        .unwrap();
    let org2 = org_repo
        .create(CreateOrganization {
            name: "Org Two".into(),
            slug: "org-two".into(),
            industry: Industry::RealEstate,
            metadata: None,
        })
        .await
        .unwrap();

    (db, org1, org2)
}

fn context_for(org_id: Uuid, org_role: &str) -> TenantContext {
    let session = SessionData {
        user_id: Uuid::new_v4().to_string(),
        organization_id: Some(org_id.to_string()),
        global_role: "EMPLOYEE".into(),
        org_role: Some(org_role.into()),
    };
    build_context(Some(&session)).unwrap()
}

fn gate_for(db: &Surreal<Db>) -> ScopedGate<SurrealAuditLogRepository<Db>> {
    ScopedGate::new(
        SurrealAuditLogRepository::new(db.clone()),
        AccessConfig::default(),
    )
}

async fn audit_entries(db: &Surreal<Db>, tenant_id: Uuid) -> PaginatedResult<AuditEntry> {
    SurrealAuditLogRepository::new(db.clone())
        .list(tenant_id, AuditLogFilter::default(), Pagination::default())
        .await
        .unwrap()
}

fn org_delete_spec(org_id: Uuid) -> MutationSpec {
    MutationSpec {
        permission: Permission::OrgDelete,
        action: "ORG_DELETE".into(),
        target_type: "organization".into(),
        target_id: Some(org_id),
        metadata: serde_json::json!({}),
    }
}

// -----------------------------------------------------------------------
// Permission enforcement
// -----------------------------------------------------------------------

#[tokio::test]
async fn member_cannot_delete_organization() {
    let (db, org1, _) = setup().await;
    let gate = gate_for(&db);
    let ctx = context_for(org1.id, "MEMBER");

    let executed = AtomicBool::new(false);
    let result = gate
        .mutate(&ctx, org_delete_spec(org1.id), |_tid| {
            executed.store(true, Ordering::SeqCst);
            async { Ok::<(), AccessError>(()) }
        })
        .await;

    assert!(matches!(result, Err(AccessError::Forbidden)));
    // The operation never ran, and nothing was audited.
    assert!(!executed.load(Ordering::SeqCst));
    assert_eq!(audit_entries(&db, org1.id).await.total, 0);
}

#[tokio::test]
async fn owner_can_delete_own_organization() {
    let (db, org1, _) = setup().await;
    let gate = gate_for(&db);
    let ctx = context_for(org1.id, "OWNER");
    let org_repo = SurrealOrganizationRepository::new(db.clone());

    let outcome = gate
        .mutate(&ctx, org_delete_spec(org1.id), |tid| org_repo.delete(tid))
        .await
        .unwrap();

    assert_eq!(outcome.audit, AuditStatus::Recorded);
    assert!(org_repo.get_by_id(org1.id).await.is_err());

    let entries = audit_entries(&db, org1.id).await;
    assert_eq!(entries.total, 1);
    assert_eq!(entries.items[0].action, "ORG_DELETE");
}

#[tokio::test]
async fn viewer_reads_but_cannot_manage() {
    let (db, org1, _) = setup().await;
    let gate = gate_for(&db);
    let ctx = context_for(org1.id, "VIEWER");
    let customer_repo = SurrealCustomerRepository::new(db.clone());

    let customer = customer_repo
        .create(CreateCustomer {
            organization_id: org1.id,
            name: "Readable".into(),
            email: "readable@example.com".into(),
            phone: None,
            metadata: None,
        })
        .await
        .unwrap();

    let fetched = gate
        .read_one(&ctx, Permission::CustomersView, |tid| {
            customer_repo.get_by_id(tid, customer.id)
        })
        .await
        .unwrap();
    assert_eq!(fetched.id, customer.id);

    let result = gate
        .mutate(
            &ctx,
            MutationSpec {
                permission: Permission::CustomersDelete,
                action: "CUSTOMER_DELETE".into(),
                target_type: "customer".into(),
                target_id: Some(customer.id),
                metadata: serde_json::json!({}),
            },
            |tid| customer_repo.delete(tid, customer.id),
        )
        .await;

    assert!(matches!(result, Err(AccessError::Forbidden)));
}

#[tokio::test]
async fn global_admin_bypasses_org_role() {
    let (db, org1, _) = setup().await;
    let gate = gate_for(&db);
    let org_repo = SurrealOrganizationRepository::new(db.clone());

    // Platform admin with only VIEWER standing in the org.
    let session = SessionData {
        user_id: Uuid::new_v4().to_string(),
        organization_id: Some(org1.id.to_string()),
        global_role: "ADMIN".into(),
        org_role: Some("VIEWER".into()),
    };
    let ctx = build_context(Some(&session)).unwrap();

    let outcome = gate
        .mutate(&ctx, org_delete_spec(org1.id), |tid| org_repo.delete(tid))
        .await
        .unwrap();
    assert_eq!(outcome.audit, AuditStatus::Recorded);
}

// -----------------------------------------------------------------------
// Cross-tenant isolation
// -----------------------------------------------------------------------

#[tokio::test]
async fn cross_tenant_entity_is_not_found() {
    let (db, org1, org2) = setup().await;
    let gate = gate_for(&db);
    let ctx = context_for(org1.id, "ADMIN");
    let customer_repo = SurrealCustomerRepository::new(db.clone());

    let foreign = customer_repo
        .create(CreateCustomer {
            organization_id: org2.id,
            name: "Foreign".into(),
            email: "foreign@example.com".into(),
            phone: None,
            metadata: None,
        })
        .await
        .unwrap();

    // The tenant-aware operation filters by org1, so the row is simply
    // absent — NotFound, not Forbidden.
    let result = gate
        .read_one(&ctx, Permission::CustomersView, |tid| {
            customer_repo.get_by_id(tid, foreign.id)
        })
        .await;

    assert!(matches!(result, Err(AccessError::NotFound { .. })));
}

#[tokio::test]
async fn gate_catches_operation_that_ignores_tenant_filter() {
    let (db, org1, org2) = setup().await;
    let gate = gate_for(&db);
    let ctx = context_for(org1.id, "ADMIN");
    let org_repo = SurrealOrganizationRepository::new(db.clone());

    // A handler that forgot to thread the tenant id: it fetches org2
    // directly. The post-read ownership check converts the hit into
    // NotFound rather than leaking the foreign row.
    let result = gate
        .read_one(&ctx, Permission::SettingsEdit, |_tid| {
            org_repo.get_by_id(org2.id)
        })
        .await;

    match result {
        Err(AccessError::NotFound { entity, id }) => {
            assert_eq!(entity, "organization");
            assert_eq!(id, org2.id.to_string());
        }
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn read_page_verifies_every_row() {
    let (db, org1, _) = setup().await;
    let gate = gate_for(&db);
    let ctx = context_for(org1.id, "MEMBER");
    let customer_repo = SurrealCustomerRepository::new(db.clone());

    for i in 0..2 {
        customer_repo
            .create(CreateCustomer {
                organization_id: org1.id,
                name: format!("Customer {i}"),
                email: format!("c{i}@example.com"),
                phone: None,
                metadata: None,
            })
            .await
            .unwrap();
    }

    let page = gate
        .read_page(&ctx, Permission::CustomersView, |tid| {
            customer_repo.list(tid, Pagination::default())
        })
        .await
        .unwrap();

    assert_eq!(page.total, 2);
    assert!(page.items.iter().all(|c| c.organization_id == org1.id));
}

// -----------------------------------------------------------------------
// Audit recording
// -----------------------------------------------------------------------

#[tokio::test]
async fn org_update_records_exactly_one_audit_entry() {
    let (db, org1, _) = setup().await;
    let gate = gate_for(&db);
    let ctx = context_for(org1.id, "ADMIN");
    let org_repo = SurrealOrganizationRepository::new(db.clone());

    let outcome = gate
        .mutate_owned(
            &ctx,
            MutationSpec {
                permission: Permission::SettingsEdit,
                action: "ORG_UPDATE".into(),
                target_type: "organization".into(),
                target_id: Some(org1.id),
                metadata: serde_json::json!({ "field": "name" }),
            },
            |tid| {
                org_repo.update(
                    tid,
                    UpdateOrganization {
                        name: Some("Renamed".into()),
                        ..Default::default()
                    },
                )
            },
        )
        .await
        .unwrap();

    assert_eq!(outcome.value.name, "Renamed");
    assert_eq!(outcome.audit, AuditStatus::Recorded);

    let entries = audit_entries(&db, org1.id).await;
    assert_eq!(entries.total, 1);
    let entry = &entries.items[0];
    assert_eq!(entry.action, "ORG_UPDATE");
    assert_eq!(entry.tenant_id, ctx.tenant_id());
    assert_eq!(entry.actor_id, ctx.principal_id());
    assert_eq!(entry.target_id, Some(org1.id));
}

/// Audit repository that always fails, for degraded-success paths.
struct OfflineAuditLog;

impl AuditLogRepository for OfflineAuditLog {
    async fn append(&self, _input: CreateAuditEntry) -> AccessResult<AuditEntry> {
        Err(AccessError::Database("audit store offline".into()))
    }

    async fn list(
        &self,
        _tenant_id: Uuid,
        _filter: AuditLogFilter,
        _pagination: Pagination,
    ) -> AccessResult<PaginatedResult<AuditEntry>> {
        Err(AccessError::Database("audit store offline".into()))
    }
}

#[tokio::test]
async fn audit_failure_on_critical_action_degrades_success() {
    let (db, org1, _) = setup().await;
    let gate = ScopedGate::new(OfflineAuditLog, AccessConfig::default());
    let ctx = context_for(org1.id, "OWNER");
    let org_repo = SurrealOrganizationRepository::new(db.clone());

    // ORG_DELETE is audit-critical by default: the mutation succeeds
    // but the outcome carries the degraded-audit warning.
    let outcome = gate
        .mutate(&ctx, org_delete_spec(org1.id), |tid| org_repo.delete(tid))
        .await
        .unwrap();

    assert_eq!(outcome.audit, AuditStatus::Degraded);
    assert!(org_repo.get_by_id(org1.id).await.is_err());
}

#[tokio::test]
async fn audit_failure_on_noncritical_action_is_dropped() {
    let (db, org1, _) = setup().await;
    let gate = ScopedGate::new(OfflineAuditLog, AccessConfig::default());
    let ctx = context_for(org1.id, "ADMIN");
    let org_repo = SurrealOrganizationRepository::new(db.clone());

    let outcome = gate
        .mutate_owned(
            &ctx,
            MutationSpec {
                permission: Permission::SettingsEdit,
                action: "ORG_UPDATE".into(),
                target_type: "organization".into(),
                target_id: Some(org1.id),
                metadata: serde_json::json!({}),
            },
            |tid| {
                org_repo.update(
                    tid,
                    UpdateOrganization {
                        name: Some("Still Renamed".into()),
                        ..Default::default()
                    },
                )
            },
        )
        .await
        .unwrap();

    assert_eq!(outcome.audit, AuditStatus::Dropped);
    assert_eq!(outcome.value.name, "Still Renamed");
}

#[tokio::test]
async fn cross_tenant_mutation_result_suppresses_audit() {
    let (db, org1, org2) = setup().await;
    let gate = gate_for(&db);
    let ctx = context_for(org1.id, "ADMIN");
    let org_repo = SurrealOrganizationRepository::new(db.clone());

    // Mutation that ignores the tenant id and touches org2: the result
    // fails the ownership check, so the caller sees NotFound and no
    // audit entry is written for either tenant.
    let result = gate
        .mutate_owned(
            &ctx,
            MutationSpec {
                permission: Permission::SettingsEdit,
                action: "ORG_UPDATE".into(),
                target_type: "organization".into(),
                target_id: Some(org2.id),
                metadata: serde_json::json!({}),
            },
            |_tid| {
                org_repo.update(
                    org2.id,
                    UpdateOrganization {
                        name: Some("Hijacked".into()),
                        ..Default::default()
                    },
                )
            },
        )
        .await;

    assert!(matches!(result, Err(AccessError::NotFound { .. })));
    assert_eq!(audit_entries(&db, org1.id).await.total, 0);
    assert_eq!(audit_entries(&db, org2.id).await.total, 0);
}
