//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async. Tenant-scoped repositories
//! require a `tenant_id` parameter to enforce data isolation — the
//! scoped gate supplies it from the request's tenant context.

use uuid::Uuid;

use crate::error::AccessResult;
use crate::models::audit::{AuditEntry, CreateAuditEntry};
use crate::models::customer::{CreateCustomer, Customer, UpdateCustomer};
use crate::models::listing::{CreateListing, Listing, UpdateListing};
use crate::models::organization::{CreateOrganization, Organization, UpdateOrganization};

/// An entity carrying its owning tenant's id.
///
/// The gate uses this to verify, after execution, that a returned row
/// belongs to the calling tenant.
pub trait TenantOwned {
    /// Entity kind used in `NotFound` errors and audit target types.
    const KIND: &'static str;

    fn id(&self) -> Uuid;
    fn owner_tenant_id(&self) -> Uuid;
}

/// Pagination parameters for list queries.
#[derive(Debug, Clone)]
pub struct Pagination {
    pub offset: u64,
    pub limit: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: 50,
        }
    }
}

/// A paginated result set.
#[derive(Debug, Clone)]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub offset: u64,
    pub limit: u64,
}

// ---------------------------------------------------------------------------
// Organizations (the tenants themselves)
// ---------------------------------------------------------------------------

pub trait OrganizationRepository: Send + Sync {
    fn create(
        &self,
        input: CreateOrganization,
    ) -> impl Future<Output = AccessResult<Organization>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = AccessResult<Organization>> + Send;
    fn get_by_slug(&self, slug: &str) -> impl Future<Output = AccessResult<Organization>> + Send;
    fn update(
        &self,
        id: Uuid,
        input: UpdateOrganization,
    ) -> impl Future<Output = AccessResult<Organization>> + Send;
    fn delete(&self, id: Uuid) -> impl Future<Output = AccessResult<()>> + Send;
    fn list(
        &self,
        pagination: Pagination,
    ) -> impl Future<Output = AccessResult<PaginatedResult<Organization>>> + Send;
}

// ---------------------------------------------------------------------------
// Tenant-scoped repositories
// ---------------------------------------------------------------------------

pub trait CustomerRepository: Send + Sync {
    fn create(&self, input: CreateCustomer)
    -> impl Future<Output = AccessResult<Customer>> + Send;
    fn get_by_id(
        &self,
        tenant_id: Uuid,
        id: Uuid,
    ) -> impl Future<Output = AccessResult<Customer>> + Send;
    fn update(
        &self,
        tenant_id: Uuid,
        id: Uuid,
        input: UpdateCustomer,
    ) -> impl Future<Output = AccessResult<Customer>> + Send;
    fn delete(&self, tenant_id: Uuid, id: Uuid) -> impl Future<Output = AccessResult<()>> + Send;
    fn list(
        &self,
        tenant_id: Uuid,
        pagination: Pagination,
    ) -> impl Future<Output = AccessResult<PaginatedResult<Customer>>> + Send;
}

pub trait ListingRepository: Send + Sync {
    fn create(&self, input: CreateListing) -> impl Future<Output = AccessResult<Listing>> + Send;
    fn get_by_id(
        &self,
        tenant_id: Uuid,
        id: Uuid,
    ) -> impl Future<Output = AccessResult<Listing>> + Send;
    fn update(
        &self,
        tenant_id: Uuid,
        id: Uuid,
        input: UpdateListing,
    ) -> impl Future<Output = AccessResult<Listing>> + Send;
    fn delete(&self, tenant_id: Uuid, id: Uuid) -> impl Future<Output = AccessResult<()>> + Send;
    fn list(
        &self,
        tenant_id: Uuid,
        pagination: Pagination,
    ) -> impl Future<Output = AccessResult<PaginatedResult<Listing>>> + Send;
}

// ---------------------------------------------------------------------------
// Audit (append-only, tenant-scoped)
// ---------------------------------------------------------------------------

/// Query filters for audit log entries.
#[derive(Debug, Clone, Default)]
pub struct AuditLogFilter {
    pub actor_id: Option<Uuid>,
    pub action: Option<String>,
    pub target_type: Option<String>,
    pub from: Option<chrono::DateTime<chrono::Utc>>,
    pub to: Option<chrono::DateTime<chrono::Utc>>,
}

pub trait AuditLogRepository: Send + Sync {
    /// Append a new audit entry. No update or delete operations exist.
    fn append(
        &self,
        input: CreateAuditEntry,
    ) -> impl Future<Output = AccessResult<AuditEntry>> + Send;
    fn list(
        &self,
        tenant_id: Uuid,
        filter: AuditLogFilter,
        pagination: Pagination,
    ) -> impl Future<Output = AccessResult<PaginatedResult<AuditEntry>>> + Send;
}
