//! Per-request tenant context.

use uuid::Uuid;

use crate::error::{AccessError, AccessResult};
use crate::models::permission::Permission;
use crate::models::principal::Principal;
use crate::models::role::{GlobalRole, OrgRole};
use crate::registry;

/// The per-request value every data-access call is scoped by.
///
/// Constructed once per request from the authenticated [`Principal`],
/// immutable afterwards, and never shared across concurrent requests.
/// Two contexts built from the same session data compare equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TenantContext {
    principal: Principal,
}

impl TenantContext {
    pub fn new(principal: Principal) -> Self {
        Self { principal }
    }

    pub fn principal_id(&self) -> Uuid {
        self.principal.id
    }

    pub fn tenant_id(&self) -> Uuid {
        self.principal.organization_id
    }

    pub fn global_role(&self) -> Option<GlobalRole> {
        self.principal.global_role
    }

    pub fn org_role(&self) -> Option<OrgRole> {
        self.principal.org_role
    }

    /// True iff this principal holds `permission`. Fail-closed: a
    /// context whose session carried unrecognized role strings grants
    /// nothing.
    pub fn grants(&self, permission: Permission) -> bool {
        registry::has_org_permission(
            self.principal.global_role,
            self.principal.org_role,
            permission,
        )
    }

    /// Like [`grants`](Self::grants), mapping refusal to
    /// [`AccessError::Forbidden`].
    pub fn require(&self, permission: Permission) -> AccessResult<()> {
        if self.grants(permission) {
            Ok(())
        } else {
            Err(AccessError::Forbidden)
        }
    }
}
