//! Tenant context construction from raw session data.

use uuid::Uuid;

use arx_core::context::TenantContext;
use arx_core::error::{AccessError, AccessResult};
use arx_core::models::principal::{Principal, SessionData};
use arx_core::models::role::{GlobalRole, OrgRole};

/// Build the per-request [`TenantContext`] from the authentication
/// collaborator's session record.
///
/// Fails with [`AccessError::Unauthenticated`] when there is no session
/// or the identity is malformed, and with [`AccessError::NoOrganization`]
/// when the principal has no resolvable tenant (mid-onboarding) — callers
/// redirect to onboarding rather than treating that as a hard error.
///
/// Role strings parse fail-closed: an unrecognized role yields a context
/// that grants no permissions, not an error.
pub fn build_context(session: Option<&SessionData>) -> AccessResult<TenantContext> {
    let session = session.ok_or(AccessError::Unauthenticated)?;

    let user_id =
        Uuid::parse_str(&session.user_id).map_err(|_| AccessError::Unauthenticated)?;

    let organization_id = session
        .organization_id
        .as_deref()
        .ok_or(AccessError::NoOrganization)?;
    let organization_id =
        Uuid::parse_str(organization_id).map_err(|_| AccessError::NoOrganization)?;

    Ok(TenantContext::new(Principal {
        id: user_id,
        organization_id,
        global_role: GlobalRole::parse(&session.global_role),
        org_role: session.org_role.as_deref().and_then(OrgRole::parse),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use arx_core::models::permission::Permission;

    fn session(org_role: &str) -> SessionData {
        SessionData {
            user_id: "a9f0a2f6-6f1f-4a8e-b7e7-0c9a4f2d8e11".into(),
            organization_id: Some("7c8a1e9b-2d3c-4f5a-9b8c-1d2e3f4a5b6c".into()),
            global_role: "EMPLOYEE".into(),
            org_role: Some(org_role.into()),
        }
    }

    #[test]
    fn missing_session_is_unauthenticated() {
        assert!(matches!(
            build_context(None),
            Err(AccessError::Unauthenticated)
        ));
    }

    #[test]
    fn malformed_user_id_is_unauthenticated() {
        let mut s = session("ADMIN");
        s.user_id = "not-a-uuid".into();
        assert!(matches!(
            build_context(Some(&s)),
            Err(AccessError::Unauthenticated)
        ));
    }

    #[test]
    fn missing_organization_redirects_to_onboarding() {
        let mut s = session("ADMIN");
        s.organization_id = None;
        assert!(matches!(
            build_context(Some(&s)),
            Err(AccessError::NoOrganization)
        ));
    }

    #[test]
    fn context_carries_parsed_identity() {
        let s = session("ADMIN");
        let ctx = build_context(Some(&s)).unwrap();
        assert_eq!(ctx.principal_id().to_string(), s.user_id);
        assert_eq!(Some(ctx.tenant_id().to_string()), s.organization_id);
        assert_eq!(ctx.org_role(), Some(OrgRole::Admin));
    }

    #[test]
    fn rebuilding_from_same_session_yields_equal_contexts() {
        let s = session("MEMBER");
        let a = build_context(Some(&s)).unwrap();
        let b = build_context(Some(&s)).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.tenant_id(), b.tenant_id());
        assert_eq!(a.org_role(), b.org_role());
    }

    #[test]
    fn unknown_role_strings_grant_nothing() {
        let mut s = session("SUPERUSER");
        s.global_role = "ROOT".into();
        let ctx = build_context(Some(&s)).unwrap();
        assert_eq!(ctx.org_role(), None);
        assert!(!ctx.grants(Permission::CustomersView));
        assert!(!ctx.grants(Permission::OrgDelete));
    }
}
