//! Role registry and permission resolver.
//!
//! The registry is a total, static mapping from every [`OrgRole`] to its
//! permission set. Resolution is pure and fail-closed: unknown role or
//! permission names grant nothing, and a `None` role (an unrecognized
//! session string) grants nothing for every permission.

use crate::models::permission::Permission;
use crate::models::role::{GlobalRole, OrgRole};

use Permission::*;

const OWNER_PERMISSIONS: &[Permission] = &[
    MembersInvite,
    MembersRemove,
    MembersUpdateRole,
    SettingsEdit,
    SettingsBilling,
    OrgDelete,
    OrgTransfer,
    ToolsInstall,
    ToolsConfigure,
    IndustryConfigure,
    CustomersView,
    CustomersManage,
    CustomersDelete,
    ListingsView,
    ListingsManage,
    ListingsDelete,
];

/// Everything the owner holds except billing, deletion, and transfer —
/// those stay with the organization owner.
const ADMIN_PERMISSIONS: &[Permission] = &[
    MembersInvite,
    MembersRemove,
    MembersUpdateRole,
    SettingsEdit,
    ToolsInstall,
    ToolsConfigure,
    IndustryConfigure,
    CustomersView,
    CustomersManage,
    CustomersDelete,
    ListingsView,
    ListingsManage,
    ListingsDelete,
];

const MEMBER_PERMISSIONS: &[Permission] = &[
    MembersInvite,
    ToolsConfigure,
    CustomersView,
    CustomersManage,
    ListingsView,
    ListingsManage,
];

const VIEWER_PERMISSIONS: &[Permission] = &[CustomersView, ListingsView];

impl OrgRole {
    /// The static permission set of this role.
    pub fn permissions(self) -> &'static [Permission] {
        match self {
            Self::Owner => OWNER_PERMISSIONS,
            Self::Admin => ADMIN_PERMISSIONS,
            Self::Member => MEMBER_PERMISSIONS,
            Self::Viewer => VIEWER_PERMISSIONS,
        }
    }
}

/// True iff `permission` is in `role`'s configured set.
pub fn has_permission(role: OrgRole, permission: Permission) -> bool {
    role.permissions().contains(&permission)
}

/// Resolve a permission for a principal's role pair.
///
/// A global [`GlobalRole::Admin`] bypasses org-level checks entirely.
/// `None` roles come from unrecognized session strings and resolve to
/// `false` for every permission.
pub fn has_org_permission(
    global: Option<GlobalRole>,
    org: Option<OrgRole>,
    permission: Permission,
) -> bool {
    if global == Some(GlobalRole::Admin) {
        return true;
    }
    org.is_some_and(|role| has_permission(role, permission))
}

/// String-shaped adapter for callers holding raw session values.
/// Unknown role or permission names resolve `false`, never error.
pub fn has_permission_named(role: &str, permission: &str) -> bool {
    match (OrgRole::parse(role), Permission::parse(permission)) {
        (Some(role), Some(permission)) => has_permission(role, permission),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_holds_every_permission() {
        for &p in OWNER_PERMISSIONS {
            assert!(has_permission(OrgRole::Owner, p));
        }
        assert!(has_permission(OrgRole::Owner, OrgDelete));
        assert!(has_permission(OrgRole::Owner, SettingsBilling));
    }

    #[test]
    fn admin_lacks_owner_only_permissions() {
        assert!(has_permission(OrgRole::Admin, MembersRemove));
        assert!(has_permission(OrgRole::Admin, SettingsEdit));
        assert!(!has_permission(OrgRole::Admin, SettingsBilling));
        assert!(!has_permission(OrgRole::Admin, OrgDelete));
        assert!(!has_permission(OrgRole::Admin, OrgTransfer));
    }

    #[test]
    fn member_has_limited_permissions() {
        assert!(has_permission(OrgRole::Member, MembersInvite));
        assert!(has_permission(OrgRole::Member, ToolsConfigure));
        assert!(!has_permission(OrgRole::Member, MembersRemove));
        assert!(!has_permission(OrgRole::Member, SettingsEdit));
        assert!(!has_permission(OrgRole::Member, OrgDelete));
    }

    #[test]
    fn viewer_is_read_only() {
        assert!(has_permission(OrgRole::Viewer, CustomersView));
        assert!(!has_permission(OrgRole::Viewer, CustomersManage));
        assert!(!has_permission(OrgRole::Viewer, MembersInvite));
        assert!(!has_permission(OrgRole::Viewer, OrgDelete));
    }

    #[test]
    fn resolution_is_deterministic() {
        // Repeated calls never differ: the registry is static data.
        for _ in 0..3 {
            assert!(has_permission(OrgRole::Owner, OrgTransfer));
            assert!(!has_permission(OrgRole::Viewer, OrgTransfer));
        }
    }

    #[test]
    fn global_admin_bypasses_org_role() {
        assert!(has_org_permission(
            Some(GlobalRole::Admin),
            Some(OrgRole::Viewer),
            OrgDelete
        ));
        assert!(has_org_permission(Some(GlobalRole::Admin), None, SettingsBilling));
    }

    #[test]
    fn other_global_roles_defer_to_org_role() {
        assert!(has_org_permission(
            Some(GlobalRole::Moderator),
            Some(OrgRole::Owner),
            OrgDelete
        ));
        assert!(!has_org_permission(
            Some(GlobalRole::Moderator),
            Some(OrgRole::Viewer),
            MembersInvite
        ));
        // Clients can still be org owners if invited.
        assert!(has_org_permission(
            Some(GlobalRole::Client),
            Some(OrgRole::Owner),
            SettingsBilling
        ));
    }

    #[test]
    fn unknown_roles_fail_closed() {
        for &p in OWNER_PERMISSIONS {
            assert!(!has_org_permission(None, None, p));
        }
        assert!(!has_permission_named("SUPERUSER", "customers_view"));
    }

    #[test]
    fn named_adapter_fails_closed_on_typos() {
        assert!(has_permission_named("OWNER", "org_delete"));
        assert!(!has_permission_named("OWNER", "org_deleet"));
        assert!(!has_permission_named("OWNR", "org_delete"));
        assert!(!has_permission_named("", ""));
    }
}
