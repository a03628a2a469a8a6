//! Permission domain model.

use serde::{Deserialize, Serialize};

/// The global permission universe.
///
/// Covers organization management and the CRM capabilities gated by the
/// access layer. The set is closed; a capability that is not listed here
/// cannot be granted to any role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    // Organization management
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
    // CRM capabilities
    CustomersView,
    CustomersManage,
    CustomersDelete,
    ListingsView,
    ListingsManage,
    ListingsDelete,
}

impl Permission {
    /// Parse a permission name. Unknown names yield `None`, so typos
    /// fail closed rather than erroring.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "members_invite" => Some(Self::MembersInvite),
            "members_remove" => Some(Self::MembersRemove),
            "members_update_role" => Some(Self::MembersUpdateRole),
            "settings_edit" => Some(Self::SettingsEdit),
            "settings_billing" => Some(Self::SettingsBilling),
            "org_delete" => Some(Self::OrgDelete),
            "org_transfer" => Some(Self::OrgTransfer),
            "tools_install" => Some(Self::ToolsInstall),
            "tools_configure" => Some(Self::ToolsConfigure),
            "industry_configure" => Some(Self::IndustryConfigure),
            "customers_view" => Some(Self::CustomersView),
            "customers_manage" => Some(Self::CustomersManage),
            "customers_delete" => Some(Self::CustomersDelete),
            "listings_view" => Some(Self::ListingsView),
            "listings_manage" => Some(Self::ListingsManage),
            "listings_delete" => Some(Self::ListingsDelete),
            _ => None,
        }
    }
}
