//! Role domain model.
//!
//! Roles are closed enums defined at build time. They are never compared
//! as strings outside the session boundary — handlers consult the
//! registry in [`crate::registry`] instead.

use serde::{Deserialize, Serialize};

/// Organization-level role of a member within their tenant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrgRole {
    Owner,
    Admin,
    Member,
    Viewer,
}

impl OrgRole {
    /// Parse a role string from session data. Unknown strings yield
    /// `None`, which grants no permissions anywhere downstream.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "OWNER" => Some(Self::Owner),
            "ADMIN" => Some(Self::Admin),
            "MEMBER" => Some(Self::Member),
            "VIEWER" => Some(Self::Viewer),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Owner => "OWNER",
            Self::Admin => "ADMIN",
            Self::Member => "MEMBER",
            Self::Viewer => "VIEWER",
        }
    }
}

/// Platform-level role, independent of any organization.
///
/// A global `Admin` bypasses org-level permission checks entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GlobalRole {
    Admin,
    Moderator,
    Employee,
    Client,
}

impl GlobalRole {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ADMIN" => Some(Self::Admin),
            "MODERATOR" => Some(Self::Moderator),
            "EMPLOYEE" => Some(Self::Employee),
            "CLIENT" => Some(Self::Client),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::Moderator => "MODERATOR",
            Self::Employee => "EMPLOYEE",
            Self::Client => "CLIENT",
        }
    }
}
