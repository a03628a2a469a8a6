//! Principal domain model.

use uuid::Uuid;

use crate::models::role::{GlobalRole, OrgRole};

/// Raw session data produced by the authentication collaborator.
///
/// The access layer does not verify credentials itself — it receives this
/// record from whatever session/token machinery the host application
/// runs, and parses it fail-closed into a [`Principal`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionData {
    /// Authenticated user id (UUID string).
    pub user_id: String,
    /// Organization the session is bound to, if onboarding completed.
    pub organization_id: Option<String>,
    /// Platform-level role name.
    pub global_role: String,
    /// Organization-level role name, if org-bound.
    pub org_role: Option<String>,
}

/// The authenticated actor — parsed, read-only for the remainder of the
/// request, and discarded at request end.
///
/// Role fields are `None` when the session carried a role string the
/// registry does not recognize; such principals hold no permissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub global_role: Option<GlobalRole>,
    pub org_role: Option<OrgRole>,
}
