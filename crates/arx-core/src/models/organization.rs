//! Organization domain model.
//!
//! An organization is the tenant: the unit of data isolation. Every
//! tenant-scoped entity carries its organization's id, and the scoped
//! gate refuses to return rows across that boundary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::industry::Industry;
use crate::repository::TenantOwned;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Organization {
    pub id: Uuid,
    /// Human-readable name.
    pub name: String,
    /// URL-safe unique identifier (e.g., `acme-realty`).
    pub slug: String,
    /// Vertical this organization operates in.
    pub industry: Industry,
    /// Arbitrary key-value metadata.
    pub metadata: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TenantOwned for Organization {
    const KIND: &'static str = "organization";

    fn id(&self) -> Uuid {
        self.id
    }

    /// An organization's owning tenant is itself.
    fn owner_tenant_id(&self) -> Uuid {
        self.id
    }
}

/// Fields required to create a new organization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrganization {
    pub name: String,
    pub slug: String,
    pub industry: Industry,
    pub metadata: Option<serde_json::Value>,
}

/// Fields that can be updated on an existing organization.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateOrganization {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub industry: Option<Industry>,
    pub metadata: Option<serde_json::Value>,
}
