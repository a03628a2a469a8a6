//! Customer domain model (tenant-scoped CRM contact).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::repository::TenantOwned;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CustomerStatus {
    Lead,
    Active,
    Archived,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub status: CustomerStatus,
    pub metadata: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TenantOwned for Customer {
    const KIND: &'static str = "customer";

    fn id(&self) -> Uuid {
        self.id
    }

    fn owner_tenant_id(&self) -> Uuid {
        self.organization_id
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCustomer {
    pub organization_id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub metadata: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateCustomer {
    pub name: Option<String>,
    pub email: Option<String>,
    /// `Some(Some(val))` = set, `Some(None)` = clear, `None` = no change.
    pub phone: Option<Option<String>>,
    pub status: Option<CustomerStatus>,
    pub metadata: Option<serde_json::Value>,
}
