//! Property listing domain model (tenant-scoped).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::repository::TenantOwned;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ListingStatus {
    Draft,
    Published,
    Sold,
    Withdrawn,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Listing {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub title: String,
    pub address: String,
    /// Asking price in cents, to avoid floating-point money.
    pub price_cents: i64,
    pub status: ListingStatus,
    pub metadata: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TenantOwned for Listing {
    const KIND: &'static str = "listing";

    fn id(&self) -> Uuid {
        self.id
    }

    fn owner_tenant_id(&self) -> Uuid {
        self.organization_id
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateListing {
    pub organization_id: Uuid,
    pub title: String,
    pub address: String,
    pub price_cents: i64,
    pub metadata: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateListing {
    pub title: Option<String>,
    pub address: Option<String>,
    pub price_cents: Option<i64>,
    pub status: Option<ListingStatus>,
    pub metadata: Option<serde_json::Value>,
}
