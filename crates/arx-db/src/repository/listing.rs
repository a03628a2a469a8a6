//! SurrealDB implementation of [`ListingRepository`].

use arx_core::error::AccessResult;
use arx_core::models::listing::{CreateListing, Listing, ListingStatus, UpdateListing};
use arx_core::repository::{ListingRepository, PaginatedResult, Pagination};
use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

fn parse_status(s: &str) -> Result<ListingStatus, DbError> {
    match s {
        "Draft" => Ok(ListingStatus::Draft),
        "Published" => Ok(ListingStatus::Published),
        "Sold" => Ok(ListingStatus::Sold),
        "Withdrawn" => Ok(ListingStatus::Withdrawn),
        other => Err(DbError::Migration(format!(
            "unknown listing status: {other}"
        ))),
    }
}

fn status_to_string(s: &ListingStatus) -> &'static str {
    match s {
        ListingStatus::Draft => "Draft",
        ListingStatus::Published => "Published",
        ListingStatus::Sold => "Sold",
        ListingStatus::Withdrawn => "Withdrawn",
    }
}

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct ListingRow {
    organization_id: String,
    title: String,
    address: String,
    price_cents: i64,
    status: String,
    metadata: serde_json::Value,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ListingRow {
    fn into_listing(self, id: Uuid) -> Result<Listing, DbError> {
        let organization_id = Uuid::parse_str(&self.organization_id)
            .map_err(|e| DbError::Migration(format!("invalid org UUID: {e}")))?;
        Ok(Listing {
            id,
            organization_id,
            title: self.title,
            address: self.address,
            price_cents: self.price_cents,
            status: parse_status(&self.status)?,
            metadata: self.metadata,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct ListingRowWithId {
    record_id: String,
    organization_id: String,
    title: String,
    address: String,
    price_cents: i64,
    status: String,
    metadata: serde_json::Value,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ListingRowWithId {
    fn try_into_listing(self) -> Result<Listing, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Migration(format!("invalid UUID: {e}")))?;
        let organization_id = Uuid::parse_str(&self.organization_id)
            .map_err(|e| DbError::Migration(format!("invalid org UUID: {e}")))?;
        Ok(Listing {
            id,
            organization_id,
            title: self.title,
            address: self.address,
            price_cents: self.price_cents,
            status: parse_status(&self.status)?,
            metadata: self.metadata,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Row struct for count queries.
#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

/// SurrealDB implementation of the Listing repository.
#[derive(Clone)]
pub struct SurrealListingRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealListingRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> ListingRepository for SurrealListingRepository<C> {
    async fn create(&self, input: CreateListing) -> AccessResult<Listing> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();
        let metadata = input
            .metadata
            .unwrap_or(serde_json::Value::Object(Default::default()));

        let result = self
            .db
            .query(
                "CREATE type::record('listing', $id) SET \
                 organization_id = $org_id, \
                 title = $title, address = $address, \
                 price_cents = $price_cents, \
                 status = $status, \
                 metadata = $metadata",
            )
            .bind(("id", id_str.clone()))
            .bind(("org_id", input.organization_id.to_string()))
            .bind(("title", input.title))
            .bind(("address", input.address))
            .bind(("price_cents", input.price_cents))
            .bind(("status", "Draft".to_string()))
            .bind(("metadata", metadata))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<ListingRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "listing".into(),
            id: id_str,
        })?;

        Ok(row.into_listing(id)?)
    }

    async fn get_by_id(&self, tenant_id: Uuid, id: Uuid) -> AccessResult<Listing> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query(
                "SELECT * FROM type::record('listing', $id) \
                 WHERE organization_id = $org_id",
            )
            .bind(("id", id_str.clone()))
            .bind(("org_id", tenant_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ListingRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "listing".into(),
            id: id_str,
        })?;

        Ok(row.into_listing(id)?)
    }

    async fn update(
        &self,
        tenant_id: Uuid,
        id: Uuid,
        input: UpdateListing,
    ) -> AccessResult<Listing> {
        let id_str = id.to_string();

        let mut sets = Vec::new();
        if input.title.is_some() {
            sets.push("title = $title");
        }
        if input.address.is_some() {
            sets.push("address = $address");
        }
        if input.price_cents.is_some() {
            sets.push("price_cents = $price_cents");
        }
        if input.status.is_some() {
            sets.push("status = $status");
        }
        if input.metadata.is_some() {
            sets.push("metadata = $metadata");
        }
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE type::record('listing', $id) SET {} \
             WHERE organization_id = $org_id",
            sets.join(", ")
        );

        let mut builder = self
            .db
            .query(&query)
            .bind(("id", id_str.clone()))
            .bind(("org_id", tenant_id.to_string()));

        if let Some(title) = input.title {
            builder = builder.bind(("title", title));
        }
        if let Some(address) = input.address {
            builder = builder.bind(("address", address));
        }
        if let Some(price_cents) = input.price_cents {
            builder = builder.bind(("price_cents", price_cents));
        }
        if let Some(ref status) = input.status {
            builder = builder.bind(("status", status_to_string(status).to_string()));
        }
        if let Some(metadata) = input.metadata {
            builder = builder.bind(("metadata", metadata));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<ListingRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "listing".into(),
            id: id_str,
        })?;

        Ok(row.into_listing(id)?)
    }

    async fn delete(&self, tenant_id: Uuid, id: Uuid) -> AccessResult<()> {
        self.db
            .query(
                "DELETE type::record('listing', $id) \
                 WHERE organization_id = $org_id",
            )
            .bind(("id", id.to_string()))
            .bind(("org_id", tenant_id.to_string()))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn list(
        &self,
        tenant_id: Uuid,
        pagination: Pagination,
    ) -> AccessResult<PaginatedResult<Listing>> {
        let org_id_str = tenant_id.to_string();

        let mut count_result = self
            .db
            .query(
                "SELECT count() AS total FROM listing \
                 WHERE organization_id = $org_id GROUP ALL",
            )
            .bind(("org_id", org_id_str.clone()))
            .await
            .map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * \
                 FROM listing \
                 WHERE organization_id = $org_id \
                 ORDER BY created_at ASC \
                 LIMIT $limit START $offset",
            )
            .bind(("org_id", org_id_str))
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ListingRowWithId> = result.take(0).map_err(DbError::from)?;

        let items = rows
            .into_iter()
            .map(|row| row.try_into_listing())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }
}
