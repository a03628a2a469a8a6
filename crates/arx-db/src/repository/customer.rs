//! SurrealDB implementation of [`CustomerRepository`].
//!
//! Every query carries the `organization_id` filter — the repository
//! never exposes an unscoped lookup.

use arx_core::error::AccessResult;
use arx_core::models::customer::{CreateCustomer, Customer, CustomerStatus, UpdateCustomer};
use arx_core::repository::{CustomerRepository, PaginatedResult, Pagination};
use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

fn parse_status(s: &str) -> Result<CustomerStatus, DbError> {
    match s {
        "Lead" => Ok(CustomerStatus::Lead),
        "Active" => Ok(CustomerStatus::Active),
        "Archived" => Ok(CustomerStatus::Archived),
        other => Err(DbError::Migration(format!(
            "unknown customer status: {other}"
        ))),
    }
}

fn status_to_string(s: &CustomerStatus) -> &'static str {
    match s {
        CustomerStatus::Lead => "Lead",
        CustomerStatus::Active => "Active",
        CustomerStatus::Archived => "Archived",
    }
}

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct CustomerRow {
    organization_id: String,
    name: String,
    email: String,
    phone: Option<String>,
    status: String,
    metadata: serde_json::Value,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl CustomerRow {
    fn into_customer(self, id: Uuid) -> Result<Customer, DbError> {
        let organization_id = Uuid::parse_str(&self.organization_id)
            .map_err(|e| DbError::Migration(format!("invalid org UUID: {e}")))?;
        Ok(Customer {
            id,
            organization_id,
            name: self.name,
            email: self.email,
            phone: self.phone,
            status: parse_status(&self.status)?,
            metadata: self.metadata,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct CustomerRowWithId {
    record_id: String,
    organization_id: String,
    name: String,
    email: String,
    phone: Option<String>,
    status: String,
    metadata: serde_json::Value,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl CustomerRowWithId {
    fn try_into_customer(self) -> Result<Customer, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Migration(format!("invalid UUID: {e}")))?;
        let organization_id = Uuid::parse_str(&self.organization_id)
            .map_err(|e| DbError::Migration(format!("invalid org UUID: {e}")))?;
        Ok(Customer {
            id,
            organization_id,
            name: self.name,
            email: self.email,
            phone: self.phone,
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

/// SurrealDB implementation of the Customer repository.
#[derive(Clone)]
pub struct SurrealCustomerRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealCustomerRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> CustomerRepository for SurrealCustomerRepository<C> {
    async fn create(&self, input: CreateCustomer) -> AccessResult<Customer> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();
        let metadata = input
            .metadata
            .unwrap_or(serde_json::Value::Object(Default::default()));

        let result = self
            .db
            .query(
                "CREATE type::record('customer', $id) SET \
                 organization_id = $org_id, \
                 name = $name, email = $email, phone = $phone, \
                 status = $status, \
                 metadata = $metadata",
            )
            .bind(("id", id_str.clone()))
            .bind(("org_id", input.organization_id.to_string()))
            .bind(("name", input.name))
            .bind(("email", input.email))
            .bind(("phone", input.phone))
            .bind(("status", "Lead".to_string()))
            .bind(("metadata", metadata))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<CustomerRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "customer".into(),
            id: id_str,
        })?;

        Ok(row.into_customer(id)?)
    }

    async fn get_by_id(&self, tenant_id: Uuid, id: Uuid) -> AccessResult<Customer> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query(
                "SELECT * FROM type::record('customer', $id) \
                 WHERE organization_id = $org_id",
            )
            .bind(("id", id_str.clone()))
            .bind(("org_id", tenant_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<CustomerRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "customer".into(),
            id: id_str,
        })?;

        Ok(row.into_customer(id)?)
    }

    async fn update(
        &self,
        tenant_id: Uuid,
        id: Uuid,
        input: UpdateCustomer,
    ) -> AccessResult<Customer> {
        let id_str = id.to_string();

        let mut sets = Vec::new();
        if input.name.is_some() {
            sets.push("name = $name");
        }
        if input.email.is_some() {
            sets.push("email = $email");
        }
        if input.phone.is_some() {
            sets.push("phone = $phone");
        }
        if input.status.is_some() {
            sets.push("status = $status");
        }
        if input.metadata.is_some() {
            sets.push("metadata = $metadata");
        }
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE type::record('customer', $id) SET {} \
             WHERE organization_id = $org_id",
            sets.join(", ")
        );

        let mut builder = self
            .db
            .query(&query)
            .bind(("id", id_str.clone()))
            .bind(("org_id", tenant_id.to_string()));

        if let Some(name) = input.name {
            builder = builder.bind(("name", name));
        }
        if let Some(email) = input.email {
            builder = builder.bind(("email", email));
        }
        if let Some(phone) = input.phone {
            // phone is Option<Option<String>>: Some(Some(v)) = set, Some(None) = clear
            builder = builder.bind(("phone", phone));
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

        let rows: Vec<CustomerRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "customer".into(),
            id: id_str,
        })?;

        Ok(row.into_customer(id)?)
    }

    async fn delete(&self, tenant_id: Uuid, id: Uuid) -> AccessResult<()> {
        self.db
            .query(
                "DELETE type::record('customer', $id) \
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
    ) -> AccessResult<PaginatedResult<Customer>> {
        let org_id_str = tenant_id.to_string();

        let mut count_result = self
            .db
            .query(
                "SELECT count() AS total FROM customer \
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
                 FROM customer \
                 WHERE organization_id = $org_id \
                 ORDER BY created_at ASC \
                 LIMIT $limit START $offset",
            )
            .bind(("org_id", org_id_str))
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<CustomerRowWithId> = result.take(0).map_err(DbError::from)?;

        let items = rows
            .into_iter()
            .map(|row| row.try_into_customer())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }
}
