//! SurrealDB repository implementations.

mod audit;
mod customer;
mod listing;
mod organization;

pub use audit::SurrealAuditLogRepository;
pub use customer::SurrealCustomerRepository;
pub use listing::SurrealListingRepository;
pub use organization::SurrealOrganizationRepository;
