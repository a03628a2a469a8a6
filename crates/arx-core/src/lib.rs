//! ARX Core — domain models, role/permission registry, tenant context,
//! and repository trait definitions.
//!
//! This crate holds everything the access layer shares with its
//! collaborators: the error taxonomy, the static RBAC registry, the
//! per-request [`TenantContext`](context::TenantContext), and the
//! tenant-scoped repository contracts implemented by `arx-db`.

pub mod context;
pub mod error;
pub mod industry;
pub mod models;
pub mod registry;
pub mod repository;
