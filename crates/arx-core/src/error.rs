//! Error types for the ARX access layer.

use thiserror::Error;

/// The access-layer error taxonomy.
///
/// The first four variants propagate to the route/action boundary and are
/// translated into user-facing responses there. `AuditWriteFailed` is
/// recovered locally by the gate and only surfaces for audit-critical
/// actions, as a degraded-success warning rather than a failure.
#[derive(Debug, Error)]
pub enum AccessError {
    /// No valid session. Callers redirect to login.
    #[error("authentication required")]
    Unauthenticated,

    /// Authenticated but not bound to an organization (mid-onboarding).
    /// Callers redirect to the onboarding flow.
    #[error("no organization")]
    NoOrganization,

    /// Permission check failed. The message deliberately names neither
    /// the role nor the missing permission.
    #[error("access denied")]
    Forbidden,

    /// Entity missing — or owned by another tenant. The two cases are
    /// indistinguishable to callers.
    #[error("not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    /// Audit append failed. Internal-only; never blocks the parent
    /// operation.
    #[error("audit write failed: {0}")]
    AuditWriteFailed(String),

    #[error("rate limit exceeded")]
    RateLimited,

    #[error("validation error: {message}")]
    Validation { message: String },

    #[error("database error: {0}")]
    Database(String),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type AccessResult<T> = Result<T, AccessError>;
