//! ARX Access — per-request context construction, the scoped query
//! gate, and the audit recorder.
//!
//! Generic over the repository traits in `arx-core` so this layer has no
//! dependency on the database crate.

pub mod audit;
pub mod config;
pub mod gate;
pub mod rate_limit;
pub mod session;

pub use audit::{AuditRecorder, AuditStatus};
pub use config::AccessConfig;
pub use gate::{MutationOutcome, MutationSpec, ScopedGate};
pub use rate_limit::{RateDecision, RateLimiter};
pub use session::build_context;
