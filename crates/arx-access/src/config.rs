//! Access layer configuration.

/// Configuration for the gate, recorder, and rate limiter.
#[derive(Debug, Clone)]
pub struct AccessConfig {
    /// Actions whose audit entry must not be silently lost. A failed
    /// append on one of these degrades the mutation's reported success.
    pub audit_critical_actions: Vec<String>,
    /// Requests allowed per client per window (default: 100).
    pub rate_limit_max_requests: u32,
    /// Rate-limit window length in seconds (default: 60).
    pub rate_limit_window_secs: u64,
}

impl AccessConfig {
    pub fn is_audit_critical(&self, action: &str) -> bool {
        self.audit_critical_actions.iter().any(|a| a == action)
    }
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            audit_critical_actions: vec![
                "ORG_DELETE".into(),
                "ORG_TRANSFER".into(),
                "MEMBER_REMOVE".into(),
            ],
            rate_limit_max_requests: 100,
            rate_limit_window_secs: 60,
        }
    }
}
