//! In-memory fixed-window rate limiter.
//!
//! Explicit, injected state: one instance is created at process start
//! and passed by reference to request handlers. Expired windows are
//! reclaimed by [`RateLimiter::sweep`], which the owner calls from its
//! housekeeping loop. Internal failures fail open — a broken limiter
//! must not take the platform down with it.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};

use crate::config::AccessConfig;

/// Outcome of a rate-limit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateDecision {
    pub allowed: bool,
    pub limit: u32,
    pub remaining: u32,
    /// When the current window ends.
    pub reset: DateTime<Utc>,
}

#[derive(Debug)]
struct Window {
    count: u32,
    reset_at: DateTime<Utc>,
}

/// Fixed-window request counter keyed by client identifier.
#[derive(Debug)]
pub struct RateLimiter {
    limit: u32,
    window: Duration,
    windows: Mutex<HashMap<String, Window>>,
}

impl RateLimiter {
    pub fn new(limit: u32, window_secs: u64) -> Self {
        Self {
            limit,
            window: Duration::seconds(window_secs as i64),
            windows: Mutex::new(HashMap::new()),
        }
    }

    pub fn from_config(config: &AccessConfig) -> Self {
        Self::new(config.rate_limit_max_requests, config.rate_limit_window_secs)
    }

    /// Count one request for `key` and decide whether it may proceed.
    pub fn check(&self, key: &str) -> RateDecision {
        let now = Utc::now();

        let mut windows = match self.windows.lock() {
            Ok(guard) => guard,
            // Poisoned lock: fail open rather than reject every request.
            Err(_) => {
                return RateDecision {
                    allowed: true,
                    limit: self.limit,
                    remaining: self.limit,
                    reset: now + self.window,
                };
            }
        };

        let window = windows.entry(key.to_string()).or_insert(Window {
            count: 0,
            reset_at: now + self.window,
        });

        if now >= window.reset_at {
            window.count = 0;
            window.reset_at = now + self.window;
        }

        if window.count < self.limit {
            window.count += 1;
            RateDecision {
                allowed: true,
                limit: self.limit,
                remaining: self.limit - window.count,
                reset: window.reset_at,
            }
        } else {
            RateDecision {
                allowed: false,
                limit: self.limit,
                remaining: 0,
                reset: window.reset_at,
            }
        }
    }

    /// Drop windows whose reset time has passed. Returns the number of
    /// entries removed.
    pub fn sweep(&self) -> usize {
        let now = Utc::now();
        match self.windows.lock() {
            Ok(mut windows) => {
                let before = windows.len();
                windows.retain(|_, w| w.reset_at > now);
                before - windows.len()
            }
            Err(_) => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allows_up_to_limit_then_rejects() {
        let limiter = RateLimiter::new(3, 3600);

        for expected_remaining in [2, 1, 0] {
            let decision = limiter.check("client-a");
            assert!(decision.allowed);
            assert_eq!(decision.limit, 3);
            assert_eq!(decision.remaining, expected_remaining);
        }

        let decision = limiter.check("client-a");
        assert!(!decision.allowed);
        assert_eq!(decision.remaining, 0);
    }

    #[test]
    fn keys_are_independent() {
        let limiter = RateLimiter::new(1, 3600);
        assert!(limiter.check("client-a").allowed);
        assert!(!limiter.check("client-a").allowed);
        assert!(limiter.check("client-b").allowed);
    }

    #[test]
    fn expired_window_resets_the_count() {
        // Zero-length window: every check starts a fresh window.
        let limiter = RateLimiter::new(1, 0);
        assert!(limiter.check("client-a").allowed);
        assert!(limiter.check("client-a").allowed);
    }

    #[test]
    fn sweep_drops_only_expired_windows() {
        let limiter = RateLimiter::new(5, 0);
        limiter.check("expired");
        assert_eq!(limiter.sweep(), 1);

        let limiter = RateLimiter::new(5, 3600);
        limiter.check("live");
        assert_eq!(limiter.sweep(), 0);
    }

    #[test]
    fn reset_is_in_the_future_for_live_windows() {
        let limiter = RateLimiter::new(5, 3600);
        let decision = limiter.check("client-a");
        assert!(decision.reset > Utc::now());
    }
}
