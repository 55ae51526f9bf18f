//! Fixed-window rate limiter keyed by caller identity × endpoint.
//!
//! Each (identity, endpoint) pair gets its own window. The first request in
//! a window starts it; requests past the endpoint's ceiling are refused with
//! a retry-after hint equal to the time left in the window. Endpoints
//! without a configured ceiling are unlimited.
//!
//! This is a separate axis from the quota gate: refusals here never touch
//! usage counters.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use serde::Serialize;
use tracing::warn;

use dossier_core::GateError;

struct WindowState {
    started: Instant,
    count: u32,
}

/// Per-endpoint ceilings over a shared fixed window.
pub struct RateLimiter {
    window: Duration,
    ceilings: HashMap<String, u32>,
    windows: Mutex<HashMap<(String, String), WindowState>>,
}

/// Snapshot of the limiter configuration for the stats endpoint.
#[derive(Clone, Debug, Serialize)]
pub struct RateLimitSnapshot {
    /// Window length in seconds.
    pub window_secs: u64,
    /// Ceiling per endpoint name.
    pub ceilings: HashMap<String, u32>,
}

impl RateLimiter {
    /// Create a limiter with a window length and no ceilings.
    #[must_use]
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            ceilings: HashMap::new(),
            windows: Mutex::new(HashMap::new()),
        }
    }

    /// Set the ceiling for an endpoint (builder style).
    #[must_use]
    pub fn with_ceiling(mut self, endpoint: &str, limit: u32) -> Self {
        let _ = self.ceilings.insert(endpoint.to_owned(), limit);
        self
    }

    /// Admit or refuse a request for `identity` on `endpoint`.
    pub fn admit(&self, identity: &str, endpoint: &str) -> Result<(), GateError> {
        let Some(&ceiling) = self.ceilings.get(endpoint) else {
            return Ok(());
        };

        let now = Instant::now();
        let mut windows = self.windows.lock();
        let state = windows
            .entry((identity.to_owned(), endpoint.to_owned()))
            .or_insert(WindowState {
                started: now,
                count: 0,
            });

        // Window elapsed: start a fresh one.
        if now.duration_since(state.started) >= self.window {
            state.started = now;
            state.count = 0;
        }

        if state.count >= ceiling {
            let remaining = self
                .window
                .saturating_sub(now.duration_since(state.started));
            let retry_after_secs = remaining.as_secs().max(1);
            warn!(endpoint, retry_after_secs, "rate limit exceeded");
            return Err(GateError::RateLimited { retry_after_secs });
        }

        state.count += 1;
        Ok(())
    }

    /// Configuration snapshot for `/stats`.
    #[must_use]
    pub fn snapshot(&self) -> RateLimitSnapshot {
        RateLimitSnapshot {
            window_secs: self.window.as_secs(),
            ceilings: self.ceilings.clone(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unlimited_endpoint_always_admits() {
        let limiter = RateLimiter::new(Duration::from_secs(60));
        for _ in 0..1000 {
            assert!(limiter.admit("caller", "stats").is_ok());
        }
    }

    #[test]
    fn ceiling_refuses_past_limit() {
        let limiter = RateLimiter::new(Duration::from_secs(60)).with_ceiling("complete", 3);
        for _ in 0..3 {
            assert!(limiter.admit("caller", "complete").is_ok());
        }
        let err = limiter.admit("caller", "complete").unwrap_err();
        assert!(matches!(err, GateError::RateLimited { .. }));
    }

    #[test]
    fn retry_after_hint_is_positive() {
        let limiter = RateLimiter::new(Duration::from_secs(60)).with_ceiling("research", 1);
        assert!(limiter.admit("caller", "research").is_ok());
        match limiter.admit("caller", "research") {
            Err(GateError::RateLimited { retry_after_secs }) => {
                assert!((1..=60).contains(&retry_after_secs));
            }
            other => panic!("expected RateLimited, got {other:?}"),
        }
    }

    #[test]
    fn callers_have_independent_windows() {
        let limiter = RateLimiter::new(Duration::from_secs(60)).with_ceiling("verify", 1);
        assert!(limiter.admit("alice", "verify").is_ok());
        assert!(limiter.admit("bob", "verify").is_ok());
        assert!(limiter.admit("alice", "verify").is_err());
    }

    #[test]
    fn endpoints_have_independent_windows() {
        let limiter = RateLimiter::new(Duration::from_secs(60))
            .with_ceiling("research", 1)
            .with_ceiling("verify", 1);
        assert!(limiter.admit("caller", "research").is_ok());
        assert!(limiter.admit("caller", "verify").is_ok());
        assert!(limiter.admit("caller", "research").is_err());
    }

    #[test]
    fn window_resets_after_elapsing() {
        let limiter = RateLimiter::new(Duration::from_millis(20)).with_ceiling("research", 1);
        assert!(limiter.admit("caller", "research").is_ok());
        assert!(limiter.admit("caller", "research").is_err());
        std::thread::sleep(Duration::from_millis(25));
        assert!(limiter.admit("caller", "research").is_ok());
    }

    #[test]
    fn snapshot_reports_configuration() {
        let limiter = RateLimiter::new(Duration::from_secs(60))
            .with_ceiling("research", 10)
            .with_ceiling("complete", 3);
        let snap = limiter.snapshot();
        assert_eq!(snap.window_secs, 60);
        assert_eq!(snap.ceilings.get("research"), Some(&10));
        assert_eq!(snap.ceilings.get("complete"), Some(&3));
    }
}
