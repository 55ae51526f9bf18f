//! API-key gate with usage tracking.
//!
//! Flow per request: missing header → `MissingKey` (401); key not in the
//! credential store → `InvalidKey` (403); otherwise the usage counter is
//! incremented and the post-increment count is checked against the
//! credential's ceiling → `QuotaExceeded` (429) once it climbs past.
//!
//! The increment-then-check order is deliberate: the counter keeps climbing
//! on rejected calls. Usage state is only reset by an explicit
//! [`UsageTracker::clear`].

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use tracing::{debug, warn};

use dossier_core::GateError;

/// A configured caller identity.
#[derive(Clone, Debug)]
pub struct Credential {
    /// The shared-secret key string.
    pub key: String,
    /// Display name for logging and responses.
    pub name: String,
    /// Total-call ceiling.
    pub usage_limit: u64,
}

/// Pluggable credential lookup.
///
/// The gate logic only ever calls [`resolve`](CredentialStore::resolve), so
/// a deployment can back this with a database without touching the gate.
pub trait CredentialStore: Send + Sync {
    /// Look up a credential by its key string.
    fn resolve(&self, key: &str) -> Option<Credential>;
}

/// In-memory credential table.
pub struct StaticCredentialStore {
    credentials: HashMap<String, Credential>,
}

impl StaticCredentialStore {
    /// Build a store from a list of credentials.
    #[must_use]
    pub fn new(credentials: Vec<Credential>) -> Self {
        Self {
            credentials: credentials
                .into_iter()
                .map(|c| (c.key.clone(), c))
                .collect(),
        }
    }
}

impl CredentialStore for StaticCredentialStore {
    fn resolve(&self, key: &str) -> Option<Credential> {
        self.credentials.get(key).cloned()
    }
}

/// Running usage for one credential.
#[derive(Clone, Debug, Serialize)]
pub struct UsageRecord {
    /// Total calls made with this key (including rejected over-limit calls).
    pub count: u64,
    /// When the key was first seen.
    pub first_used: DateTime<Utc>,
}

/// Per-key usage counters.
///
/// Shared across all request tasks; the lock is held only for the map
/// operation, never across awaits.
#[derive(Default)]
pub struct UsageTracker {
    records: RwLock<HashMap<String, UsageRecord>>,
}

impl UsageTracker {
    /// Create an empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment the counter for a key, initializing the record on first
    /// use. Returns the post-increment count.
    pub fn record(&self, key: &str) -> u64 {
        let mut records = self.records.write();
        let record = records.entry(key.to_owned()).or_insert_with(|| UsageRecord {
            count: 0,
            first_used: Utc::now(),
        });
        record.count += 1;
        record.count
    }

    /// Current count for a key without incrementing.
    #[must_use]
    pub fn count(&self, key: &str) -> u64 {
        self.records.read().get(key).map_or(0, |r| r.count)
    }

    /// Admin reset: drop all usage records.
    pub fn clear(&self) {
        self.records.write().clear();
    }
}

/// What a successful authentication yields: the caller's identity plus its
/// current usage, echoed back in response bodies as `"{usage}/{limit}"`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AuthSession {
    /// Display name of the credential.
    pub name: String,
    /// Post-increment usage count for this call.
    pub usage: u64,
    /// Configured ceiling.
    pub limit: u64,
    /// The key itself (used as the rate-limit identity, never serialized).
    #[serde(skip)]
    pub key: String,
}

impl AuthSession {
    /// The `"{usage}/{limit}"` string responses carry.
    #[must_use]
    pub fn usage_display(&self) -> String {
        format!("{}/{}", self.usage, self.limit)
    }
}

/// The quota/auth gate.
pub struct ApiKeyGate {
    store: Arc<dyn CredentialStore>,
    tracker: Arc<UsageTracker>,
}

impl ApiKeyGate {
    /// Create a gate over a credential store and usage tracker.
    #[must_use]
    pub fn new(store: Arc<dyn CredentialStore>, tracker: Arc<UsageTracker>) -> Self {
        Self { store, tracker }
    }

    /// Validate a presented key and account for the call.
    pub fn authenticate(&self, presented: Option<&str>) -> Result<AuthSession, GateError> {
        let key = presented.ok_or(GateError::MissingKey)?;
        let Some(credential) = self.store.resolve(key) else {
            warn!("rejected request with unrecognized API key");
            return Err(GateError::InvalidKey);
        };

        // Increment before checking: over-limit calls still count.
        let usage = self.tracker.record(key);
        if usage > credential.usage_limit {
            warn!(
                caller = %credential.name,
                usage,
                limit = credential.usage_limit,
                "usage limit exceeded"
            );
            return Err(GateError::QuotaExceeded {
                limit: credential.usage_limit,
            });
        }

        debug!(caller = %credential.name, usage, limit = credential.usage_limit, "authenticated");
        Ok(AuthSession {
            name: credential.name,
            usage,
            limit: credential.usage_limit,
            key: key.to_owned(),
        })
    }

    /// The underlying usage tracker (for admin reset).
    #[must_use]
    pub fn tracker(&self) -> &Arc<UsageTracker> {
        &self.tracker
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn gate_with_limit(limit: u64) -> ApiKeyGate {
        let store = StaticCredentialStore::new(vec![Credential {
            key: "dev_key_123".into(),
            name: "Development".into(),
            usage_limit: limit,
        }]);
        ApiKeyGate::new(Arc::new(store), Arc::new(UsageTracker::new()))
    }

    #[test]
    fn missing_key_is_rejected() {
        let gate = gate_with_limit(10);
        assert_eq!(gate.authenticate(None), Err(GateError::MissingKey));
    }

    #[test]
    fn unknown_key_is_rejected() {
        let gate = gate_with_limit(10);
        assert_eq!(
            gate.authenticate(Some("nope")),
            Err(GateError::InvalidKey)
        );
    }

    #[test]
    fn first_call_yields_usage_one() {
        let gate = gate_with_limit(10);
        let session = gate.authenticate(Some("dev_key_123")).unwrap();
        assert_eq!(session.usage, 1);
        assert_eq!(session.limit, 10);
        assert_eq!(session.name, "Development");
        assert_eq!(session.usage_display(), "1/10");
    }

    #[test]
    fn call_past_ceiling_is_quota_exceeded() {
        let gate = gate_with_limit(2);
        assert!(gate.authenticate(Some("dev_key_123")).is_ok());
        assert!(gate.authenticate(Some("dev_key_123")).is_ok());
        assert_eq!(
            gate.authenticate(Some("dev_key_123")),
            Err(GateError::QuotaExceeded { limit: 2 })
        );
    }

    #[test]
    fn counter_keeps_climbing_past_ceiling() {
        // Increment-then-check: rejected calls still consume the counter.
        let gate = gate_with_limit(1);
        let _ = gate.authenticate(Some("dev_key_123"));
        let _ = gate.authenticate(Some("dev_key_123"));
        let _ = gate.authenticate(Some("dev_key_123"));
        assert_eq!(gate.tracker().count("dev_key_123"), 3);
    }

    #[test]
    fn rejected_keys_do_not_create_usage() {
        let gate = gate_with_limit(10);
        let _ = gate.authenticate(Some("nope"));
        assert_eq!(gate.tracker().count("nope"), 0);
    }

    #[test]
    fn clear_resets_usage() {
        let gate = gate_with_limit(1);
        let _ = gate.authenticate(Some("dev_key_123"));
        assert_eq!(
            gate.authenticate(Some("dev_key_123")),
            Err(GateError::QuotaExceeded { limit: 1 })
        );
        gate.tracker().clear();
        let session = gate.authenticate(Some("dev_key_123")).unwrap();
        assert_eq!(session.usage, 1);
    }

    #[test]
    fn usage_is_tracked_per_key() {
        let store = StaticCredentialStore::new(vec![
            Credential {
                key: "a".into(),
                name: "A".into(),
                usage_limit: 5,
            },
            Credential {
                key: "b".into(),
                name: "B".into(),
                usage_limit: 5,
            },
        ]);
        let gate = ApiKeyGate::new(Arc::new(store), Arc::new(UsageTracker::new()));
        let _ = gate.authenticate(Some("a"));
        let _ = gate.authenticate(Some("a"));
        let session = gate.authenticate(Some("b")).unwrap();
        assert_eq!(session.usage, 1);
        assert_eq!(gate.tracker().count("a"), 2);
    }

    #[test]
    fn tracker_records_first_used_once() {
        let tracker = UsageTracker::new();
        let _ = tracker.record("k");
        let first = tracker.records.read().get("k").unwrap().first_used;
        let _ = tracker.record("k");
        let second = tracker.records.read().get("k").unwrap().first_used;
        assert_eq!(first, second);
    }
}
