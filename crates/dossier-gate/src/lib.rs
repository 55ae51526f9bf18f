//! # dossier-gate
//!
//! The admission-control stack that wraps every protected endpoint:
//!
//! - [`ApiKeyGate`]: credential validation + per-key usage quota
//! - [`RateLimiter`]: fixed-window request ceilings per caller × endpoint
//! - [`ResponseCache`]: TTL + capacity-bounded cache over normalized queries
//!
//! The three are independent axes: the rate limiter never touches quota
//! state, and a cache hit still consumes quota (the gate runs first).

#![deny(unsafe_code)]

pub mod auth;
pub mod cache;
pub mod rate_limit;

pub use auth::{ApiKeyGate, AuthSession, Credential, CredentialStore, StaticCredentialStore, UsageTracker};
pub use cache::{CacheStats, ResponseCache};
pub use rate_limit::{RateLimitSnapshot, RateLimiter};
