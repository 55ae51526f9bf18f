//! Admission-control errors.
//!
//! [`GateError`] covers every way a request can be refused before any
//! generation work starts: missing or invalid credential, exhausted quota,
//! or a rate-limit window violation. The server maps these onto HTTP status
//! codes via [`GateError::status_code`].

use thiserror::Error;

/// A request was refused by the auth gate or rate limiter.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GateError {
    /// No credential header was presented.
    #[error("API Key required. Add the API key header with your key.")]
    MissingKey,

    /// The presented credential is not in the configured set.
    #[error("Invalid API Key")]
    InvalidKey,

    /// The credential's usage ceiling has been exceeded.
    #[error("Usage limit exceeded. Limit: {limit} requests.")]
    QuotaExceeded {
        /// Configured ceiling for this credential.
        limit: u64,
    },

    /// Too many requests inside the current rate-limit window.
    #[error("Rate limit exceeded. Try again in {retry_after_secs} seconds.")]
    RateLimited {
        /// Seconds until the current window resets.
        retry_after_secs: u64,
    },
}

impl GateError {
    /// HTTP status code this error maps to at the API boundary.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::MissingKey => 401,
            Self::InvalidKey => 403,
            Self::QuotaExceeded { .. } | Self::RateLimited { .. } => 429,
        }
    }

    /// Retry-after hint in seconds, when the error carries one.
    #[must_use]
    pub fn retry_after_secs(&self) -> Option<u64> {
        match self {
            Self::RateLimited { retry_after_secs } => Some(*retry_after_secs),
            _ => None,
        }
    }
}
