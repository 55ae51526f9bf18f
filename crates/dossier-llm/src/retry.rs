//! Retry with exponential backoff and jitter.
//!
//! Non-streaming generation calls are safe to rerun wholesale, so the retry
//! wrapper is a simple loop: run the operation, and if it fails with a
//! retryable error, wait with backoff and try again up to a bounded number
//! of attempts.

use std::future::Future;

use rand::Rng;
use tracing::debug;

use crate::generator::GeneratorResult;

/// Default maximum retries.
pub const DEFAULT_MAX_RETRIES: u32 = 3;
/// Default base delay in milliseconds.
pub const DEFAULT_BASE_DELAY_MS: u64 = 500;
/// Default maximum delay between retries in milliseconds.
pub const DEFAULT_MAX_DELAY_MS: u64 = 10_000;
/// Default jitter factor (0.0-1.0).
pub const DEFAULT_JITTER_FACTOR: f64 = 0.2;

/// Configuration for retry behavior.
#[derive(Clone, Debug)]
pub struct RetryConfig {
    /// Maximum retry attempts after the first try.
    pub max_retries: u32,
    /// Base delay for exponential backoff in ms.
    pub base_delay_ms: u64,
    /// Maximum delay between retries in ms.
    pub max_delay_ms: u64,
    /// Jitter factor 0.0-1.0.
    pub jitter_factor: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            base_delay_ms: DEFAULT_BASE_DELAY_MS,
            max_delay_ms: DEFAULT_MAX_DELAY_MS,
            jitter_factor: DEFAULT_JITTER_FACTOR,
        }
    }
}

/// Calculate the backoff delay for a zero-based attempt index.
///
/// Formula: `min(max_delay, base_delay * 2^attempt)`, then jitter applied
/// symmetrically (a factor of 0.2 varies the delay by up to ±20%).
#[must_use]
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn backoff_delay_ms(attempt: u32, config: &RetryConfig) -> u64 {
    let exp = config
        .base_delay_ms
        .saturating_mul(1_u64.checked_shl(attempt).unwrap_or(u64::MAX))
        .min(config.max_delay_ms);
    let jitter = rand::rng().random_range(-config.jitter_factor..=config.jitter_factor);
    let delayed = exp as f64 * (1.0 + jitter);
    delayed.max(0.0) as u64
}

/// Run an operation, retrying retryable [`GeneratorError`]s with backoff.
///
/// Non-retryable errors are returned immediately.
pub async fn with_retry<T, F, Fut>(config: &RetryConfig, mut op: F) -> GeneratorResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = GeneratorResult<T>>,
{
    let mut attempt = 0u32;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !err.is_retryable() || attempt >= config.max_retries {
                    return Err(err);
                }
                let delay = backoff_delay_ms(attempt, config);
                debug!(
                    attempt = attempt + 1,
                    delay_ms = delay,
                    category = err.category(),
                    "retrying generation call"
                );
                tokio::time::sleep(std::time::Duration::from_millis(delay)).await;
                attempt += 1;
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::GeneratorError;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast_config() -> RetryConfig {
        RetryConfig {
            max_retries: 3,
            base_delay_ms: 1,
            max_delay_ms: 2,
            jitter_factor: 0.0,
        }
    }

    fn retryable_error() -> GeneratorError {
        GeneratorError::Api {
            status: 503,
            message: "overloaded".into(),
            retryable: true,
        }
    }

    #[tokio::test]
    async fn success_on_first_try() {
        let calls = AtomicU32::new(0);
        let result = with_retry(&fast_config(), || {
            let _ = calls.fetch_add(1, Ordering::SeqCst);
            async { Ok::<_, GeneratorError>("ok") }
        })
        .await;
        assert_eq!(result.unwrap(), "ok");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn retries_retryable_until_success() {
        let calls = AtomicU32::new(0);
        let result = with_retry(&fast_config(), || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err(retryable_error())
                } else {
                    Ok("finally")
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), "finally");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn non_retryable_fails_immediately() {
        let calls = AtomicU32::new(0);
        let result: GeneratorResult<()> = with_retry(&fast_config(), || {
            let _ = calls.fetch_add(1, Ordering::SeqCst);
            async { Err(GeneratorError::EmptyResponse) }
        })
        .await;
        assert!(matches!(result, Err(GeneratorError::EmptyResponse)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn gives_up_after_max_retries() {
        let calls = AtomicU32::new(0);
        let result: GeneratorResult<()> = with_retry(&fast_config(), || {
            let _ = calls.fetch_add(1, Ordering::SeqCst);
            async { Err(retryable_error()) }
        })
        .await;
        assert!(result.is_err());
        // 1 initial try + 3 retries
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn backoff_doubles_and_caps() {
        let config = RetryConfig {
            max_retries: 5,
            base_delay_ms: 100,
            max_delay_ms: 350,
            jitter_factor: 0.0,
        };
        assert_eq!(backoff_delay_ms(0, &config), 100);
        assert_eq!(backoff_delay_ms(1, &config), 200);
        // 400 capped to 350
        assert_eq!(backoff_delay_ms(2, &config), 350);
        assert_eq!(backoff_delay_ms(10, &config), 350);
    }

    #[test]
    fn jitter_stays_in_band() {
        let config = RetryConfig {
            max_retries: 1,
            base_delay_ms: 1000,
            max_delay_ms: 60_000,
            jitter_factor: 0.2,
        };
        for _ in 0..100 {
            let d = backoff_delay_ms(0, &config);
            assert!((800..=1200).contains(&d), "delay {d} outside jitter band");
        }
    }
}
