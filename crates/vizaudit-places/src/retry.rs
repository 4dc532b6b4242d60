//! Retry with exponential back-off and jitter for the places client.
//!
//! [`retry_with_backoff`] wraps any fallible async operation and retries on
//! transient errors (network failures, 5xx). Application-level errors are
//! returned immediately — retrying a malformed response or a missing place
//! will not change the answer.

use std::future::Future;
use std::time::Duration;

use crate::error::PlacesError;

/// Returns `true` for errors that are worth retrying after a back-off delay.
///
/// **Retriable:**
/// - Network-level failures: timeout, connection reset.
/// - HTTP 5xx responses: transient server/infrastructure errors.
///
/// **Not retriable (hard stop):**
/// - [`PlacesError::ApiError`] — the provider rejected the request.
/// - [`PlacesError::NotFound`] — the place does not exist.
/// - [`PlacesError::Deserialize`] — malformed response; retrying won't fix it.
pub(crate) fn is_retriable(err: &PlacesError) -> bool {
    match err {
        PlacesError::Http(e) => {
            e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
        }
        PlacesError::ApiError(_)
        | PlacesError::NotFound { .. }
        | PlacesError::Deserialize { .. } => false,
    }
}

/// Runs `operation` with up to `max_retries` additional attempts on transient errors.
///
/// Back-off before the n-th retry is `backoff_base_ms * 2^(n-1)` capped at
/// 60 s, with ±25 % jitter so concurrent audits don't retry in lockstep.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_ms: u64,
    mut operation: F,
) -> Result<T, PlacesError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, PlacesError>>,
{
    const MAX_DELAY_MS: u64 = 60_000;
    let mut attempt = 0u32;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) || attempt >= max_retries {
                    return Err(err);
                }
                attempt += 1;
                let computed = backoff_base_ms.saturating_mul(1u64 << (attempt - 1).min(10));
                let capped = computed.min(MAX_DELAY_MS);
                #[allow(
                    clippy::cast_possible_truncation,
                    clippy::cast_sign_loss,
                    clippy::cast_precision_loss
                )]
                let delay_ms = (capped as f64 * (rand::random::<f64>() * 0.5 + 0.75)) as u64;
                tracing::warn!(
                    attempt,
                    max_retries,
                    delay_ms,
                    error = %err,
                    "places transient error — retrying after back-off"
                );
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn deserialize_err() -> PlacesError {
        let src = serde_json::from_str::<()>("invalid").unwrap_err();
        PlacesError::Deserialize {
            context: "test".to_owned(),
            source: src,
        }
    }

    #[test]
    fn api_error_is_not_retriable() {
        assert!(!is_retriable(&PlacesError::ApiError("bad".to_owned())));
    }

    #[test]
    fn not_found_is_not_retriable() {
        assert!(!is_retriable(&PlacesError::NotFound {
            place_id: "p1".to_owned()
        }));
    }

    #[test]
    fn deserialize_error_is_not_retriable() {
        assert!(!is_retriable(&deserialize_err()));
    }

    #[tokio::test]
    async fn succeeds_immediately_on_first_try() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_with_backoff(3, 0, || {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Ok::<u32, PlacesError>(42)
            }
        })
        .await;
        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn does_not_retry_api_error() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_with_backoff(3, 0, || {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Err::<u32, _>(PlacesError::ApiError("REQUEST_DENIED".to_owned()))
            }
        })
        .await;
        assert_eq!(calls.load(Ordering::SeqCst), 1, "ApiError must not be retried");
        assert!(matches!(result, Err(PlacesError::ApiError(_))));
    }

    #[tokio::test]
    async fn retries_connect_errors_then_succeeds() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_with_backoff(3, 0, || {
            let c = Arc::clone(&c);
            async move {
                let attempt = c.fetch_add(1, Ordering::SeqCst) + 1;
                if attempt < 3 {
                    // Simulate a retriable HTTP connect error
                    let err = reqwest::Client::new()
                        .get("http://0.0.0.0:1")
                        .send()
                        .await
                        .unwrap_err();
                    Err::<u32, _>(PlacesError::Http(err))
                } else {
                    Ok(99)
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), 99, "should succeed after retries");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }
}
