//! Bounded retry with exponential backoff for transient API errors.
//!
//! Retriable: [`ShopifyError::RateLimited`] (HTTP 429) and
//! [`ShopifyError::Http`] (network-level failures). Everything else —
//! 404s, unexpected statuses, deserialization failures — is propagated
//! immediately, since retrying would return the same result.

use std::future::Future;
use std::time::Duration;

use crate::error::ShopifyError;

fn is_retriable(err: &ShopifyError) -> bool {
    matches!(
        err,
        ShopifyError::RateLimited { .. } | ShopifyError::Http(_)
    )
}

/// Executes `operation`, retrying transient errors up to `max_retries`
/// additional attempts after the first try.
///
/// The wait before the n-th retry is `backoff_base_secs * 2^(n-1)` seconds,
/// except for a 429, where Shopify's `Retry-After` value is honored when it
/// is longer than the computed backoff.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_secs: u64,
    mut operation: F,
) -> Result<T, ShopifyError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ShopifyError>>,
{
    let mut attempt = 0u32;

    loop {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) || attempt >= max_retries {
                    return Err(err);
                }
                err
            }
        };

        // Exponential backoff: base * 2^attempt seconds, capped against
        // shift overflow on extreme configs.
        let mut delay_secs = backoff_base_secs.saturating_mul(1u64 << attempt.min(62));
        if let ShopifyError::RateLimited { retry_after_secs } = &err {
            delay_secs = delay_secs.max(*retry_after_secs);
        }

        tracing::warn!(
            attempt,
            max_retries,
            delay_secs,
            error = %err,
            "transient Shopify API error — retrying after backoff"
        );
        tokio::time::sleep(Duration::from_secs(delay_secs)).await;
        attempt += 1;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    use super::*;

    fn rate_limited() -> ShopifyError {
        ShopifyError::RateLimited {
            retry_after_secs: 0,
        }
    }

    #[tokio::test]
    async fn succeeds_immediately_on_first_try() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&calls);
        let result = retry_with_backoff(3, 0, || {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok::<u32, ShopifyError>(42)
            }
        })
        .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn retries_rate_limited_then_succeeds() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&calls);
        let result = retry_with_backoff(3, 0, || {
            let counter = Arc::clone(&counter);
            async move {
                if counter.fetch_add(1, Ordering::SeqCst) < 2 {
                    Err(rate_limited())
                } else {
                    Ok::<u32, ShopifyError>(99)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 99);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn gives_up_after_exhausting_retries() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&calls);
        let result = retry_with_backoff(2, 0, || {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err::<u32, ShopifyError>(rate_limited())
            }
        })
        .await;

        // max_retries=2 means 3 total attempts.
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert!(matches!(result, Err(ShopifyError::RateLimited { .. })));
    }

    #[tokio::test]
    async fn does_not_retry_unexpected_status() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&calls);
        let result = retry_with_backoff(3, 0, || {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err::<u32, ShopifyError>(ShopifyError::UnexpectedStatus {
                    status: 403,
                    url: "https://example.myshopify.com/admin/api/2024-01/products.json"
                        .to_owned(),
                })
            }
        })
        .await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(matches!(result, Err(ShopifyError::UnexpectedStatus { .. })));
    }
}
