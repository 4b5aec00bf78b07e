use std::fmt::Display;
use std::time::{Duration, Instant};

use tokio::time::sleep;
use tracing::warn;

/// Retry a transient async operation with exponential backoff, bounded to
/// at most `max_attempts` tries and `max_total` wall-clock time.
///
/// Unlike an unbounded retry loop, this stops attempting as soon as the
/// elapsed time would exceed `max_total`, even if attempts remain.
pub async fn retry_bounded<F, Fut, T, E>(
    mut operation: F,
    max_attempts: usize,
    max_total: Duration,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, E>>,
    E: Display,
{
    let started = Instant::now();
    let mut last_error = None;
    let mut delay = Duration::from_millis(250);

    for attempt in 1..=max_attempts {
        match operation().await {
            Ok(result) => return Ok(result),
            Err(e) => {
                let elapsed = started.elapsed();
                if attempt == max_attempts || elapsed >= max_total {
                    last_error = Some(e);
                    break;
                }

                let remaining = max_total.saturating_sub(elapsed);
                let sleep_for = delay.min(remaining);
                warn!(
                    "request failed (attempt {attempt}/{max_attempts}): {e}. retrying after {sleep_for:?}"
                );
                sleep(sleep_for).await;
                delay *= 2;
                last_error = Some(e);
            }
        }
    }

    #[allow(clippy::expect_used)]
    Err(last_error.expect("loop always records the last error before exiting"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn succeeds_on_first_attempt() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let result = retry_bounded(
            || {
                let attempts = attempts.clone();
                async move {
                    attempts.fetch_add(1, Ordering::SeqCst);
                    Ok::<(), String>(())
                }
            },
            3,
            Duration::from_secs(5),
        )
        .await;
        assert!(result.is_ok());
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn retries_up_to_max_attempts() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let result: Result<(), String> = retry_bounded(
            || {
                let attempts = attempts.clone();
                async move {
                    attempts.fetch_add(1, Ordering::SeqCst);
                    Err("fail".to_string())
                }
            },
            3,
            Duration::from_secs(5),
        )
        .await;
        assert!(result.is_err());
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn succeeds_after_transient_failures() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let result: Result<(), String> = retry_bounded(
            || {
                let attempts = attempts.clone();
                async move {
                    let count = attempts.fetch_add(1, Ordering::SeqCst) + 1;
                    if count < 2 { Err("fail".to_string()) } else { Ok(()) }
                }
            },
            3,
            Duration::from_secs(5),
        )
        .await;
        assert!(result.is_ok());
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }
}
