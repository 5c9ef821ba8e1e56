/// Timeout wrapper for async operations
use std::future::Future;
use std::time::Duration;
use tokio::time::timeout;

#[derive(Debug, Clone)]
pub struct TimeoutConfig {
    pub duration: Duration,
}

/// Outcome of a bounded call that did not produce a value.
///
/// The inner error is kept typed so callers can still tell a failing store
/// apart from a slow one.
#[derive(Debug, thiserror::Error)]
pub enum TimeoutError<E> {
    #[error("Operation timed out after {0:?}")]
    Elapsed(Duration),
    #[error("Operation failed: {0}")]
    Failed(E),
}

/// Execute a fallible future with timeout
///
/// The wrapped future is dropped when the deadline passes, which cancels the
/// underlying call at its next await point.
pub async fn with_timeout_result<F, T, E>(
    duration: Duration,
    future: F,
) -> Result<T, TimeoutError<E>>
where
    F: Future<Output = Result<T, E>>,
{
    match timeout(duration, future).await {
        Ok(Ok(result)) => Ok(result),
        Ok(Err(e)) => Err(TimeoutError::Failed(e)),
        Err(_) => {
            tracing::warn!(timeout_ms = duration.as_millis() as u64, "bounded call timed out");
            Err(TimeoutError::Elapsed(duration))
        }
    }
}
