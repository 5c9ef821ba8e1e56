/// Deadline helpers for calls into external stores
///
/// Every read the feed core issues against PostgreSQL is bounded by a
/// caller-supplied deadline. This crate keeps that policy in one place:
/// - **Timeout**: wraps a future and fails once the deadline elapses
/// - **Presets**: pre-tuned deadlines per backend type
///
/// No retries happen here. A call that fails or times out is reported to the
/// caller, which owns any retry policy.
///
/// # Example: Database Query with Timeout
///
/// ```rust,no_run
/// use resilience::{presets, timeout::with_timeout_result};
///
/// #[tokio::main]
/// async fn main() {
///     let config = presets::database_config();
///
///     let result = with_timeout_result(
///         config.timeout.duration,
///         async {
///             // Your database query
///             Ok::<_, String>(())
///         }
///     ).await;
///     assert!(result.is_ok());
/// }
/// ```

pub mod presets;
pub mod timeout;

pub use presets::{database_config, ServiceConfig};
pub use timeout::{with_timeout_result, TimeoutConfig, TimeoutError};
