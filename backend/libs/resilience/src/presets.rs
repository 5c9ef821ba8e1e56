/// Preset configurations for common backend types
use crate::timeout::TimeoutConfig;
use std::time::Duration;

/// Configuration bundle for a backend type
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub timeout: TimeoutConfig,
}

/// Database queries (PostgreSQL)
///
/// - Timeout: 2s (feed reads are single-index scans)
/// - No retry (retry policy belongs to the caller)
pub fn database_config() -> ServiceConfig {
    ServiceConfig {
        timeout: TimeoutConfig {
            duration: Duration::from_secs(2),
        },
    }
}
