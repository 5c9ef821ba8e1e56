/// Content Feed Library
///
/// Serves a paginated feed of posts where the page window wraps around the
/// end of the post list, each post enriched with its like count and comment
/// thread, alongside the post, like and comment endpoints that feed it.
///
/// # Modules
///
/// - `handlers`: HTTP request handlers and route registration
/// - `models`: Feed, post and comment payloads
/// - `services`: Pagination, engagement enrichment, feed assembly and content operations
/// - `db`: Store traits and PostgreSQL repositories
/// - `middleware`: JWT authentication and request metrics
/// - `error`: Error types and HTTP mapping
/// - `config`: Configuration management
/// - `metrics`: Prometheus collectors
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod models;
pub mod services;

pub use config::Config;
pub use error::{AppError, Result};
