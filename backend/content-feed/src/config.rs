/// Configuration management for the content feed service
///
/// Everything is loaded from environment variables (optionally seeded from a
/// `.env` file by `main`).
use db_pool::DbConfig;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application settings
    pub app: AppConfig,
    /// CORS configuration
    pub cors: CorsConfig,
    /// Database configuration
    pub database: DatabaseConfig,
    /// Token verification
    pub auth: AuthConfig,
    /// Feed pagination and enrichment
    pub feed: FeedConfig,
}

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application environment (development, staging, production)
    pub env: String,
    /// Server host to bind to
    pub host: String,
    /// Server port to bind to
    pub port: u16,
}

/// CORS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Comma-separated list of allowed origins
    pub allowed_origins: String,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HS256 signing secret
    #[serde(skip_serializing)]
    pub jwt_secret: String,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"[REDACTED]")
            .finish()
    }
}

/// Feed pagination and enrichment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Posts per page
    pub page_size: u64,
    /// Max posts enriched at once
    pub enrich_concurrency: usize,
    /// Deadline for each store call
    pub store_timeout_ms: u64,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, String> {
        let app_env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());
        let is_production = app_env.eq_ignore_ascii_case("production");

        Ok(Config {
            app: AppConfig {
                env: app_env.clone(),
                host: std::env::var("CONTENT_FEED_HOST")
                    .unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: parse_env_or_default("CONTENT_FEED_PORT", 8081)?,
            },
            cors: {
                let allowed_origins = match std::env::var("CORS_ALLOWED_ORIGINS") {
                    Ok(value) => value,
                    Err(_) if is_production => {
                        return Err("CORS_ALLOWED_ORIGINS must be set in production".to_string())
                    }
                    Err(_) => "http://localhost:3000".to_string(),
                };

                if is_production && allowed_origins.trim() == "*" {
                    return Err("CORS_ALLOWED_ORIGINS cannot be '*' in production".to_string());
                }

                CorsConfig { allowed_origins }
            },
            database: DatabaseConfig {
                url: std::env::var("DATABASE_URL")
                    .unwrap_or_else(|_| "postgresql://localhost/content_feed".to_string()),
                max_connections: parse_env_or_default("DATABASE_MAX_CONNECTIONS", 10)?,
            },
            auth: AuthConfig {
                jwt_secret: match std::env::var("JWT_SECRET") {
                    Ok(secret) if !secret.trim().is_empty() => secret,
                    _ => return Err("JWT_SECRET must be set".to_string()),
                },
            },
            feed: {
                let page_size: u64 = parse_env_or_default("FEED_PAGE_SIZE", 9)?;
                if page_size == 0 {
                    return Err("FEED_PAGE_SIZE must be at least 1".to_string());
                }
                let enrich_concurrency: usize = parse_env_or_default("FEED_ENRICH_CONCURRENCY", 8)?;
                if enrich_concurrency == 0 {
                    return Err("FEED_ENRICH_CONCURRENCY must be at least 1".to_string());
                }

                FeedConfig {
                    page_size,
                    enrich_concurrency,
                    store_timeout_ms: parse_env_or_default("FEED_STORE_TIMEOUT_MS", 2_000)?,
                }
            },
        })
    }
}

impl DatabaseConfig {
    /// Pool settings for `service_name`, starting from the `DB_*` variables.
    ///
    /// `max_connections` replaces `DB_MAX_CONNECTIONS`: enrichment concurrency
    /// is capped against it, so the pool has to match.
    pub fn pool_config(&self, service_name: &str) -> DbConfig {
        let mut pool = DbConfig::from_env(service_name);
        let overridden = std::env::var("DB_MAX_CONNECTIONS").is_ok()
            && pool.max_connections != self.max_connections;
        if overridden {
            warn!(
                db_max_connections = pool.max_connections,
                database_max_connections = self.max_connections,
                "DB_MAX_CONNECTIONS ignored in favour of DATABASE_MAX_CONNECTIONS"
            );
        }
        pool.database_url = self.url.clone();
        pool.max_connections = self.max_connections;
        pool
    }
}

impl FeedConfig {
    /// Posts enriched at once. Each post holds two store calls in flight
    /// (likes and comments), so at most half the pool's connections.
    pub fn capped_concurrency(&self, max_connections: u32) -> usize {
        let per_post_budget = (max_connections / 2).max(1) as usize;
        self.enrich_concurrency.min(per_post_budget)
    }
}

fn parse_env_or_default<T>(key: &str, default: T) -> Result<T, String>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(val) => val
            .trim()
            .parse()
            .map_err(|e| format!("Failed to parse {}='{}': {}", key, val, e)),
        Err(_) => Ok(default),
    }
}
