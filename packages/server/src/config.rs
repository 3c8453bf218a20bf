use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::time::Duration;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    /// Optional read replica for listing queries. Status history is always
    /// read from the primary.
    pub database_replica_url: Option<String>,
    pub database_max_connections: u32,
    pub port: u16,
    pub status_cache_ttl: Duration,
    /// When set, matching also runs in-process on this interval instead of
    /// relying solely on an external caller of the internal endpoint.
    pub matching_interval: Option<Duration>,
    /// Nearest-K pre-narrowing for matching candidates (unset = all chairs).
    pub matching_candidate_pool: Option<i64>,
    pub payment_gateway_url: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            database_replica_url: env::var("DATABASE_REPLICA_URL").ok(),
            database_max_connections: parse_or("DATABASE_MAX_CONNECTIONS", 10)?,
            port: parse_or("PORT", 8080)?,
            status_cache_ttl: Duration::from_millis(parse_or("STATUS_CACHE_TTL_MS", 1000)?),
            matching_interval: parse_optional::<u64>("MATCHING_INTERVAL_MS")?
                .map(Duration::from_millis),
            matching_candidate_pool: parse_optional("MATCHING_CANDIDATE_POOL")?,
            payment_gateway_url: env::var("PAYMENT_GATEWAY_URL")
                .unwrap_or_else(|_| "http://localhost:12345".to_string()),
        })
    }
}

fn parse_or<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    Ok(parse_optional(key)?.unwrap_or(default))
}

fn parse_optional<T>(key: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map(Some)
            .with_context(|| format!("{} must be a valid number", key)),
        _ => Ok(None),
    }
}
