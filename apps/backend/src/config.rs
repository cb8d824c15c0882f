//! Service configuration loaded from the environment.

use std::str::FromStr;

use anyhow::Context;

/// Runtime settings for the server.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub max_connections: u32,
    /// Lifetime of issued auth tokens.
    pub token_ttl_days: i64,
    /// bcrypt work factor for new password hashes.
    pub password_hash_cost: u32,
    /// Lifetime of the cached lesson list.
    pub lessons_cache_ttl_secs: u64,
}

impl Config {
    /// Read configuration from environment variables (after `.env` is loaded).
    ///
    /// Required: DATABASE_URL. Optional: HOST, PORT, DATABASE_MAX_CONNECTIONS,
    /// TOKEN_TTL_DAYS, PASSWORD_HASH_COST, LESSONS_CACHE_TTL_SECS.
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

        Ok(Self {
            database_url,
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env_or("PORT", 3000)?,
            max_connections: env_or("DATABASE_MAX_CONNECTIONS", 10)?,
            token_ttl_days: env_or("TOKEN_TTL_DAYS", 30)?,
            password_hash_cost: env_or("PASSWORD_HASH_COST", bcrypt::DEFAULT_COST)?,
            lessons_cache_ttl_secs: env_or("LESSONS_CACHE_TTL_SECS", 5)?,
        })
    }

    /// Address to bind the listener to.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            host: "0.0.0.0".to_string(),
            port: 3000,
            max_connections: 10,
            token_ttl_days: 30,
            password_hash_cost: bcrypt::DEFAULT_COST,
            lessons_cache_ttl_secs: 5,
        }
    }
}

fn env_or<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse()
            .with_context(|| format!("{} has an invalid value: {:?}", key, raw)),
        Err(_) => Ok(default),
    }
}
