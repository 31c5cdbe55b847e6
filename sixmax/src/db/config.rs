//! Database configuration module.
//!
//! Provides configuration structures for database connection management.

use std::{env, str::FromStr};
use thiserror::Error;

/// Configuration error types
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required environment variable: {var}\nHint: {hint}")]
    MissingRequired { var: String, hint: String },

    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

/// Database configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub database_url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections in the pool
    pub min_connections: u32,

    /// Connection timeout in seconds
    pub connection_timeout_secs: u64,

    /// Idle connection timeout in seconds
    pub idle_timeout_secs: u64,

    /// Maximum connection lifetime in seconds
    pub max_lifetime_secs: u64,
}

impl DatabaseConfig {
    /// Create configuration from environment variables
    ///
    /// Expected environment variables:
    /// - `DATABASE_URL`: PostgreSQL connection string. When unset the URL is
    ///   assembled from `DB_HOST` (default: localhost), `DB_PORT` (default:
    ///   5432), `POSTGRES_USER` (default: postgres), `POSTGRES_PASSWORD`
    ///   (optional) and `POSTGRES_DB` (default: poker_db)
    /// - `DB_MAX_CONNECTIONS`: Maximum pool size (default: 20)
    /// - `DB_MIN_CONNECTIONS`: Minimum pool size (default: 5)
    /// - `DB_CONNECTION_TIMEOUT`: Connection timeout in seconds (default: 10)
    /// - `DB_IDLE_TIMEOUT`: Idle timeout in seconds (default: 600)
    /// - `DB_MAX_LIFETIME`: Max lifetime in seconds (default: 1800)
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if a numeric variable doesn't parse
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`DatabaseConfig::from_env`], reading variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = match lookup("DATABASE_URL") {
            Some(url) => url,
            None => {
                let host = lookup("DB_HOST").unwrap_or_else(|| "localhost".to_string());
                let port: u16 = parse_var(&lookup, "DB_PORT", 5432)?;
                let user = lookup("POSTGRES_USER").unwrap_or_else(|| "postgres".to_string());
                let db = lookup("POSTGRES_DB").unwrap_or_else(|| "poker_db".to_string());
                match lookup("POSTGRES_PASSWORD").filter(|p| !p.is_empty()) {
                    Some(password) => format!("postgres://{user}:{password}@{host}:{port}/{db}"),
                    None => format!("postgres://{user}@{host}:{port}/{db}"),
                }
            }
        };

        let config = Self {
            database_url,
            max_connections: parse_var(&lookup, "DB_MAX_CONNECTIONS", 20)?,
            min_connections: parse_var(&lookup, "DB_MIN_CONNECTIONS", 5)?,
            connection_timeout_secs: parse_var(&lookup, "DB_CONNECTION_TIMEOUT", 10)?,
            idle_timeout_secs: parse_var(&lookup, "DB_IDLE_TIMEOUT", 600)?,
            max_lifetime_secs: parse_var(&lookup, "DB_MAX_LIFETIME", 1800)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check pool bounds
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_connections == 0 {
            return Err(ConfigError::Invalid {
                var: "DB_MAX_CONNECTIONS".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }
        if self.min_connections > self.max_connections {
            return Err(ConfigError::Invalid {
                var: "DB_MIN_CONNECTIONS".to_string(),
                reason: format!(
                    "Must not exceed max connections ({})",
                    self.max_connections
                ),
            });
        }
        Ok(())
    }

    /// Create a default configuration for development
    ///
    /// Uses `postgres://postgres@localhost:5432/poker_db` as the database URL
    pub fn development() -> Self {
        Self {
            database_url: "postgres://postgres@localhost:5432/poker_db".to_string(),
            max_connections: 20,
            min_connections: 5,
            connection_timeout_secs: 10,
            idle_timeout_secs: 600,
            max_lifetime_secs: 1800,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self::development()
    }
}

fn parse_var<T, F>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            var: key.to_string(),
            reason: format!("{raw:?}: {e}"),
        }),
        None => Ok(default),
    }
}
