//! Server configuration management.
//!
//! Consolidates all environment variable reads and provides validated configuration.

use sixmax::db::{ConfigError as DatabaseConfigError, DatabaseConfig};
use std::{fmt, net::SocketAddr, str::FromStr};

/// Origin the web frontend is served from inside the compose network
pub const FRONTEND_CONTAINER_ORIGIN: &str = "http://frontend:3000";

/// Where stored hands live
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandStoreKind {
    Postgres,
    Memory,
}

impl FromStr for HandStoreKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(Self::Postgres),
            "memory" | "in-memory" => Ok(Self::Memory),
            other => Err(format!("unknown hand store {other:?}, use postgres or memory")),
        }
    }
}

impl fmt::Display for HandStoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandStoreKind::Postgres => write!(f, "postgres"),
            HandStoreKind::Memory => write!(f, "memory"),
        }
    }
}

/// Complete server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server bind address
    pub bind: SocketAddr,
    /// Hand store backend
    pub hand_store: HandStoreKind,
    /// Database configuration (used when the store is PostgreSQL)
    pub database: DatabaseConfig,
    /// Frontend origin allowed by CORS
    pub frontend_url: String,
    /// Prometheus exporter address, if metrics are enabled
    pub metrics_bind: Option<SocketAddr>,
}

/// CLI values that take precedence over the environment
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub bind: Option<SocketAddr>,
    pub database_url: Option<String>,
    pub hand_store: Option<HandStoreKind>,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// - `SERVER_BIND`, or `API_HOST` (default: 0.0.0.0) with `API_PORT` (default: 8000)
    /// - `HAND_STORE`: `postgres` (default) or `memory`
    /// - `DATABASE_URL` / `DB_HOST` / `DB_PORT` / `POSTGRES_*` and pool settings,
    ///   see [`DatabaseConfig::from_env`]
    /// - `FRONTEND_URL` (default: http://localhost:3000)
    /// - `METRICS_BIND` (optional)
    ///
    /// # Errors
    ///
    /// Returns error if a variable is present but invalid
    pub fn from_env(overrides: Overrides) -> Result<Self, ConfigError> {
        Self::from_lookup(overrides, |key| std::env::var(key).ok())
    }

    /// Same as [`ServerConfig::from_env`], reading variables through `lookup`.
    pub fn from_lookup<F>(overrides: Overrides, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind = match overrides.bind {
            Some(bind) => bind,
            None => match lookup("SERVER_BIND") {
                Some(raw) => parse_value("SERVER_BIND", &raw)?,
                None => {
                    let host = lookup("API_HOST").unwrap_or_else(|| "0.0.0.0".to_string());
                    let port: u16 = parse_env_or(&lookup, "API_PORT", 8000)?;
                    parse_value("API_HOST", &format!("{host}:{port}"))?
                }
            },
        };

        let hand_store = match overrides.hand_store {
            Some(kind) => kind,
            None => parse_env_or(&lookup, "HAND_STORE", HandStoreKind::Postgres)?,
        };

        let mut database = DatabaseConfig::from_lookup(&lookup)?;
        if let Some(url) = overrides.database_url {
            database.database_url = url;
        }

        let frontend_url =
            lookup("FRONTEND_URL").unwrap_or_else(|| "http://localhost:3000".to_string());

        let metrics_bind = lookup("METRICS_BIND")
            .filter(|raw| !raw.trim().is_empty())
            .map(|raw| parse_value("METRICS_BIND", &raw))
            .transpose()?;

        Ok(ServerConfig {
            bind,
            hand_store,
            database,
            frontend_url,
            metrics_bind,
        })
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.frontend_url.starts_with("http://") || self.frontend_url.starts_with("https://"))
        {
            return Err(ConfigError::Invalid {
                var: "FRONTEND_URL".to_string(),
                reason: "Must be an http(s) origin".to_string(),
            });
        }

        if self.metrics_bind == Some(self.bind) {
            return Err(ConfigError::Invalid {
                var: "METRICS_BIND".to_string(),
                reason: format!("Must differ from the server bind address ({})", self.bind),
            });
        }

        if self.hand_store == HandStoreKind::Postgres {
            self.database.validate()?;
        }

        Ok(())
    }

    /// Origins CORS lets through
    pub fn allowed_origins(&self) -> Vec<String> {
        let mut origins = vec![self.frontend_url.clone()];
        if self.frontend_url != FRONTEND_CONTAINER_ORIGIN {
            origins.push(FRONTEND_CONTAINER_ORIGIN.to_string());
        }
        origins
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },

    #[error(transparent)]
    Database(#[from] DatabaseConfigError),
}

/// Parse an environment variable, falling back to `default` when it's unset
fn parse_env_or<T, F>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => parse_value(key, &raw),
        None => Ok(default),
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        var: key.to_string(),
        reason: format!("{raw:?}: {e}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_lookup(Overrides::default(), lookup_from(&[])).unwrap();
        assert_eq!(config.bind, "0.0.0.0:8000".parse().unwrap());
        assert_eq!(config.hand_store, HandStoreKind::Postgres);
        assert_eq!(config.frontend_url, "http://localhost:3000");
        assert_eq!(config.metrics_bind, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_api_host_and_port() {
        let config = ServerConfig::from_lookup(
            Overrides::default(),
            lookup_from(&[("API_HOST", "127.0.0.1"), ("API_PORT", "9000")]),
        )
        .unwrap();
        assert_eq!(config.bind, "127.0.0.1:9000".parse().unwrap());
    }

    #[test]
    fn test_server_bind_beats_host_and_port() {
        let config = ServerConfig::from_lookup(
            Overrides::default(),
            lookup_from(&[("SERVER_BIND", "127.0.0.1:7000"), ("API_PORT", "9000")]),
        )
        .unwrap();
        assert_eq!(config.bind.port(), 7000);
    }

    #[test]
    fn test_overrides_win() {
        let overrides = Overrides {
            bind: Some("127.0.0.1:1234".parse().unwrap()),
            database_url: Some("postgres://cli@localhost/cli".to_string()),
            hand_store: Some(HandStoreKind::Memory),
        };
        let config = ServerConfig::from_lookup(
            overrides,
            lookup_from(&[
                ("SERVER_BIND", "127.0.0.1:7000"),
                ("HAND_STORE", "postgres"),
                ("DATABASE_URL", "postgres://env@localhost/env"),
            ]),
        )
        .unwrap();
        assert_eq!(config.bind.port(), 1234);
        assert_eq!(config.hand_store, HandStoreKind::Memory);
        assert_eq!(config.database.database_url, "postgres://cli@localhost/cli");
    }

    #[test]
    fn test_invalid_values_are_errors() {
        let err = ServerConfig::from_lookup(
            Overrides::default(),
            lookup_from(&[("API_PORT", "eighty")]),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref var, .. } if var == "API_PORT"));

        let err = ServerConfig::from_lookup(
            Overrides::default(),
            lookup_from(&[("HAND_STORE", "redis")]),
        )
        .unwrap_err();
        assert!(err.to_string().contains("HAND_STORE"));

        let err = ServerConfig::from_lookup(
            Overrides::default(),
            lookup_from(&[("DB_PORT", "x")]),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Database(_)));
    }

    #[test]
    fn test_validate_rejects_bad_frontend_url() {
        let config = ServerConfig::from_lookup(
            Overrides::default(),
            lookup_from(&[("FRONTEND_URL", "localhost:3000")]),
        )
        .unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_shared_metrics_port() {
        let config = ServerConfig::from_lookup(
            Overrides::default(),
            lookup_from(&[
                ("SERVER_BIND", "127.0.0.1:8000"),
                ("METRICS_BIND", "127.0.0.1:8000"),
            ]),
        )
        .unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_allowed_origins_include_frontend_container() {
        let config = ServerConfig::from_lookup(
            Overrides::default(),
            lookup_from(&[("FRONTEND_URL", "https://poker.example")]),
        )
        .unwrap();
        assert_eq!(
            config.allowed_origins(),
            vec!["https://poker.example", FRONTEND_CONTAINER_ORIGIN]
        );
    }

    #[test]
    fn test_hand_store_parse() {
        assert_eq!("Memory".parse(), Ok(HandStoreKind::Memory));
        assert_eq!("postgresql".parse(), Ok(HandStoreKind::Postgres));
        assert!("sqlite".parse::<HandStoreKind>().is_err());
    }

    #[test]
    #[serial]
    fn test_from_env_reads_process_env() {
        // SAFETY: serialized with every other env-mutating test.
        unsafe {
            std::env::set_var("HAND_STORE", "memory");
            std::env::set_var("API_PORT", "8123");
        }
        let config = ServerConfig::from_env(Overrides::default());
        unsafe {
            std::env::remove_var("HAND_STORE");
            std::env::remove_var("API_PORT");
        }
        let config = config.unwrap();
        assert_eq!(config.hand_store, HandStoreKind::Memory);
        assert_eq!(config.bind.port(), 8123);
    }
}
