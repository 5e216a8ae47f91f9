/// Configuration management for Social Graph Service
///
/// Loaded from environment variables; `main` reads `.env` first via dotenvy.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application settings
    pub app: AppConfig,
    /// Database configuration
    pub database: DatabaseConfig,
    /// Which repository implementation backs the services
    pub storage: StorageConfig,
    /// Log output settings
    pub logging: LoggingConfig,
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

/// Database configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database URL
    pub url: String,
    /// Max connections in pool
    pub max_connections: u32,
    /// Min idle connections kept open
    pub min_connections: u32,
    /// Seconds to wait for a pooled connection
    pub acquire_timeout_secs: u64,
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("url", &"[REDACTED]")
            .field("max_connections", &self.max_connections)
            .field("min_connections", &self.min_connections)
            .field("acquire_timeout_secs", &self.acquire_timeout_secs)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Postgres,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StorageBackend::Postgres),
            "memory" | "in-memory" => Ok(StorageBackend::Memory),
            other => Err(format!(
                "STORAGE_BACKEND must be 'postgres' or 'memory', got '{}'",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub backend: StorageBackend,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub format: LogFormat,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, String> {
        let app_env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        let backend = match std::env::var("STORAGE_BACKEND") {
            Ok(value) => value.parse()?,
            Err(_) => StorageBackend::Postgres,
        };

        let database_url = match std::env::var("DATABASE_URL") {
            Ok(url) => url,
            Err(_) if backend == StorageBackend::Postgres => {
                return Err("DATABASE_URL must be set when STORAGE_BACKEND=postgres".to_string())
            }
            Err(_) => String::new(),
        };

        let format = match std::env::var("LOG_FORMAT") {
            Ok(value) if value.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Text,
        };

        Ok(Config {
            app: AppConfig {
                env: app_env,
                host: std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: parse_env_or_default("PORT", 8080)?,
            },
            database: DatabaseConfig {
                url: database_url,
                max_connections: parse_env_or_default("DB_MAX_CONNECTIONS", 10)?,
                min_connections: parse_env_or_default("DB_MIN_CONNECTIONS", 2)?,
                acquire_timeout_secs: parse_env_or_default("DB_ACQUIRE_TIMEOUT_SECS", 10)?,
            },
            storage: StorageConfig { backend },
            logging: LoggingConfig { format },
        })
    }

    pub fn bind_address(&self) -> (String, u16) {
        (self.app.host.clone(), self.app.port)
    }
}

fn parse_env_or_default<T>(key: &str, default: T) -> Result<T, String>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match std::env::var(key) {
        Ok(val) => val
            .parse()
            .map_err(|e| format!("Failed to parse {}='{}': {}", key, val, e)),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        for key in [
            "APP_ENV",
            "APP_HOST",
            "PORT",
            "DATABASE_URL",
            "DB_MAX_CONNECTIONS",
            "DB_MIN_CONNECTIONS",
            "DB_ACQUIRE_TIMEOUT_SECS",
            "STORAGE_BACKEND",
            "LOG_FORMAT",
        ] {
            std::env::remove_var(key);
        }
    }

    #[test]
    #[serial]
    fn test_memory_backend_needs_no_database() {
        clear_env();
        std::env::set_var("STORAGE_BACKEND", "memory");

        let config = Config::from_env().unwrap();
        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert_eq!(config.app.port, 8080);
        assert_eq!(config.app.host, "0.0.0.0");
        assert_eq!(config.logging.format, LogFormat::Text);
        assert_eq!(config.database.max_connections, 10);
        clear_env();
    }

    #[test]
    #[serial]
    fn test_postgres_backend_requires_database_url() {
        clear_env();

        let err = Config::from_env().unwrap_err();
        assert!(err.contains("DATABASE_URL"));

        std::env::set_var("DATABASE_URL", "postgres://localhost/social_graph");
        let config = Config::from_env().unwrap();
        assert_eq!(config.storage.backend, StorageBackend::Postgres);
        clear_env();
    }

    #[test]
    #[serial]
    fn test_overrides_are_parsed() {
        clear_env();
        std::env::set_var("STORAGE_BACKEND", "memory");
        std::env::set_var("PORT", "9091");
        std::env::set_var("LOG_FORMAT", "JSON");
        std::env::set_var("DB_MAX_CONNECTIONS", "32");

        let config = Config::from_env().unwrap();
        assert_eq!(config.bind_address(), ("0.0.0.0".to_string(), 9091));
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.database.max_connections, 32);
        clear_env();
    }

    #[test]
    #[serial]
    fn test_invalid_values_are_rejected() {
        clear_env();
        std::env::set_var("STORAGE_BACKEND", "cassandra");
        assert!(Config::from_env().is_err());

        std::env::set_var("STORAGE_BACKEND", "memory");
        std::env::set_var("PORT", "not-a-port");
        let err = Config::from_env().unwrap_err();
        assert!(err.contains("PORT"));
        clear_env();
    }

    #[test]
    fn test_database_url_is_redacted_in_debug() {
        let db = DatabaseConfig {
            url: "postgres://user:secret@db/social".to_string(),
            max_connections: 1,
            min_connections: 1,
            acquire_timeout_secs: 1,
        };
        assert!(!format!("{:?}", db).contains("secret"));
    }
}
