//! Process configuration read from the environment.
//!
//! Empty variables count as unset. Only malformed numbers are errors; every
//! missing value falls back to a default or is left for the database to
//! reject at the first query.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be a number, got {value:?}")]
    InvalidNumber { var: &'static str, value: String },

    #[error("TODO_STORE must be \"mysql\" or \"memory\", got {0:?}")]
    UnknownStore(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    MySql,
    Memory,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: Option<String>,
    pub database: Option<String>,
    pub max_connections: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub port: u16,
    pub database: DatabaseConfig,
    /// Extra origin allowed next to the two localhost dev origins.
    pub external_origin: Option<String>,
    pub backend: StoreBackend,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let backend = match get("TODO_STORE").as_deref().map(str::to_ascii_lowercase) {
            None => StoreBackend::MySql,
            Some(s) if s == "mysql" => StoreBackend::MySql,
            Some(s) if s == "memory" => StoreBackend::Memory,
            Some(other) => return Err(ConfigError::UnknownStore(other)),
        };

        Ok(Config {
            port: number(&get, "PORT", 3000)?,
            database: DatabaseConfig {
                host: get("DB_HOST").unwrap_or_else(|| "localhost".to_string()),
                port: number(&get, "DB_PORT", 3306)?,
                user: get("DB_USER").unwrap_or_else(|| "root".to_string()),
                password: get("DB_PASSWORD"),
                database: get("DB_NAME"),
                max_connections: number(&get, "DB_MAX_CONNECTIONS", 10)?,
            },
            external_origin: get("REACT_APP_API_URL"),
            backend,
        })
    }
}

fn number<T, G>(get: &G, var: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    G: Fn(&str) -> Option<String>,
{
    match get(var) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidNumber { var, value }),
    }
}
