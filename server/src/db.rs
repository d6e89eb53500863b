//! MySQL connection pool.

use std::time::Duration;

use sqlx::mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions};

use crate::config::DatabaseConfig;

/// How long a request waits for a pooled connection before failing.
pub const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(10);

pub fn connect_options(config: &DatabaseConfig) -> MySqlConnectOptions {
    let mut options = MySqlConnectOptions::new()
        .host(&config.host)
        .port(config.port)
        .username(&config.user);
    if let Some(password) = &config.password {
        options = options.password(password);
    }
    if let Some(database) = &config.database {
        options = options.database(database);
    }
    options
}

/// Build the pool without opening a connection.
///
/// An unreachable or misconfigured database is reported by the first query
/// (as a 500 to that request), not at startup.
pub fn connect_lazy(config: &DatabaseConfig) -> MySqlPool {
    tracing::info!(
        host = %config.host,
        port = config.port,
        database = config.database.as_deref().unwrap_or(""),
        max_connections = config.max_connections,
        "configuring MySQL pool"
    );
    MySqlPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .connect_lazy_with(connect_options(config))
}
